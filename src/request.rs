//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::Error;
use crate::method::Method;

/// Largest request body the server buffers.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// An incoming HTTP request with its body fully buffered.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request by hand. The server builds them from hyper; tests use this.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Buffers an incoming request, up to [`MAX_BODY_BYTES`] of body. The
    /// method has already been parsed by the caller.
    pub(crate) async fn from_http<B>(method: Method, req: http::Request<B>) -> Result<Self, Error>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let body = Limited::new(body, MAX_BODY_BYTES)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    Error::PayloadTooLarge(MAX_BODY_BYTES)
                } else {
                    Error::BadRequest(format!("failed to read request body: {e}"))
                }
            })?
            .to_bytes();
        Ok(Self {
            method,
            path: parts.uri.path().to_owned(),
            body,
            params: HashMap::new(),
        })
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{user_id}`, `req.param("user_id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a named integer id from the path. A missing or malformed value
    /// is a validation failure on that parameter.
    pub fn id(&self, key: &str) -> Result<i32, Error> {
        self.param(key)
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| Error::invalid(key, "value is not a valid integer"))
    }

    /// Deserializes the JSON body and runs its field constraints.
    pub fn json<T: DeserializeOwned + Validate>(&self) -> Result<T, Error> {
        let value: T = serde_json::from_slice(&self.body)
            .map_err(|e| Error::invalid("body", format!("invalid JSON body: {e}")))?;
        value.validate()?;
        Ok(value)
    }
}
