//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers return anything that implements [`IntoResponse`]: a [`Response`],
//! a [`Json`] or [`Html`] wrapper, or either of those paired with a
//! [`Status`] as `(Status::Created, Json(user))`.

use bytes::Bytes;
use http::{HeaderName, HeaderValue};
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content types quill writes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Html, // text/html; charset=utf-8
    Json, // application/json
    Text, // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use quill::{ContentType, Response, Status};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::builder()
///     .status(Status::Created)
///     .header("location", "/api/users/42")
///     .bytes(ContentType::Json, br#"{"id":42}"#.to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK`, `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().bytes(ContentType::Json, body)
    }

    /// `200 OK`, `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::builder().bytes(ContentType::Html, body.into().into_bytes())
    }

    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().bytes(ContentType::Text, body.into().into_bytes())
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    pub fn status_code(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into the hyper response the server writes. Headers that are
    /// not valid HTTP are dropped with an error log.
    pub(crate) fn into_hyper(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();
        for (name, value) in self.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    res.headers_mut().append(name, value);
                }
                _ => error!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a typed body.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.as_str().to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

/// Overrides the status of any other response: `(Status::Created, Json(user))`.
impl<R: IntoResponse> IntoResponse for (Status, R) {
    fn into_response(self) -> Response {
        let mut res = self.1.into_response();
        res.status = self.0;
        res
    }
}

/// A serde-serializable value written as `application/json`.
#[derive(Debug)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("failed to serialize response body: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }
}

/// A rendered page written as `text/html`.
#[derive(Debug)]
pub struct Html(pub String);

impl IntoResponse for Html {
    fn into_response(self) -> Response { Response::html(self.0) }
}
