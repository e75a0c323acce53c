//! Unified error type.

use std::borrow::Cow;

use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::status::Status;

/// Message shown to clients when a failure carries no message of its own.
pub const DEFAULT_MESSAGE: &str = "An error occurred processing your request.";

/// The error type returned by handlers and quill's fallible operations.
///
/// Domain failures ([`NotFound`](Error::NotFound), [`Conflict`](Error::Conflict),
/// [`Validation`](Error::Validation), ...) are recovered at the router boundary
/// and rendered as JSON or HTML. Infrastructure failures become a 500 with
/// [`DEFAULT_MESSAGE`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The request body ran past the limit, in bytes.
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("database: {0}")]
    Database(#[from] DbErr),

    #[error("template: {0}")]
    Template(#[from] tera::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// A validation failure on a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError { field: field.into(), message: message.into() }])
    }

    /// HTTP status the catcher answers with.
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound(_)        => Status::NotFound,
            Self::Conflict(_)        => Status::BadRequest,
            Self::BadRequest(_)      => Status::BadRequest,
            Self::MethodNotAllowed   => Status::MethodNotAllowed,
            Self::PayloadTooLarge(_) => Status::ContentTooLarge,
            Self::Validation(_)      => Status::UnprocessableContent,
            Self::Database(_)
            | Self::Template(_)
            | Self::Io(_)
            | Self::Internal(_)      => Status::InternalServerError,
        }
    }

    /// Client-facing message. Infrastructure details never leave the process.
    pub fn message(&self) -> Cow<'_, str> {
        match self {
            Self::NotFound(m) | Self::Conflict(m) | Self::BadRequest(m) if !m.is_empty() => {
                Cow::Borrowed(m.as_str())
            }
            Self::MethodNotAllowed | Self::PayloadTooLarge(_) => Cow::Owned(self.to_string()),
            _ => Cow::Borrowed(DEFAULT_MESSAGE),
        }
    }

    /// `true` for failures the client caused.
    pub fn is_client_error(&self) -> bool {
        self.status().code() < 500
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError { field: field.clone(), message: describe(e) })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        Self::Validation(fields)
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let bound = |name: &str| error.params.get(name).and_then(serde_json::Value::as_u64);
    match &*error.code {
        "length" => match (bound("min"), bound("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max} characters"),
            (Some(min), None) => format!("must be at least {min} character(s)"),
            (None, Some(max)) => format!("must be at most {max} characters"),
            (None, None) => "has an invalid length".to_owned(),
        },
        "email" => "value is not a valid email address".to_owned(),
        code => format!("failed the `{code}` check"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_failure_taxonomy() {
        assert_eq!(Error::not_found("x").status(), Status::NotFound);
        assert_eq!(Error::conflict("x").status(), Status::BadRequest);
        assert_eq!(Error::invalid("f", "m").status(), Status::UnprocessableContent);
        assert_eq!(Error::PayloadTooLarge(16).status(), Status::ContentTooLarge);
        assert_eq!(Error::Internal("boom".into()).status(), Status::InternalServerError);
    }

    #[test]
    fn infrastructure_messages_are_not_leaked() {
        let err = Error::Database(DbErr::Custom("disk on fire".into()));
        assert_eq!(err.message(), DEFAULT_MESSAGE);
        assert!(!err.is_client_error());
    }

    #[test]
    fn empty_domain_message_falls_back_to_default() {
        assert_eq!(Error::not_found("").message(), DEFAULT_MESSAGE);
        assert_eq!(Error::not_found("Post with id 3 not found").message(), "Post with id 3 not found");
    }

    #[test]
    fn oversized_body_is_a_client_error_naming_the_limit() {
        let err = Error::PayloadTooLarge(1024);
        assert!(err.is_client_error());
        assert_eq!(err.message(), "Request body exceeds 1024 bytes");
    }
}
