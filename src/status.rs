//! HTTP status codes the service answers with, as a typed enum.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()`,
//! `Response::builder().status()`, or paired with a body as `(Status, body)`.

/// Status codes produced by quill's handlers and error catcher.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                   // 200
    Created,              // 201

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,           // 400
    NotFound,             // 404
    MethodNotAllowed,     // 405
    ContentTooLarge,      // 413
    UnprocessableContent, // 422

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError,  // 500
    ServiceUnavailable,   // 503
}

impl Status {
    /// Numeric status code.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok                   => 200,
            Self::Created              => 201,
            Self::BadRequest           => 400,
            Self::NotFound             => 404,
            Self::MethodNotAllowed     => 405,
            Self::ContentTooLarge      => 413,
            Self::UnprocessableContent => 422,
            Self::InternalServerError  => 500,
            Self::ServiceUnavailable   => 503,
        }
    }

    /// Canonical reason phrase (e.g. `"Not Found"`).
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok                   => "OK",
            Self::Created              => "Created",
            Self::BadRequest           => "Bad Request",
            Self::NotFound             => "Not Found",
            Self::MethodNotAllowed     => "Method Not Allowed",
            Self::ContentTooLarge      => "Content Too Large",
            Self::UnprocessableContent => "Unprocessable Content",
            Self::InternalServerError  => "Internal Server Error",
            Self::ServiceUnavailable   => "Service Unavailable",
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.code()
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> Self {
        Self::from_u16(s.code()).unwrap_or(Self::INTERNAL_SERVER_ERROR)
    }
}
