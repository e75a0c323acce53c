//! Turns a failed request into a response.
//!
//! Requests under [`API_PREFIX`] get JSON, everything else gets the rendered
//! error page. Field-level validation detail is only ever sent as JSON.

use serde::Serialize;

use crate::error::{Error, FieldError};
use crate::pages::Pages;
use crate::response::{Html, IntoResponse, Json, Response};

/// Path namespace of the JSON API.
pub const API_PREFIX: &str = "/api";

const INVALID_INPUT: &str = "Invalid request data";
const INVALID_INPUT_PAGE: &str = "Invalid request. Please check your input and try again.";

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

/// `true` when `path` is `/api` or below it.
pub fn is_api(path: &str) -> bool {
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub(crate) fn catch(err: &Error, path: &str, pages: &Pages) -> Response {
    let status = err.status();
    let api = is_api(path);

    match (err, api) {
        (Error::Validation(fields), true) => {
            let body = ErrorBody { message: INVALID_INPUT, errors: Some(fields.as_slice()) };
            (status, Json(body)).into_response()
        }
        (Error::Validation(_), false) => {
            (status, Html(pages.render_error(status, INVALID_INPUT_PAGE))).into_response()
        }
        (_, true) => {
            let message = err.message();
            (status, Json(ErrorBody { message: &message, errors: None })).into_response()
        }
        (_, false) => {
            (status, Html(pages.render_error(status, &err.message()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::error::DEFAULT_MESSAGE;
    use crate::status::Status;

    fn pages() -> Pages {
        Pages::new().unwrap()
    }

    fn json(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[test]
    fn api_prefix_matches_whole_segments_only() {
        assert!(is_api("/api"));
        assert!(is_api("/api/posts/1"));
        assert!(!is_api("/apiary"));
        assert!(!is_api("/posts/1"));
    }

    #[test]
    fn api_domain_failure_is_json_message() {
        let res = catch(&Error::not_found("Post with id 4 not found"), "/api/posts/4", &pages());
        assert_eq!(res.status_code(), Status::NotFound);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(json(&res), serde_json::json!({ "message": "Post with id 4 not found" }));
    }

    #[test]
    fn api_validation_failure_lists_fields() {
        let err = Error::invalid("username", "must be between 3 and 50 characters");
        let res = catch(&err, "/api/users", &pages());
        assert_eq!(res.status_code(), Status::UnprocessableContent);
        let body = json(&res);
        assert_eq!(body["message"], INVALID_INPUT);
        assert_eq!(body["errors"][0]["field"], "username");
    }

    #[test]
    fn page_validation_failure_hides_fields() {
        let err = Error::invalid("username", "must be between 3 and 50 characters");
        let res = catch(&err, "/users/x/posts", &pages());
        assert_eq!(res.status_code(), Status::UnprocessableContent);
        let html = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(html.contains("Please check your input"));
        assert!(!html.contains("username"));
    }

    #[test]
    fn page_domain_failure_renders_status_title() {
        let res = catch(&Error::not_found("Post with id 4 not found"), "/posts/4", &pages());
        assert_eq!(res.status_code(), Status::NotFound);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        let html = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(html.contains("<title>404"));
        assert!(html.contains("Post with id 4 not found"));
    }

    #[test]
    fn infrastructure_failure_uses_default_message() {
        let res = catch(&Error::Internal("pool exhausted".into()), "/api/posts", &pages());
        assert_eq!(res.status_code(), Status::InternalServerError);
        assert_eq!(json(&res)["message"], DEFAULT_MESSAGE);
    }

    #[test]
    fn oversized_api_body_is_json_413() {
        let res = catch(&Error::PayloadTooLarge(1024), "/api/users", &pages());
        assert_eq!(res.status_code(), Status::ContentTooLarge);
        assert_eq!(json(&res)["message"], "Request body exceeds 1024 bytes");
    }
}
