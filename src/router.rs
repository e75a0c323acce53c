//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. The router owns the
//! application state and is the single boundary where handler failures are
//! turned into responses by the [`catcher`](crate::catcher).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use matchit::Router as MatchitRouter;
use tracing::{debug, error, info};

use crate::catcher;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::state::AppState;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    state: AppState,
}

impl Router {
    pub fn new(state: AppState) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or collides with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Routes one request, runs its handler and maps any failure through the
    /// catcher. Never fails: every outcome is a response.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let started = Instant::now();
        let method = req.method;
        let path = req.path.clone();

        let outcome = match self.lookup(method, &path) {
            Ok((handler, params)) => {
                req.params = params;
                handler.call(req, self.state.clone()).await
            }
            Err(e) => Err(e),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(e) => self.reject(e, &path),
        };

        info!(
            %method,
            path = %path,
            status = response.status.code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );
        response
    }

    /// Answers a request that failed before or during its handler.
    pub(crate) fn reject(&self, err: Error, path: &str) -> Response {
        if err.is_client_error() {
            debug!(path, error = %err, "request rejected");
        } else {
            error!(path, error = %err, "request failed");
        }
        catcher::catch(&err, path, &self.state.pages)
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Result<(BoxedHandler, HashMap<String, String>), Error> {
        let matched = self.routes.get(&method).and_then(|tree| tree.at(path).ok());
        if let Some(matched) = matched {
            let handler = Arc::clone(matched.value);
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Ok((handler, params));
        }

        let other_method = self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok());
        if other_method {
            Err(Error::MethodNotAllowed)
        } else {
            Err(Error::not_found("Not Found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::db::Database;
    use crate::status::Status;

    async fn echo(req: Request, _state: AppState) -> Result<String, Error> {
        Ok(format!("{}:{}", req.param("kind").unwrap_or("-"), req.param("id").unwrap_or("-")))
    }

    async fn fixed(_req: Request, _state: AppState) -> Result<&'static str, Error> {
        Ok("fixed")
    }

    async fn failing(_req: Request, _state: AppState) -> Result<&'static str, Error> {
        Err(Error::not_found("Widget with id 3 not found"))
    }

    async fn router() -> Router {
        let state = AppState::new(Database::in_memory().await.unwrap()).unwrap();
        Router::new(state)
            .on(Method::Get, "/api/{kind}/{id}", echo)
            .on(Method::Get, "/api/widgets/new", fixed)
            .on(Method::Post, "/api/widgets", fixed)
            .on(Method::Get, "/widgets/{id}", failing)
    }

    async fn call(router: &Router, method: Method, path: &str) -> Response {
        router.dispatch(Request::new(method, path)).await
    }

    fn message(res: &Response) -> Value {
        serde_json::from_slice::<Value>(res.body()).unwrap()["message"].clone()
    }

    #[tokio::test]
    async fn path_params_reach_the_handler() {
        let res = call(&router().await, Method::Get, "/api/posts/42").await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), b"posts:42");
    }

    #[tokio::test]
    async fn static_segment_wins_over_param() {
        let res = call(&router().await, Method::Get, "/api/widgets/new").await;
        assert_eq!(res.body(), b"fixed");
    }

    #[tokio::test]
    async fn unmatched_path_is_404() {
        let res = call(&router().await, Method::Get, "/api/widgets/new/edit").await;
        assert_eq!(res.status_code(), Status::NotFound);
        assert_eq!(message(&res), "Not Found");
    }

    #[tokio::test]
    async fn path_matched_under_another_method_is_405() {
        let res = call(&router().await, Method::Delete, "/api/widgets").await;
        assert_eq!(res.status_code(), Status::MethodNotAllowed);
        assert_eq!(message(&res), "Method Not Allowed");
    }

    #[tokio::test]
    async fn handler_failure_goes_through_the_catcher() {
        let res = call(&router().await, Method::Get, "/widgets/3").await;
        assert_eq!(res.status_code(), Status::NotFound);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    }

    #[tokio::test]
    #[should_panic(expected = "invalid route")]
    async fn conflicting_route_panics_at_registration() {
        let state = AppState::new(Database::in_memory().await.unwrap()).unwrap();
        let _ = Router::new(state)
            .on(Method::Get, "/api/{kind}", fixed)
            .on(Method::Get, "/api/{other}", fixed);
    }
}
