//! Handler trait and type erasure.
//!
//! The router stores handlers of different concrete types in one radix tree
//! per method, so each is boxed behind a common trait object:
//!
//! ```text
//! async fn get_user(req: Request, state: AppState) -> Result<Json<User>, Error>
//!        ↓ router.on(Method::Get, "/api/users/{user_id}", get_user)
//! get_user.into_boxed_handler()                    ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(get_user))                    ← stored as BoxedHandler
//!        ↓
//! handler.call(req, state)  at request time        ← one vtable dispatch
//!        ↓
//! Box::pin(async { get_user(req, state).await.map(IntoResponse::into_response) })
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::state::AppState;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased handler future.
#[doc(hidden)]
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// Internal dispatch interface.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request, state: AppState) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Satisfied automatically by any `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request, state: AppState) -> Result<impl IntoResponse, Error>
/// ```
///
/// Sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, AppState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request, AppState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Bridges a concrete handler `F` to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request, AppState) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, state: AppState) -> BoxFuture {
        let fut = (self.0)(req, state);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}
