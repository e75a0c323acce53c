//! # quill
//!
//! A small blog service: HTML pages and a JSON API for users and posts,
//! backed by a relational store through sea-orm.
//!
//! ## Routes
//!
//! | Method | Path | Answer |
//! |---|---|---|
//! | GET  | `/`, `/posts`              | home page, every post |
//! | GET  | `/posts/{post_id}`         | one post page |
//! | GET  | `/users/{user_id}/posts`   | one user's posts page |
//! | GET  | `/api/users/{user_id}`     | user JSON |
//! | POST | `/api/users`               | create a user, 201 |
//! | GET  | `/api/users/{user_id}/posts` | that user's posts JSON |
//! | GET  | `/api/posts`               | every post JSON |
//! | POST | `/api/posts`               | create a post, 201 |
//! | GET  | `/api/posts/{post_id}`     | post JSON |
//! | GET  | `/healthz`, `/readyz`      | probes |
//!
//! Failures under `/api` are answered as `{"message": ...}` JSON, everywhere
//! else as a rendered error page; see [`catcher`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use quill::{AppState, Database, Server};
//!
//! # async fn run() -> Result<(), quill::Error> {
//! let db = Database::connect("sqlite://quill.db?mode=rwc", 5, false).await?;
//! db.migrate().await?;
//! let app = quill::app(AppState::new(db)?);
//! Server::bind("127.0.0.1:8000".parse().unwrap()).serve(app).await
//! # }
//! ```

mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod state;
mod status;

pub mod catcher;
pub mod config;
pub mod crud;
pub mod db;
pub mod error;
pub mod health;
pub mod logger;
pub mod pages;
pub mod routes;
pub mod schema;

pub use config::Config;
pub use db::{Database, Session};
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, Html, IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use state::AppState;
pub use status::Status;

use routes::{api, site};

/// Builds the full route table over `state`.
pub fn app(state: AppState) -> Router {
    Router::new(state)
        .on(Method::Get,  "/",                          site::home)
        .on(Method::Get,  "/posts",                     site::home)
        .on(Method::Get,  "/posts/{post_id}",           site::post_page)
        .on(Method::Get,  "/users/{user_id}/posts",     site::user_posts_page)
        .on(Method::Get,  "/api/users/{user_id}",       api::get_user)
        .on(Method::Post, "/api/users",                 api::create_user)
        .on(Method::Get,  "/api/users/{user_id}/posts", api::get_user_posts)
        .on(Method::Get,  "/api/posts",                 api::get_posts)
        .on(Method::Post, "/api/posts",                 api::create_post)
        .on(Method::Get,  "/api/posts/{post_id}",       api::get_post)
        .on(Method::Get,  "/healthz",                   health::liveness)
        .on(Method::Get,  "/readyz",                    health::readiness)
}
