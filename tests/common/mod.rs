#![allow(dead_code)]

use quill::{AppState, Database, Method, Request, Response, Router, Status};
use serde_json::{Value, json};

/// A fresh app over its own in-memory database.
pub async fn app() -> Router {
    let db = Database::in_memory().await.expect("in-memory database");
    quill::app(AppState::new(db).expect("templates compile"))
}

pub async fn get(app: &Router, path: &str) -> Response {
    app.dispatch(Request::new(Method::Get, path)).await
}

pub async fn post_json(app: &Router, path: &str, body: &Value) -> Response {
    let body = serde_json::to_vec(body).expect("serializable body");
    app.dispatch(Request::new(Method::Post, path).with_body(body)).await
}

pub async fn post_raw(app: &Router, path: &str, body: &'static str) -> Response {
    app.dispatch(Request::new(Method::Post, path).with_body(body)).await
}

pub fn body_json(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("JSON body")
}

pub fn body_html(res: &Response) -> String {
    String::from_utf8(res.body().to_vec()).expect("UTF-8 body")
}

pub async fn create_user(app: &Router, username: &str, email: &str) -> Value {
    let res = post_json(app, "/api/users", &json!({ "username": username, "email": email })).await;
    assert_eq!(res.status_code(), Status::Created, "{}", body_html(&res));
    body_json(&res)
}

pub async fn create_post(app: &Router, user_id: i64, title: &str, content: &str) -> Value {
    let body = json!({ "title": title, "content": content, "user_id": user_id });
    let res = post_json(app, "/api/posts", &body).await;
    assert_eq!(res.status_code(), Status::Created, "{}", body_html(&res));
    body_json(&res)
}
