mod common;

use quill::Status;

use common::*;

const HTML: Option<&str> = Some("text/html; charset=utf-8");

#[tokio::test]
async fn home_lists_posts_with_authors() {
    let app = app().await;
    let alice = create_user(&app, "alice", "alice@example.com").await;
    create_post(&app, alice["id"].as_i64().unwrap(), "Morning notes", "Coffee first.").await;

    for path in ["/", "/posts"] {
        let res = get(&app, path).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), HTML);
        let html = body_html(&res);
        assert!(html.contains("<title>Home"));
        assert!(html.contains("Morning notes"));
        assert!(html.contains("alice"));
    }
}

#[tokio::test]
async fn home_renders_with_no_posts() {
    let app = app().await;
    let res = get(&app, "/").await;
    assert_eq!(res.status_code(), Status::Ok);
    assert!(body_html(&res).contains("No posts yet."));
}

#[tokio::test]
async fn post_page_shows_one_post() {
    let app = app().await;
    let alice = create_user(&app, "alice", "alice@example.com").await;
    let post = create_post(&app, alice["id"].as_i64().unwrap(), "A title", "Body text").await;

    let res = get(&app, &format!("/posts/{}", post["id"])).await;
    assert_eq!(res.status_code(), Status::Ok);
    let html = body_html(&res);
    assert!(html.contains("<title>A title"));
    assert!(html.contains("Body text"));
}

#[tokio::test]
async fn post_content_is_escaped() {
    let app = app().await;
    let alice = create_user(&app, "alice", "alice@example.com").await;
    let post = create_post(&app, alice["id"].as_i64().unwrap(), "xss", "<script>alert(1)</script>").await;

    let html = body_html(&get(&app, &format!("/posts/{}", post["id"])).await);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn missing_post_page_is_a_404_page() {
    let app = app().await;
    let res = get(&app, "/posts/5").await;
    assert_eq!(res.status_code(), Status::NotFound);
    assert_eq!(res.header("content-type"), HTML);
    let html = body_html(&res);
    assert!(html.contains("<title>404"));
    assert!(html.contains("Post with id 5 not found"));
}

#[tokio::test]
async fn user_posts_page_lists_that_users_posts() {
    let app = app().await;
    let alice = create_user(&app, "alice", "alice@example.com").await;
    let bob = create_user(&app, "bob", "bob@example.com").await;
    create_post(&app, alice["id"].as_i64().unwrap(), "by alice", "a").await;
    create_post(&app, bob["id"].as_i64().unwrap(), "by bob", "b").await;

    let res = get(&app, &format!("/users/{}/posts", alice["id"])).await;
    assert_eq!(res.status_code(), Status::Ok);
    let html = body_html(&res);
    assert!(html.contains("alice&#x27;s Posts"));
    assert!(html.contains("by alice"));
    assert!(!html.contains("by bob"));
}

#[tokio::test]
async fn missing_user_page_is_a_404_page() {
    let app = app().await;
    let res = get(&app, "/users/3/posts").await;
    assert_eq!(res.status_code(), Status::NotFound);
    let html = body_html(&res);
    assert!(html.contains("<title>404"));
    assert!(html.contains("User with id 3 not found"));
}

#[tokio::test]
async fn invalid_id_on_a_page_is_a_generic_422_page() {
    let app = app().await;
    let res = get(&app, "/posts/latest").await;
    assert_eq!(res.status_code(), Status::UnprocessableContent);
    assert_eq!(res.header("content-type"), HTML);
    let html = body_html(&res);
    assert!(html.contains("<title>422"));
    assert!(html.contains("Please check your input"));
    assert!(!html.contains("post_id"));
    assert!(!html.contains("valid integer"));
}

#[tokio::test]
async fn unmatched_page_route_is_a_404_page() {
    let app = app().await;
    let res = get(&app, "/about").await;
    assert_eq!(res.status_code(), Status::NotFound);
    assert_eq!(res.header("content-type"), HTML);
    assert!(body_html(&res).contains("<title>404"));
}
