//! HTML page handlers. Same lookups as the API, rendered through [`Pages`](crate::pages::Pages).

use tera::Context;

use crate::crud;
use crate::error::Error;
use crate::pages::short_title;
use crate::request::Request;
use crate::response::Html;
use crate::state::AppState;

/// `GET /` and `GET /posts`
pub async fn home(_req: Request, state: AppState) -> Result<Html, Error> {
    let session = state.db.session().await?;
    let posts = crud::list_posts(&session).await?;
    session.finish().await?;

    let mut context = Context::new();
    context.insert("title", "Home");
    context.insert("posts", &posts);
    Ok(Html(state.pages.render("home.html", &context)?))
}

/// `GET /posts/{post_id}`
pub async fn post_page(req: Request, state: AppState) -> Result<Html, Error> {
    let post_id = req.id("post_id")?;
    let session = state.db.session().await?;
    let post = crud::find_post(&session, post_id).await?;
    session.finish().await?;

    let mut context = Context::new();
    context.insert("title", &short_title(&post.title, 50));
    context.insert("post", &post);
    Ok(Html(state.pages.render("post.html", &context)?))
}

/// `GET /users/{user_id}/posts`
pub async fn user_posts_page(req: Request, state: AppState) -> Result<Html, Error> {
    let user_id = req.id("user_id")?;
    let session = state.db.session().await?;
    let (user, posts) = crud::list_user_posts(&session, user_id).await?;
    session.finish().await?;

    let mut context = Context::new();
    context.insert("title", &format!("{}'s Posts", user.username));
    context.insert("user", &user);
    context.insert("posts", &posts);
    Ok(Html(state.pages.render("user_posts.html", &context)?))
}
