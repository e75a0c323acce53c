//! JSON API handlers.
//!
//! Each handler opens one session, runs one operation from [`crud`] and
//! commits before answering. Creates use a write session.

use crate::crud;
use crate::error::Error;
use crate::request::Request;
use crate::response::Json;
use crate::schema::{PostCreate, PostResponse, UserCreate, UserResponse};
use crate::state::AppState;
use crate::status::Status;

/// `GET /api/users/{user_id}`
pub async fn get_user(req: Request, state: AppState) -> Result<Json<UserResponse>, Error> {
    let user_id = req.id("user_id")?;
    let session = state.db.session().await?;
    let user = crud::find_user(&session, user_id).await?;
    session.finish().await?;
    Ok(Json(user.into()))
}

/// `POST /api/users`
pub async fn create_user(req: Request, state: AppState) -> Result<(Status, Json<UserResponse>), Error> {
    let input: UserCreate = req.json()?;
    let session = state.db.write_session().await?;
    let user = crud::create_user(&session, input).await?;
    session.finish().await?;
    Ok((Status::Created, Json(user)))
}

/// `GET /api/users/{user_id}/posts`
pub async fn get_user_posts(req: Request, state: AppState) -> Result<Json<Vec<PostResponse>>, Error> {
    let user_id = req.id("user_id")?;
    let session = state.db.session().await?;
    let (_, posts) = crud::list_user_posts(&session, user_id).await?;
    session.finish().await?;
    Ok(Json(posts))
}

/// `GET /api/posts`
pub async fn get_posts(_req: Request, state: AppState) -> Result<Json<Vec<PostResponse>>, Error> {
    let session = state.db.session().await?;
    let posts = crud::list_posts(&session).await?;
    session.finish().await?;
    Ok(Json(posts))
}

/// `POST /api/posts`
pub async fn create_post(req: Request, state: AppState) -> Result<(Status, Json<PostResponse>), Error> {
    let input: PostCreate = req.json()?;
    let session = state.db.write_session().await?;
    let post = crud::create_post(&session, input).await?;
    session.finish().await?;
    Ok((Status::Created, Json(post)))
}

/// `GET /api/posts/{post_id}`
pub async fn get_post(req: Request, state: AppState) -> Result<Json<PostResponse>, Error> {
    let post_id = req.id("post_id")?;
    let session = state.db.session().await?;
    let post = crud::find_post(&session, post_id).await?;
    session.finish().await?;
    Ok(Json(post))
}
