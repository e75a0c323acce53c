//! Create and read operations over users and posts.
//!
//! Both the JSON API and the HTML pages go through these functions, so a
//! missing user or post fails the same way on either surface. Every check
//! runs before anything is written.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::{debug, info};

use crate::db::Session;
use crate::db::entity::{post, user};
use crate::error::Error;
use crate::schema::{PostCreate, PostResponse, UserCreate, UserResponse};

/// Inserts a new user after checking username and email are both unused.
///
/// A unique-constraint failure on the insert itself, from a writer that
/// got there between the checks and the insert, is the same conflict.
pub async fn create_user(session: &Session, input: UserCreate) -> Result<UserResponse, Error> {
    let taken = user::Entity::find()
        .filter(user::Column::Username.eq(input.username.as_str()))
        .one(&**session)
        .await?;
    if taken.is_some() {
        debug!(username = %input.username, "username already taken");
        return Err(Error::conflict("Username already exists"));
    }

    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(input.email.as_str()))
        .one(&**session)
        .await?;
    if taken.is_some() {
        debug!(email = %input.email, "email already registered");
        return Err(Error::conflict("Email already registered"));
    }

    let user = user::ActiveModel {
        username: Set(input.username),
        email: Set(input.email),
        image_file: Set(None),
        ..Default::default()
    }
    .insert(&**session)
    .await
    .map_err(user_conflict)?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok(user.into())
}

fn user_conflict(err: DbErr) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("email") => {
            Error::conflict("Email already registered")
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::conflict("Username already exists"),
        _ => err.into(),
    }
}

/// Looks up a user by id.
pub async fn find_user(session: &Session, user_id: i32) -> Result<user::Model, Error> {
    user::Entity::find_by_id(user_id)
        .one(&**session)
        .await?
        .ok_or_else(|| Error::not_found(format!("User with id {user_id} not found")))
}

/// Inserts a new post authored by an existing user.
pub async fn create_post(session: &Session, input: PostCreate) -> Result<PostResponse, Error> {
    let author = user::Entity::find_by_id(input.user_id)
        .one(&**session)
        .await?
        .ok_or_else(|| Error::not_found(format!("User with id {} not found", input.user_id)))?;

    let post = post::ActiveModel {
        title: Set(input.title),
        content: Set(input.content),
        date_posted: Set(Utc::now()),
        user_id: Set(author.id),
        ..Default::default()
    }
    .insert(&**session)
    .await?;

    info!(post_id = post.id, user_id = author.id, "post created");
    Ok(PostResponse::new(post, author))
}

/// Looks up a post with its author.
pub async fn find_post(session: &Session, post_id: i32) -> Result<PostResponse, Error> {
    let (post, author) = post::Entity::find_by_id(post_id)
        .find_also_related(user::Entity)
        .one(&**session)
        .await?
        .ok_or_else(|| Error::not_found(format!("Post with id {post_id} not found")))?;
    with_author(post, author)
}

/// Every post, oldest first, each with its author.
pub async fn list_posts(session: &Session) -> Result<Vec<PostResponse>, Error> {
    post::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(post::Column::Id)
        .all(&**session)
        .await?
        .into_iter()
        .map(|(post, author)| with_author(post, author))
        .collect()
}

/// The posts of one user, oldest first. Fails if the user does not exist.
pub async fn list_user_posts(
    session: &Session,
    user_id: i32,
) -> Result<(UserResponse, Vec<PostResponse>), Error> {
    let author = find_user(session, user_id).await?;
    let posts = post::Entity::find()
        .filter(post::Column::UserId.eq(user_id))
        .order_by_asc(post::Column::Id)
        .all(&**session)
        .await?
        .into_iter()
        .map(|post| PostResponse::new(post, author.clone()))
        .collect();
    Ok((author.into(), posts))
}

fn with_author(post: post::Model, author: Option<user::Model>) -> Result<PostResponse, Error> {
    match author {
        Some(author) => Ok(PostResponse::new(post, author)),
        None => Err(Error::Internal(format!("post {} references missing user {}", post.id, post.user_id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::status::Status;

    async fn insert(session: &Session, username: &str, email: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            image_file: Set(None),
            ..Default::default()
        }
        .insert(&**session)
        .await
    }

    #[tokio::test]
    async fn unique_violation_on_insert_is_a_conflict() {
        let db = Database::in_memory().await.unwrap();
        let session = db.write_session().await.unwrap();
        insert(&session, "alice", "alice@example.com").await.unwrap();

        let err = user_conflict(insert(&session, "alice", "other@example.com").await.unwrap_err());
        assert_eq!(err.status(), Status::BadRequest);
        assert_eq!(err.message(), "Username already exists");

        let err = user_conflict(insert(&session, "bob", "alice@example.com").await.unwrap_err());
        assert_eq!(err.status(), Status::BadRequest);
        assert_eq!(err.message(), "Email already registered");
    }

    #[test]
    fn other_database_failures_pass_through() {
        let err = user_conflict(DbErr::Custom("disk full".into()));
        assert_eq!(err.status(), Status::InternalServerError);
    }
}
