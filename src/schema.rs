//! Request and response schemas.
//!
//! Input schemas carry the field constraints checked by
//! [`Request::json`](crate::Request::json) before any handler logic runs.
//! Output schemas are what the JSON API writes and the page templates read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::entity::{post, user};

const PROFILE_PICS: &str = "/media/profile_pics";
const DEFAULT_PROFILE_PIC: &str = "/static/profile_pics/default.jpg";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email, length(max = 120))]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub image_file: Option<String>,
    /// Public URL of the profile picture, falling back to the default one.
    pub image_path: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        let image_path = match &user.image_file {
            Some(file) => format!("{PROFILE_PICS}/{file}"),
            None => DEFAULT_PROFILE_PIC.to_owned(),
        };
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            image_file: user.image_file,
            image_path,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PostCreate {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: i32,
    pub date_posted: DateTime<Utc>,
    pub author: UserResponse,
}

impl PostResponse {
    pub fn new(post: post::Model, author: user::Model) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            user_id: post.user_id,
            date_posted: post.date_posted,
            author: author.into(),
        }
    }
}
