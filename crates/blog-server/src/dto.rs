//! Request and response bodies.

use blog_core::{Post, User};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Body returned by create endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub birth_date: Option<NaiveDate>,
}

impl From<CreateUser> for User {
    fn from(req: CreateUser) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            username: req.username,
            hashed_password: req.password,
            birth_date: req.birth_date.unwrap_or_default(),
            ..Self::default()
        }
    }
}

/// Partial user update. Fields left out of the body stay unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub birth_date: Option<NaiveDate>,
}

impl From<UpdateUser> for User {
    fn from(req: UpdateUser) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            username: req.username,
            hashed_password: req.password,
            birth_date: req.birth_date.unwrap_or_default(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            username: user.username,
            birth_date: user.birth_date,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePost {
    pub title: String,
    pub extract: String,
    pub content: String,
    pub author_id: Uuid,
}

impl From<CreatePost> for Post {
    fn from(req: CreatePost) -> Self {
        Self {
            title: req.title,
            extract: req.extract,
            content: req.content,
            author_id: req.author_id,
            ..Self::default()
        }
    }
}

/// Partial post update. The author of a post cannot be changed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePost {
    pub title: String,
    pub extract: String,
    pub content: String,
}

impl From<UpdatePost> for Post {
    fn from(req: UpdatePost) -> Self {
        Self {
            title: req.title,
            extract: req.extract,
            content: req.content,
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub extract: String,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            extract: post.extract,
            content: post.content,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
