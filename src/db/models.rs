use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{ProjectStatus, Role};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string, never the plaintext password.
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_id: i64,
    pub status: ProjectStatus,
    pub updated_at: DateTime<Utc>,
}

/// A project joined with its owner's username, as shown on the dashboard
/// and project page.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_id: i64,
    pub owner: String,
    pub status: ProjectStatus,
    pub updated_at: DateTime<Utc>,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, Serialize)]
pub struct CommentEntry {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A grade joined with the grading teacher's username.
#[derive(Debug, Clone, Serialize)]
pub struct GradeEntry {
    pub id: i64,
    pub teacher: String,
    pub score: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
