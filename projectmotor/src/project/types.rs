use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::errors::ProjectError;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Gates visibility to users other than the owner
    pub published: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub project_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of inserting a share row.
///
/// A uniqueness violation on `(project_id, user_id)` is reported as
/// `AlreadyExists` rather than as a failure.
#[must_use]
#[derive(Debug)]
pub enum ShareOutcome {
    Created,
    AlreadyExists,
    Failed(ProjectError),
}
