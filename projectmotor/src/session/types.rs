use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A persisted login session
#[derive(Clone, Serialize, FromRow, PartialEq)]
pub struct Session {
    pub id: i64,
    #[serde(skip_serializing)]
    pub token: String,
    pub user_id: i64,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("user_agent", &self.user_agent)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Session summary shown on the profile page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionInfo {
    pub id: i64,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    /// Whether this is the session making the request
    pub current: bool,
}

impl SessionInfo {
    pub(crate) fn from_session(session: Session, current_token: &str) -> Self {
        let current = crate::utils::secure_compare(&session.token, current_token);
        Self {
            id: session.id,
            user_agent: session.user_agent,
            created_at: session.created_at,
            current,
        }
    }
}
