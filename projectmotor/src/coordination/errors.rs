//! Error types for the coordination layer

use thiserror::Error;

use crate::oauth2::OAuth2Error;
use crate::project::ProjectError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::userdb::UserError;
use crate::utils::UtilError;

/// Errors surfaced by the `*_core` entry points
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// The callback `state` does not match the one stored in the session
    #[error("State mismatch")]
    StateMismatch,

    /// Malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unauthorized access error
    #[error("Unauthorized access")]
    Unauthorized,

    /// No user is registered with the email a project was shared with
    #[error("We couldn't find a user with the email address you provided.")]
    UserNotFound,

    /// The owner tried to share a project with themselves
    #[error("It's not possible to share a project with yourself.")]
    SelfShare,

    /// Resource not found with context
    #[error("Resource not found: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Error from the user database operations
    #[error("User error: {0}")]
    UserError(UserError),

    /// Error from OAuth2 operations
    #[error("OAuth2 error: {0}")]
    OAuth2Error(OAuth2Error),

    /// Error from Session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),

    /// Error from project and task operations
    #[error("Project error: {0}")]
    ProjectError(ProjectError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    UtilsError(UtilError),
}

impl CoordinationError {
    pub(crate) fn not_found(resource_type: &str, resource_id: impl ToString) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
        }
    }

    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Database(msg) => tracing::error!("Database error: {}", msg),
            Self::StateMismatch => tracing::warn!("State mismatch"),
            Self::InvalidRequest(msg) => tracing::warn!("Invalid request: {}", msg),
            Self::Unauthorized => tracing::warn!("Unauthorized access"),
            Self::UserNotFound => tracing::info!("Share target not found"),
            Self::SelfShare => tracing::info!("Self share rejected"),
            Self::ResourceNotFound {
                resource_type,
                resource_id,
            } => tracing::info!("Resource not found: {} {}", resource_type, resource_id),
            Self::UserError(err) => tracing::error!("User error: {}", err),
            Self::OAuth2Error(err) => tracing::error!("OAuth2 error: {}", err),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::ProjectError(err) => tracing::error!("Project error: {}", err),
            Self::UtilsError(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }
}

// Custom From implementations that automatically log errors

impl From<OAuth2Error> for CoordinationError {
    fn from(err: OAuth2Error) -> Self {
        let error = Self::OAuth2Error(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        let error = Self::SessionError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        let error = Self::UserError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<ProjectError> for CoordinationError {
    fn from(err: ProjectError) -> Self {
        let error = Self::ProjectError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        let error = Self::UtilsError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        let error = Self::Database(err.to_string());
        tracing::error!("{}", error);
        error
    }
}
