use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Link between an external provider account and a local user.
///
/// `id` is the provider's user id. The `user_id` never changes after creation.
#[derive(Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Account {
    pub id: String,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Normalized identity returned by an [`IdentityProvider`](super::IdentityProvider)
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderIdentity {
    pub external_id: String,
    pub primary_email: String,
}

/// Query parameters of the provider callback
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitHubTokenResponse {
    pub(super) access_token: Option<String>,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitHubUser {
    pub(super) id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct GitHubEmail {
    pub(super) email: String,
    pub(super) primary: bool,
    pub(super) verified: bool,
    #[allow(dead_code)]
    pub(super) visibility: Option<String>,
}
