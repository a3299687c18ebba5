mod config;
mod errors;
mod github;
mod provider;
mod storage;
mod types;

pub use config::OAuth2Config;
pub use errors::OAuth2Error;
pub use github::GitHubProvider;
pub use provider::IdentityProvider;
pub use types::{Account, AuthResponse, ProviderIdentity};

pub(crate) use storage::AccountStore;
