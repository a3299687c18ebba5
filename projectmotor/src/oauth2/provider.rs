use async_trait::async_trait;

use super::errors::OAuth2Error;
use super::types::ProviderIdentity;

/// A third-party identity provider reached through the OAuth authorization code flow.
///
/// The login flow only talks to the provider through this trait, which lets
/// tests substitute a fake.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Name used in `/oauth/{provider}/...` routes
    fn name(&self) -> &str;

    /// URL the user agent is redirected to, carrying `state`
    fn authorization_url(&self, state: &str) -> Result<String, OAuth2Error>;

    /// Exchange an authorization code for an access token
    async fn exchange_code(&self, code: &str) -> Result<String, OAuth2Error>;

    /// Resolve an access token to the remote user's id and primary email
    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, OAuth2Error>;
}
