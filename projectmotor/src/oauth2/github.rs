use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};

use super::config::OAuth2Config;
use super::errors::OAuth2Error;
use super::provider::IdentityProvider;
use super::types::{GitHubEmail, GitHubTokenResponse, GitHubUser, ProviderIdentity};

const CLIENT_USER_AGENT: &str = concat!("projectmotor/", env!("CARGO_PKG_VERSION"));

fn get_client() -> Result<reqwest::Client, OAuth2Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(CLIENT_USER_AGENT)
        .build()
        .map_err(|e| OAuth2Error::Configuration(format!("Failed to create http client: {e}")))
}

/// GitHub OAuth app client
pub struct GitHubProvider {
    config: OAuth2Config,
    client: reqwest::Client,
}

impl GitHubProvider {
    pub fn new(config: OAuth2Config) -> Result<Self, OAuth2Error> {
        Ok(Self {
            config,
            client: get_client()?,
        })
    }

    async fn fetch_user(&self, access_token: &str) -> Result<GitHubUser, OAuth2Error> {
        let url = format!("{}/user", self.config.api_url);
        let response_body = self.get_json_body(&url, access_token).await?;
        serde_json::from_str(&response_body)
            .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize user: {e}")))
    }

    async fn fetch_emails(&self, access_token: &str) -> Result<Vec<GitHubEmail>, OAuth2Error> {
        let url = format!("{}/user/emails", self.config.api_url);
        let response_body = self.get_json_body(&url, access_token).await?;
        serde_json::from_str(&response_body)
            .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize emails: {e}")))
    }

    async fn get_json_body(&self, url: &str, access_token: &str) -> Result<String, OAuth2Error> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, url, "Provider API request rejected");
            return Err(OAuth2Error::FetchUserInfo(format!(
                "{url} returned {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))
    }
}

/// Pick the address flagged primary, provided the provider has verified it.
pub(super) fn select_primary_email(emails: &[GitHubEmail]) -> Result<String, OAuth2Error> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email.clone())
        .ok_or(OAuth2Error::NoPrimaryEmail)
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn name(&self) -> &str {
        &self.config.provider
    }

    fn authorization_url(&self, state: &str) -> Result<String, OAuth2Error> {
        let url = url::Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| OAuth2Error::Configuration(format!("Invalid auth url: {e}")))?;
        Ok(url.into())
    }

    #[tracing::instrument(skip_all)]
    async fn exchange_code(&self, code: &str) -> Result<String, OAuth2Error> {
        let response = self
            .client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {
                tracing::debug!("Token exchange responded");
            }
            status => {
                return Err(OAuth2Error::TokenExchange(status.to_string()));
            }
        };

        let response_body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;
        let token: GitHubTokenResponse = serde_json::from_str(&response_body)
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        // GitHub reports a rejected code with 200 and an error field
        if let Some(error) = token.error {
            let description = token.error_description.unwrap_or_default();
            return Err(OAuth2Error::TokenExchange(format!("{error}: {description}")));
        }

        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                OAuth2Error::TokenExchange("Access token not present in response".to_string())
            })
    }

    #[tracing::instrument(skip_all)]
    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, OAuth2Error> {
        let user = self.fetch_user(access_token).await?;
        let emails = self.fetch_emails(access_token).await?;
        let primary_email = select_primary_email(&emails)?;

        tracing::debug!(external_id = user.id, "Fetched provider identity");
        Ok(ProviderIdentity {
            external_id: user.id.to_string(),
            primary_email,
        })
    }
}
