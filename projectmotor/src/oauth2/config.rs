use std::fmt;

use crate::config::{ConfigError, Vars};

const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_SCOPE: &str = "read:user user:email";

/// OAuth client settings for the identity provider
#[derive(Clone)]
pub struct OAuth2Config {
    /// Provider name used in routes, `/oauth/{provider}/...`
    pub provider: String,
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scope: String,
    pub redirect_uri: String,
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("scope", &self.scope)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl OAuth2Config {
    pub(crate) fn from_vars(vars: &Vars<'_>, origin: &str) -> Result<Self, ConfigError> {
        let provider = "github".to_string();
        Ok(Self {
            client_id: vars.required("OAUTH2_GITHUB_CLIENT_ID")?,
            client_secret: vars.required("OAUTH2_GITHUB_CLIENT_SECRET")?,
            auth_url: vars
                .optional("OAUTH2_GITHUB_AUTH_URL")
                .unwrap_or_else(|| GITHUB_AUTH_URL.to_string()),
            token_url: vars
                .optional("OAUTH2_GITHUB_TOKEN_URL")
                .unwrap_or_else(|| GITHUB_TOKEN_URL.to_string()),
            api_url: vars
                .optional("OAUTH2_GITHUB_API_URL")
                .unwrap_or_else(|| GITHUB_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            scope: GITHUB_SCOPE.to_string(),
            redirect_uri: format!("{origin}/oauth/{provider}/callback"),
            provider,
        })
    }
}
