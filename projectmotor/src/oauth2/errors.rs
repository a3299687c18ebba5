use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Fetch user info error: {0}")]
    FetchUserInfo(String),

    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("No verified primary email found")]
    NoPrimaryEmail,

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for OAuth2Error {
    fn from(err: sqlx::Error) -> Self {
        OAuth2Error::Storage(err.to_string())
    }
}
