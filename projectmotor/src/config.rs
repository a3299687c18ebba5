//! Process-wide configuration, loaded once at startup and injected into [`AppContext`](crate::AppContext).

use std::env;

use thiserror::Error;

use crate::oauth2::OAuth2Config;
use crate::session::SessionConfig;
use crate::storage::StoreConfig;

pub(crate) const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Application configuration.
///
/// Built with [`AppConfig::from_env`] after the binary has loaded `.env`.
/// Tests construct it with [`AppConfig::from_lookup`] or directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Public origin of the server, e.g. `https://projects.example.com`
    pub origin: String,
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub oauth2: OAuth2Config,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);
        let origin = vars
            .optional("ORIGIN")
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = Self {
            store: StoreConfig::from_vars(&vars)?,
            session: SessionConfig::from_vars(&vars)?,
            oauth2: OAuth2Config::from_vars(&vars, &origin)?,
            origin,
        };

        tracing::info!(
            origin = %config.origin,
            store_type = %config.store.store_type,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Variable accessor shared by the per-module configs.
pub(crate) struct Vars<'a>(pub(crate) &'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    pub(crate) fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    pub(crate) fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    pub(crate) fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_vars(key: &str) -> Option<String> {
    match key {
        "GENERIC_DATA_STORE_TYPE" => Some("sqlite".to_string()),
        "GENERIC_DATA_STORE_URL" => Some("sqlite::memory:".to_string()),
        "OAUTH2_GITHUB_CLIENT_ID" => Some("test-client-id".to_string()),
        "OAUTH2_GITHUB_CLIENT_SECRET" => Some("test-client-secret".to_string()),
        "SESSION_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
        "SESSION_COOKIE_SECURE" => Some("false".to_string()),
        _ => None,
    }
}
