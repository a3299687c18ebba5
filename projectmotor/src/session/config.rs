use std::fmt;

use crate::config::{ConfigError, Vars};

pub(crate) const SESSION_COOKIE_NAME: &str = "_session";
const DEFAULT_MAX_AGE: i64 = 30 * 24 * 60 * 60;
const MIN_SECRET_LEN: usize = 32;

/// Cookie settings for the `_session` cookie
#[derive(Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// HMAC key used to sign the cookie
    pub secret: Vec<u8>,
    pub secure: bool,
    pub max_age: i64,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .field("secure", &self.secure)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl SessionConfig {
    pub(crate) fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let secret = vars.required("SESSION_SECRET")?.into_bytes();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "SESSION_SECRET".to_string(),
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }

        Ok(Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            secret,
            secure: vars.parsed("SESSION_COOKIE_SECURE", true)?,
            max_age: vars.parsed("SESSION_COOKIE_MAX_AGE", DEFAULT_MAX_AGE)?,
        })
    }
}
