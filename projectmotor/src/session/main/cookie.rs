//! Signed `_session` cookie carrying the session token and the pending OAuth state.

use hmac::{Hmac, Mac};
use http::header::HeaderMap;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::session::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::utils::{base64url_decode, base64url_encode, get_cookie, header_set_cookie};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CookieSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) token: Option<String>,
    /// CSRF state of a login in progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) state: Option<String>,
}

impl CookieSession {
    /// `base64url(json) "." base64url(hmac)`
    pub(crate) fn encode(&self, secret: &[u8]) -> Result<String, SessionError> {
        let payload = base64url_encode(&serde_json::to_vec(self)?);
        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| SessionError::Crypto("Invalid cookie key".to_string()))?;
        mac.update(payload.as_bytes());
        let signature = base64url_encode(&mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    pub(crate) fn decode(value: &str, secret: &[u8]) -> Result<Self, SessionError> {
        let (payload, signature) = value.split_once('.').ok_or(SessionError::InvalidCookie)?;
        let signature = base64url_decode(signature).map_err(|_| SessionError::InvalidCookie)?;

        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| SessionError::Crypto("Invalid cookie key".to_string()))?;
        mac.update(payload.as_bytes());
        // verify_slice compares in constant time
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::InvalidCookie)?;

        let json = base64url_decode(payload).map_err(|_| SessionError::InvalidCookie)?;
        serde_json::from_slice(&json).map_err(|_| SessionError::InvalidCookie)
    }
}

/// Decode the session cookie of a request.
///
/// A missing cookie and a cookie that fails verification both yield `None`.
pub(crate) fn read_cookie_session(config: &SessionConfig, headers: &HeaderMap) -> Option<CookieSession> {
    let raw = get_cookie(headers, &config.cookie_name)?;
    match CookieSession::decode(&raw, &config.secret) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring session cookie that failed verification");
            None
        }
    }
}

/// Response headers that store `session` in the cookie
pub(crate) fn cookie_session_headers(
    config: &SessionConfig,
    session: &CookieSession,
) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &config.cookie_name,
        &session.encode(&config.secret)?,
        config.max_age,
        config.secure,
    )?;
    Ok(headers)
}
