use http::header::HeaderMap;

use super::cookie::read_cookie_session;
use crate::session::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::storage::DataStore;
use crate::userdb::{User, UserSearchField, UserStore};
use crate::utils::header_set_cookie;

/// Resolve the session cookie of a request to its user.
///
/// Returns the user together with the session token so callers can tell
/// the current session apart from the user's other sessions.
pub(crate) async fn get_user_from_session(
    store: &dyn DataStore,
    config: &SessionConfig,
    headers: &HeaderMap,
) -> Result<(User, String), SessionError> {
    let token = read_cookie_session(config, headers)
        .and_then(|session| session.token)
        .filter(|token| !token.is_empty())
        .ok_or(SessionError::NoSession)?;

    let user = UserStore::get_user_by(store, UserSearchField::SessionToken(token.clone()))
        .await?
        .ok_or(SessionError::NoSession)?;

    Ok((user, token))
}

/// Headers that expire the session cookie in the browser
pub(crate) fn prepare_logout_headers(config: &SessionConfig) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, &config.cookie_name, "", -86400, config.secure)?;
    Ok(headers)
}
