use http::HeaderMap;

use super::errors::CoordinationError;
use crate::context::AppContext;
use crate::session::{SessionError, SessionInfo, SessionStore, get_user_from_session};
use crate::userdb::User;

/// The user behind a request, resolved from its session cookie.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session_token: String,
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// Resolve the session cookie in `headers`.
///
/// Fails with [`SessionError::NoSession`] when there is no cookie, the cookie
/// does not verify, or the token is unknown.
pub async fn get_authenticated_user(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, SessionError> {
    let (user, session_token) =
        get_user_from_session(ctx.store(), &ctx.config().session, headers).await?;
    tracing::debug!(user_id = user.id, "Session resolved");
    Ok(AuthenticatedUser {
        user,
        session_token,
    })
}

/// Sessions of the authenticated user, newest first, with the current one marked.
#[tracing::instrument(skip(ctx, current_token))]
pub async fn list_sessions_core(
    ctx: &AppContext,
    user_id: i64,
    current_token: &str,
) -> Result<Vec<SessionInfo>, CoordinationError> {
    let sessions = SessionStore::list_sessions(ctx.store(), user_id).await?;
    Ok(sessions
        .into_iter()
        .map(|session| SessionInfo::from_session(session, current_token))
        .collect())
}
