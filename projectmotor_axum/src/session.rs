use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use http::request::Parts;

use projectmotor::{AppContext, AuthenticatedUser, get_authenticated_user};

pub(crate) const LOGIN_PATH: &str = "/login";

/// Rejection of [`AuthUser`]: a 303 redirect to the login page.
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        tracing::debug!("Redirecting to {}", LOGIN_PATH);
        Redirect::to(LOGIN_PATH).into_response()
    }
}

/// The signed-in user, available as an axum extractor.
///
/// Behind the session guard the value inserted by the guard is reused;
/// elsewhere the session cookie is resolved on demand. Handlers only ever
/// read it.
///
/// ```no_run
/// use projectmotor_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Token of the session making the request
    pub(crate) session_token: String,
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl From<AuthenticatedUser> for AuthUser {
    fn from(auth: AuthenticatedUser) -> Self {
        AuthUser {
            id: auth.user.id,
            email: auth.user.email,
            name: auth.user.name,
            created_at: auth.user.created_at,
            session_token: auth.session_token,
        }
    }
}

impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        get_authenticated_user(ctx, &parts.headers)
            .await
            .map(AuthUser::from)
            .map_err(|e| {
                tracing::debug!(error = %e, "No valid session");
                AuthRedirect
            })
    }
}

impl OptionalFromRequestParts<AppContext> for AuthUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthUser as FromRequestParts<AppContext>>::from_request_parts(parts, ctx).await;
        Ok(result.ok())
    }
}
