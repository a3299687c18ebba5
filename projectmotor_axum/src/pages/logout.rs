use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use projectmotor::{AppContext, logout_all_core, logout_core};

use super::{hx_redirect, toast};
use crate::error::IntoResponseError;
use crate::session::AuthUser;

/// End the current session, expire the cookie and send the browser to `/login`.
pub(super) async fn logout(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let headers = logout_core(&ctx, &headers).await.into_response_error()?;
    Ok((headers, hx_redirect("/login")).into_response())
}

/// End every other session of the user. The current browser stays signed in.
pub(super) async fn logout_all(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Response, (StatusCode, String)> {
    let removed = logout_all_core(&ctx, user.id, &user.session_token)
        .await
        .into_response_error()?;

    let message = match removed {
        1 => "Signed out of 1 other session.".to_string(),
        n => format!("Signed out of {n} other sessions."),
    };
    Ok(toast(StatusCode::OK, "success", &message))
}
