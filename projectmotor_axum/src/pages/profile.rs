use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};

use projectmotor::{AppContext, SessionInfo, list_sessions_core};

use super::render;
use crate::error::IntoResponseError;
use crate::session::AuthUser;

#[derive(Template)]
#[template(path = "profile.j2")]
struct ProfileTemplate<'a> {
    user: &'a AuthUser,
    sessions: Vec<SessionInfo>,
}

/// Account details and the list of active sessions
pub(super) async fn profile(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Html<String>, (StatusCode, String)> {
    let sessions = list_sessions_core(&ctx, user.id, &user.session_token)
        .await
        .into_response_error()?;

    render(&ProfileTemplate {
        user: &user,
        sessions,
    })
}
