use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::LOCATION},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::{TypedHeader, headers};

use projectmotor::{AppContext, AuthResponse, begin_login_core, complete_login_core};

use super::error::IntoResponseError;

pub(super) fn router() -> Router<AppContext> {
    Router::new()
        .route("/oauth/{provider}/login", get(oauth_login))
        .route("/oauth/{provider}/callback", get(oauth_callback))
}

/// Store a fresh state in the session cookie and send the browser to the provider.
async fn oauth_login(
    State(ctx): State<AppContext>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let (auth_url, headers) = begin_login_core(&ctx, &provider, &headers)
        .await
        .into_response_error()?;

    Ok((StatusCode::FOUND, headers, [(LOCATION, auth_url)]).into_response())
}

async fn oauth_callback(
    State(ctx): State<AppContext>,
    Path(provider): Path<String>,
    Query(query): Query<AuthResponse>,
    user_agent: Option<TypedHeader<headers::UserAgent>>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let user_agent = user_agent
        .map(|TypedHeader(ua)| ua.as_str().to_string())
        .unwrap_or_default();

    let (headers, user) = complete_login_core(&ctx, &provider, &headers, &query, &user_agent)
        .await
        .into_response_error()?;

    tracing::debug!(user_id = user.id, "Redirecting to dashboard");
    Ok((headers, Redirect::to("/")))
}
