use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use projectmotor::{AppContext, get_authenticated_user};

use super::session::{AuthRedirect, AuthUser};

/// Session guard for protected routes.
///
/// A request without a valid session is answered with a 303 to `/login` and
/// never reaches the handler. Otherwise the resolved [`AuthUser`] is stored
/// in the request extensions for the handler's extractor.
pub async fn require_session(
    State(ctx): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Response {
    match get_authenticated_user(&ctx, req.headers()).await {
        Ok(auth) => {
            let auth_user = AuthUser::from(auth);
            tracing::debug!(user_id = auth_user.id, path = %req.uri().path(), "Session accepted");
            req.extensions_mut().insert(auth_user);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %req.uri().path(), "Session rejected");
            AuthRedirect.into_response()
        }
    }
}
