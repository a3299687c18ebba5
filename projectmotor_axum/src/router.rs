//! The application router

use axum::{Router, middleware::from_fn_with_state};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use projectmotor::AppContext;

use super::middleware::require_session;

/// Build the full application: public login routes, and everything else
/// behind the session guard.
///
/// Requests without a valid session to a protected route get a 303 to `/login`.
pub fn app_router(ctx: AppContext) -> Router {
    app_router_no_trace(ctx).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`app_router`] without the HTTP tracing layer
pub fn app_router_no_trace(ctx: AppContext) -> Router {
    let protected = Router::new()
        .merge(super::pages::protected_router())
        .merge(super::projects::router())
        .merge(super::tasks::router())
        .route_layer(from_fn_with_state(ctx.clone(), require_session));

    Router::new()
        .merge(super::pages::public_router())
        .merge(super::oauth2::router())
        .merge(protected)
        .with_state(ctx)
}
