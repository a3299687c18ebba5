//! Login, dashboard, profile and logout pages, plus the pieces other pages share.

mod dashboard;
mod login;
mod logout;
mod profile;

use askama::Template;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get},
};

use projectmotor::AppContext;

use super::error::IntoResponseError;

/// Routes reachable without a session
pub(super) fn public_router() -> Router<AppContext> {
    Router::new().route("/login", get(login::login))
}

/// Routes behind the session guard
pub(super) fn protected_router() -> Router<AppContext> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/profile", get(profile::profile))
        .route("/logout", delete(logout::logout))
        .route("/logout/all", delete(logout::logout_all))
}

pub(crate) const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
pub(crate) const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, (StatusCode, String)> {
    Ok(Html(template.render().into_response_error()?))
}

/// Redirect that works for both htmx and plain requests: `HX-Redirect`
/// for htmx, a 303 for everything else.
pub(crate) fn hx_redirect(url: &'static str) -> Response {
    (
        [(HX_REDIRECT, HeaderValue::from_static(url))],
        Redirect::to(url),
    )
        .into_response()
}

#[derive(Template)]
#[template(path = "toast.j2")]
pub(crate) struct ToastTemplate<'a> {
    pub(crate) message: &'a str,
    /// `success` or `error`
    pub(crate) kind: &'a str,
}

/// A toast fragment with the given status
pub(crate) fn toast(status: StatusCode, kind: &str, message: &str) -> Response {
    match render(&ToastTemplate { message, kind }) {
        Ok(html) => (status, html).into_response(),
        Err(e) => e.into_response(),
    }
}
