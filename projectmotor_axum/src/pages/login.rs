use askama::Template;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use super::render;
use crate::session::AuthUser;

#[derive(Template)]
#[template(path = "login.j2")]
struct LoginTemplate<'a> {
    provider: &'a str,
}

/// Login page. Visitors who already have a session go straight to the dashboard.
pub(super) async fn login(user: Option<AuthUser>) -> Result<Response, (StatusCode, String)> {
    match user {
        Some(_) => Ok(Redirect::to("/").into_response()),
        None => Ok(render(&LoginTemplate { provider: "github" })?.into_response()),
    }
}
