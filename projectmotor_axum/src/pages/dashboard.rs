use askama::Template;
use axum::{http::StatusCode, response::Html};

use super::render;
use crate::session::AuthUser;

#[derive(Template)]
#[template(path = "dashboard.j2")]
struct DashboardTemplate {
    message: String,
}

pub(super) async fn dashboard(user: AuthUser) -> Result<Html<String>, (StatusCode, String)> {
    render(&DashboardTemplate {
        message: format!("Welcome back, {}!", user.email),
    })
}
