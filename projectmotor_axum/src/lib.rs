//! projectmotor-axum - axum integration for projectmotor
//!
//! Provides the session guard, the [`AuthUser`] extractor, and the login,
//! project, task and profile pages as one router.

mod error;
mod middleware;
mod oauth2;
mod pages;
mod projects;
mod router;
mod session;
mod tasks;
mod validation;

pub use error::IntoResponseError;
pub use middleware::require_session;
pub use router::{app_router, app_router_no_trace};
pub use session::{AuthRedirect, AuthUser};

pub use projectmotor::{AppConfig, AppContext};
