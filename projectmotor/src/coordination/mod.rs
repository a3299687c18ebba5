//! Entry points for the HTTP layer.
//!
//! Each `*_core` function takes the [`AppContext`](crate::AppContext) plus plain
//! values and returns a [`CoordinationError`] on failure, so any web framework
//! can drive them.

mod errors;
mod login;
mod project;
mod task;
mod user;

pub use errors::CoordinationError;
pub use login::{begin_login_core, complete_login_core, logout_all_core, logout_core};
pub use project::{
    create_project_core, delete_project_core, get_project_core, list_projects_core,
    list_shared_users_core, revoke_share_core, share_project_core, toggle_published_core,
    update_project_core,
};
pub use task::{create_task_core, get_task_core, list_tasks_core, update_task_core};
pub use user::{AuthenticatedUser, get_authenticated_user, list_sessions_core};
