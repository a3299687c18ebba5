//! projectmotor - core library of the project and task manager
//!
//! Holds storage, GitHub login, sessions, projects, tasks and sharing. The
//! web layer lives in `projectmotor-axum` and calls the `*_core` functions
//! re-exported here.

mod config;
mod context;
mod coordination;
mod oauth2;
mod project;
mod session;
mod storage;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{AppConfig, ConfigError};
pub use context::AppContext;

// Re-export the main coordination components
pub use coordination::{
    AuthenticatedUser, CoordinationError, begin_login_core, complete_login_core,
    get_authenticated_user, list_sessions_core, logout_all_core, logout_core,
};
pub use coordination::{
    create_project_core, delete_project_core, get_project_core, list_projects_core,
    list_shared_users_core, revoke_share_core, share_project_core, toggle_published_core,
    update_project_core,
};
pub use coordination::{create_task_core, get_task_core, list_tasks_core, update_task_core};

pub use oauth2::{
    Account, AuthResponse, GitHubProvider, IdentityProvider, OAuth2Config, OAuth2Error,
    ProviderIdentity,
};
pub use project::{Project, ProjectError, ShareOutcome, Task};
pub use session::{Session, SessionConfig, SessionError, SessionInfo};
pub use storage::{DataStore, StoreConfig, StoreType, connect_data_store};
pub use userdb::{User, UserError};
pub use utils::{UtilError, gen_random_string};
