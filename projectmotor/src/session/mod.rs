mod config;
mod errors;
mod main;
mod storage;
mod types;

pub use config::SessionConfig;
pub use errors::SessionError;
pub use types::{Session, SessionInfo};

pub(crate) use main::{
    CookieSession, cookie_session_headers, get_user_from_session, prepare_logout_headers,
    read_cookie_session,
};
pub(crate) use storage::SessionStore;
