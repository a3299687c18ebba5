mod cookie;
mod session;

pub(crate) use cookie::{CookieSession, cookie_session_headers, read_cookie_session};
pub(crate) use session::{get_user_from_session, prepare_logout_headers};
