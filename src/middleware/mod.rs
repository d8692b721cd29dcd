pub mod auth;
pub mod session_cookie;

pub use auth::{security_gate, AuthenticatedUser};
pub use session_cookie::{clear_session_cookie, read_session_cookie, session_cookie, SESSION_COOKIE};
