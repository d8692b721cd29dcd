use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

use super::session_cookie::{clear_session_cookie, read_session_cookie};

/// Paths reachable without a session: the login form and logout.
pub const PUBLIC_PATHS: &[&str] = &["/login", "/logout"];

pub const LOGIN_PATH: &str = "/login";

/// Identity of the caller, inserted into request extensions by [`security_gate`].
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub username: String,
    pub authorities: Vec<String>,
}

/// Every request except [`PUBLIC_PATHS`] needs a valid session holding the
/// configured authority. No session redirects to the login form; a session
/// without the authority is refused with 403.
pub async fn security_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let Some(token) = read_session_cookie(request.headers()) else {
        tracing::debug!("No session for {}, redirecting to login", request.uri().path());
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let claims = match state.auth.validate_session(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Rejected session: {}", e);
            let clear = clear_session_cookie(state.security.secure_cookie);
            return ([(header::SET_COOKIE, clear)], Redirect::to(LOGIN_PATH)).into_response();
        }
    };

    let required = state.security.required_role.as_str();
    if !claims.has_authority(required) {
        tracing::warn!(
            "User '{}' lacks authority '{}' for {}",
            claims.sub,
            required,
            request.uri().path()
        );
        return ApiError::forbidden("Access Denied").into_response();
    }

    request.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
        authorities: claims.authorities,
    });

    next.run(request).await
}
