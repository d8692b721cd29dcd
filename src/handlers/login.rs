use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::AuthError;
use crate::error::ApiError;
use crate::middleware::{clear_session_cookie, session_cookie};
use crate::views;

use super::form::ValidForm;
use super::notes::NOTE_LIST_PATH;

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login
pub async fn login_form(Query(query): Query<LoginPageQuery>) -> Html<String> {
    Html(views::login_page(query.error.is_some(), query.logout.is_some()))
}

/// POST /login (username, password)
pub async fn login_submit(
    State(state): State<AppState>,
    ValidForm(form): ValidForm<LoginForm>,
) -> Result<Response, ApiError> {
    let details = match state.auth.authenticate(&form.username, &form.password).await {
        Ok(details) => details,
        Err(AuthError::UserNotFound(_)) | Err(AuthError::BadCredentials) => {
            return Ok(Redirect::to("/login?error").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.auth.issue_session(&details)?;
    let cookie = session_cookie(
        &token,
        state.security.session_expiry_hours.saturating_mul(3600),
        state.security.secure_cookie,
    );

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(NOTE_LIST_PATH)).into_response())
}

/// GET | POST /logout
pub async fn logout(State(state): State<AppState>) -> Response {
    tracing::info!("Session closed");
    let cookie = clear_session_cookie(state.security.secure_cookie);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/login?logout")).into_response()
}
