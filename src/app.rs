use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::auth::AuthService;
use crate::config::SecurityConfig;
use crate::database::repository::{NoteRepository, PgNoteRepository, PgUserRepository, UserRepository};
use crate::handlers;
use crate::middleware::security_gate;
use crate::services::NoteService;

/// Services shared by every handler, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub auth: AuthService,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        users: Arc<dyn UserRepository>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            notes: NoteService::new(notes),
            auth: AuthService::new(users, &security),
            security: Arc::new(security),
        }
    }

    /// Postgres-backed state
    pub fn from_pool(pool: PgPool, security: SecurityConfig) -> Self {
        Self::new(
            Arc::new(PgNoteRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
            security,
        )
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Login flow (let through by the gate)
        .route("/login", get(handlers::login_form).post(handlers::login_submit))
        .route("/logout", get(handlers::logout).post(handlers::logout))
        // Notes
        .route("/", get(handlers::redirect_to_list))
        .route("/note", get(handlers::redirect_to_list))
        .route("/note/", get(handlers::redirect_to_list))
        .route("/note/list", get(handlers::list_notes))
        .route("/note/add", post(handlers::add_note))
        .route("/note/edit", post(handlers::edit_note))
        .route("/note/delete", post(handlers::delete_note))
        // Diagnostics
        .route("/test", get(handlers::test_page))
        .fallback(handlers::not_found)
        // Gate wraps routes and fallback alike
        .layer(middleware::from_fn_with_state(state.clone(), security_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
