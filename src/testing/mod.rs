use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::auth::PasswordEncoder;
use crate::config::AppConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewNote, Note, NotePatch, Role, User};
use crate::database::repository::{NoteRepository, UserRepository};
use crate::middleware::SESSION_COOKIE;

/// Development config with the cheapest bcrypt cost.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    config
}

/// Notes held in memory with sequential ids starting at 1.
#[derive(Default)]
pub struct MemoryNoteRepository {
    inner: Mutex<(i64, BTreeMap<i64, Note>)>,
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn find_all(&self) -> Result<Vec<Note>, DatabaseError> {
        Ok(self.inner.lock().await.1.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Note>, DatabaseError> {
        Ok(self.inner.lock().await.1.get(&id).cloned())
    }

    async fn insert(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let mut guard = self.inner.lock().await;
        guard.0 += 1;
        let stored = Note {
            id: guard.0,
            title: note.title,
            content: note.content,
        };
        guard.1.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, patch: NotePatch) -> Result<Option<Note>, DatabaseError> {
        let mut guard = self.inner.lock().await;
        Ok(guard.1.get_mut(&patch.id).map(|existing| {
            existing.apply(patch);
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.inner.lock().await.1.remove(&id).is_some())
    }
}

#[derive(Default)]
struct UserTables {
    users: Vec<User>,
    roles: Vec<Role>,
}

#[derive(Default)]
pub struct MemoryUserRepository {
    tables: Mutex<UserTables>,
}

impl MemoryUserRepository {
    /// Adds a user whose password is stored as a bcrypt hash.
    pub async fn seed(&self, name: &str, password: &str, roles: &[&str]) {
        let hash = PasswordEncoder::new(4).encode(password).unwrap();
        let user = self.create_user(name, &hash).await.unwrap();
        for role in roles {
            let role = self.ensure_role(role).await.unwrap();
            self.assign_role(user.id, role.id).await.unwrap();
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.name == name).cloned())
    }

    async fn create_user(&self, name: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let mut tables = self.tables.lock().await;
        let user = User {
            id: tables.users.len() as i64 + 1,
            name: name.to_string(),
            password: password_hash.to_string(),
            roles: Vec::new(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn ensure_role(&self, name: &str) -> Result<Role, DatabaseError> {
        let mut tables = self.tables.lock().await;
        if let Some(role) = tables.roles.iter().find(|r| r.name == name) {
            return Ok(role.clone());
        }
        let role = Role {
            id: tables.roles.len() as i32 + 1,
            name: name.to_string(),
        };
        tables.roles.push(role.clone());
        Ok(role)
    }

    async fn assign_role(&self, user_id: i64, role_id: i32) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().await;
        let role = tables
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("role {}", role_id)))?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        if !user.roles.contains(&role) {
            user.roles.push(role);
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.lock().await.users.clone())
    }
}

/// Router over in-memory storage with two accounts:
/// `admin`/`secret` holding ADMIN and `viewer`/`secret` holding USER.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    admin_cookie: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let users = MemoryUserRepository::default();
        users.seed("admin", "secret", &["ADMIN"]).await;
        users.seed("viewer", "secret", &["USER"]).await;

        let state = AppState::new(
            Arc::new(MemoryNoteRepository::default()),
            Arc::new(users),
            test_config().security,
        );
        let router = app(state.clone());

        let mut test_app = Self {
            state,
            router,
            admin_cookie: String::new(),
        };
        test_app.admin_cookie = test_app.cookie_for("admin", "secret").await;
        test_app
    }

    /// `Cookie` header value for a fresh session of `username`.
    pub async fn cookie_for(&self, username: &str, password: &str) -> String {
        let details = self.state.auth.authenticate(username, password).await.unwrap();
        let token = self.state.auth.issue_session(&details).unwrap();
        format!("{}={}", SESSION_COOKIE, token)
    }

    pub fn authed(&self, method: Method, uri: &str, body: Option<&str>) -> Request<Body> {
        form_request(method, uri, body, Some(&self.admin_cookie))
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Request with an optional form-encoded body and `Cookie` header.
pub fn form_request(method: Method, uri: &str, body: Option<&str>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    builder.body(body).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
