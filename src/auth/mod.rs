//! Credential resolution, password hashing and session tokens.
//!
//! Login resolves a user by name through [`UserDetailsService`], verifies the
//! submitted password with [`PasswordEncoder`] and, on success, issues a signed
//! session token ([`SessionKeys`]) carrying the user's authorities. The security
//! gate only ever trusts what that token says.

pub mod password;
pub mod session;
pub mod user_details;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::database::manager::DatabaseError;
use crate::database::repository::UserRepository;

pub use password::PasswordEncoder;
pub use session::{Claims, SessionKeys};
pub use user_details::{Authority, UserDetails, UserDetailsService};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User not found with username: {0}")]
    UserNotFound(String),
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Invalid session: {0}")]
    InvalidSession(String),
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Form-login authentication wired from the three parts above.
#[derive(Clone)]
pub struct AuthService {
    user_details: UserDetailsService,
    encoder: PasswordEncoder,
    sessions: SessionKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, security: &SecurityConfig) -> Self {
        Self {
            user_details: UserDetailsService::new(users),
            encoder: PasswordEncoder::new(security.bcrypt_cost),
            sessions: SessionKeys::new(&security.session_secret, security.session_expiry_hours),
        }
    }

    /// Verifies a username/password pair against the stored hash.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserDetails, AuthError> {
        let details = match self.user_details.load_user_by_username(username).await {
            Ok(details) => details,
            Err(AuthError::UserNotFound(name)) => {
                warn!("Login failed: unknown user '{}'", name);
                return Err(AuthError::UserNotFound(name));
            }
            Err(e) => return Err(e),
        };

        if !self.encoder.matches(password, &details.password_hash) {
            warn!("Login failed: bad password for '{}'", username);
            return Err(AuthError::BadCredentials);
        }

        info!("User '{}' authenticated", details.username);
        Ok(details)
    }

    pub fn issue_session(&self, details: &UserDetails) -> Result<String, AuthError> {
        self.sessions.issue(details)
    }

    pub fn validate_session(&self, token: &str) -> Result<Claims, AuthError> {
        self.sessions.validate(token)
    }
}
