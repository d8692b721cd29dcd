use std::sync::Arc;

use crate::database::models::User;
use crate::database::repository::UserRepository;

use super::AuthError;

const ROLE_PREFIX: &str = "ROLE_";

/// Runtime form of a role, as checked by the security gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority(String);

impl Authority {
    /// `ROLE_ADMIN` and `ADMIN` both become `ADMIN`.
    pub fn from_role_name(name: &str) -> Self {
        let name = name.trim();
        Self(name.strip_prefix(ROLE_PREFIX).unwrap_or(name).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What authentication needs to know about a user.
#[derive(Debug, Clone)]
pub struct UserDetails {
    pub username: String,
    pub password_hash: String,
    pub authorities: Vec<Authority>,
}

impl UserDetails {
    pub fn has_authority(&self, required: &str) -> bool {
        let required = Authority::from_role_name(required);
        self.authorities.contains(&required)
    }
}

impl From<User> for UserDetails {
    fn from(user: User) -> Self {
        let authorities = user.role_names().map(Authority::from_role_name).collect();
        Self {
            username: user.name,
            password_hash: user.password,
            authorities,
        }
    }
}

/// Repository-backed credential lookup.
#[derive(Clone)]
pub struct UserDetailsService {
    users: Arc<dyn UserRepository>,
}

impl UserDetailsService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn load_user_by_username(&self, username: &str) -> Result<UserDetails, AuthError> {
        self.users
            .find_by_name(username)
            .await?
            .map(UserDetails::from)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))
    }
}
