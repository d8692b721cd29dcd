use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthError, PasswordEncoder};
use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::database::repository::UserRepository;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User not found with username: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Account provisioning. Not reachable over HTTP; used by `notesctl`.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    encoder: PasswordEncoder,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, encoder: PasswordEncoder) -> Self {
        Self { users, encoder }
    }

    /// Hashes `password` and stores a new user holding `roles`.
    pub async fn create_user(
        &self,
        name: &str,
        password: &str,
        roles: &[String],
    ) -> Result<User, UserError> {
        validate_username(name).map_err(UserError::InvalidInput)?;
        if password.is_empty() {
            return Err(UserError::InvalidInput("Password cannot be empty".to_string()));
        }
        for role in roles {
            validate_role_name(role).map_err(UserError::InvalidInput)?;
        }

        if self.users.find_by_name(name).await?.is_some() {
            return Err(UserError::AlreadyExists(name.to_string()));
        }

        let hash = self.encoder.encode(password)?;
        let mut user = self.users.create_user(name, &hash).await?;

        for role_name in roles {
            let role = self.users.ensure_role(role_name).await?;
            self.users.assign_role(user.id, role.id).await?;
            if !user.roles.contains(&role) {
                user.roles.push(role);
            }
        }

        info!("Created user '{}' with roles {:?}", user.name, roles);
        Ok(user)
    }

    pub async fn grant_role(&self, name: &str, role_name: &str) -> Result<User, UserError> {
        validate_role_name(role_name).map_err(UserError::InvalidInput)?;

        let mut user = self
            .users
            .find_by_name(name)
            .await?
            .ok_or_else(|| UserError::NotFound(name.to_string()))?;

        let role = self.users.ensure_role(role_name).await?;
        self.users.assign_role(user.id, role.id).await?;
        if !user.roles.contains(&role) {
            user.roles.push(role);
        }

        info!("Granted role '{}' to user '{}'", role_name, name);
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.list_users().await?)
    }
}

/// Login names: 3-50 chars of letters, digits, `_` or `-`, starting alphanumeric.
fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if username.len() > 50 {
        return Err("Username must be less than 50 characters".to_string());
    }
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err("Username can only contain letters, numbers, underscore, and hyphen".to_string());
    }
    if !username.starts_with(|c: char| c.is_alphanumeric()) {
        return Err("Username must start with a letter or number".to_string());
    }
    Ok(())
}

fn validate_role_name(role: &str) -> Result<(), String> {
    if role.is_empty() || !role.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Invalid role name '{}'", role));
    }
    Ok(())
}
