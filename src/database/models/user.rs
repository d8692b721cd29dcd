use serde::{Deserialize, Serialize};

use super::role::Role;

/// Login account with its roles loaded eagerly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// bcrypt hash, never plaintext
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: Vec<Role>,
}

impl User {
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.name.as_str())
    }
}
