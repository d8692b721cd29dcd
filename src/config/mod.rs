use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Secret used to sign session cookies when running locally without `SESSION_SECRET`.
const DEVELOPMENT_SESSION_SECRET: &str = "notes-web-development-secret-do-not-deploy";

/// Cost range accepted by bcrypt.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Session lifetimes accepted, in hours (up to a year).
const SESSION_EXPIRY_RANGE: std::ops::RangeInclusive<u64> = 1..=8760;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC secret for session tokens. Empty means "not configured".
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub session_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub secure_cookie: bool,
    /// Authority every request must hold.
    pub required_role: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Presets first, then individual env vars win
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("NOTES_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("NOTES_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Security overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours = v.parse().unwrap_or(self.security.session_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIE") {
            self.security.secure_cookie = v.parse().unwrap_or(self.security.secure_cookie);
        }
        if let Ok(v) = env::var("SECURITY_REQUIRED_ROLE") {
            self.security.required_role = v;
        }

        self
    }

    /// Checks the settings that cannot be defaulted safely.
    pub fn validate(&self) -> Result<(), String> {
        if self.security.session_secret.is_empty() {
            return Err(format!(
                "SESSION_SECRET must be set in {:?} mode",
                self.environment
            ));
        }
        if !BCRYPT_COST_RANGE.contains(&self.security.bcrypt_cost) {
            return Err(format!(
                "bcrypt cost {} outside {:?}",
                self.security.bcrypt_cost, BCRYPT_COST_RANGE
            ));
        }
        if !SESSION_EXPIRY_RANGE.contains(&self.security.session_expiry_hours) {
            return Err(format!(
                "session expiry {}h outside {:?}",
                self.security.session_expiry_hours, SESSION_EXPIRY_RANGE
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub(crate) fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                acquire_timeout_secs: 30,
                run_migrations: true,
            },
            security: SecurityConfig {
                session_secret: DEVELOPMENT_SESSION_SECRET.to_string(),
                session_expiry_hours: 24,
                bcrypt_cost: 10,
                secure_cookie: false,
                required_role: "ADMIN".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                acquire_timeout_secs: 10,
                run_migrations: true,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_expiry_hours: 8,
                bcrypt_cost: 10,
                secure_cookie: true,
                required_role: "ADMIN".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                acquire_timeout_secs: 5,
                run_migrations: false,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_expiry_hours: 4,
                bcrypt_cost: 12,
                secure_cookie: true,
                required_role: "ADMIN".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
