use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, Authority, UserDetails};

/// Contents of the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub authorities: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(details: &UserDetails, expiry_hours: u64) -> Self {
        let now = Utc::now();
        // Out-of-range lifetimes saturate instead of panicking
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp();

        Self {
            sub: details.username.clone(),
            authorities: details
                .authorities
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn has_authority(&self, required: &str) -> bool {
        let required = Authority::from_role_name(required);
        self.authorities.iter().any(|a| a == required.as_str())
    }
}

/// HS256 signing keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl SessionKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    pub fn issue(&self, details: &UserDetails) -> Result<String, AuthError> {
        self.encode(&Claims::new(details, self.expiry_hours))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))
    }
}
