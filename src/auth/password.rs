use tracing::warn;

use super::AuthError;

/// bcrypt with a fixed cost factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordEncoder {
    cost: u32,
}

impl PasswordEncoder {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn encode(&self, raw: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(raw, self.cost)?)
    }

    /// A malformed stored hash never matches.
    pub fn matches(&self, raw: &str, hash: &str) -> bool {
        match bcrypt::verify(raw, hash) {
            Ok(ok) => ok,
            Err(e) => {
                warn!("Stored password hash could not be verified: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_salted_hash_that_matches() {
        let encoder = PasswordEncoder::new(4);
        let a = encoder.encode("hunter2").unwrap();
        let b = encoder.encode("hunter2").unwrap();

        assert_ne!(a, "hunter2");
        assert_ne!(a, b);
        assert!(encoder.matches("hunter2", &a));
        assert!(encoder.matches("hunter2", &b));
        assert!(!encoder.matches("hunter3", &a));
    }

    #[test]
    fn plaintext_stored_password_never_matches() {
        let encoder = PasswordEncoder::new(4);
        assert!(!encoder.matches("hunter2", "hunter2"));
    }
}
