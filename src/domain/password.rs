//! Password value object.
//!
//! Wraps an Argon2 PHC string. Plain text never outlives the call that
//! hashes or checks it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Well-formed Argon2id hash that matches no password. Checked when an
/// account is missing so failed logins cost the same either way.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hashed account password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a new plain-text password.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than
    /// [`MIN_PASSWORD_LENGTH`] characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Hash that never verifies; see [`DECOY_HASH`].
    pub fn decoy() -> Self {
        Self::from_hash(DECOY_HASH.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plain-text candidate. Malformed stored hashes never match.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("hunter22").unwrap();

        assert!(password.verify("hunter22"));
        assert!(!password.verify("hunter23"));
        assert_ne!(password.as_str(), "hunter22");
    }

    #[test]
    fn test_restored_hash_still_verifies() {
        let hash = Password::new("open-sesame").unwrap().into_string();
        assert!(Password::from_hash(hash).verify("open-sesame"));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let first = Password::new("same-password").unwrap();
        let second = Password::new("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_password_too_short() {
        assert!(matches!(Password::new("12345"), Err(AppError::Validation(_))));
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn test_decoy_never_matches() {
        let decoy = Password::decoy();
        assert!(!decoy.verify(""));
        assert!(!decoy.verify("password"));
    }

    #[test]
    fn test_debug_hides_hash() {
        let password = Password::new("hunter22").unwrap();
        assert!(!format!("{:?}", password).contains(password.as_str()));
    }
}
