//! Argon2id hashing behind the administrator password port.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use portal_application::PasswordHasher as PasswordHasherPort;
use portal_core::{AppError, AppResult};

/// Memory cost in KiB (19 MiB), from the OWASP password storage guidance.
const MEMORY_COST_KIB: u32 = 19_456;
/// Iteration count paired with the 19 MiB memory cost.
const TIME_COST: u32 = 2;
/// Lane count.
const PARALLELISM: u32 = 1;

/// Argon2id implementation of the password hashing port.
///
/// Produces self-describing PHC strings, so the cost parameters can be
/// raised later without invalidating stored hashes.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Builds a hasher with the portal's fixed cost parameters.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .unwrap_or_else(|_| Params::default());

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|error| AppError::Internal(format!("could not hash password: {error}")))?;

        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(password_hash).map_err(|error| {
            AppError::Internal(format!("stored password hash is malformed: {error}"))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification error: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use portal_application::PasswordHasher as PasswordHasherPort;
    use portal_core::AppResult;

    use super::Argon2PasswordHasher;

    #[test]
    fn a_hashed_password_verifies_against_its_own_hash() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();

        let hash = hasher.hash_password("kebele-office-passphrase")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("kebele-office-passphrase", &hash)?);
        Ok(())
    }

    #[test]
    fn a_wrong_password_is_rejected_without_erroring() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();

        let hash = hasher.hash_password("kebele-office-passphrase")?;

        assert!(!hasher.verify_password("a-different-passphrase", &hash)?);
        Ok(())
    }

    #[test]
    fn hashing_the_same_password_twice_salts_differently() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();

        let first = hasher.hash_password("kebele-office-passphrase")?;
        let second = hasher.hash_password("kebele-office-passphrase")?;

        assert_ne!(first, second);
        assert!(hasher.verify_password("kebele-office-passphrase", &second)?);
        Ok(())
    }

    #[test]
    fn a_malformed_stored_hash_is_an_error_not_a_mismatch() {
        let hasher = Argon2PasswordHasher::new();

        let result = hasher.verify_password("anything", "not-a-phc-string");

        assert!(result.is_err());
    }
}
