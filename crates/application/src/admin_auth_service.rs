//! Credential verification for administrator accounts.
//!
//! Session handling lives at the HTTP layer; this service only answers
//! "are these credentials valid, and for which identity?". Login failures
//! are indistinguishable to the caller whether the email or the password
//! was wrong.

use std::sync::Arc;

use async_trait::async_trait;
use portal_core::{AdminIdentity, AppError, AppResult, WoredaId};
use uuid::Uuid;

/// Minimum accepted password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Well-formed hash verified when the email is unknown, so both failure
/// paths cost one password verification.
const UNKNOWN_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$uJ/yxUuEMUUXZh0FAIYqdA$S8EHZLIZxCSaknyRK+VTCtUbFmDGillK1/RCPq/o9Fc";

/// Stored administrator account.
#[derive(Debug, Clone)]
pub struct AdminAccountRecord {
    /// Opaque account identifier.
    pub id: Uuid,
    /// Login email, stored lowercased.
    pub email: String,
    /// Human-readable name shown in the review UI.
    pub display_name: String,
    /// Password hash in PHC string format.
    pub password_hash: String,
    /// Administrative scope the account manages.
    pub woreda_id: WoredaId,
    /// Creation instant.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating an administrator account.
#[derive(Debug, Clone)]
pub struct NewAdminAccount {
    /// Login email.
    pub email: String,
    /// Human-readable name.
    pub display_name: String,
    /// Plaintext password, hashed before it reaches a repository.
    pub password: String,
    /// Administrative scope the account will manage.
    pub woreda_id: WoredaId,
}

/// Password hashing port.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into PHC string format.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; `Err` is reserved for malformed hashes
    /// and hasher failures.
    fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<bool>;
}

/// Repository port for administrator accounts.
#[async_trait]
pub trait AdminAccountRepository: Send + Sync {
    /// Finds an account by lowercased email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminAccountRecord>>;

    /// Inserts a new account with an already-hashed password.
    async fn insert(
        &self,
        account: &NewAdminAccount,
        password_hash: &str,
    ) -> AppResult<AdminAccountRecord>;
}

/// Verifies administrator credentials and provisions accounts.
#[derive(Clone)]
pub struct AdminAuthService {
    accounts: Arc<dyn AdminAccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AdminAuthService {
    /// Creates a new authentication service.
    #[must_use]
    pub fn new(accounts: Arc<dyn AdminAccountRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Verifies credentials and returns the identity on success.
    ///
    /// Returns `Ok(None)` for both unknown emails and wrong passwords.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Option<AdminIdentity>> {
        let email = email.trim().to_lowercase();

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            // Burn a comparable verification so unknown emails cost the
            // same as wrong passwords.
            let _ = self.hasher.verify_password(password, UNKNOWN_ACCOUNT_HASH);
            return Ok(None);
        };

        if self.hasher.verify_password(password, &account.password_hash)? {
            Ok(Some(identity_for(&account)))
        } else {
            Ok(None)
        }
    }

    /// Creates an administrator account and returns its identity.
    pub async fn create_account(&self, account: NewAdminAccount) -> AppResult<AdminIdentity> {
        let email = account.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if account.display_name.trim().is_empty() {
            return Err(AppError::Validation(
                "display name must not be empty".to_owned(),
            ));
        }
        if account.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::InvalidState(format!(
                "an account for '{email}' already exists"
            )));
        }

        let password_hash = self.hasher.hash_password(&account.password)?;
        let normalized = NewAdminAccount { email, ..account };
        let record = self.accounts.insert(&normalized, &password_hash).await?;

        Ok(identity_for(&record))
    }
}

fn identity_for(account: &AdminAccountRecord) -> AdminIdentity {
    AdminIdentity::new(
        account.id.to_string(),
        account.display_name.clone(),
        account.email.clone(),
        account.woreda_id.clone(),
    )
}
