//! Shared primitives for all crates in the woreda document portal.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::AdminIdentity;

/// Result type used across portal crates.
pub type AppResult<T> = Result<T, AppError>;

/// Administrative scope (woreda/office) that owns documents and access
/// requests. Every authorization decision is keyed by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WoredaId(String);

impl WoredaId {
    /// Creates a validated woreda identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "woreda id must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying identifier slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for WoredaId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<WoredaId> for String {
    fn from(value: WoredaId) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Attempted transition violates a record's state machine.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Caller is not authenticated or presented an invalid/expired credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Upstream probe or fetch exceeded its time bound.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::WoredaId;

    #[test]
    fn woreda_id_rejects_whitespace() {
        let result = WoredaId::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn woreda_id_formats_as_its_value() {
        let woreda = WoredaId::new("woreda-04");
        assert_eq!(
            woreda.map(|id| id.to_string()).unwrap_or_default(),
            "woreda-04"
        );
    }
}
