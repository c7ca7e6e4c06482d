use std::fmt::{Display, Formatter};
use std::str::FromStr;

use portal_core::{AppError, AppResult, WoredaId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a QR-initiated access request.
///
/// Transitions are monotonic: `pending` moves to exactly one of the terminal
/// states and nothing ever leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting an administrator's decision.
    Pending,
    /// Granted; a temporary access token exists for the request.
    Approved,
    /// Rejected; no token will ever be issued.
    Denied,
}

impl RequestStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Returns true for states from which no further transition occurs.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Denied)
    }

    /// Returns whether the state machine permits moving to `next`.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }
}

impl Display for RequestStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            _ => Err(AppError::Validation(format!(
                "unknown request status '{value}'"
            ))),
        }
    }
}

/// Human-presented short code minted at QR-generation time.
///
/// Codes look like `WRD-1700000000-ABC1234`: a fixed prefix, the mint time in
/// unix seconds, and a short random suffix. Validation is deliberately loose
/// (uppercase alphanumerics and dashes) so older code batches keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessCode(String);

impl AccessCode {
    const MAX_LENGTH: usize = 64;

    /// Creates a validated access code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "access code must not be empty".to_owned(),
            ));
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "access code must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        if !trimmed
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '-')
        {
            return Err(AppError::Validation(
                "access code may only contain letters, digits, and dashes".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying code slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for AccessCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A visitor's request for temporary access to a woreda's documents.
///
/// Created when a QR code is redeemed, decided exactly once by an
/// administrator, and consulted on every protected document fetch as the
/// complete authorization context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Opaque record identifier.
    pub id: Uuid,
    /// Administrative scope the request was made against.
    pub woreda_id: WoredaId,
    /// Code the requester uses to look up status before a token exists.
    pub code: AccessCode,
    /// Best-effort client network origin, advisory only.
    pub ip_address: Option<String>,
    /// Current lifecycle state.
    pub status: RequestStatus,
    /// Creation instant.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Status payload surfaced to the polling client.
///
/// The token travels with the first `approved` observation instead of
/// requiring a separate round-trip, and absent fields are impossible by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RequestStatusView {
    /// No decision yet; keep polling.
    Pending,
    /// Granted, with the bearer token for subsequent document fetches.
    Approved {
        /// Temporary access token bound to the approved request.
        token: String,
    },
    /// Rejected; polling should stop.
    Denied,
}

impl RequestStatusView {
    /// Returns true when no further status change can occur.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AccessCode, RequestStatus, RequestStatusView};

    #[test]
    fn status_roundtrip_storage_value() {
        let status = RequestStatus::Approved;
        let restored = RequestStatus::from_str(status.as_str());
        assert!(restored.is_ok());
        assert_eq!(restored.unwrap_or(RequestStatus::Pending), status);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = RequestStatus::from_str("granted");
        assert!(parsed.is_err());
    }

    #[test]
    fn only_pending_transitions_forward() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Denied));
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Denied));
        assert!(!RequestStatus::Denied.can_transition_to(RequestStatus::Approved));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn access_code_accepts_minted_format() {
        let code = AccessCode::new("WRD-1700000000-ABC1234");
        assert!(code.is_ok());
    }

    #[test]
    fn access_code_rejects_other_punctuation() {
        assert!(AccessCode::new("WRD 1700000000").is_err());
        assert!(AccessCode::new("").is_err());
        assert!(AccessCode::new("a".repeat(65)).is_err());
    }

    #[test]
    fn status_view_serializes_with_status_tag() {
        let approved = RequestStatusView::Approved {
            token: "abc123".to_owned(),
        };
        let encoded = serde_json::to_value(&approved).unwrap_or_default();
        assert_eq!(
            encoded,
            serde_json::json!({"status": "approved", "token": "abc123"})
        );

        let pending = serde_json::to_value(RequestStatusView::Pending).unwrap_or_default();
        assert_eq!(pending, serde_json::json!({"status": "pending"}));
    }

    #[test]
    fn terminal_views_are_terminal() {
        assert!(!RequestStatusView::Pending.is_terminal());
        assert!(RequestStatusView::Denied.is_terminal());
        assert!(
            RequestStatusView::Approved {
                token: "t".to_owned()
            }
            .is_terminal()
        );
    }
}
