use serde::{Deserialize, Serialize};

use crate::WoredaId;

/// Administrator information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    subject: String,
    display_name: String,
    email: String,
    woreda_id: WoredaId,
}

impl AdminIdentity {
    /// Creates an administrator identity from account and scope data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        woreda_id: WoredaId,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            email: email.into(),
            woreda_id,
        }
    }

    /// Returns the stable subject for the administrator account.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the administrator.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the administrative scope this account manages.
    #[must_use]
    pub fn woreda_id(&self) -> &WoredaId {
        &self.woreda_id
    }
}
