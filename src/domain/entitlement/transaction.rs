//! Authoritative transaction state as reported by the provider.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata keys that may carry an application-supplied email, in priority
/// order. Checkout flows set this so the entitlement follows the account that
/// started the purchase even if the payer uses a different provider login.
pub const METADATA_EMAIL_KEYS: [&str; 3] = ["app_email", "user_email", "email"];

/// Lifecycle status of a provider transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Approved,
    Pending,
    Authorized,
    InProcess,
    InMediation,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
    /// A status this relay does not know about.
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Approved => "approved",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Authorized => "authorized",
            TransactionStatus::InProcess => "in_process",
            TransactionStatus::InMediation => "in_mediation",
            TransactionStatus::Rejected => "rejected",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::ChargedBack => "charged_back",
            TransactionStatus::Other(s) => s,
        }
    }
}

impl From<&str> for TransactionStatus {
    fn from(s: &str) -> Self {
        match s {
            "approved" => TransactionStatus::Approved,
            "pending" => TransactionStatus::Pending,
            "authorized" => TransactionStatus::Authorized,
            "in_process" => TransactionStatus::InProcess,
            "in_mediation" => TransactionStatus::InMediation,
            "rejected" => TransactionStatus::Rejected,
            "cancelled" => TransactionStatus::Cancelled,
            "refunded" => TransactionStatus::Refunded,
            "charged_back" => TransactionStatus::ChargedBack,
            other => TransactionStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        TransactionStatus::from(s.as_str())
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider transaction. Read-only to this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub status: TransactionStatus,
    pub payer_email: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl TransactionRecord {
    /// Only approved transactions grant an entitlement.
    pub fn is_approved(&self) -> bool {
        self.status == TransactionStatus::Approved
    }

    /// The email the entitlement should be attributed to.
    ///
    /// An application-supplied email in metadata wins over the payer's own.
    /// Blank values are treated as absent.
    pub fn attributable_email(&self) -> Option<&str> {
        METADATA_EMAIL_KEYS
            .iter()
            .filter_map(|key| self.metadata.get(*key))
            .map(String::as_str)
            .chain(self.payer_email.as_deref())
            .find(|email| !email.trim().is_empty())
    }
}
