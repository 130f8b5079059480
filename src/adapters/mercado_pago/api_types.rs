//! Mercado Pago API objects as they arrive from the payments endpoint.
//!
//! Only the fields the relay reads are modelled; everything else in the
//! (very large) payment object is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::entitlement::{TransactionRecord, TransactionStatus};

/// `GET /v1/payments/{id}` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MpPayment {
    /// Numeric in practice, but tolerated as a string.
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub status_detail: Option<String>,

    #[serde(default)]
    pub payer: Option<MpPayer>,

    /// Arbitrary key/value pairs set at preference creation.
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, Value>>,
}

/// Payer sub-object.
#[derive(Debug, Clone, Deserialize)]
pub struct MpPayer {
    #[serde(default)]
    pub email: Option<String>,
}

impl MpPayment {
    /// Maps the provider payment onto the relay's transaction record.
    ///
    /// `requested_id` stands in when the body carries no usable id.
    pub fn into_record(self, requested_id: &str) -> TransactionRecord {
        let id = self
            .id
            .as_ref()
            .and_then(scalar_to_string)
            .unwrap_or_else(|| requested_id.to_string());

        let status = self
            .status
            .filter(|s| !s.is_empty())
            .map(TransactionStatus::from)
            .unwrap_or_else(|| TransactionStatus::Other("unknown".to_string()));

        let payer_email = self
            .payer
            .and_then(|p| p.email)
            .filter(|e| !e.trim().is_empty());

        let metadata: BTreeMap<String, String> = self
            .metadata
            .unwrap_or_default()
            .iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect();

        TransactionRecord {
            id,
            status,
            payer_email,
            metadata,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
