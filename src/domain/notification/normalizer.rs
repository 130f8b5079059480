//! Notification normalizer.
//!
//! The provider reaches us in three shapes that must collapse into one event:
//!
//! - new-format webhook body: `{"type": "payment", "data": {"id": "123"}}`
//! - legacy IPN body: `{"topic": "payment", "resource": "123"}`
//! - query-string only: `?topic=payment&id=123` or `?type=payment&data.id=123`
//!
//! Extraction is an ordered fallback over candidate fields; the first
//! non-empty value wins. Numbers are accepted wherever a string is expected
//! because the provider is not consistent about id encoding.

use std::collections::HashMap;

use serde_json::Value;

/// The only event type that can lead to an entitlement.
pub const PAYMENT_EVENT_TYPE: &str = "payment";

/// An inbound notification reduced to the two fields that matter.
///
/// The raw body and query are retained for forensic logging only.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub event_type: Option<String>,
    pub transaction_id: Option<String>,
    pub raw_body: Value,
    pub raw_query: HashMap<String, String>,
}

/// A notification that passed classification and names a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    pub transaction_id: String,
}

/// Why a notification was classified as ignorable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// An event type was present but was not `payment`.
    NotAPayment(String),
    /// No transaction identifier could be found anywhere.
    MissingTransactionId,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::NotAPayment(kind) => write!(f, "event type '{}' is not a payment", kind),
            IgnoreReason::MissingTransactionId => write!(f, "no transaction id present"),
        }
    }
}

impl Notification {
    /// Extracts `(event_type, transaction_id)` from a body and query mapping.
    ///
    /// `event_type`: body `type`, body `topic`, query `type`, query `topic`.
    ///
    /// `transaction_id`: body `data.id`, query `id`, query `data.id`,
    /// body `resource`, body `id`.
    ///
    /// Never fails: a body that is not an object simply contributes nothing.
    pub fn normalize(body: &Value, query: &HashMap<String, String>) -> Self {
        let event_type = first_present([
            body_field(body, "type"),
            body_field(body, "topic"),
            query_field(query, "type"),
            query_field(query, "topic"),
        ]);

        let transaction_id = first_present([
            body.get("data").and_then(|data| body_field(data, "id")),
            query_field(query, "id"),
            query_field(query, "data.id"),
            body_field(body, "resource").map(resource_id),
            body_field(body, "id"),
        ]);

        Self {
            event_type,
            transaction_id,
            raw_body: body.clone(),
            raw_query: query.clone(),
        }
    }

    /// Classifies the notification as actionable or ignorable.
    ///
    /// A missing event type is not grounds for ignoring: some legacy
    /// deliveries carry only an id. A present one must be `payment`.
    pub fn classify(&self) -> Result<PaymentNotification, IgnoreReason> {
        if let Some(kind) = &self.event_type {
            if kind != PAYMENT_EVENT_TYPE {
                return Err(IgnoreReason::NotAPayment(kind.clone()));
            }
        }

        match &self.transaction_id {
            Some(id) => Ok(PaymentNotification {
                transaction_id: id.clone(),
            }),
            None => Err(IgnoreReason::MissingTransactionId),
        }
    }
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().next()
}

/// Reads a scalar field from a JSON object as a non-empty string.
fn body_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn query_field(query: &HashMap<String, String>, key: &str) -> Option<String> {
    query.get(key).and_then(|s| non_empty(s))
}

/// Blank values count as absent; anything else is kept verbatim.
fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Legacy `resource` is usually a bare id but some deliveries send the full
/// resource URL; the id is its last path segment.
fn resource_id(resource: String) -> String {
    match resource.trim_end_matches('/').rsplit_once('/') {
        Some((_, last)) if !last.is_empty() => last.to_string(),
        _ => resource,
    }
}
