//! Entitlement grants expressed as upsert-merge patches.
//!
//! A grant never replaces a user document; it names only the fields it owns
//! and leaves everything else other producers have written untouched.

use std::collections::BTreeMap;

/// Document field holding the entitlement flag.
pub const FIELD_PREMIUM: &str = "premium";
/// Document field stamped with the server time of the last grant.
pub const FIELD_PREMIUM_LAST_UPDATE: &str = "premiumLastUpdate";
/// Document field recording the transaction that triggered the last grant.
pub const FIELD_LAST_TRANSACTION_ID: &str = "lastTransactionId";

/// Value of a single field in a merge patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    /// Resolved by the store at write time, never by the caller.
    ServerTimestamp,
}

/// A set of fields to merge into a document, creating it if absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePatch {
    fields: BTreeMap<String, FieldValue>,
}

impl MergePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field.
    pub fn set(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Splits the patch into literal values and server-timestamp field names.
    pub fn partition(&self) -> (serde_json::Map<String, serde_json::Value>, Vec<String>) {
        let mut literals = serde_json::Map::new();
        let mut stamped = Vec::new();
        for (name, value) in &self.fields {
            match value {
                FieldValue::Bool(b) => {
                    literals.insert(name.clone(), serde_json::Value::Bool(*b));
                }
                FieldValue::Text(s) => {
                    literals.insert(name.clone(), serde_json::Value::String(s.clone()));
                }
                FieldValue::ServerTimestamp => stamped.push(name.clone()),
            }
        }
        (literals, stamped)
    }
}

/// The premium entitlement granted for an approved transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementGrant {
    pub transaction_id: String,
}

impl EntitlementGrant {
    pub fn premium(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
        }
    }

    /// Replaying the same grant yields the same patch, so the store ends in
    /// an equivalent state apart from the server timestamp.
    pub fn to_patch(&self) -> MergePatch {
        MergePatch::new()
            .set(FIELD_PREMIUM, FieldValue::Bool(true))
            .set(FIELD_PREMIUM_LAST_UPDATE, FieldValue::ServerTimestamp)
            .set(
                FIELD_LAST_TRANSACTION_ID,
                FieldValue::Text(self.transaction_id.clone()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_grant_sets_owned_fields_only() {
        let patch = EntitlementGrant::premium("555").to_patch();

        assert_eq!(patch.get(FIELD_PREMIUM), Some(&FieldValue::Bool(true)));
        assert_eq!(
            patch.get(FIELD_PREMIUM_LAST_UPDATE),
            Some(&FieldValue::ServerTimestamp)
        );
        assert_eq!(
            patch.get(FIELD_LAST_TRANSACTION_ID),
            Some(&FieldValue::Text("555".to_string()))
        );
        assert_eq!(patch.iter().count(), 3);
    }

    #[test]
    fn same_grant_produces_equal_patches() {
        let grant = EntitlementGrant::premium("777");
        assert_eq!(grant.to_patch(), grant.to_patch());
    }

    #[test]
    fn partition_separates_server_timestamps() {
        let patch = EntitlementGrant::premium("555").to_patch();
        let (literals, stamped) = patch.partition();

        assert_eq!(literals.get("premium"), Some(&serde_json::json!(true)));
        assert_eq!(literals.get("lastTransactionId"), Some(&serde_json::json!("555")));
        assert!(!literals.contains_key("premiumLastUpdate"));
        assert_eq!(stamped, vec!["premiumLastUpdate".to_string()]);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(MergePatch::new().is_empty());
        assert!(!EntitlementGrant::premium("1").to_patch().is_empty());
    }
}
