//! Shared-secret authenticity gate.
//!
//! The provider's dashboard lets the merchant attach a static secret to the
//! notification URL's headers. When one is configured every actionable
//! notification must present it; when none is configured the gate admits
//! everything (reduced-security mode, announced at startup).

use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use super::errors::NotificationError;

/// Header names that may carry the shared secret, in lookup order.
pub const SECRET_HEADERS: [&str; 3] = ["x-signature", "x-hook-secret", "x-webhook-secret"];

/// Admits or rejects a notification based on a shared secret header.
#[derive(Clone)]
pub struct AuthenticityGate {
    secret: Option<SecretString>,
}

impl AuthenticityGate {
    /// Creates a gate. `None` or a blank secret disables checking.
    pub fn new(secret: Option<SecretString>) -> Self {
        let secret = secret.filter(|s| !s.expose_secret().trim().is_empty());
        Self { secret }
    }

    /// A gate that admits every call.
    pub fn open() -> Self {
        Self { secret: None }
    }

    /// Whether a secret is configured.
    pub fn is_enforcing(&self) -> bool {
        self.secret.is_some()
    }

    /// Checks the request headers against the configured secret.
    ///
    /// The first recognised header that is present is the only one compared;
    /// later headers are not consulted if it mismatches.
    ///
    /// # Errors
    ///
    /// `NotificationError::Unauthorized` when a secret is configured and the
    /// presented value is absent or differs in any byte.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), NotificationError> {
        let Some(expected) = &self.secret else {
            return Ok(());
        };

        let presented = SECRET_HEADERS
            .iter()
            .find_map(|name| headers.get(*name))
            .map(|value| value.as_bytes());

        match presented {
            Some(value) if constant_time_eq(value, expected.expose_secret().as_bytes()) => Ok(()),
            _ => Err(NotificationError::Unauthorized),
        }
    }
}

impl std::fmt::Debug for AuthenticityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticityGate")
            .field("enforcing", &self.is_enforcing())
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
