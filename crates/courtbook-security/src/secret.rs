use courtbook_core::{CourtbookError, CourtbookResult};
use tracing::warn;

/// Compare two strings in constant time with respect to their contents.
///
/// Length mismatch returns early; only the byte comparison is constant-time.
pub fn constant_time_eq(expected: &str, candidate: &str) -> bool {
    let a = expected.as_bytes();
    let b = candidate.as_bytes();

    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// The organizer password guarding admin screens.
///
/// This is a single shared value, not a credential system.
#[derive(Clone, Default)]
pub struct SharedSecret {
    value: Option<String>,
}

impl SharedSecret {
    /// Wraps a configured secret. Empty strings count as unset.
    pub fn new(value: Option<String>) -> Self {
        Self {
            value: value.filter(|v| !v.is_empty()),
        }
    }

    /// Whether a secret is configured.
    pub fn is_configured(&self) -> bool {
        self.value.is_some()
    }

    /// Checks `candidate` against the secret.
    ///
    /// Fails with `Config` when no secret is configured and `Unauthorized`
    /// on mismatch.
    pub fn verify(&self, candidate: &str) -> CourtbookResult<()> {
        let Some(expected) = self.value.as_deref() else {
            warn!("Admin password check attempted without a configured secret");
            return Err(CourtbookError::Config(
                "Admin password not configured".to_string(),
            ));
        };
        if constant_time_eq(expected, candidate) {
            Ok(())
        } else {
            warn!("Admin password rejected");
            Err(CourtbookError::Unauthorized("Incorrect password".to_string()))
        }
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("configured", &self.is_configured())
            .finish()
    }
}
