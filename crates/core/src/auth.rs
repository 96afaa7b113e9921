use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Opaque bearer credential issued by the external auth subsystem.
///
/// Rolegate never inspects or validates the token; it only forwards it to the
/// permission authority and uses its presence as the "signed in" signal.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Creates a credential from a raw token.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::Validation(
                "session credential must not be empty".to_owned(),
            ));
        }

        Ok(Self(token))
    }

    /// Returns the raw token for transport headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for SessionCredential {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("SessionCredential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::SessionCredential;

    #[test]
    fn debug_output_hides_the_token() {
        let credential = SessionCredential::new("secret-token");
        assert!(credential.is_ok());

        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn blank_credential_is_rejected() {
        assert!(SessionCredential::new("  ").is_err());
    }
}
