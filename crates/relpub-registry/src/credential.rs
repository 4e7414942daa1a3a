//! API credential.

use std::fmt;

use crate::error::{RegistryError, Result};

/// Environment variable holding the token unless configured otherwise.
pub const DEFAULT_TOKEN_VAR: &str = "GH_TOKEN";

/// A GitHub token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Read the token from the process environment.
    pub fn from_env(var: &str) -> Result<Self> {
        Self::from_lookup(var, |name| std::env::var(name).ok())
    }

    /// Read the token through `lookup`. Unset and blank values both count
    /// as missing.
    pub fn from_lookup(var: &str, lookup: impl FnOnce(&str) -> Option<String>) -> Result<Self> {
        match lookup(var) {
            Some(token) if !token.trim().is_empty() => Ok(Credential(token.trim().to_string())),
            _ => Err(RegistryError::MissingCredential {
                var: var.to_string(),
            }),
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_token() {
        let cred = Credential::from_lookup("GH_TOKEN", |name| {
            assert_eq!(name, "GH_TOKEN");
            Some("ghp_abc123\n".to_string())
        })
        .unwrap();
        assert_eq!(cred.authorization(), "token ghp_abc123");
    }

    #[test]
    fn unset_token_is_missing() {
        let err = Credential::from_lookup("GH_TOKEN", |_| None).unwrap_err();
        assert!(matches!(err, RegistryError::MissingCredential { ref var } if var == "GH_TOKEN"));
        assert!(err.to_string().contains("$GH_TOKEN"));
    }

    #[test]
    fn blank_token_is_missing() {
        assert!(Credential::from_lookup("TOKEN", |_| Some("  ".to_string())).is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let cred = Credential::from_lookup("T", |_| Some("secret".to_string())).unwrap();
        assert!(!format!("{cred:?}").contains("secret"));
    }
}
