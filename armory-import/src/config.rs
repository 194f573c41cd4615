//! Credential resolution for armory-import
//!
//! Battle.net client credentials come from the process environment
//! (`CLIENT_ID`, `CLIENT_SECRET`). The binary loads a `.env` file into the
//! environment before calling [`Credentials::from_env`].

use armory_common::{Error, Result};

pub const CLIENT_ID_ENV: &str = "CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "CLIENT_SECRET";

/// Battle.net OAuth client credentials
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from the environment
    ///
    /// Missing or blank values are a configuration error.
    pub fn from_env() -> Result<Self> {
        let client_id = read_env(CLIENT_ID_ENV);
        let client_secret = read_env(CLIENT_SECRET_ENV);

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(Self {
                client_id,
                client_secret,
            }),
            _ => Err(Error::Config(format!(
                "{} and {} must be set",
                CLIENT_ID_ENV, CLIENT_SECRET_ENV
            ))),
        }
    }
}

/// Non-blank environment value
fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| is_valid_key(value))
}

/// Validate credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("  \t"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("id-123", "super-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("id-123"));
        assert!(!rendered.contains("super-secret"));
    }
}
