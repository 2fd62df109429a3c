use std::fmt;

use crate::error::ConfigError;

/// The API key pair every request is signed with.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn try_new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        let secret = secret.into().trim().to_string();

        if key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if secret.is_empty() {
            return Err(ConfigError::MissingSecretKey);
        }

        Ok(Self { key, secret })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Value of the `X-Key` header.
    pub fn key_header(&self) -> String {
        format!("Key {}", self.key)
    }

    /// Value of the `X-Secret` header.
    pub fn secret_header(&self) -> String {
        format!("Secret {}", self.secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_values() {
        assert!(matches!(
            Credentials::try_new("", "s"),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            Credentials::try_new("k", "   "),
            Err(ConfigError::MissingSecretKey)
        ));
    }

    #[test]
    fn header_values() {
        let creds = Credentials::try_new(" abc ", "xyz").unwrap();
        assert_eq!(creds.key_header(), "Key abc");
        assert_eq!(creds.secret_header(), "Secret xyz");
    }

    #[test]
    fn debug_hides_secret() {
        let creds = Credentials::try_new("abc", "topsecret").unwrap();
        let out = format!("{creds:?}");
        assert!(out.contains("abc"));
        assert!(!out.contains("topsecret"));
    }
}
