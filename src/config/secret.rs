//! Credentials held in configuration
//!
//! The Figma personal access token and the TinyPNG API key are stored as
//! [`SecretString`]: the bytes are zeroized on drop, `Debug` prints
//! `[REDACTED]`, and reading the value needs an explicit `expose_secret()`.
//!
//! ```rust
//! use layer_export::config::{exposed, secret_string};
//!
//! let token = Some(secret_string("figd_token".to_string()));
//! assert_eq!(exposed(token.as_ref()), Some("figd_token"));
//! assert!(!format!("{token:?}").contains("figd_token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Token or key text, wiped when dropped
#[derive(Clone, Debug, Zeroize, Serialize, Deserialize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only; an unset `${VAR}` usually ends up here
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Credential as stored in [`AppConfig`](crate::config::AppConfig)
pub type SecretString = Secret<SecretValue>;

#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

/// Read a credential from the environment, ignoring unset or blank variables
///
/// ```rust
/// use layer_export::config::secret_from_env;
///
/// assert!(secret_from_env("LAYER_EXPORT_SURELY_UNSET_KEY").is_none());
/// ```
pub fn secret_from_env(name: &str) -> Option<SecretString> {
    std::env::var(name)
        .ok()
        .map(secret_string)
        .filter(|secret| !secret.expose_secret().is_blank())
}

/// Trimmed credential text, or `None` when absent or blank
pub fn exposed(secret: Option<&SecretString>) -> Option<&str> {
    secret
        .map(|s| s.expose_secret().as_str().trim())
        .filter(|s| !s.is_empty())
}
