//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for design-tool identifiers.
//! Each type ensures type safety and rejects empty values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Design-tool node identifier
///
/// Host node ids look like `12:345` (or `I12:345;6:7` for instances) and
/// may contain characters that are illegal in file names.
///
/// # Examples
///
/// ```
/// use layer_export::domain::ids::NodeId;
/// use std::str::FromStr;
///
/// let id = NodeId::from_str("618:21941").unwrap();
/// assert_eq!(id.sanitized(), "618_21941");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a new NodeId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Node ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the node ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-name safe form: every `:` becomes `_`
    pub fn sanitized(&self) -> String {
        self.0.replace(':', "_")
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Design file key (the `<key>` segment of a `/design/<key>/...` URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileKey(String);

impl FileKey {
    /// Creates a new FileKey, rejecting empty keys and keys containing `/`
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err("File key cannot be empty".to_string());
        }
        if trimmed.contains('/') {
            return Err(format!("File key must not contain '/': {trimmed}"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the file key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
