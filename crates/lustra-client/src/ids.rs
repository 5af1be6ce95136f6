//! Control-plane ID types
//!
//! Newtype wrappers for type-safe identifiers. The control plane hands out
//! opaque string identifiers (`fs-0123456789abcdef0`, `backup-…`); these
//! wrappers keep them from being mixed up in signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a file system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSystemId(String);

impl FileSystemId {
    /// Wrap an identifier returned by the control plane.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FileSystemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FileSystemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for a file system backup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupId(String);

impl BackupId {
    /// Wrap a backup identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BackupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BackupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
