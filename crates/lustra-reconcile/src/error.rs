//! Reconciliation error types
//!
//! Every error leaving the reconciler carries the operation and the file
//! system identifier (when one is known) so callers get user-facing
//! context without inspecting the chain. Lower errors are wrapped, never
//! swallowed.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use lustra_client::error::ApiError;
use lustra_client::ids::FileSystemId;

/// Reconciliation operation, used for error context and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Creating a file system.
    Create,
    /// Applying an in-place update.
    Update,
    /// Deleting a file system.
    Delete,
    /// Reading back observed state.
    Read,
}

impl Operation {
    /// Get the lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Read => "read",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced by the reconciliation engine.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// An impossible combination of desired-config fields. Detected
    /// before any network call is made.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// The requested change cannot be applied in place; the resource must
    /// be destroyed and recreated. No mutation was issued.
    #[error("update requires replacement, fields: {}", .fields.join(", "))]
    ReplacementRequired { fields: Vec<&'static str> },

    /// The file system does not exist.
    #[error("file system not found: {id}")]
    NotFound { id: FileSystemId },

    /// The file system reached a definitively bad lifecycle state.
    #[error("{operation} of file system {id} failed in state {status}: {message}")]
    Terminal {
        operation: Operation,
        id: FileSystemId,
        status: String,
        message: String,
    },

    /// The convergence wait exceeded its deadline.
    #[error(
        "timed out waiting for {operation} of file system {id} after {waited:?}{}",
        .last_status.as_deref().map(|s| format!(" (last status: {s})")).unwrap_or_default()
    )]
    Timeout {
        operation: Operation,
        id: FileSystemId,
        waited: Duration,
        last_status: Option<String>,
    },

    /// A control-plane call failed.
    #[error(
        "{operation} of file system{} failed",
        .id.as_ref().map(|i| format!(" {i}")).unwrap_or_default()
    )]
    Api {
        operation: Operation,
        id: Option<FileSystemId>,
        #[source]
        source: ApiError,
    },
}

impl ReconcileError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        ReconcileError::Configuration {
            message: message.into(),
        }
    }

    /// Wrap a control-plane error with operation context.
    pub fn api(operation: Operation, id: Option<FileSystemId>, source: ApiError) -> Self {
        ReconcileError::Api {
            operation,
            id,
            source,
        }
    }

    /// Whether this error means the file system is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            ReconcileError::NotFound { .. } => true,
            ReconcileError::Api { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
