//! Control-plane client error types
//!
//! Error definitions with not-found and transient classification. The
//! reconciliation engine recovers from "not found" locally (idempotent
//! delete, state clearing on read) so that kind must stay distinguishable
//! from transport and validation failures.

use thiserror::Error;

use crate::ids::{BackupId, FileSystemId};

/// Error returned by control-plane calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The file system does not exist (or is not of the requested kind).
    #[error("file system not found: {id}")]
    FileSystemNotFound { id: FileSystemId },

    /// The backup to restore from does not exist.
    #[error("backup not found: {id}")]
    BackupNotFound { id: BackupId },

    /// The request was rejected as malformed.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// A parameter combination the control plane does not accept.
    #[error("incompatible parameter '{parameter}': {message}")]
    IncompatibleParameter { parameter: String, message: String },

    /// An account-level service limit was hit.
    #[error("service limit exceeded: {message}")]
    ServiceLimitExceeded { message: String },

    /// The caller is being rate limited.
    #[error("request throttled")]
    Throttled,

    /// The control plane is temporarily unavailable.
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Failed to reach the control plane.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response that does not fit the API contract (e.g. duplicate
    /// identifiers in a describe result).
    #[error("unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// Internal control-plane error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ApiError {
    /// Whether this error means the addressed resource is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::FileSystemNotFound { .. } | ApiError::BackupNotFound { .. }
        )
    }

    /// Whether this error is transient and the call may be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Throttled
                | ApiError::ServiceUnavailable { .. }
                | ApiError::ConnectionFailed { .. }
        )
    }

    /// Get an error code for classification.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::FileSystemNotFound { .. } => "FILE_SYSTEM_NOT_FOUND",
            ApiError::BackupNotFound { .. } => "BACKUP_NOT_FOUND",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::IncompatibleParameter { .. } => "INCOMPATIBLE_PARAMETER",
            ApiError::ServiceLimitExceeded { .. } => "SERVICE_LIMIT_EXCEEDED",
            ApiError::Throttled => "THROTTLED",
            ApiError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            ApiError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ApiError::UnexpectedResponse { .. } => "UNEXPECTED_RESPONSE",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    // Convenience constructors

    /// Create a file-system-not-found error.
    pub fn not_found(id: impl Into<FileSystemId>) -> Self {
        ApiError::FileSystemNotFound { id: id.into() }
    }

    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    /// Create an unexpected-response error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        ApiError::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// Create a connection-failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        ApiError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection-failed error with a source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type for control-plane calls.
pub type ApiResult<T> = Result<T, ApiError>;
