//! # Lustra control-plane client contract
//!
//! Typed request/response structures, status vocabularies, and the
//! [`FileSystemClient`] trait for the managed Lustre file system
//! control-plane API.
//!
//! This crate defines the *contract* the reconciliation engine
//! (`lustra-reconcile`) consumes; the HTTP transport and credential
//! handling that implement it for the real control plane live in a
//! separate crate. Keeping the contract free of transport concerns lets
//! the engine be exercised against scripted in-memory clients.
//!
//! ## Crate organization
//!
//! - [`ids`] - Type-safe identifiers ([`FileSystemId`], [`BackupId`])
//! - [`types`] - Status enums and observed-state structures
//! - [`requests`] - Mutation and describe request shapes
//! - [`error`] - [`ApiError`] with not-found/transient classification
//! - [`client`] - The [`FileSystemClient`] trait
//!
//! [`FileSystemId`]: ids::FileSystemId
//! [`BackupId`]: ids::BackupId
//! [`ApiError`]: error::ApiError
//! [`FileSystemClient`]: client::FileSystemClient

pub mod client;
pub mod error;
pub mod ids;
pub mod requests;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use lustra_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::FileSystemClient;
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::ids::{BackupId, FileSystemId};
    pub use crate::requests::{
        CreateFileSystemRequest, CreateFromBackupRequest, DescribeFileSystemsPage,
        DescribeFileSystemsRequest, LustreCreateConfig, LustreUpdateConfig,
        UpdateFileSystemRequest,
    };
    pub use crate::types::{
        ActionStatus, ActionType, AdministrativeAction, AuditLogLevel, AutoImportPolicy,
        CompressionType, DataRepositoryConfiguration, DeploymentType, DriveCacheType,
        FailureDetails, FileSystem, FileSystemKind, Lifecycle, LogConfiguration,
        MetadataConfiguration, MetadataMode, RootSquashConfiguration, StorageType,
    };
}

// Re-export async_trait for client implementors
pub use async_trait::async_trait;
