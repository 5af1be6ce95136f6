//! Mutation and describe request structures
//!
//! Optional fields left as `None` are absent from the marshaled request, so
//! the control plane keeps its computed defaults for them. Both create
//! shapes embed the same [`LustreCreateConfig`] block; callers populate it
//! once and create behavior is identical whether a file system is built
//! from scratch or restored from a backup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{BackupId, FileSystemId};
use crate::types::{
    AutoImportPolicy, CompressionType, DeploymentType, DriveCacheType, FileSystem,
    LogConfiguration, MetadataConfiguration, RootSquashConfiguration, StorageType,
};

fn new_client_token() -> String {
    Uuid::new_v4().to_string()
}

/// Lustre-specific settings shared by both create shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LustreCreateConfig {
    /// Deployment type, fixed for the lifetime of the file system.
    pub deployment_type: DeploymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_import_policy: Option<AutoImportPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic_backup_retention_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_tags_to_backups: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_automatic_backup_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_compression_type: Option<CompressionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_cache_type: Option<DriveCacheType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_file_chunk_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_configuration: Option<LogConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_configuration: Option<MetadataConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_unit_storage_throughput: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_squash_configuration: Option<RootSquashConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_maintenance_start_time: Option<String>,
}

/// Request to create a file system from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileSystemRequest {
    /// Idempotency token.
    pub client_token: String,
    /// Storage capacity in GiB.
    pub storage_capacity: u64,
    /// Storage media.
    pub storage_type: StorageType,
    /// Subnet placement.
    pub subnet_ids: Vec<String>,
    /// Security groups to attach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
    /// KMS key for encryption at rest (persistent deployments).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    /// File system software version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_system_version: Option<String>,
    /// Lustre-specific settings.
    pub lustre: LustreCreateConfig,
}

impl CreateFileSystemRequest {
    /// Create a request with a fresh idempotency token.
    #[must_use]
    pub fn new(storage_capacity: u64, subnet_ids: Vec<String>) -> Self {
        Self {
            client_token: new_client_token(),
            storage_capacity,
            storage_type: StorageType::default(),
            subnet_ids,
            security_group_ids: Vec::new(),
            kms_key_id: None,
            file_system_version: None,
            lustre: LustreCreateConfig::default(),
        }
    }
}

/// Request to create a file system by restoring a backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFromBackupRequest {
    /// Idempotency token.
    pub client_token: String,
    /// Backup to restore from.
    pub backup_id: BackupId,
    /// Storage media.
    pub storage_type: StorageType,
    /// Subnet placement.
    pub subnet_ids: Vec<String>,
    /// Security groups to attach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
    /// KMS key for encryption at rest (persistent deployments).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    /// File system software version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_system_version: Option<String>,
    /// Lustre-specific settings.
    pub lustre: LustreCreateConfig,
}

impl CreateFromBackupRequest {
    /// Create a request with a fresh idempotency token.
    #[must_use]
    pub fn new(backup_id: BackupId, subnet_ids: Vec<String>) -> Self {
        Self {
            client_token: new_client_token(),
            backup_id,
            storage_type: StorageType::default(),
            subnet_ids,
            security_group_ids: Vec::new(),
            kms_key_id: None,
            file_system_version: None,
            lustre: LustreCreateConfig::default(),
        }
    }
}

/// Lustre-specific settings changeable in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LustreUpdateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_import_policy: Option<AutoImportPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic_backup_retention_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_automatic_backup_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_compression_type: Option<CompressionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_configuration: Option<LogConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_configuration: Option<MetadataConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_unit_storage_throughput: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_squash_configuration: Option<RootSquashConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_maintenance_start_time: Option<String>,
}

impl LustreUpdateConfig {
    /// Whether no Lustre-specific field is being changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Request to update a file system in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFileSystemRequest {
    /// Idempotency token.
    pub client_token: String,
    /// Target file system.
    pub file_system_id: FileSystemId,
    /// New storage capacity in GiB, when growing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_capacity: Option<u64>,
    /// Lustre-specific changes.
    pub lustre: LustreUpdateConfig,
}

impl UpdateFileSystemRequest {
    /// Create an empty update request with a fresh idempotency token.
    #[must_use]
    pub fn new(file_system_id: FileSystemId) -> Self {
        Self {
            client_token: new_client_token(),
            file_system_id,
            storage_capacity: None,
            lustre: LustreUpdateConfig::default(),
        }
    }

    /// Whether the request carries no change at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage_capacity.is_none() && self.lustre.is_empty()
    }
}

/// Filter for a describe call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescribeFileSystemsRequest {
    /// Restrict to these identifiers; empty lists all file systems.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_system_ids: Vec<FileSystemId>,
    /// Page size hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Continuation token from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl DescribeFileSystemsRequest {
    /// Describe a single file system by id.
    #[must_use]
    pub fn by_id(id: FileSystemId) -> Self {
        Self {
            file_system_ids: vec![id],
            max_results: None,
            next_token: None,
        }
    }
}

/// One page of a describe result. An empty page is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescribeFileSystemsPage {
    /// File systems on this page.
    #[serde(default)]
    pub file_systems: Vec<FileSystem>,
    /// Token for the next page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
