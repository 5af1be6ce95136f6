//! Desired file system configuration
//!
//! The caller-declared target state. Immutable fields are fixed at
//! creation and force replacement if changed; mutable fields can be
//! updated in place. Computed fields are filled in by read-back after a
//! create or update converges.

use serde::{Deserialize, Serialize};

use lustra_client::ids::BackupId;
use lustra_client::types::{
    AutoImportPolicy, CompressionType, DeploymentType, DriveCacheType, FileSystem,
    LogConfiguration, MetadataConfiguration, RootSquashConfiguration, StorageType,
};

use crate::error::{ReconcileError, ReconcileResult};

/// Minimum storage capacity in GiB the control plane accepts.
pub const MIN_STORAGE_CAPACITY: u64 = 1200;

/// Desired configuration for a managed Lustre file system.
///
/// Optional fields left as `None` are never sent to the control plane, so
/// its computed defaults stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSystemConfig {
    // Immutable fields, fixed at creation.
    /// Deployment type. Defaults to first-generation scratch.
    pub deployment_type: DeploymentType,
    /// Storage media. Defaults to SSD.
    pub storage_type: StorageType,
    /// Subnet placement. Required; the first entry hosts the primary
    /// network interface.
    pub subnet_ids: Vec<String>,
    /// Security groups to attach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
    /// KMS key for encryption at rest (persistent deployments only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    /// Backup to restore from instead of creating from scratch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<BackupId>,
    /// Object-store path data is imported from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    /// Object-store path data is exported to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
    /// Chunk size (MiB) used when striping imported files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_file_chunk_size: Option<u32>,
    /// File system software version (`x.y`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_system_version: Option<String>,
    /// Whether tags are copied to backups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_tags_to_backups: Option<bool>,
    /// Read-cache option (HDD storage only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_cache_type: Option<DriveCacheType>,

    // Mutable fields, updatable in place (with capacity-like caveats,
    // see the differ).
    /// Storage capacity in GiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_capacity: Option<u64>,
    /// Provisioned throughput per TiB of storage (MB/s/TiB).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_unit_storage_throughput: Option<u32>,
    /// Import policy for repository changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_import_policy: Option<AutoImportPolicy>,
    /// Automatic backup retention in days (0 disables backups).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic_backup_retention_days: Option<u32>,
    /// Daily backup window start (`HH:MM`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_automatic_backup_start_time: Option<String>,
    /// Weekly maintenance window start (`d:HH:MM`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_maintenance_start_time: Option<String>,
    /// Data compression setting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_compression_type: Option<CompressionType>,
    /// Audit logging configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_configuration: Option<LogConfiguration>,
    /// Metadata subsystem configuration. Only legal under the
    /// second-generation persistent deployment type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_configuration: Option<MetadataConfiguration>,
    /// Root-squash policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_squash_configuration: Option<RootSquashConfiguration>,

    // Computed fields, populated by read-back. Never sent.
    /// DNS name of the endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    /// Mount name clients use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_name: Option<String>,
    /// Attached network interfaces, primary first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interface_ids: Vec<String>,
    /// Owning account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// VPC the file system is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

impl FileSystemConfig {
    /// Check field combinations the control plane would reject, without
    /// issuing any call.
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.subnet_ids.is_empty() {
            return Err(ReconcileError::configuration(
                "subnet_ids must contain at least one subnet",
            ));
        }

        if self.metadata_configuration.is_some()
            && self.deployment_type != DeploymentType::Persistent2
        {
            return Err(ReconcileError::configuration(format!(
                "metadata_configuration can only be set when deployment_type is {}, got {}",
                DeploymentType::Persistent2,
                self.deployment_type
            )));
        }

        if self.per_unit_storage_throughput.is_some() && !self.deployment_type.is_persistent() {
            return Err(ReconcileError::configuration(format!(
                "per_unit_storage_throughput requires a persistent deployment_type, got {}",
                self.deployment_type
            )));
        }

        if let Some(capacity) = self.storage_capacity {
            if capacity < MIN_STORAGE_CAPACITY {
                return Err(ReconcileError::configuration(format!(
                    "storage_capacity must be at least {MIN_STORAGE_CAPACITY} GiB, got {capacity}"
                )));
            }
        }

        Ok(())
    }

    /// Overwrite this record with the observed remote state.
    ///
    /// Copies every field, including read-only computed attributes; this
    /// is how derived values reach the caller after create and update.
    pub fn apply_observed(&mut self, fs: &FileSystem) {
        self.deployment_type = fs.deployment_type;
        self.storage_type = fs.storage_type;
        self.storage_capacity = Some(fs.storage_capacity);
        self.subnet_ids = fs.subnet_ids.clone();
        if !fs.security_group_ids.is_empty() {
            self.security_group_ids = fs.security_group_ids.clone();
        }
        self.kms_key_id = fs.kms_key_id.clone();
        self.file_system_version = fs.file_system_version.clone();
        self.per_unit_storage_throughput = fs.per_unit_storage_throughput;
        self.automatic_backup_retention_days = fs.automatic_backup_retention_days;
        self.daily_automatic_backup_start_time = fs.daily_automatic_backup_start_time.clone();
        self.weekly_maintenance_start_time = fs.weekly_maintenance_start_time.clone();
        self.copy_tags_to_backups = fs.copy_tags_to_backups;
        self.data_compression_type = fs.data_compression_type;
        self.drive_cache_type = fs.drive_cache_type;
        self.log_configuration = fs.log_configuration.clone();
        self.metadata_configuration = fs.metadata_configuration.clone();
        if fs.root_squash_configuration.is_some() {
            self.root_squash_configuration = fs.root_squash_configuration.clone();
        }
        if let Some(repo) = &fs.data_repository_configuration {
            self.import_path = repo.import_path.clone();
            self.export_path = repo.export_path.clone();
            self.auto_import_policy = repo.auto_import_policy;
            self.imported_file_chunk_size = repo.imported_file_chunk_size;
        }

        self.dns_name = fs.dns_name.clone();
        self.mount_name = fs.mount_name.clone();
        self.network_interface_ids = fs.network_interface_ids.clone();
        self.owner_id = fs.owner_id.clone();
        self.vpc_id = fs.vpc_id.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lustra_client::types::{MetadataConfiguration, MetadataMode};

    fn base_config() -> FileSystemConfig {
        FileSystemConfig {
            subnet_ids: vec!["subnet-1".to_string()],
            storage_capacity: Some(1200),
            ..FileSystemConfig::default()
        }
    }

    #[test]
    fn test_valid_minimal_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_missing_subnets_rejected() {
        let config = FileSystemConfig {
            subnet_ids: vec![],
            ..base_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ReconcileError::Configuration { .. })
        ));
    }

    #[test]
    fn test_metadata_requires_persistent2() {
        let mut config = base_config();
        config.metadata_configuration = Some(MetadataConfiguration {
            mode: MetadataMode::UserProvisioned,
            iops: Some(3000),
        });
        assert!(matches!(
            config.validate(),
            Err(ReconcileError::Configuration { .. })
        ));

        config.deployment_type = DeploymentType::Persistent2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_throughput_requires_persistent() {
        let mut config = base_config();
        config.per_unit_storage_throughput = Some(200);
        assert!(config.validate().is_err());

        config.deployment_type = DeploymentType::Persistent1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capacity_minimum() {
        let mut config = base_config();
        config.storage_capacity = Some(600);
        assert!(config.validate().is_err());
    }
}
