//! Config differ
//!
//! Pure comparison of two desired-configuration snapshots. Each field is
//! classified as unchanged, changeable in place, or forcing replacement
//! (destroy and recreate). The differ never talks to the network; illegal
//! field combinations in the new snapshot fail fast here.

use lustra_client::types::{DeploymentType, MetadataMode};

use crate::config::FileSystemConfig;
use crate::error::ReconcileResult;

/// Classification of the delta observed for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldChange {
    /// No delta.
    #[default]
    Unchanged,
    /// Delta can be applied with an in-place update call.
    InPlace,
    /// Delta requires destroying and recreating the file system.
    Replace,
}

impl FieldChange {
    /// Whether a delta exists at all.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        *self != FieldChange::Unchanged
    }

    /// Whether the delta forces replacement.
    #[must_use]
    pub fn is_replace(&self) -> bool {
        *self == FieldChange::Replace
    }
}

fn immutable<T: PartialEq>(old: &T, new: &T) -> FieldChange {
    if old == new {
        FieldChange::Unchanged
    } else {
        FieldChange::Replace
    }
}

fn mutable<T: PartialEq>(old: &T, new: &T) -> FieldChange {
    if old == new {
        FieldChange::Unchanged
    } else {
        FieldChange::InPlace
    }
}

/// Per-field change classification between two config snapshots.
#[derive(Debug, Clone, Default)]
pub struct ConfigDiff {
    pub deployment_type: FieldChange,
    pub storage_type: FieldChange,
    pub subnet_ids: FieldChange,
    pub security_group_ids: FieldChange,
    pub kms_key_id: FieldChange,
    pub backup_id: FieldChange,
    pub import_path: FieldChange,
    pub export_path: FieldChange,
    pub imported_file_chunk_size: FieldChange,
    pub file_system_version: FieldChange,
    pub copy_tags_to_backups: FieldChange,
    pub drive_cache_type: FieldChange,
    pub storage_capacity: FieldChange,
    pub per_unit_storage_throughput: FieldChange,
    pub metadata_configuration: FieldChange,
    pub auto_import_policy: FieldChange,
    pub automatic_backup_retention_days: FieldChange,
    pub daily_automatic_backup_start_time: FieldChange,
    pub weekly_maintenance_start_time: FieldChange,
    pub data_compression_type: FieldChange,
    pub log_configuration: FieldChange,
    pub root_squash_configuration: FieldChange,
}

impl ConfigDiff {
    /// Compare two snapshots.
    ///
    /// The new snapshot is validated first so impossible configurations
    /// surface before anything reaches the network.
    pub fn between(old: &FileSystemConfig, new: &FileSystemConfig) -> ReconcileResult<Self> {
        new.validate()?;

        Ok(Self {
            deployment_type: immutable(&old.deployment_type, &new.deployment_type),
            storage_type: immutable(&old.storage_type, &new.storage_type),
            subnet_ids: immutable(&old.subnet_ids, &new.subnet_ids),
            security_group_ids: immutable(&old.security_group_ids, &new.security_group_ids),
            kms_key_id: immutable(&old.kms_key_id, &new.kms_key_id),
            backup_id: immutable(&old.backup_id, &new.backup_id),
            import_path: immutable(&old.import_path, &new.import_path),
            export_path: immutable(&old.export_path, &new.export_path),
            imported_file_chunk_size: immutable(
                &old.imported_file_chunk_size,
                &new.imported_file_chunk_size,
            ),
            file_system_version: immutable(&old.file_system_version, &new.file_system_version),
            copy_tags_to_backups: immutable(&old.copy_tags_to_backups, &new.copy_tags_to_backups),
            drive_cache_type: immutable(&old.drive_cache_type, &new.drive_cache_type),
            storage_capacity: diff_storage_capacity(old, new),
            per_unit_storage_throughput: diff_capacity_like(
                old.per_unit_storage_throughput,
                new.per_unit_storage_throughput,
            ),
            metadata_configuration: diff_metadata(old, new),
            auto_import_policy: mutable(&old.auto_import_policy, &new.auto_import_policy),
            automatic_backup_retention_days: mutable(
                &old.automatic_backup_retention_days,
                &new.automatic_backup_retention_days,
            ),
            daily_automatic_backup_start_time: mutable(
                &old.daily_automatic_backup_start_time,
                &new.daily_automatic_backup_start_time,
            ),
            weekly_maintenance_start_time: mutable(
                &old.weekly_maintenance_start_time,
                &new.weekly_maintenance_start_time,
            ),
            data_compression_type: mutable(&old.data_compression_type, &new.data_compression_type),
            log_configuration: mutable(&old.log_configuration, &new.log_configuration),
            root_squash_configuration: mutable(
                &old.root_squash_configuration,
                &new.root_squash_configuration,
            ),
        })
    }

    fn entries(&self) -> [(&'static str, FieldChange); 22] {
        [
            ("deployment_type", self.deployment_type),
            ("storage_type", self.storage_type),
            ("subnet_ids", self.subnet_ids),
            ("security_group_ids", self.security_group_ids),
            ("kms_key_id", self.kms_key_id),
            ("backup_id", self.backup_id),
            ("import_path", self.import_path),
            ("export_path", self.export_path),
            ("imported_file_chunk_size", self.imported_file_chunk_size),
            ("file_system_version", self.file_system_version),
            ("copy_tags_to_backups", self.copy_tags_to_backups),
            ("drive_cache_type", self.drive_cache_type),
            ("storage_capacity", self.storage_capacity),
            (
                "per_unit_storage_throughput",
                self.per_unit_storage_throughput,
            ),
            ("metadata_configuration", self.metadata_configuration),
            ("auto_import_policy", self.auto_import_policy),
            (
                "automatic_backup_retention_days",
                self.automatic_backup_retention_days,
            ),
            (
                "daily_automatic_backup_start_time",
                self.daily_automatic_backup_start_time,
            ),
            (
                "weekly_maintenance_start_time",
                self.weekly_maintenance_start_time,
            ),
            ("data_compression_type", self.data_compression_type),
            ("log_configuration", self.log_configuration),
            ("root_squash_configuration", self.root_squash_configuration),
        ]
    }

    /// Whether no field changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, c)| !c.is_changed())
    }

    /// Whether any field forces replacement.
    #[must_use]
    pub fn requires_replacement(&self) -> bool {
        self.entries().iter().any(|(_, c)| c.is_replace())
    }

    /// Names of the fields forcing replacement.
    #[must_use]
    pub fn replaced_fields(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .filter(|(_, c)| c.is_replace())
            .map(|(name, _)| *name)
            .collect()
    }
}

fn diff_capacity_like(old: Option<u32>, new: Option<u32>) -> FieldChange {
    match (old, new) {
        (o, n) if o == n => FieldChange::Unchanged,
        // A decrease cannot be applied in place.
        (Some(o), Some(n)) if n < o => FieldChange::Replace,
        _ => FieldChange::InPlace,
    }
}

fn diff_storage_capacity(old: &FileSystemConfig, new: &FileSystemConfig) -> FieldChange {
    if old.storage_capacity == new.storage_capacity {
        return FieldChange::Unchanged;
    }
    // First-generation scratch file systems cannot resize at all.
    if new.deployment_type == DeploymentType::Scratch1 {
        return FieldChange::Replace;
    }
    match (old.storage_capacity, new.storage_capacity) {
        (Some(o), Some(n)) if n < o => FieldChange::Replace,
        _ => FieldChange::InPlace,
    }
}

fn diff_metadata(old: &FileSystemConfig, new: &FileSystemConfig) -> FieldChange {
    if old.metadata_configuration == new.metadata_configuration {
        return FieldChange::Unchanged;
    }

    // An IOPS decrease forces replacement, but only under user-provisioned
    // mode; automatic mode reshapes IOPS server-side.
    if let (Some(old_meta), Some(new_meta)) =
        (&old.metadata_configuration, &new.metadata_configuration)
    {
        if new_meta.mode == MetadataMode::UserProvisioned {
            if let (Some(old_iops), Some(new_iops)) = (old_meta.iops, new_meta.iops) {
                if new_iops < old_iops {
                    return FieldChange::Replace;
                }
            }
        }
    }

    FieldChange::InPlace
}

#[cfg(test)]
mod tests {
    use super::*;
    use lustra_client::types::{MetadataConfiguration, MetadataMode};

    fn config(capacity: u64) -> FileSystemConfig {
        FileSystemConfig {
            deployment_type: DeploymentType::Persistent2,
            subnet_ids: vec!["subnet-1".to_string()],
            storage_capacity: Some(capacity),
            ..FileSystemConfig::default()
        }
    }

    #[test]
    fn test_identical_configs_empty_diff() {
        let diff = ConfigDiff::between(&config(1200), &config(1200)).unwrap();
        assert!(diff.is_empty());
        assert!(!diff.requires_replacement());
    }

    #[test]
    fn test_capacity_decrease_forces_replacement() {
        let diff = ConfigDiff::between(&config(1200), &config(1000)).unwrap();
        assert!(diff.storage_capacity.is_replace());
        assert_eq!(diff.replaced_fields(), vec!["storage_capacity"]);
    }

    #[test]
    fn test_capacity_increase_in_place() {
        let diff = ConfigDiff::between(&config(1200), &config(2400)).unwrap();
        assert_eq!(diff.storage_capacity, FieldChange::InPlace);
        assert!(!diff.requires_replacement());
    }

    #[test]
    fn test_scratch1_capacity_change_forces_replacement() {
        let old = FileSystemConfig {
            deployment_type: DeploymentType::Scratch1,
            ..config(1200)
        };
        let new = FileSystemConfig {
            deployment_type: DeploymentType::Scratch1,
            ..config(2400)
        };
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert!(diff.storage_capacity.is_replace());
    }

    #[test]
    fn test_immutable_field_change_forces_replacement() {
        let old = config(1200);
        let mut new = config(1200);
        new.subnet_ids = vec!["subnet-2".to_string()];
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert!(diff.subnet_ids.is_replace());
        assert_eq!(diff.replaced_fields(), vec!["subnet_ids"]);
    }

    #[test]
    fn test_mutable_field_change_in_place() {
        let old = config(1200);
        let mut new = config(1200);
        new.automatic_backup_retention_days = Some(7);
        new.weekly_maintenance_start_time = Some("1:05:00".to_string());
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert_eq!(diff.automatic_backup_retention_days, FieldChange::InPlace);
        assert_eq!(diff.weekly_maintenance_start_time, FieldChange::InPlace);
        assert!(!diff.requires_replacement());
        assert!(!diff.is_empty());
    }

    #[test]
    fn test_metadata_iops_decrease_user_provisioned() {
        let meta = |iops| {
            Some(MetadataConfiguration {
                mode: MetadataMode::UserProvisioned,
                iops: Some(iops),
            })
        };
        let mut old = config(1200);
        old.metadata_configuration = meta(6000);
        let mut new = config(1200);
        new.metadata_configuration = meta(3000);
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert!(diff.metadata_configuration.is_replace());

        // Increase stays in place.
        new.metadata_configuration = meta(12000);
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert_eq!(diff.metadata_configuration, FieldChange::InPlace);
    }

    #[test]
    fn test_metadata_iops_decrease_automatic_mode_in_place() {
        let meta = |iops| {
            Some(MetadataConfiguration {
                mode: MetadataMode::Automatic,
                iops: Some(iops),
            })
        };
        let mut old = config(1200);
        old.metadata_configuration = meta(6000);
        let mut new = config(1200);
        new.metadata_configuration = meta(3000);
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert_eq!(diff.metadata_configuration, FieldChange::InPlace);
    }

    #[test]
    fn test_throughput_decrease_forces_replacement() {
        let mut old = config(1200);
        old.per_unit_storage_throughput = Some(250);
        let mut new = config(1200);
        new.per_unit_storage_throughput = Some(125);
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert!(diff.per_unit_storage_throughput.is_replace());

        new.per_unit_storage_throughput = Some(500);
        let diff = ConfigDiff::between(&old, &new).unwrap();
        assert_eq!(diff.per_unit_storage_throughput, FieldChange::InPlace);
    }

    #[test]
    fn test_invalid_new_config_fails_fast() {
        let old = config(1200);
        let mut new = config(1200);
        new.deployment_type = DeploymentType::Scratch2;
        new.metadata_configuration = Some(MetadataConfiguration {
            mode: MetadataMode::Automatic,
            iops: None,
        });
        assert!(ConfigDiff::between(&old, &new).is_err());
    }
}
