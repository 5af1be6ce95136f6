//! Request builder
//!
//! Maps a desired configuration into control-plane mutation requests.
//! Only fields the caller explicitly set are included; unset optional
//! fields stay absent so remote-computed defaults survive. Pure mapping,
//! no network: configuration-legality violations surface here as fatal
//! errors before any call is issued.

use lustra_client::ids::{BackupId, FileSystemId};
use lustra_client::requests::{
    CreateFileSystemRequest, CreateFromBackupRequest, LustreCreateConfig, UpdateFileSystemRequest,
};

use crate::config::FileSystemConfig;
use crate::diff::ConfigDiff;
use crate::error::{ReconcileError, ReconcileResult};

/// Build the Lustre settings block shared by both create shapes.
///
/// Populating it once guarantees scratch-create and restore-from-backup
/// behave identically for every setting.
fn build_lustre_config(config: &FileSystemConfig) -> LustreCreateConfig {
    LustreCreateConfig {
        deployment_type: config.deployment_type,
        auto_import_policy: config.auto_import_policy,
        automatic_backup_retention_days: config.automatic_backup_retention_days,
        copy_tags_to_backups: config.copy_tags_to_backups,
        daily_automatic_backup_start_time: config.daily_automatic_backup_start_time.clone(),
        data_compression_type: config.data_compression_type,
        drive_cache_type: config.drive_cache_type,
        export_path: config.export_path.clone(),
        import_path: config.import_path.clone(),
        imported_file_chunk_size: config.imported_file_chunk_size,
        log_configuration: config.log_configuration.clone(),
        metadata_configuration: config.metadata_configuration.clone(),
        per_unit_storage_throughput: config.per_unit_storage_throughput,
        root_squash_configuration: config.root_squash_configuration.clone(),
        weekly_maintenance_start_time: config.weekly_maintenance_start_time.clone(),
    }
}

/// Build a scratch-create request from a desired configuration.
pub fn build_create_request(config: &FileSystemConfig) -> ReconcileResult<CreateFileSystemRequest> {
    config.validate()?;

    let storage_capacity = config.storage_capacity.ok_or_else(|| {
        ReconcileError::configuration("storage_capacity is required when creating from scratch")
    })?;

    let mut req = CreateFileSystemRequest::new(storage_capacity, config.subnet_ids.clone());
    req.storage_type = config.storage_type;
    req.security_group_ids = config.security_group_ids.clone();
    req.kms_key_id = config.kms_key_id.clone();
    req.file_system_version = config.file_system_version.clone();
    req.lustre = build_lustre_config(config);
    Ok(req)
}

/// Build a restore-from-backup request from a desired configuration.
pub fn build_backup_request(
    config: &FileSystemConfig,
    backup_id: &BackupId,
) -> ReconcileResult<CreateFromBackupRequest> {
    config.validate()?;

    let mut req = CreateFromBackupRequest::new(backup_id.clone(), config.subnet_ids.clone());
    req.storage_type = config.storage_type;
    req.security_group_ids = config.security_group_ids.clone();
    req.kms_key_id = config.kms_key_id.clone();
    req.file_system_version = config.file_system_version.clone();
    req.lustre = build_lustre_config(config);
    Ok(req)
}

/// Build an update request carrying only the fields the differ flagged as
/// changeable in place.
pub fn build_update_request(
    id: &FileSystemId,
    config: &FileSystemConfig,
    diff: &ConfigDiff,
) -> ReconcileResult<UpdateFileSystemRequest> {
    config.validate()?;

    let mut req = UpdateFileSystemRequest::new(id.clone());

    if diff.storage_capacity.is_changed() {
        req.storage_capacity = config.storage_capacity;
    }
    if diff.auto_import_policy.is_changed() {
        req.lustre.auto_import_policy = config.auto_import_policy;
    }
    if diff.automatic_backup_retention_days.is_changed() {
        req.lustre.automatic_backup_retention_days = config.automatic_backup_retention_days;
    }
    if diff.daily_automatic_backup_start_time.is_changed() {
        req.lustre.daily_automatic_backup_start_time =
            config.daily_automatic_backup_start_time.clone();
    }
    if diff.data_compression_type.is_changed() {
        req.lustre.data_compression_type = config.data_compression_type;
    }
    if diff.log_configuration.is_changed() {
        req.lustre.log_configuration = config.log_configuration.clone();
    }
    if diff.metadata_configuration.is_changed() {
        req.lustre.metadata_configuration = config.metadata_configuration.clone();
    }
    if diff.per_unit_storage_throughput.is_changed() {
        req.lustre.per_unit_storage_throughput = config.per_unit_storage_throughput;
    }
    if diff.root_squash_configuration.is_changed() {
        req.lustre.root_squash_configuration = config.root_squash_configuration.clone();
    }
    if diff.weekly_maintenance_start_time.is_changed() {
        req.lustre.weekly_maintenance_start_time = config.weekly_maintenance_start_time.clone();
    }

    Ok(req)
}
