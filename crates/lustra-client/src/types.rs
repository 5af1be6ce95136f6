//! Control-plane type definitions
//!
//! Closed enumerations for lifecycle and configuration vocabularies, plus
//! the observed-state structures returned by describe calls. Statuses are
//! modeled as enums with exhaustive matching rather than free-form strings
//! so unmodeled states fail at the parsing boundary, not deep in the
//! convergence loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::FileSystemId;

/// Error parsing an enum value from its wire representation.
#[derive(Debug, Clone)]
pub struct ParseEnumError {
    value: String,
    expected: &'static str,
}

impl ParseEnumError {
    fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}', expected one of: {}",
            self.value, self.expected
        )
    }
}

impl std::error::Error for ParseEnumError {}

/// Subtype of a managed file system.
///
/// The control plane serves several file system families behind one API;
/// this crate only drives the Lustre family, but describe calls can return
/// any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileSystemKind {
    /// Lustre parallel file system.
    Lustre,
    /// Windows file server.
    Windows,
    /// ONTAP file system.
    Ontap,
    /// OpenZFS file system.
    OpenZfs,
}

impl FileSystemKind {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FileSystemKind::Lustre => "LUSTRE",
            FileSystemKind::Windows => "WINDOWS",
            FileSystemKind::Ontap => "ONTAP",
            FileSystemKind::OpenZfs => "OPEN_ZFS",
        }
    }
}

impl fmt::Display for FileSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileSystemKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LUSTRE" => Ok(FileSystemKind::Lustre),
            "WINDOWS" => Ok(FileSystemKind::Windows),
            "ONTAP" => Ok(FileSystemKind::Ontap),
            "OPEN_ZFS" => Ok(FileSystemKind::OpenZfs),
            _ => Err(ParseEnumError::new(s, "LUSTRE, WINDOWS, ONTAP, OPEN_ZFS")),
        }
    }
}

/// Lifecycle state of a file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    /// The file system is being created.
    Creating,
    /// The file system is available for use.
    Available,
    /// An update is being applied.
    Updating,
    /// The file system is being deleted.
    Deleting,
    /// Creation or an update failed definitively.
    Failed,
    /// The file system is in a misconfigured state.
    Misconfigured,
    /// Misconfigured and currently unavailable.
    MisconfiguredUnavailable,
}

impl Lifecycle {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Creating => "CREATING",
            Lifecycle::Available => "AVAILABLE",
            Lifecycle::Updating => "UPDATING",
            Lifecycle::Deleting => "DELETING",
            Lifecycle::Failed => "FAILED",
            Lifecycle::Misconfigured => "MISCONFIGURED",
            Lifecycle::MisconfiguredUnavailable => "MISCONFIGURED_UNAVAILABLE",
        }
    }

    /// Whether this state is a definitive failure that no amount of
    /// polling will recover from.
    #[must_use]
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            Lifecycle::Failed | Lifecycle::Misconfigured | Lifecycle::MisconfiguredUnavailable
        )
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATING" => Ok(Lifecycle::Creating),
            "AVAILABLE" => Ok(Lifecycle::Available),
            "UPDATING" => Ok(Lifecycle::Updating),
            "DELETING" => Ok(Lifecycle::Deleting),
            "FAILED" => Ok(Lifecycle::Failed),
            "MISCONFIGURED" => Ok(Lifecycle::Misconfigured),
            "MISCONFIGURED_UNAVAILABLE" => Ok(Lifecycle::MisconfiguredUnavailable),
            _ => Err(ParseEnumError::new(
                s,
                "CREATING, AVAILABLE, UPDATING, DELETING, FAILED, MISCONFIGURED, MISCONFIGURED_UNAVAILABLE",
            )),
        }
    }
}

/// Deployment type of a Lustre file system, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentType {
    /// First-generation scratch deployment.
    #[default]
    Scratch1,
    /// Second-generation scratch deployment.
    Scratch2,
    /// First-generation persistent deployment.
    Persistent1,
    /// Second-generation persistent deployment.
    Persistent2,
}

impl DeploymentType {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentType::Scratch1 => "SCRATCH_1",
            DeploymentType::Scratch2 => "SCRATCH_2",
            DeploymentType::Persistent1 => "PERSISTENT_1",
            DeploymentType::Persistent2 => "PERSISTENT_2",
        }
    }

    /// Whether this is a persistent deployment (data survives instance
    /// failure; supports provisioned throughput and KMS encryption).
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, DeploymentType::Persistent1 | DeploymentType::Persistent2)
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeploymentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCRATCH_1" => Ok(DeploymentType::Scratch1),
            "SCRATCH_2" => Ok(DeploymentType::Scratch2),
            "PERSISTENT_1" => Ok(DeploymentType::Persistent1),
            "PERSISTENT_2" => Ok(DeploymentType::Persistent2),
            _ => Err(ParseEnumError::new(
                s,
                "SCRATCH_1, SCRATCH_2, PERSISTENT_1, PERSISTENT_2",
            )),
        }
    }
}

/// Underlying storage media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageType {
    /// Solid-state storage.
    #[default]
    Ssd,
    /// Magnetic storage.
    Hdd,
}

impl StorageType {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Ssd => "SSD",
            StorageType::Hdd => "HDD",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SSD" => Ok(StorageType::Ssd),
            "HDD" => Ok(StorageType::Hdd),
            _ => Err(ParseEnumError::new(s, "SSD, HDD")),
        }
    }
}

/// Read-cache option for HDD-backed file systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriveCacheType {
    /// No read cache.
    None,
    /// SSD read cache in front of the HDD tier.
    Read,
}

impl DriveCacheType {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveCacheType::None => "NONE",
            DriveCacheType::Read => "READ",
        }
    }
}

impl fmt::Display for DriveCacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transparent data compression setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompressionType {
    /// Compression disabled.
    #[default]
    None,
    /// LZ4 compression.
    Lz4,
}

impl CompressionType {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionType::None => "NONE",
            CompressionType::Lz4 => "LZ4",
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How changes in the linked data repository are imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoImportPolicy {
    /// No automatic import.
    None,
    /// Import new and changed objects.
    NewChanged,
    /// Import new, changed, and deleted objects.
    NewChangedDeleted,
}

impl AutoImportPolicy {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoImportPolicy::None => "NONE",
            AutoImportPolicy::NewChanged => "NEW_CHANGED",
            AutoImportPolicy::NewChangedDeleted => "NEW_CHANGED_DELETED",
        }
    }
}

impl fmt::Display for AutoImportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mode of the metadata subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataMode {
    /// The control plane scales metadata IOPS with storage capacity.
    Automatic,
    /// The caller provisions metadata IOPS explicitly.
    UserProvisioned,
}

impl MetadataMode {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataMode::Automatic => "AUTOMATIC",
            MetadataMode::UserProvisioned => "USER_PROVISIONED",
        }
    }
}

impl fmt::Display for MetadataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit-log verbosity for client access logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditLogLevel {
    /// Logging disabled.
    #[default]
    Disabled,
    /// Log warnings only.
    WarnOnly,
    /// Log errors only.
    ErrorOnly,
    /// Log warnings and errors.
    WarnError,
}

impl AuditLogLevel {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLogLevel::Disabled => "DISABLED",
            AuditLogLevel::WarnOnly => "WARN_ONLY",
            AuditLogLevel::ErrorOnly => "ERROR_ONLY",
            AuditLogLevel::WarnError => "WARN_ERROR",
        }
    }
}

impl fmt::Display for AuditLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type tag of an administrative action.
///
/// Administrative actions are asynchronous side-effect operations the
/// control plane runs against a file system, most of them triggered by an
/// update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// The settings change applied by an update call.
    FileSystemUpdate,
    /// Rebalancing data after a capacity change.
    StorageOptimization,
    /// Throughput tier migration.
    ThroughputOptimization,
    /// Metadata IOPS migration.
    IopsOptimization,
    /// Snapshot-related maintenance.
    SnapshotUpdate,
}

impl ActionType {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::FileSystemUpdate => "FILE_SYSTEM_UPDATE",
            ActionType::StorageOptimization => "STORAGE_OPTIMIZATION",
            ActionType::ThroughputOptimization => "THROUGHPUT_OPTIMIZATION",
            ActionType::IopsOptimization => "IOPS_OPTIMIZATION",
            ActionType::SnapshotUpdate => "SNAPSHOT_UPDATE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of an administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    /// Queued, not yet started.
    Pending,
    /// Currently running.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Settings applied; background optimization still running.
    UpdatedOptimizing,
    /// Failed definitively.
    Failed,
}

impl ActionStatus {
    /// Get the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "PENDING",
            ActionStatus::InProgress => "IN_PROGRESS",
            ActionStatus::Completed => "COMPLETED",
            ActionStatus::UpdatedOptimizing => "UPDATED_OPTIMIZING",
            ActionStatus::Failed => "FAILED",
        }
    }

    /// Whether the action has converged successfully.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, ActionStatus::Completed | ActionStatus::UpdatedOptimizing)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ActionStatus::Pending),
            "IN_PROGRESS" => Ok(ActionStatus::InProgress),
            "COMPLETED" => Ok(ActionStatus::Completed),
            "UPDATED_OPTIMIZING" => Ok(ActionStatus::UpdatedOptimizing),
            "FAILED" => Ok(ActionStatus::Failed),
            _ => Err(ParseEnumError::new(
                s,
                "PENDING, IN_PROGRESS, COMPLETED, UPDATED_OPTIMIZING, FAILED",
            )),
        }
    }
}

/// Human-readable cause attached to a failed resource or action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetails {
    /// Failure message, if the control plane provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FailureDetails {
    /// Create failure details with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// An asynchronous side-effect operation tied to a file system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdministrativeAction {
    /// Type of the action.
    pub action_type: ActionType,
    /// Current status.
    pub status: ActionStatus,
    /// When the control plane accepted the request that spawned this action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_time: Option<DateTime<Utc>>,
    /// Failure cause, when `status` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_details: Option<FailureDetails>,
}

impl AdministrativeAction {
    /// Synthesize a completed action of the given type.
    ///
    /// Used when the action list holds no record of a type: the control
    /// plane drops settled actions, so absence means already complete.
    #[must_use]
    pub fn completed(action_type: ActionType) -> Self {
        Self {
            action_type,
            status: ActionStatus::Completed,
            request_time: None,
            failure_details: None,
        }
    }
}

/// Client access audit logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfiguration {
    /// Verbosity level.
    pub level: AuditLogLevel,
    /// Destination log group, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Metadata subsystem configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfiguration {
    /// Provisioning mode.
    pub mode: MetadataMode,
    /// Provisioned metadata IOPS; required when `mode` is
    /// `UserProvisioned`, computed otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
}

/// Root-squash policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSquashConfiguration {
    /// `UID:GID` pair root is squashed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_squash: Option<String>,
    /// Client NIDs exempt from squashing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_squash_nids: Vec<String>,
}

/// Linked data repository configuration (import/export paths).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRepositoryConfiguration {
    /// Object-store path data is imported from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    /// Object-store path data is exported to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
    /// Import policy for repository changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_import_policy: Option<AutoImportPolicy>,
    /// Chunk size (MiB) used when striping imported files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_file_chunk_size: Option<u32>,
}

/// Observed state of a file system, as returned by a describe call.
///
/// Immutable snapshot: the reconciliation engine never mutates one, it
/// fetches a fresh snapshot on every poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSystem {
    /// Identifier assigned at creation.
    pub id: FileSystemId,
    /// File system family.
    pub kind: FileSystemKind,
    /// Current lifecycle state.
    pub lifecycle: Lifecycle,
    /// Failure cause, populated for terminal-failure lifecycles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_details: Option<FailureDetails>,

    /// Deployment type, fixed at creation.
    pub deployment_type: DeploymentType,
    /// Storage media.
    pub storage_type: StorageType,
    /// Storage capacity in GiB.
    pub storage_capacity: u64,
    /// Subnet placement (first entry is the primary interface).
    pub subnet_ids: Vec<String>,
    /// Attached security groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
    /// KMS key encrypting data at rest (persistent deployments).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    /// File system software version (`x.y`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_system_version: Option<String>,
    /// Provisioned throughput per TiB of storage (MB/s/TiB).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_unit_storage_throughput: Option<u32>,

    /// Automatic backup retention in days (0 disables backups).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic_backup_retention_days: Option<u32>,
    /// Daily backup window start (`HH:MM`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_automatic_backup_start_time: Option<String>,
    /// Weekly maintenance window start (`d:HH:MM`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_maintenance_start_time: Option<String>,
    /// Whether tags are copied to backups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_tags_to_backups: Option<bool>,
    /// Data compression setting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_compression_type: Option<CompressionType>,
    /// Read-cache option (HDD storage only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_cache_type: Option<DriveCacheType>,
    /// Audit logging configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_configuration: Option<LogConfiguration>,
    /// Metadata subsystem configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_configuration: Option<MetadataConfiguration>,
    /// Root-squash policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_squash_configuration: Option<RootSquashConfiguration>,
    /// Linked data repository configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_repository_configuration: Option<DataRepositoryConfiguration>,

    /// DNS name of the endpoint (computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    /// Mount name clients use (computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_name: Option<String>,
    /// Attached network interfaces, primary first (computed).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interface_ids: Vec<String>,
    /// Owning account (computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// VPC the file system is attached to (computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,

    /// Pending and recent administrative actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub administrative_actions: Vec<AdministrativeAction>,
}

impl FileSystem {
    /// Find the most recently requested administrative action of a type.
    #[must_use]
    pub fn action_of_type(&self, action_type: ActionType) -> Option<&AdministrativeAction> {
        self.administrative_actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .max_by_key(|a| a.request_time)
    }

    /// Failure message, if failure details with a message are present.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_details
            .as_ref()
            .and_then(|d| d.message.as_deref())
    }
}
