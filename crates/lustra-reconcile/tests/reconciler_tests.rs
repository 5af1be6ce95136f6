//! End-to-end reconciler tests against a scripted in-memory control plane.
//!
//! The mock serves a scripted sequence of lifecycle observations through
//! describe calls and records every mutating request, so tests can assert
//! both the outcome and the exact call pattern.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lustra_client::async_trait;
use lustra_client::error::{ApiError, ApiResult};
use lustra_client::ids::{BackupId, FileSystemId};
use lustra_client::requests::{
    CreateFileSystemRequest, CreateFromBackupRequest, DescribeFileSystemsPage,
    DescribeFileSystemsRequest, UpdateFileSystemRequest,
};
use lustra_client::types::{
    DeploymentType, FailureDetails, FileSystem, FileSystemKind, Lifecycle, StorageType,
};
use lustra_reconcile::config::FileSystemConfig;
use lustra_reconcile::error::{Operation, ReconcileError};
use lustra_reconcile::reconciler::{FileSystemReconciler, ReconcileTimeouts};

const FAST_DELAY: Duration = Duration::from_millis(1);

/// One scripted describe response.
#[derive(Debug, Clone, Copy)]
enum Observation {
    State(Lifecycle),
    Gone,
}

#[derive(Default)]
struct Recorded {
    creates: Vec<CreateFileSystemRequest>,
    backup_creates: Vec<CreateFromBackupRequest>,
    updates: Vec<UpdateFileSystemRequest>,
    deletes: usize,
    describes: usize,
}

struct MockState {
    template: FileSystem,
    script: VecDeque<Observation>,
    delete_error: Option<ApiError>,
    recorded: Recorded,
}

/// Scripted control plane. Describe calls consume the observation script
/// in order; the final entry repeats once the script is exhausted.
struct MockControlPlane {
    state: Mutex<MockState>,
}

impl MockControlPlane {
    fn new(template: FileSystem, script: Vec<Observation>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockState {
                template,
                script: script.into(),
                delete_error: None,
                recorded: Recorded::default(),
            }),
        })
    }

    fn failing_delete(self: Arc<Self>, error: ApiError) -> Arc<Self> {
        self.state.lock().unwrap().delete_error = Some(error);
        self
    }

    fn recorded<R>(&self, f: impl FnOnce(&Recorded) -> R) -> R {
        f(&self.state.lock().unwrap().recorded)
    }
}

#[async_trait]
impl lustra_client::client::FileSystemClient for MockControlPlane {
    async fn create_file_system(&self, request: CreateFileSystemRequest) -> ApiResult<FileSystem> {
        let mut state = self.state.lock().unwrap();
        state.recorded.creates.push(request);
        let mut fs = state.template.clone();
        fs.lifecycle = Lifecycle::Creating;
        Ok(fs)
    }

    async fn create_from_backup(
        &self,
        request: CreateFromBackupRequest,
    ) -> ApiResult<FileSystem> {
        let mut state = self.state.lock().unwrap();
        state.recorded.backup_creates.push(request);
        let mut fs = state.template.clone();
        fs.lifecycle = Lifecycle::Creating;
        Ok(fs)
    }

    async fn update_file_system(&self, request: UpdateFileSystemRequest) -> ApiResult<()> {
        self.state.lock().unwrap().recorded.updates.push(request);
        Ok(())
    }

    async fn delete_file_system(&self, _id: &FileSystemId) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.recorded.deletes += 1;
        match state.delete_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn describe_file_systems(
        &self,
        request: DescribeFileSystemsRequest,
    ) -> ApiResult<DescribeFileSystemsPage> {
        let mut state = self.state.lock().unwrap();
        state.recorded.describes += 1;

        let observation = if state.script.len() > 1 {
            state.script.pop_front()
        } else {
            state.script.front().copied()
        };

        let page = match observation {
            None | Some(Observation::Gone) => DescribeFileSystemsPage::default(),
            Some(Observation::State(lifecycle)) => {
                let mut fs = state.template.clone();
                fs.lifecycle = lifecycle;
                let matches = request.file_system_ids.is_empty()
                    || request.file_system_ids.contains(&fs.id);
                DescribeFileSystemsPage {
                    file_systems: if matches { vec![fs] } else { vec![] },
                    next_token: None,
                }
            }
        };
        Ok(page)
    }
}

fn template() -> FileSystem {
    FileSystem {
        id: FileSystemId::new("fs-1"),
        kind: FileSystemKind::Lustre,
        lifecycle: Lifecycle::Creating,
        failure_details: None,
        deployment_type: DeploymentType::Scratch1,
        storage_type: StorageType::Ssd,
        storage_capacity: 1200,
        subnet_ids: vec!["subnet-1".to_string()],
        security_group_ids: vec![],
        kms_key_id: None,
        file_system_version: None,
        per_unit_storage_throughput: None,
        automatic_backup_retention_days: None,
        daily_automatic_backup_start_time: None,
        weekly_maintenance_start_time: None,
        copy_tags_to_backups: None,
        data_compression_type: None,
        drive_cache_type: None,
        log_configuration: None,
        metadata_configuration: None,
        root_squash_configuration: None,
        data_repository_configuration: None,
        dns_name: Some("fs-1.lustra.internal".to_string()),
        mount_name: Some("lustra".to_string()),
        network_interface_ids: vec!["eni-1".to_string()],
        owner_id: Some("123456789012".to_string()),
        vpc_id: Some("vpc-1".to_string()),
        administrative_actions: vec![],
    }
}

fn scratch_config() -> FileSystemConfig {
    FileSystemConfig {
        subnet_ids: vec!["subnet-1".to_string()],
        storage_capacity: Some(1200),
        ..FileSystemConfig::default()
    }
}

fn reconciler(mock: &Arc<MockControlPlane>) -> FileSystemReconciler {
    FileSystemReconciler::new(mock.clone()).with_poll_delay(FAST_DELAY)
}

use Observation::{Gone, State};

#[tokio::test]
async fn test_create_waits_for_stable_availability() {
    // A single available observation mid-flap must not count; only the
    // trailing run of three settles the create.
    let mock = MockControlPlane::new(
        template(),
        vec![
            State(Lifecycle::Creating),
            State(Lifecycle::Available),
            State(Lifecycle::Available),
            State(Lifecycle::Creating),
            State(Lifecycle::Available),
            State(Lifecycle::Available),
            State(Lifecycle::Available),
        ],
    );

    let (id, observed) = reconciler(&mock).create(&scratch_config()).await.unwrap();

    assert_eq!(id.as_str(), "fs-1");
    assert_eq!(observed.storage_capacity, Some(1200));
    assert_eq!(observed.dns_name.as_deref(), Some("fs-1.lustra.internal"));
    assert_eq!(observed.mount_name.as_deref(), Some("lustra"));

    mock.recorded(|r| {
        assert_eq!(r.creates.len(), 1);
        assert_eq!(r.creates[0].storage_capacity, 1200);
        assert_eq!(r.creates[0].subnet_ids, vec!["subnet-1".to_string()]);
        assert!(r.backup_creates.is_empty());
        // 7 lifecycle probes plus the final read-back.
        assert_eq!(r.describes, 8);
    });
}

#[tokio::test]
async fn test_create_from_backup_uses_restore_call() {
    let mock = MockControlPlane::new(template(), vec![State(Lifecycle::Available)]);

    let config = FileSystemConfig {
        backup_id: Some(BackupId::new("backup-1")),
        storage_capacity: None,
        ..scratch_config()
    };
    reconciler(&mock).create(&config).await.unwrap();

    mock.recorded(|r| {
        assert!(r.creates.is_empty());
        assert_eq!(r.backup_creates.len(), 1);
        assert_eq!(r.backup_creates[0].backup_id.as_str(), "backup-1");
    });
}

#[tokio::test]
async fn test_create_failure_surfaces_details() {
    let mut template = template();
    template.failure_details = Some(FailureDetails::new("insufficient capacity"));
    let mock = MockControlPlane::new(
        template,
        vec![State(Lifecycle::Creating), State(Lifecycle::Failed)],
    );

    let err = reconciler(&mock).create(&scratch_config()).await.unwrap_err();
    match err {
        ReconcileError::Terminal {
            operation,
            status,
            message,
            ..
        } => {
            assert_eq!(operation, Operation::Create);
            assert_eq!(status, "FAILED");
            assert_eq!(message, "insufficient capacity");
        }
        other => panic!("expected terminal error, got {other}"),
    }
}

#[tokio::test]
async fn test_create_timeout_carries_last_lifecycle() {
    let mock = MockControlPlane::new(template(), vec![State(Lifecycle::Creating)]);

    let err = reconciler(&mock)
        .with_timeouts(ReconcileTimeouts {
            create: Duration::from_millis(20),
            ..ReconcileTimeouts::default()
        })
        .create(&scratch_config())
        .await
        .unwrap_err();

    match err {
        ReconcileError::Timeout {
            operation,
            last_status,
            ..
        } => {
            assert_eq!(operation, Operation::Create);
            assert_eq!(last_status.as_deref(), Some("CREATING"));
        }
        other => panic!("expected timeout, got {other}"),
    }
}

#[tokio::test]
async fn test_update_sends_only_changed_fields() {
    let mock = MockControlPlane::new(
        template(),
        vec![State(Lifecycle::Updating), State(Lifecycle::Available)],
    );

    let old = FileSystemConfig {
        automatic_backup_retention_days: Some(0),
        ..scratch_config()
    };
    let new = FileSystemConfig {
        automatic_backup_retention_days: Some(7),
        ..scratch_config()
    };

    let id = FileSystemId::new("fs-1");
    reconciler(&mock).update(&id, &old, &new).await.unwrap();

    mock.recorded(|r| {
        assert_eq!(r.updates.len(), 1);
        let request = &r.updates[0];
        assert_eq!(request.file_system_id.as_str(), "fs-1");
        assert_eq!(request.storage_capacity, None);
        assert_eq!(request.lustre.automatic_backup_retention_days, Some(7));
        // The unchanged Lustre settings stay out of the request.
        let mut rest = request.lustre.clone();
        rest.automatic_backup_retention_days = None;
        assert!(rest.is_empty());

        assert!(r.creates.is_empty());
        assert!(r.backup_creates.is_empty());
        assert_eq!(r.deletes, 0);
    });
}

#[tokio::test]
async fn test_update_refuses_replacement_before_any_call() {
    let mock = MockControlPlane::new(template(), vec![State(Lifecycle::Available)]);

    let old = scratch_config();
    let new = FileSystemConfig {
        deployment_type: DeploymentType::Scratch2,
        ..scratch_config()
    };

    let id = FileSystemId::new("fs-1");
    let err = reconciler(&mock).update(&id, &old, &new).await.unwrap_err();

    match err {
        ReconcileError::ReplacementRequired { fields } => {
            assert_eq!(fields, vec!["deployment_type"]);
        }
        other => panic!("expected replacement-required, got {other}"),
    }
    mock.recorded(|r| {
        assert!(r.updates.is_empty());
        assert_eq!(r.describes, 0);
        assert_eq!(r.deletes, 0);
    });
}

#[tokio::test]
async fn test_update_with_no_changes_only_refreshes() {
    let mock = MockControlPlane::new(template(), vec![State(Lifecycle::Available)]);

    let id = FileSystemId::new("fs-1");
    let config = scratch_config();
    let observed = reconciler(&mock).update(&id, &config, &config).await.unwrap();

    assert_eq!(observed.dns_name.as_deref(), Some("fs-1.lustra.internal"));
    mock.recorded(|r| {
        assert!(r.updates.is_empty());
        assert_eq!(r.describes, 1);
    });
}

#[tokio::test]
async fn test_delete_waits_until_gone() {
    let mock = MockControlPlane::new(
        template(),
        vec![
            State(Lifecycle::Deleting),
            State(Lifecycle::Deleting),
            Gone,
        ],
    );

    let id = FileSystemId::new("fs-1");
    reconciler(&mock).delete(&id).await.unwrap();

    mock.recorded(|r| {
        assert_eq!(r.deletes, 1);
        assert_eq!(r.describes, 3);
    });
}

#[tokio::test]
async fn test_delete_of_missing_file_system_succeeds() {
    let mock = MockControlPlane::new(template(), vec![Gone])
        .failing_delete(ApiError::not_found("fs-1"));

    let id = FileSystemId::new("fs-1");
    reconciler(&mock).delete(&id).await.unwrap();

    mock.recorded(|r| {
        assert_eq!(r.deletes, 1);
        // No convergence wait for something already gone.
        assert_eq!(r.describes, 0);
    });
}

#[tokio::test]
async fn test_read_missing_file_system_is_not_found() {
    let mock = MockControlPlane::new(template(), vec![Gone]);

    let id = FileSystemId::new("fs-1");
    let err = reconciler(&mock).read(&id).await.unwrap_err();
    assert!(matches!(err, ReconcileError::NotFound { .. }));
}

#[tokio::test]
async fn test_read_wrong_kind_is_not_found() {
    // A different file system family under the same id must not be
    // adopted as a Lustre file system.
    let mut template = template();
    template.kind = FileSystemKind::Windows;
    let mock = MockControlPlane::new(template, vec![State(Lifecycle::Available)]);

    let id = FileSystemId::new("fs-1");
    let err = reconciler(&mock).read(&id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_read_populates_computed_fields() {
    let mock = MockControlPlane::new(template(), vec![State(Lifecycle::Available)]);

    let id = FileSystemId::new("fs-1");
    let observed = reconciler(&mock).read(&id).await.unwrap();

    assert_eq!(observed.storage_capacity, Some(1200));
    assert_eq!(observed.mount_name.as_deref(), Some("lustra"));
    assert_eq!(observed.vpc_id.as_deref(), Some("vpc-1"));
    assert_eq!(observed.network_interface_ids, vec!["eni-1".to_string()]);
}
