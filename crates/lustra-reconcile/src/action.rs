//! Administrative action tracking
//!
//! Update calls spawn asynchronous administrative actions on the control
//! plane. This module waits for the action of a given type to settle,
//! treating the action list as closed-world: the control plane drops
//! records of settled actions, so a missing record counts as complete and
//! costs no further probes.

use std::time::Duration;

use tracing::{debug, instrument};

use lustra_client::client::FileSystemClient;
use lustra_client::error::ApiError;
use lustra_client::ids::FileSystemId;
use lustra_client::types::{ActionStatus, ActionType, AdministrativeAction};

use crate::error::{Operation, ReconcileError, ReconcileResult};
use crate::finder::find_file_system;
use crate::poll::{PollFailure, Probed, StateChange};

/// Wait until the newest administrative action of `action_type` settles.
///
/// Success covers both `Completed` and `UpdatedOptimizing`: once settings
/// are applied, background optimization may keep running indefinitely and
/// is not worth blocking on. A `Failed` action aborts the wait with the
/// action's failure detail.
#[instrument(skip(client), fields(id = %id, action = %action_type))]
pub async fn wait_for_action(
    client: &dyn FileSystemClient,
    operation: Operation,
    id: &FileSystemId,
    action_type: ActionType,
    timeout: Duration,
    delay: Duration,
) -> ReconcileResult<()> {
    let wait = StateChange::new(
        vec![ActionStatus::Pending, ActionStatus::InProgress],
        vec![ActionStatus::Completed, ActionStatus::UpdatedOptimizing],
        timeout,
        delay,
    );

    let result = wait.wait(|| probe_action(client, id, action_type)).await;

    match result {
        Ok(_) => {
            debug!("administrative action settled");
            Ok(())
        }
        Err(PollFailure::Unexpected { status, last }) => Err(ReconcileError::Terminal {
            operation,
            id: id.clone(),
            status,
            message: last
                .failure_details
                .and_then(|d| d.message)
                .unwrap_or_else(|| "administrative action failed".to_string()),
        }),
        Err(PollFailure::Timeout { waited, last }) => Err(ReconcileError::Timeout {
            operation,
            id: id.clone(),
            waited,
            last_status: last.map(|a| a.status.to_string()),
        }),
        Err(PollFailure::Api(err)) => Err(ReconcileError::api(operation, Some(id.clone()), err)),
    }
}

async fn probe_action(
    client: &dyn FileSystemClient,
    id: &FileSystemId,
    action_type: ActionType,
) -> Result<Probed<AdministrativeAction, ActionStatus>, ApiError> {
    let fs = find_file_system(client, id).await?;
    // Settled actions fall off the list; absence means already complete.
    let action = fs
        .action_of_type(action_type)
        .cloned()
        .unwrap_or_else(|| AdministrativeAction::completed(action_type));
    let status = action.status;
    Ok(Probed::Observed {
        state: action,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use lustra_client::async_trait;
    use lustra_client::error::{ApiError, ApiResult};
    use lustra_client::requests::{
        CreateFileSystemRequest, CreateFromBackupRequest, DescribeFileSystemsPage,
        DescribeFileSystemsRequest, UpdateFileSystemRequest,
    };
    use lustra_client::types::{
        DeploymentType, FailureDetails, FileSystem, FileSystemKind, Lifecycle, StorageType,
    };

    const FAST: Duration = Duration::from_millis(1);

    fn base_fs(actions: Vec<AdministrativeAction>) -> FileSystem {
        FileSystem {
            id: FileSystemId::new("fs-1"),
            kind: FileSystemKind::Lustre,
            lifecycle: Lifecycle::Available,
            failure_details: None,
            deployment_type: DeploymentType::Persistent2,
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
            dns_name: None,
            mount_name: None,
            network_interface_ids: vec![],
            owner_id: None,
            vpc_id: None,
            administrative_actions: actions,
        }
    }

    fn action(status: ActionStatus) -> AdministrativeAction {
        AdministrativeAction {
            action_type: ActionType::FileSystemUpdate,
            status,
            request_time: None,
            failure_details: None,
        }
    }

    /// Client serving one scripted describe response per call; the last
    /// entry repeats once the script runs out.
    struct ScriptedClient {
        snapshots: Mutex<Vec<FileSystem>>,
        describes: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(snapshots: Vec<FileSystem>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots),
                describes: AtomicUsize::new(0),
            }
        }

        fn describes(&self) -> usize {
            self.describes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FileSystemClient for ScriptedClient {
        async fn create_file_system(
            &self,
            _request: CreateFileSystemRequest,
        ) -> ApiResult<FileSystem> {
            unimplemented!("not exercised")
        }

        async fn create_from_backup(
            &self,
            _request: CreateFromBackupRequest,
        ) -> ApiResult<FileSystem> {
            unimplemented!("not exercised")
        }

        async fn update_file_system(&self, _request: UpdateFileSystemRequest) -> ApiResult<()> {
            unimplemented!("not exercised")
        }

        async fn delete_file_system(&self, _id: &FileSystemId) -> ApiResult<()> {
            unimplemented!("not exercised")
        }

        async fn describe_file_systems(
            &self,
            _request: DescribeFileSystemsRequest,
        ) -> ApiResult<DescribeFileSystemsPage> {
            self.describes.fetch_add(1, Ordering::SeqCst);
            let mut snapshots = self.snapshots.lock().unwrap();
            let fs = if snapshots.len() > 1 {
                snapshots.remove(0)
            } else {
                snapshots
                    .first()
                    .cloned()
                    .ok_or_else(|| ApiError::not_found("fs-1"))?
            };
            Ok(DescribeFileSystemsPage {
                file_systems: vec![fs],
                next_token: None,
            })
        }
    }

    #[tokio::test]
    async fn test_missing_record_completes_without_extra_probes() {
        let client = ScriptedClient::new(vec![base_fs(vec![])]);
        wait_for_action(
            &client,
            Operation::Update,
            &FileSystemId::new("fs-1"),
            ActionType::FileSystemUpdate,
            Duration::from_secs(1),
            FAST,
        )
        .await
        .unwrap();
        assert_eq!(client.describes(), 1);
    }

    #[tokio::test]
    async fn test_in_progress_then_completed() {
        let client = ScriptedClient::new(vec![
            base_fs(vec![action(ActionStatus::Pending)]),
            base_fs(vec![action(ActionStatus::InProgress)]),
            base_fs(vec![action(ActionStatus::Completed)]),
        ]);
        wait_for_action(
            &client,
            Operation::Update,
            &FileSystemId::new("fs-1"),
            ActionType::FileSystemUpdate,
            Duration::from_secs(1),
            FAST,
        )
        .await
        .unwrap();
        assert_eq!(client.describes(), 3);
    }

    #[tokio::test]
    async fn test_updated_optimizing_counts_as_settled() {
        let client = ScriptedClient::new(vec![base_fs(vec![action(
            ActionStatus::UpdatedOptimizing,
        )])]);
        wait_for_action(
            &client,
            Operation::Update,
            &FileSystemId::new("fs-1"),
            ActionType::FileSystemUpdate,
            Duration::from_secs(1),
            FAST,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_failed_action_surfaces_detail() {
        let mut failed = action(ActionStatus::Failed);
        failed.failure_details = Some(FailureDetails::new("quota exceeded"));
        let client = ScriptedClient::new(vec![base_fs(vec![failed])]);

        let err = wait_for_action(
            &client,
            Operation::Update,
            &FileSystemId::new("fs-1"),
            ActionType::FileSystemUpdate,
            Duration::from_secs(1),
            FAST,
        )
        .await
        .unwrap_err();

        match err {
            ReconcileError::Terminal {
                status, message, ..
            } => {
                assert_eq!(status, "FAILED");
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected terminal error, got {other}"),
        }
    }
}
