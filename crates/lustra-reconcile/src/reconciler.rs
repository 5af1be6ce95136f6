//! Reconciliation orchestrator
//!
//! Drives a managed Lustre file system from declared configuration to
//! observed remote state: create, update in place, delete, and read-back.
//! Every mutating call is followed by a convergence wait, so a successful
//! return means the control plane actually settled, not merely accepted
//! the request.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use lustra_client::client::FileSystemClient;
use lustra_client::error::ApiError;
use lustra_client::ids::FileSystemId;
use lustra_client::types::{ActionStatus, ActionType, FileSystem, FileSystemKind, Lifecycle};

use crate::action::wait_for_action;
use crate::config::FileSystemConfig;
use crate::diff::ConfigDiff;
use crate::error::{Operation, ReconcileError, ReconcileResult};
use crate::finder::{find_file_system, find_file_system_by_kind};
use crate::poll::{PollFailure, Probed, StateChange};
use crate::request::{build_backup_request, build_create_request, build_update_request};

/// Interval between lifecycle probes.
const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(30);

/// Default budget for each convergence wait.
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Consecutive `Available` observations required after create. New file
/// systems briefly report available while network interfaces are still
/// attaching, so a single observation is not trustworthy.
const CREATE_STABILITY: u32 = 3;

/// Per-operation convergence deadlines.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileTimeouts {
    /// Deadline for create to reach a stable `Available`.
    pub create: Duration,
    /// Deadline for update convergence, applied separately to the
    /// lifecycle wait and the administrative action wait.
    pub update: Duration,
    /// Deadline for the file system to disappear after delete.
    pub delete: Duration,
}

impl Default for ReconcileTimeouts {
    fn default() -> Self {
        Self {
            create: DEFAULT_OPERATION_TIMEOUT,
            update: DEFAULT_OPERATION_TIMEOUT,
            delete: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

/// Reconciles declared Lustre file system configuration against the
/// control plane.
///
/// Holds no per-file-system state; all state lives remotely and is
/// re-observed on every operation. Cheap to clone and safe to share.
#[derive(Clone)]
pub struct FileSystemReconciler {
    client: Arc<dyn FileSystemClient>,
    timeouts: ReconcileTimeouts,
    poll_delay: Duration,
}

impl FileSystemReconciler {
    /// Create a reconciler with default timeouts and poll interval.
    #[must_use]
    pub fn new(client: Arc<dyn FileSystemClient>) -> Self {
        Self {
            client,
            timeouts: ReconcileTimeouts::default(),
            poll_delay: DEFAULT_POLL_DELAY,
        }
    }

    /// Override the per-operation convergence deadlines.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: ReconcileTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Override the interval between lifecycle probes.
    #[must_use]
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    /// Create a file system and wait until it is stably available.
    ///
    /// When `config.backup_id` is set the file system is restored from
    /// that backup; otherwise it is created from scratch. Both shapes
    /// carry the same Lustre settings. Returns the assigned identifier
    /// and the configuration refreshed from observed state.
    #[instrument(skip_all)]
    pub async fn create(
        &self,
        config: &FileSystemConfig,
    ) -> ReconcileResult<(FileSystemId, FileSystemConfig)> {
        let fs = match &config.backup_id {
            Some(backup_id) => {
                let request = build_backup_request(config, backup_id)?;
                info!(backup = %backup_id, "creating file system from backup");
                self.client
                    .create_from_backup(request)
                    .await
                    .map_err(|err| ReconcileError::api(Operation::Create, None, err))?
            }
            None => {
                let request = build_create_request(config)?;
                info!("creating file system");
                self.client
                    .create_file_system(request)
                    .await
                    .map_err(|err| ReconcileError::api(Operation::Create, None, err))?
            }
        };

        let id = fs.id.clone();
        info!(id = %id, "create accepted, waiting for availability");

        let wait = StateChange::new(
            vec![Lifecycle::Creating],
            vec![Lifecycle::Available],
            self.timeouts.create,
            self.poll_delay,
        )
        .with_stability(CREATE_STABILITY);

        match wait.wait(|| self.probe_lifecycle(&id)).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ReconcileError::NotFound { id }),
            Err(failure) => return Err(convergence_error(Operation::Create, &id, failure)),
        }

        info!(id = %id, "file system available");
        let observed = self.read_back(&id, config.clone()).await?;
        Ok((id, observed))
    }

    /// Apply the delta between two configurations in place.
    ///
    /// Fails with [`ReconcileError::ReplacementRequired`] before issuing
    /// any call when the delta touches a field that cannot change in
    /// place. An empty delta only refreshes observed state. Otherwise the
    /// update is sent, the lifecycle wait runs, and the spawned
    /// settings-change action is tracked to completion.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update(
        &self,
        id: &FileSystemId,
        old: &FileSystemConfig,
        new: &FileSystemConfig,
    ) -> ReconcileResult<FileSystemConfig> {
        let diff = ConfigDiff::between(old, new)?;

        if diff.requires_replacement() {
            return Err(ReconcileError::ReplacementRequired {
                fields: diff.replaced_fields(),
            });
        }

        if diff.is_empty() {
            debug!("no changes to apply, refreshing observed state");
            return self.read_back(id, new.clone()).await;
        }

        let request = build_update_request(id, new, &diff)?;
        // Cutoff for attributing failed side-effect actions to this update.
        let start = Utc::now();
        info!("updating file system");
        self.client
            .update_file_system(request)
            .await
            .map_err(|err| ReconcileError::api(Operation::Update, Some(id.clone()), err))?;

        let wait = StateChange::new(
            vec![Lifecycle::Updating],
            vec![Lifecycle::Available],
            self.timeouts.update,
            self.poll_delay,
        );

        match wait.wait(|| self.probe_lifecycle(id)).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ReconcileError::NotFound { id: id.clone() }),
            Err(PollFailure::Unexpected { status, last }) => {
                return Err(ReconcileError::Terminal {
                    operation: Operation::Update,
                    id: id.clone(),
                    status,
                    message: update_failure_message(&last, start),
                });
            }
            Err(failure) => return Err(convergence_error(Operation::Update, id, failure)),
        }

        wait_for_action(
            self.client.as_ref(),
            Operation::Update,
            id,
            ActionType::FileSystemUpdate,
            self.timeouts.update,
            self.poll_delay,
        )
        .await?;

        info!("update converged");
        self.read_back(id, new.clone()).await
    }

    /// Delete a file system and wait until it is gone.
    ///
    /// Deleting a file system that does not exist succeeds, so delete can
    /// be retried safely.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&self, id: &FileSystemId) -> ReconcileResult<()> {
        info!("deleting file system");
        match self.client.delete_file_system(id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                debug!("file system already gone");
                return Ok(());
            }
            Err(err) => return Err(ReconcileError::api(Operation::Delete, Some(id.clone()), err)),
        }

        // Empty target set: success is the file system disappearing.
        let wait = StateChange::new(
            vec![Lifecycle::Available, Lifecycle::Deleting],
            vec![],
            self.timeouts.delete,
            self.poll_delay,
        );

        match wait.wait(|| self.probe_lifecycle(id)).await {
            Ok(_) => {
                info!("file system deleted");
                Ok(())
            }
            Err(failure) => Err(convergence_error(Operation::Delete, id, failure)),
        }
    }

    /// Read the observed configuration of an existing Lustre file system.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn read(&self, id: &FileSystemId) -> ReconcileResult<FileSystemConfig> {
        self.read_back(id, FileSystemConfig::default()).await
    }

    /// Probe for the lifecycle waits. Absence is a valid observation, not
    /// an error; the wait decides what it means.
    async fn probe_lifecycle(
        &self,
        id: &FileSystemId,
    ) -> Result<Probed<FileSystem, Lifecycle>, ApiError> {
        match find_file_system(self.client.as_ref(), id).await {
            Ok(fs) => {
                let status = fs.lifecycle;
                Ok(Probed::Observed { state: fs, status })
            }
            Err(err) if err.is_not_found() => Ok(Probed::Absent),
            Err(err) => Err(err),
        }
    }

    /// Refresh `config` from observed remote state.
    async fn read_back(
        &self,
        id: &FileSystemId,
        mut config: FileSystemConfig,
    ) -> ReconcileResult<FileSystemConfig> {
        let fs = find_file_system_by_kind(self.client.as_ref(), id, FileSystemKind::Lustre)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    ReconcileError::NotFound { id: id.clone() }
                } else {
                    ReconcileError::api(Operation::Read, Some(id.clone()), err)
                }
            })?;
        config.apply_observed(&fs);
        Ok(config)
    }
}

fn convergence_error(
    operation: Operation,
    id: &FileSystemId,
    failure: PollFailure<FileSystem>,
) -> ReconcileError {
    match failure {
        PollFailure::Timeout { waited, last } => ReconcileError::Timeout {
            operation,
            id: id.clone(),
            waited,
            last_status: last.map(|fs| fs.lifecycle.to_string()),
        },
        PollFailure::Unexpected { status, last } => ReconcileError::Terminal {
            operation,
            id: id.clone(),
            status,
            message: last
                .failure_message()
                .unwrap_or("no failure details reported")
                .to_string(),
        },
        PollFailure::Api(err) => ReconcileError::api(operation, Some(id.clone()), err),
    }
}

/// Assemble the failure message for an update that ended in a terminal
/// lifecycle, folding in side-effect actions that failed after the update
/// was issued. The settings-change action itself is excluded; its failure
/// already is the lifecycle failure.
fn update_failure_message(fs: &FileSystem, start: DateTime<Utc>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(message) = fs.failure_message() {
        parts.push(message.to_string());
    }
    for action in &fs.administrative_actions {
        if action.action_type == ActionType::FileSystemUpdate
            || action.status != ActionStatus::Failed
        {
            continue;
        }
        let requested_in_window = action.request_time.is_some_and(|t| t >= start);
        if !requested_in_window {
            continue;
        }
        if let Some(message) = action
            .failure_details
            .as_ref()
            .and_then(|d| d.message.as_deref())
        {
            parts.push(format!("{}: {}", action.action_type, message));
        }
    }
    if parts.is_empty() {
        "no failure details reported".to_string()
    } else {
        parts.join("; ")
    }
}
