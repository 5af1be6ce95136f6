//! # Lustra reconciliation engine
//!
//! Converges declared Lustre file system configuration with the state the
//! control plane actually holds. The engine computes the delta between
//! desired and observed configuration, issues the minimal set of mutating
//! calls through a [`FileSystemClient`], and polls the eventually
//! consistent control plane until each operation settles or fails
//! definitively.
//!
//! ## Crate organization
//!
//! - [`config`] - Desired-state declaration and validation
//! - [`diff`] - Field-level delta with in-place/replacement classification
//! - [`request`] - Desired state to wire-request translation
//! - [`finder`] - Paginated lookup with single-result semantics
//! - [`poll`] - Generic state-convergence wait
//! - [`action`] - Administrative action tracking
//! - [`reconciler`] - The [`FileSystemReconciler`] orchestrator
//! - [`error`] - [`ReconcileError`] taxonomy
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lustra_reconcile::prelude::*;
//!
//! async fn provision(client: Arc<dyn FileSystemClient>) -> ReconcileResult<()> {
//!     let reconciler = FileSystemReconciler::new(client);
//!     let config = FileSystemConfig {
//!         subnet_ids: vec!["subnet-0123".to_string()],
//!         storage_capacity: Some(1200),
//!         ..FileSystemConfig::default()
//!     };
//!     let (id, observed) = reconciler.create(&config).await?;
//!     println!("mounted at {:?}", observed.dns_name);
//!     reconciler.delete(&id).await?;
//!     Ok(())
//! }
//! ```
//!
//! [`FileSystemClient`]: lustra_client::client::FileSystemClient
//! [`FileSystemReconciler`]: reconciler::FileSystemReconciler
//! [`ReconcileError`]: error::ReconcileError

pub mod action;
pub mod config;
pub mod diff;
pub mod error;
pub mod finder;
pub mod poll;
pub mod reconciler;
pub mod request;

/// Prelude module for convenient imports.
///
/// ```
/// use lustra_reconcile::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{FileSystemConfig, MIN_STORAGE_CAPACITY};
    pub use crate::diff::{ConfigDiff, FieldChange};
    pub use crate::error::{Operation, ReconcileError, ReconcileResult};
    pub use crate::poll::{PollFailure, Probed, StateChange};
    pub use crate::reconciler::{FileSystemReconciler, ReconcileTimeouts};

    pub use lustra_client::client::FileSystemClient;
    pub use lustra_client::ids::{BackupId, FileSystemId};
}
