//! Control-plane client trait
//!
//! The transport, authentication, and wire marshaling behind these calls
//! live elsewhere; this trait is the seam the reconciliation engine is
//! written and tested against.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::ids::FileSystemId;
use crate::requests::{
    CreateFileSystemRequest, CreateFromBackupRequest, DescribeFileSystemsPage,
    DescribeFileSystemsRequest, UpdateFileSystemRequest,
};
use crate::types::FileSystem;

/// Client for the managed file system control-plane API.
///
/// All calls are request/response; mutating calls return once the control
/// plane has *accepted* the operation, not once it has converged. Callers
/// poll `describe_file_systems` to observe convergence.
#[async_trait]
pub trait FileSystemClient: Send + Sync {
    /// Create a file system from scratch.
    ///
    /// Returns the initial observed state, including the identifier the
    /// control plane assigned.
    async fn create_file_system(&self, req: CreateFileSystemRequest) -> ApiResult<FileSystem>;

    /// Create a file system by restoring a backup.
    async fn create_from_backup(&self, req: CreateFromBackupRequest) -> ApiResult<FileSystem>;

    /// Apply an in-place settings change.
    async fn update_file_system(&self, req: UpdateFileSystemRequest) -> ApiResult<()>;

    /// Delete a file system.
    async fn delete_file_system(&self, id: &FileSystemId) -> ApiResult<()>;

    /// Describe file systems, one page at a time.
    ///
    /// Pagination is driven by `next_token`; a page with no file systems
    /// and no token is a valid empty result, not an error.
    async fn describe_file_systems(
        &self,
        req: DescribeFileSystemsRequest,
    ) -> ApiResult<DescribeFileSystemsPage>;
}
