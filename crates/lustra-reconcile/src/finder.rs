//! File system lookup
//!
//! Lookup by identifier over the paginated describe call. Pagination is
//! aggregated transparently and an empty page is tolerated; absence and
//! subtype mismatch both normalize to the typed not-found error, since a
//! file system of the wrong kind is not the resource this engine manages.

use lustra_client::client::FileSystemClient;
use lustra_client::error::{ApiError, ApiResult};
use lustra_client::ids::FileSystemId;
use lustra_client::requests::DescribeFileSystemsRequest;
use lustra_client::types::{FileSystem, FileSystemKind};

/// Look up the current remote state of a file system.
pub async fn find_file_system(
    client: &dyn FileSystemClient,
    id: &FileSystemId,
) -> ApiResult<FileSystem> {
    let mut matches: Vec<FileSystem> = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let req = DescribeFileSystemsRequest {
            file_system_ids: vec![id.clone()],
            max_results: None,
            next_token: next_token.take(),
        };
        let page = client.describe_file_systems(req).await?;

        matches.extend(page.file_systems.into_iter().filter(|fs| fs.id == *id));

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    match matches.len() {
        0 => Err(ApiError::not_found(id.clone())),
        1 => Ok(matches.remove(0)),
        n => Err(ApiError::unexpected(format!(
            "describe returned {n} file systems for id {id}"
        ))),
    }
}

/// Look up a file system and require it to be of the given kind.
///
/// A file system that exists but is of another kind is reported as not
/// found, identically to absence.
pub async fn find_file_system_by_kind(
    client: &dyn FileSystemClient,
    id: &FileSystemId,
    kind: FileSystemKind,
) -> ApiResult<FileSystem> {
    let fs = find_file_system(client, id).await?;

    if fs.kind != kind {
        return Err(ApiError::not_found(id.clone()));
    }

    Ok(fs)
}
