// crates/ccg-core/src/traits.rs

use async_trait::async_trait;

use crate::error::CcgError;
use crate::identity::RepositoryId;
use crate::pointer::{ContentId, ContentPointer, TransactionHash};

/// Client for a remote content-addressed pinning service.
///
/// Implemented by ccg-store (Lighthouse HTTP API, in-memory).
/// Implementations never retry; a failed call is reported as-is.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Upload bytes and return the identifier the service assigned.
    ///
    /// `label` is an advisory file name and plays no part in addressing.
    async fn upload(&self, data: &[u8], label: &str) -> Result<ContentId, CcgError>;

    /// Fetch the bytes previously uploaded under `cid`.
    async fn download(&self, cid: &ContentId) -> Result<Vec<u8>, CcgError>;
}

/// On-chain key/value pointer from repository identifier to content ids.
///
/// Implemented by ccg-anchor (EVM JSON-RPC, in-memory).
///
/// Remote implementations bound every read and every write with deadlines
/// fixed when the anchor is built. A caller needing a tighter bound for one
/// call wraps it in `tokio::time::timeout`: dropping the future cancels the
/// in-flight request.
#[async_trait]
pub trait ChainAnchor: Send + Sync {
    /// Whether any pointer has been written for `id`.
    async fn exists(&self, id: &RepositoryId) -> Result<bool, CcgError>;

    /// Read the full pointer. `None` if nothing was ever written.
    async fn get_pointer(&self, id: &RepositoryId) -> Result<Option<ContentPointer>, CcgError>;

    /// Read only the metadata content id. `None` if nothing was ever written.
    async fn get_metadata(&self, id: &RepositoryId) -> Result<Option<ContentId>, CcgError>;

    /// Replace the pointer for `id` and return the submitted transaction hash.
    ///
    /// Returns once the write is accepted for submission. It does not wait for
    /// confirmation, so a returned hash may still be pending.
    async fn set_pointer(
        &self,
        id: &RepositoryId,
        blob: &ContentId,
        metadata: &ContentId,
    ) -> Result<TransactionHash, CcgError>;
}
