// crates/ccg-anchor/src/memory.rs
//
// In-process anchor with the contract's semantics: one pointer per
// repository identifier, replaced wholesale on each write, last write wins.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha3::{Digest, Keccak256};

use ccg_core::{CcgError, ChainAnchor, ContentId, ContentPointer, RepositoryId, TransactionHash};

#[derive(Debug, Default)]
struct AnchorState {
    pointers: HashMap<RepositoryId, ContentPointer>,
    writes: u64,
}

/// In-memory [`ChainAnchor`] for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryAnchor {
    state: Mutex<AnchorState>,
}

fn poisoned() -> CcgError {
    CcgError::Rpc("memory anchor lock poisoned".to_string())
}

impl MemoryAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set_pointer` calls so far.
    pub fn write_count(&self) -> u64 {
        self.state.lock().map(|s| s.writes).unwrap_or(0)
    }

    fn read_pointer(&self, id: &RepositoryId) -> Result<Option<ContentPointer>, CcgError> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(state.pointers.get(id).cloned())
    }
}

#[async_trait]
impl ChainAnchor for MemoryAnchor {
    async fn exists(&self, id: &RepositoryId) -> Result<bool, CcgError> {
        Ok(self.read_pointer(id)?.is_some())
    }

    async fn get_pointer(&self, id: &RepositoryId) -> Result<Option<ContentPointer>, CcgError> {
        self.read_pointer(id)
    }

    async fn get_metadata(&self, id: &RepositoryId) -> Result<Option<ContentId>, CcgError> {
        Ok(self.read_pointer(id)?.map(|p| p.metadata))
    }

    async fn set_pointer(
        &self,
        id: &RepositoryId,
        blob: &ContentId,
        metadata: &ContentId,
    ) -> Result<TransactionHash, CcgError> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        state.writes += 1;

        let mut hasher = Keccak256::new();
        hasher.update(id.as_bytes());
        hasher.update(blob.as_str().as_bytes());
        hasher.update(metadata.as_str().as_bytes());
        hasher.update(state.writes.to_be_bytes());
        let tx = TransactionHash(format!("0x{}", hex::encode(hasher.finalize())));

        state.pointers.insert(
            *id,
            ContentPointer {
                blob: blob.clone(),
                metadata: metadata.clone(),
            },
        );
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccg_core::repository_id;

    #[tokio::test]
    async fn unknown_id_reads_as_absent() {
        let anchor = MemoryAnchor::new();
        let id = repository_id("never/pushed");
        assert!(!anchor.exists(&id).await.unwrap());
        assert_eq!(anchor.get_pointer(&id).await.unwrap(), None);
        assert_eq!(anchor.get_metadata(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_replaces_pointer() {
        let anchor = MemoryAnchor::new();
        let id = repository_id("acme/widgets");

        let first = anchor
            .set_pointer(&id, &ContentId::new("blob1"), &ContentId::new("meta1"))
            .await
            .unwrap();
        let second = anchor
            .set_pointer(&id, &ContentId::new("blob2"), &ContentId::new("meta2"))
            .await
            .unwrap();
        assert_ne!(first, second);
        assert!(second.0.starts_with("0x") && second.0.len() == 66);

        let pointer = anchor.get_pointer(&id).await.unwrap().unwrap();
        assert_eq!(pointer.blob, ContentId::new("blob2"));
        assert_eq!(pointer.metadata, ContentId::new("meta2"));
        assert_eq!(anchor.write_count(), 2);
    }

    #[tokio::test]
    async fn ids_are_independent() {
        let anchor = MemoryAnchor::new();
        let a = repository_id("acme/widgets");
        let b = repository_id("acme/gadgets");
        anchor
            .set_pointer(&a, &ContentId::new("blob"), &ContentId::new("meta"))
            .await
            .unwrap();
        assert!(anchor.exists(&a).await.unwrap());
        assert!(!anchor.exists(&b).await.unwrap());
    }
}
