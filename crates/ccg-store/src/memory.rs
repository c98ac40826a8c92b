// crates/ccg-store/src/memory.rs
//
// In-process content store. Objects are addressed by the hex SHA-256 of
// their bytes and never removed, mirroring a pinning service.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use ccg_core::crypto::hash_bytes;
use ccg_core::{CcgError, ContentId, ContentStore};

/// In-memory [`ContentStore`] for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<ContentId, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct objects held, referenced or not.
    pub fn object_count(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn contains(&self, cid: &ContentId) -> bool {
        self.objects
            .lock()
            .map(|o| o.contains_key(cid))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn upload(&self, data: &[u8], label: &str) -> Result<ContentId, CcgError> {
        let cid = ContentId(hex::encode(hash_bytes(data)));
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| CcgError::RemoteStorage {
                status: None,
                body: "memory store lock poisoned".to_string(),
            })?;
        objects.entry(cid.clone()).or_insert_with(|| data.to_vec());
        tracing::trace!("Stored {} bytes as {} ({})", data.len(), cid, label);
        Ok(cid)
    }

    async fn download(&self, cid: &ContentId) -> Result<Vec<u8>, CcgError> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| CcgError::RemoteStorage {
                status: None,
                body: "memory store lock poisoned".to_string(),
            })?;
        objects
            .get(cid)
            .cloned()
            .ok_or_else(|| CcgError::RemoteStorage {
                status: Some(404),
                body: format!("no object for {}", cid),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_download() {
        let store = MemoryStore::new();
        let cid = store.upload(b"bundle", "abc").await.unwrap();
        assert!(store.contains(&cid));
        assert_eq!(store.download(&cid).await.unwrap(), b"bundle");
    }

    #[tokio::test]
    async fn identical_bytes_share_an_address() {
        let store = MemoryStore::new();
        let a = store.upload(b"same", "one").await.unwrap();
        let b = store.upload(b"same", "two").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_remote_storage_error() {
        let store = MemoryStore::new();
        let result = store.download(&ContentId::new("missing")).await;
        assert!(matches!(
            result,
            Err(CcgError::RemoteStorage { status: Some(404), .. })
        ));
    }
}
