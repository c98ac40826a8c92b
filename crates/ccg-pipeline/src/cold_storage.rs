// crates/ccg-pipeline/src/cold_storage.rs
//
// Push/pull pipeline across the content store, crypto codec and anchor.
//
// The three external systems are not updated transactionally. The anchor
// write is the single commit point of a push: if it fails after both
// uploads succeeded, the uploads stay behind as unreferenced objects and the
// previous pointer remains authoritative. Retrying a failed push from
// scratch is safe.
//
// Concurrent pushes for the same repository race at the anchor write and
// the last one to land wins, dropping the version entry computed by the
// other from a now-stale history.

use std::sync::Arc;

use zeroize::Zeroizing;

use ccg_core::crypto::{self, KEY_SIZE};
use ccg_core::{
    build_next_version, repository_id, CcgError, ChainAnchor, ContentStore, TransactionHash,
};

/// Bundle and history fetched by [`ColdStorage::pull`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulledRepository {
    pub bundle: Vec<u8>,
    pub history: Vec<u8>,
}

/// Orchestrates pushes and pulls for any number of repositories.
pub struct ColdStorage {
    store: Arc<dyn ContentStore>,
    anchor: Arc<dyn ChainAnchor>,
    key: Zeroizing<Vec<u8>>,
}

impl ColdStorage {
    /// Fails with `Configuration` unless `key` is exactly 32 bytes.
    pub fn new(
        store: Arc<dyn ContentStore>,
        anchor: Arc<dyn ChainAnchor>,
        key: &[u8],
    ) -> Result<Self, CcgError> {
        if key.len() != KEY_SIZE {
            return Err(CcgError::Configuration(format!(
                "encryption key must be {} bytes, got {}",
                KEY_SIZE,
                key.len()
            )));
        }
        Ok(Self {
            store,
            anchor,
            key: Zeroizing::new(key.to_vec()),
        })
    }

    async fn fetch_decrypted(&self, cid: &ccg_core::ContentId) -> Result<Vec<u8>, CcgError> {
        let blob = self.store.download(cid).await?;
        crypto::decrypt(&self.key, &blob)
    }

    /// Encrypt and upload `bundle`, extend the version history with
    /// `commit_hash`, and point the anchor at both.
    ///
    /// 1. Derive the repository id
    /// 2. Read the current metadata id from the anchor
    /// 3. Download and decrypt the prior history, if any
    /// 4. Append the new version record
    /// 5. Upload the encrypted bundle
    /// 6. Upload the encrypted history
    /// 7. Write the new pointer and return its transaction hash
    pub async fn push(
        &self,
        repo: &str,
        bundle: &[u8],
        commit_hash: &str,
    ) -> Result<TransactionHash, CcgError> {
        // Step 1
        let id = repository_id(repo);
        tracing::debug!("Pushing {} ({}) at commit {}", repo, id, commit_hash);

        // Step 2
        let existing_meta = self.anchor.get_metadata(&id).await?;

        // Step 3
        let history = match &existing_meta {
            Some(cid) => {
                tracing::debug!("Extending history stored at {}", cid);
                Some(self.fetch_decrypted(cid).await?)
            }
            None => None,
        };

        // Step 4
        let next_history = build_next_version(history.as_deref(), commit_hash)?;

        // Step 5
        let sealed_bundle = crypto::encrypt(&self.key, bundle)?;
        let blob_cid = self.store.upload(&sealed_bundle, commit_hash).await?;

        // Step 6
        let sealed_history = crypto::encrypt(&self.key, &next_history)?;
        let meta_label = format!("{}_meta", commit_hash);
        let meta_cid = self.store.upload(&sealed_history, &meta_label).await?;

        // Step 7
        let tx = match self.anchor.set_pointer(&id, &blob_cid, &meta_cid).await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::warn!(
                    "Anchor write for {} failed, uploads {} and {} are now unreferenced: {}",
                    repo,
                    blob_cid,
                    meta_cid,
                    e
                );
                return Err(e);
            }
        };

        tracing::info!("Pushed {} at commit {} in transaction {}", repo, commit_hash, tx);
        Ok(tx)
    }

    /// Fetch and decrypt the latest bundle and history.
    ///
    /// Fails with `NotFound` if the repository was never pushed.
    pub async fn pull(&self, repo: &str) -> Result<PulledRepository, CcgError> {
        let id = repository_id(repo);
        let pointer = self
            .anchor
            .get_pointer(&id)
            .await?
            .ok_or_else(|| CcgError::NotFound(format!("no pointer for repository {}", repo)))?;

        let bundle = self.fetch_decrypted(&pointer.blob).await?;
        let history = self.fetch_decrypted(&pointer.metadata).await?;

        tracing::info!("Pulled {} ({} bundle bytes)", repo, bundle.len());
        Ok(PulledRepository { bundle, history })
    }

    /// Fetch and decrypt only the latest history. `None` if never pushed.
    pub async fn latest_metadata(&self, repo: &str) -> Result<Option<Vec<u8>>, CcgError> {
        let id = repository_id(repo);
        match self.anchor.get_metadata(&id).await? {
            Some(cid) => Ok(Some(self.fetch_decrypted(&cid).await?)),
            None => Ok(None),
        }
    }
}
