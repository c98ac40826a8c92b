// crates/ccg-cli/src/commands/mod.rs
//
// Command module declarations for the ccg CLI, plus client wiring shared by
// the commands that reach the store and the chain.

pub mod id;
pub mod metadata;
pub mod pull;
pub mod push;

use std::sync::Arc;

use ccg_anchor::JsonRpcAnchor;
use ccg_core::CcgError;
use ccg_pipeline::ColdStorage;
use ccg_store::LighthouseStore;

use crate::config::CcgConfig;

/// Whether the pipeline will write to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// Build the production pipeline from configuration.
///
/// `ReadWrite` loads the signing key up front, so a missing or undecryptable
/// key fails before anything is uploaded. The anchor is returned alongside
/// so callers can run chain checks.
pub fn build_pipeline(
    config: &CcgConfig,
    access: Access,
) -> Result<(ColdStorage, Arc<JsonRpcAnchor>), CcgError> {
    let key = zeroize::Zeroizing::new(config.encryption_key_bytes()?);
    let store = Arc::new(LighthouseStore::new(config.lighthouse_config()?)?);
    let mut anchor = JsonRpcAnchor::new(config.anchor_config())?;
    if access == Access::ReadWrite {
        anchor = anchor.with_signer(config.signer()?);
    }
    let anchor = Arc::new(anchor);
    let pipeline = ColdStorage::new(store, anchor.clone(), &key)?;
    Ok((pipeline, anchor))
}
