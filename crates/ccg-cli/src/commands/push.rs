// crates/ccg-cli/src/commands/push.rs
//
// `ccg push <repo> <bundle-path> <commit-hash>`: anchor a new bundle.

use std::path::PathBuf;

use clap::Args;

use ccg_core::CcgError;

use crate::config::CcgConfig;

/// Encrypt, upload and anchor a repository bundle.
#[derive(Debug, Args)]
pub struct PushCmd {
    /// Repository name, e.g. `acme/widgets`.
    pub repo: String,
    /// Path to the bundle file (e.g. produced by `git bundle create`).
    pub bundle: PathBuf,
    /// Commit the bundle was taken at.
    pub commit_hash: String,
}

/// Run the push command. Prints the submitted transaction hash.
pub async fn run(cmd: &PushCmd, config: &CcgConfig) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = tokio::fs::read(&cmd.bundle).await.map_err(|e| {
        CcgError::Io(format!("cannot read bundle {}: {}", cmd.bundle.display(), e))
    })?;

    let (pipeline, anchor) = super::build_pipeline(config, super::Access::ReadWrite)?;
    anchor.verify_chain_id().await?;

    tracing::info!(
        "Pushing {} ({} bytes) at commit {}",
        cmd.repo,
        bundle.len(),
        cmd.commit_hash
    );
    let tx = pipeline.push(&cmd.repo, &bundle, &cmd.commit_hash).await?;

    // Submission only; the transaction may still be pending.
    println!("{}", tx);
    Ok(())
}
