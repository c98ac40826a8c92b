// crates/ccg-cli/src/commands/pull.rs
//
// `ccg pull <repo> <output-path>`: fetch the latest bundle and history.

use std::path::PathBuf;

use clap::Args;

use ccg_core::CcgError;

use crate::config::CcgConfig;
use crate::output::{render_history, OutputFormat};

/// Download and decrypt the latest bundle of a repository.
#[derive(Debug, Args)]
pub struct PullCmd {
    /// Repository name, e.g. `acme/widgets`.
    pub repo: String,
    /// Where to write the decrypted bundle.
    pub output: PathBuf,
    /// How to print the version history.
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// Run the pull command. Writes the bundle, prints the history.
pub async fn run(cmd: &PullCmd, config: &CcgConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (pipeline, _anchor) = super::build_pipeline(config, super::Access::ReadOnly)?;
    let pulled = pipeline.pull(&cmd.repo).await?;

    tokio::fs::write(&cmd.output, &pulled.bundle)
        .await
        .map_err(|e| CcgError::Io(format!("cannot write {}: {}", cmd.output.display(), e)))?;
    tracing::info!(
        "Wrote {} bytes to {}",
        pulled.bundle.len(),
        cmd.output.display()
    );

    println!("{}", render_history(&pulled.history, cmd.format)?);
    Ok(())
}
