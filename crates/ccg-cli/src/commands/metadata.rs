// crates/ccg-cli/src/commands/metadata.rs
//
// `ccg metadata <repo>`: print the latest version history.

use clap::Args;

use crate::config::CcgConfig;
use crate::output::{render_history, OutputFormat};

/// Show the version history of a repository.
#[derive(Debug, Args)]
pub struct MetadataCmd {
    /// Repository name, e.g. `acme/widgets`.
    pub repo: String,
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// Run the metadata command.
pub async fn run(cmd: &MetadataCmd, config: &CcgConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (pipeline, _anchor) = super::build_pipeline(config, super::Access::ReadOnly)?;

    match pipeline.latest_metadata(&cmd.repo).await? {
        Some(history) => println!("{}", render_history(&history, cmd.format)?),
        None => println!("No metadata found for {}. Push it first with `ccg push`.", cmd.repo),
    }
    Ok(())
}
