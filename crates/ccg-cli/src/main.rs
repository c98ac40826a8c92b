// crates/ccg-cli/src/main.rs
//
// CLI entrypoint for ccg.
//
// Loads configuration once, initializes tracing (to stderr, so stdout stays
// machine-readable), and dispatches to the push, pull, metadata and id
// subcommands.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use commands::id::IdCmd;
use commands::metadata::MetadataCmd;
use commands::pull::PullCmd;
use commands::push::PushCmd;
use config::{expand_tilde, CcgConfig};

/// ccg: anchor encrypted git bundles in cold storage behind an on-chain pointer.
#[derive(Parser, Debug)]
#[command(name = "ccg", version, about = "Encrypted git cold storage anchored on-chain")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.ccg/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypt and upload a bundle, then anchor it on-chain.
    Push(PushCmd),

    /// Fetch and decrypt the latest bundle; print its version history.
    Pull(PullCmd),

    /// Print the latest version history.
    Metadata(MetadataCmd),

    /// Print the repository identifier used as the anchor key.
    Id(IdCmd),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = expand_tilde(&cli.config);
    let loaded = CcgConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => CcgConfig::default(),
    };
    config.apply_env();

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &loaded {
        Ok(_) => tracing::debug!("Loaded configuration from {}", config_path),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    match &cli.command {
        Commands::Push(cmd) => commands::push::run(cmd, &config).await?,
        Commands::Pull(cmd) => commands::pull::run(cmd, &config).await?,
        Commands::Metadata(cmd) => commands::metadata::run(cmd, &config).await?,
        Commands::Id(cmd) => commands::id::run(cmd),
    }

    Ok(())
}
