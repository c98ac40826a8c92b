// crates/ccg-cli/src/commands/id.rs
//
// `ccg id <repo>`: print the repository identifier used as the anchor key.

use clap::Args;

use ccg_core::repository_id;

#[derive(Debug, Args)]
pub struct IdCmd {
    /// Repository name, e.g. `acme/widgets`.
    pub repo: String,
}

pub fn run(cmd: &IdCmd) {
    println!("{}", repository_id(&cmd.repo));
}
