// crates/ccg-core/src/lib.rs
//
// ccg-core: Core types, traits, crypto codec and version ledger for ccg.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the repository identifier, the encrypted blob format, the
// version history record, the shared error type, and the trait seams for
// the remote content store and the on-chain anchor.

pub mod crypto;
pub mod error;
pub mod identity;
pub mod pointer;
pub mod traits;
pub mod version;

// Re-export key types for ergonomic access from downstream crates.
pub use error::CcgError;
pub use identity::{repository_id, RepositoryId};
pub use pointer::{ContentId, ContentPointer, TransactionHash};
pub use traits::{ChainAnchor, ContentStore};
pub use version::{build_next_version, parse_history, VersionRecord};
