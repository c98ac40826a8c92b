// crates/ccg-store/src/lib.rs
//
// ccg-store: Remote content store clients for ccg.
//
// Provides the Lighthouse HTTP client used in production and an in-memory
// content-addressed store for tests and dry runs. Both implement
// `ccg_core::ContentStore`.

pub mod lighthouse;
pub mod memory;

// Re-export key types for ergonomic access from downstream crates.
pub use lighthouse::{LighthouseConfig, LighthouseStore};
pub use memory::MemoryStore;
