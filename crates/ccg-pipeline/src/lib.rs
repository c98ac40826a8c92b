// crates/ccg-pipeline/src/lib.rs
//
// ccg-pipeline: push/pull orchestration for ccg.
//
// Sequences identifier derivation, the anchor read, history extension,
// encryption, uploads and the anchor write. Clients are injected, so the
// same pipeline runs against the Lighthouse/JSON-RPC clients or the
// in-memory ones.

pub mod cold_storage;

pub use cold_storage::{ColdStorage, PulledRepository};
