// crates/ccg-anchor/src/lib.rs
//
// ccg-anchor: On-chain pointer anchor clients for ccg.
//
// Provides the JSON-RPC client for the deployed pointer contract, the ABI
// bindings and local transaction signer it uses, and an in-memory anchor with
// the same last-write-wins semantics. Both clients implement
// `ccg_core::ChainAnchor`.

pub mod abi;
pub mod jsonrpc;
pub mod memory;
pub mod signer;

pub use jsonrpc::{AnchorConfig, JsonRpcAnchor};
pub use memory::MemoryAnchor;
pub use signer::LocalSigner;
