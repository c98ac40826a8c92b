use std::time::Duration;

use thiserror::Error;

/// Error taxonomy shared by every ccg crate.
#[derive(Debug, Error)]
pub enum CcgError {
    /// Bad key size, missing credentials or an unusable configuration value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote content store answered with a non-success status or could not be reached.
    /// `status` is `None` when no HTTP response was received at all.
    #[error("Remote storage error ({}): {body}", status_label(.status))]
    RemoteStorage { status: Option<u16>, body: String },

    /// Input too short to even contain a nonce.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// AEAD tag check failed: wrong key or tampered ciphertext.
    #[error("Authentication failed: ciphertext was tampered with or sealed under another key")]
    AuthenticationFailed,

    /// The opened payload does not end with the decryption key.
    #[error("Key mismatch: wrong key used for decryption")]
    KeyMismatch,

    /// Version history could not be decoded or encoded.
    #[error("Corrupt version history: {0}")]
    CorruptHistory(String),

    /// Chain node unreachable, call reverted or returned undecodable data.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Signing identity missing, locked or unknown to the node.
    #[error("Signing error: {0}")]
    Signing(String),

    /// A chain read exceeded its deadline.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// No pointer has ever been written for the repository.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local filesystem error.
    #[error("I/O error: {0}")]
    Io(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "no response".to_string(),
    }
}

impl CcgError {
    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Nothing in ccg retries on its own; this only informs callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CcgError::RemoteStorage { .. } | CcgError::Rpc(_) | CcgError::Timeout(_)
        )
    }
}

impl From<serde_json::Error> for CcgError {
    fn from(e: serde_json::Error) -> Self {
        CcgError::CorruptHistory(e.to_string())
    }
}

impl From<std::io::Error> for CcgError {
    fn from(e: std::io::Error) -> Self {
        CcgError::Io(e.to_string())
    }
}
