// crates/ccg-core/src/pointer.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote content store to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        ContentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current on-chain record for a repository.
///
/// A pointer is replaced wholesale on every successful write; the chain keeps
/// no history of earlier pointers. Anchors return `Option<ContentPointer>`,
/// where `None` means nothing was ever written for the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPointer {
    /// Encrypted repository bundle.
    pub blob: ContentId,
    /// Encrypted version history.
    pub metadata: ContentId,
}

/// Hash of a submitted (not necessarily confirmed) chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(pub String);

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
