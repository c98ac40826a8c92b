// crates/ccg-core/src/identity.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::hash_bytes;

/// Fixed-width identifier of a repository, used as the anchor's key.
///
/// Derived as SHA-256 over the UTF-8 bytes of the repository name, with no
/// salt, prefix or normalization. Any implementation hashing the same bytes
/// with SHA-256 arrives at the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryId(pub [u8; 32]);

impl RepositoryId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Lowercase `0x`-prefixed hex, the form used in logs, CLI output and chain
/// explorers alike.
impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Derive the repository identifier for `name`.
pub fn repository_id(name: &str) -> RepositoryId {
    RepositoryId(hash_bytes(name.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_id() {
        assert_eq!(repository_id("acme/widgets"), repository_id("acme/widgets"));
    }

    #[test]
    fn different_names_different_ids() {
        assert_ne!(repository_id("acme/widgets"), repository_id("acme/gadgets"));
        assert_ne!(repository_id("acme/widgets"), repository_id("acme/widgets "));
        assert_ne!(repository_id(""), repository_id("a"));
    }

    #[test]
    fn matches_plain_sha256_of_utf8_bytes() {
        // SHA-256("abc")
        let id = repository_id("abc");
        assert_eq!(
            hex::encode(id.as_bytes()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn display_is_prefixed_hex() {
        let id = repository_id("abc");
        assert_eq!(
            id.to_string(),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
