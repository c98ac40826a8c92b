// crates/ccg-core/src/version.rs
//
// Append-only version history kept next to each pushed bundle.
//
// Serialized as a compact JSON array, e.g.
// `[{"version":1,"commitHash":"abc123"},{"version":2,"commitHash":"def456"}]`.
// Versions start at 1 and are contiguous, so the history length always
// equals the last entry's `version`.

use serde::{Deserialize, Serialize};

use crate::error::CcgError;

/// One checkpoint in a repository's version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: u32,
    #[serde(rename = "commitHash")]
    pub commit_hash: String,
}

/// Decode a serialized history.
pub fn parse_history(bytes: &[u8]) -> Result<Vec<VersionRecord>, CcgError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Extend `existing` (or start a fresh history) with an entry for `commit_hash`.
///
/// Returns the re-encoded history. Fails with `CorruptHistory` if `existing`
/// is not a JSON array of version records.
pub fn build_next_version(
    existing: Option<&[u8]>,
    commit_hash: &str,
) -> Result<Vec<u8>, CcgError> {
    let mut history = match existing {
        Some(bytes) => parse_history(bytes)?,
        None => Vec::new(),
    };

    let next = u32::try_from(history.len() + 1)
        .map_err(|_| CcgError::CorruptHistory("version counter overflow".to_string()))?;
    history.push(VersionRecord {
        version: next,
        commit_hash: commit_hash.to_string(),
    });

    Ok(serde_json::to_vec(&history)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_version_from_absent_history() {
        let out = build_next_version(None, "abc123").unwrap();
        assert_eq!(out, br#"[{"version":1,"commitHash":"abc123"}]"#.to_vec());
    }

    #[test]
    fn appends_to_existing_history() {
        let first = build_next_version(None, "abc123").unwrap();
        let second = build_next_version(Some(first.as_slice()), "def456").unwrap();
        assert_eq!(
            String::from_utf8(second).unwrap(),
            r#"[{"version":1,"commitHash":"abc123"},{"version":2,"commitHash":"def456"}]"#
        );
    }

    #[test]
    fn repeated_application_is_contiguous() {
        let commits: Vec<String> = (0..25).map(|i| format!("commit-{:02}", i)).collect();
        let mut history: Option<Vec<u8>> = None;
        for c in &commits {
            history = Some(build_next_version(history.as_deref(), c).unwrap());
        }

        let records = parse_history(&history.unwrap()).unwrap();
        assert_eq!(records.len(), commits.len());
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.version as usize, i + 1);
            assert_eq!(record.commit_hash, commits[i]);
        }
        assert_eq!(records.last().unwrap().version as usize, records.len());
    }

    #[test]
    fn malformed_history_is_corrupt() {
        let bad_inputs: [&[u8]; 3] = [b"not json", br#"{"version":1}"#, br#"[{"version":"one"}]"#];
        for bad in bad_inputs {
            assert!(matches!(
                build_next_version(Some(bad), "abc"),
                Err(CcgError::CorruptHistory(_))
            ));
        }
    }

    #[test]
    fn empty_array_starts_at_one() {
        let out = build_next_version(Some(&b"[]"[..]), "abc").unwrap();
        let records = parse_history(&out).unwrap();
        assert_eq!(records, vec![VersionRecord { version: 1, commit_hash: "abc".into() }]);
    }
}
