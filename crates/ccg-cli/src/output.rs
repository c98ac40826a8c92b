// crates/ccg-cli/src/output.rs
//
// Output formatting utilities for the ccg CLI.
// Supports table and JSON output modes.

use clap::ValueEnum;
use tabled::{Table, Tabled};

use ccg_core::{parse_history, CcgError, VersionRecord};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The history JSON exactly as stored.
    Json,
    /// Pretty-printed table output.
    Table,
}

#[derive(Tabled)]
struct VersionRow {
    #[tabled(rename = "Version")]
    version: u32,
    #[tabled(rename = "Commit")]
    commit: String,
}

impl From<&VersionRecord> for VersionRow {
    fn from(record: &VersionRecord) -> Self {
        Self {
            version: record.version,
            commit: record.commit_hash.clone(),
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Render a serialized version history in the requested format.
pub fn render_history(history: &[u8], format: OutputFormat) -> Result<String, CcgError> {
    match format {
        OutputFormat::Json => String::from_utf8(history.to_vec())
            .map_err(|e| CcgError::CorruptHistory(format!("history is not UTF-8: {}", e))),
        OutputFormat::Table => {
            let rows: Vec<VersionRow> = parse_history(history)?.iter().map(VersionRow::from).collect();
            Ok(format_table(&rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &[u8] =
        br#"[{"version":1,"commitHash":"abc123"},{"version":2,"commitHash":"def456"}]"#;

    #[test]
    fn json_is_verbatim() {
        let out = render_history(HISTORY, OutputFormat::Json).unwrap();
        assert_eq!(out.as_bytes(), HISTORY);
    }

    #[test]
    fn table_lists_every_version() {
        let out = render_history(HISTORY, OutputFormat::Table).unwrap();
        assert!(out.contains("Version"));
        assert!(out.contains("Commit"));
        assert!(out.contains("abc123"));
        assert!(out.contains("def456"));
    }

    #[test]
    fn table_rejects_corrupt_history() {
        assert!(matches!(
            render_history(b"{oops", OutputFormat::Table),
            Err(CcgError::CorruptHistory(_))
        ));
    }
}
