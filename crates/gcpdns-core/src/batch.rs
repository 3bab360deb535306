//! Desired-state CSV tables.
//!
//! One row per entity operation. Rows are parsed individually so a
//! malformed line becomes a per-row failure subject to `--ignore-errors`
//! instead of aborting the whole parse.

use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ── Actions ─────────────────────────────────────────────────────────

/// Recognized row actions. `add` is accepted as an alias for `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Create,
    Replace,
    Delete,
}

impl FromStr for RowAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" | "add" => Ok(Self::Create),
            "replace" => Ok(Self::Replace),
            "delete" => Ok(Self::Delete),
            other => Err(CoreError::validation(format!(
                "invalid action {other:?} (expected create, add, replace, or delete)"
            ))),
        }
    }
}

impl std::fmt::Display for RowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Replace => write!(f, "replace"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

// ── Row shapes ──────────────────────────────────────────────────────

/// A zone-table row. `action` stays raw text here so an unknown action
/// is reported as a validation failure for that row, not a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneRow {
    pub action: String,
    pub dns_name: String,
    #[serde(default)]
    pub gcp_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `TYPE:name|TYPE:name` record sets to remove before a zone delete.
    #[serde(default)]
    pub record_info: Option<String>,
}

/// A record-table row.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordRow {
    pub action: String,
    pub name: String,
    pub record_type: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    /// `|`-delimited record data.
    #[serde(default)]
    pub data: Option<String>,
}

/// A parsed CSV row with its 1-based source line number.
#[derive(Debug)]
pub struct CsvRow<T> {
    pub line: u64,
    pub parsed: Result<T, CoreError>,
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Read every data row from a headered CSV table.
///
/// The outer `Result` covers unreadable input (I/O, missing header);
/// individual malformed rows land as `Err` in their `CsvRow` so the
/// reconciler can isolate them.
pub fn parse_rows<T, R>(input: R) -> Result<Vec<CsvRow<T>>, CoreError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| CoreError::Csv {
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // Header is line 1; data rows start at line 2.
        let fallback_line = (index as u64) + 2;
        match record {
            Ok(record) => {
                let line = record
                    .position()
                    .map_or(fallback_line, csv::Position::line);
                let parsed = record
                    .deserialize::<T>(Some(&headers))
                    .map_err(|e| CoreError::Csv {
                        line,
                        message: e.to_string(),
                    });
                rows.push(CsvRow { line, parsed });
            }
            Err(e) => {
                let line = e
                    .position()
                    .map_or(fallback_line, csv::Position::line);
                rows.push(CsvRow {
                    line,
                    parsed: Err(CoreError::Csv {
                        line,
                        message: e.to_string(),
                    }),
                });
            }
        }
    }

    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn action_parses_aliases() {
        assert_eq!("create".parse::<RowAction>().unwrap(), RowAction::Create);
        assert_eq!("ADD".parse::<RowAction>().unwrap(), RowAction::Create);
        assert_eq!("Replace".parse::<RowAction>().unwrap(), RowAction::Replace);
        assert_eq!("delete".parse::<RowAction>().unwrap(), RowAction::Delete);
        assert!("upsert".parse::<RowAction>().is_err());
    }

    #[test]
    fn record_rows_parse_with_line_numbers() {
        let csv = "action,name,record_type,ttl,data\n\
                   create,www.example.com,A,300,192.0.2.10\n\
                   delete,old.example.com,CNAME,,\n";
        let rows: Vec<CsvRow<RecordRow>> = parse_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        let first = rows[0].parsed.as_ref().unwrap();
        assert_eq!(first.action, "create");
        assert_eq!(first.ttl, Some(300));
        assert_eq!(first.data.as_deref(), Some("192.0.2.10"));

        assert_eq!(rows[1].line, 3);
        let second = rows[1].parsed.as_ref().unwrap();
        assert_eq!(second.action, "delete");
        assert_eq!(second.ttl, None);
        assert_eq!(second.data, None);
    }

    #[test]
    fn missing_column_is_a_row_error() {
        // No record_type column at all: every row fails, parsing survives.
        let csv = "action,name\ncreate,www.example.com\n";
        let rows: Vec<CsvRow<RecordRow>> = parse_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].parsed.is_err());
    }

    #[test]
    fn zone_rows_parse_optional_fields() {
        let csv = "action,dns_name,gcp_name,description\n\
                   create,example.com,,Test zone\n";
        let rows: Vec<CsvRow<ZoneRow>> = parse_rows(csv.as_bytes()).unwrap();

        let row = rows[0].parsed.as_ref().unwrap();
        assert_eq!(row.dns_name, "example.com");
        assert_eq!(row.gcp_name, None);
        assert_eq!(row.description.as_deref(), Some("Test zone"));
    }
}
