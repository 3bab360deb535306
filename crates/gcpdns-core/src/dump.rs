//! Dump shapes for zone and record listings.
//!
//! Field names match the data model so JSON output is stable; the CLI
//! decides how to flatten these for CSV and tables.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::RecordType;

/// A record set's identity, rendered as `TYPE:name` in flattened output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordInfo {
    pub record_type: RecordType,
    pub name: String,
}

impl std::fmt::Display for RecordInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.record_type, self.name)
    }
}

impl FromStr for RecordInfo {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (record_type, name) = s.split_once(':').ok_or_else(|| {
            CoreError::validation(format!("invalid record info {s:?} (expected TYPE:name)"))
        })?;
        Ok(Self {
            record_type: record_type.parse().map_err(|_| {
                CoreError::validation(format!("invalid record type in record info: {record_type:?}"))
            })?,
            name: name.to_owned(),
        })
    }
}

/// Parse a `|`-delimited list of `TYPE:name` entries. Empty segments
/// are ignored so trailing separators don't fail a row.
pub fn parse_record_info(raw: &str) -> Result<Vec<RecordInfo>, CoreError> {
    raw.split('|')
        .filter(|s| !s.is_empty())
        .map(RecordInfo::from_str)
        .collect()
}

/// One zone in a `zone dump` listing.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneDump {
    pub dns_name: String,
    pub name: String,
    pub created: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub name_servers: Vec<String>,
    pub zone_records: Vec<RecordInfo>,
}

/// One record set in a `record dump` listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecordDump {
    pub name: String,
    pub record_type: RecordType,
    pub ttl: u32,
    pub data: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn record_info_parses_and_displays() {
        let info: RecordInfo = "A:www.example.com.".parse().unwrap();
        assert_eq!(info.record_type, RecordType::A);
        assert_eq!(info.name, "www.example.com.");
        assert_eq!(info.to_string(), "A:www.example.com.");
    }

    #[test]
    fn record_info_list_skips_empty_segments() {
        let infos = parse_record_info("A:www.example.com.|TXT:example.com.|").unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1].record_type, RecordType::TXT);
    }

    #[test]
    fn malformed_record_info_is_rejected() {
        assert!(parse_record_info("www.example.com.").is_err());
        assert!(parse_record_info("BOGUS:www.example.com.").is_err());
    }
}
