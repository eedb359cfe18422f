//! CSV codec for the source and working tables.
//!
//! Name lists and the name → EIN map are stored as JSON-encoded cells,
//! matching the original files. The source CSV carries only the first two
//! columns; the working CSV carries all of them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreResult;
use crate::record::Record;

/// One serialized row of the working CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub spons_dfe_ein: u64,
    pub unique_names_v2: String,
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub marked_names: Option<String>,
    #[serde(default)]
    pub name_ein_mappings: Option<String>,
    #[serde(default)]
    pub completion_status: Option<String>,
}

/// Parse a JSON-encoded name list cell.
///
/// Older exports serialized lists with single quotes; those are rescued
/// by a quote swap before giving up.
pub fn parse_names(cell: &str) -> Vec<String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<String>>(cell) {
        Ok(names) => names,
        Err(_) => match serde_json::from_str::<Vec<String>>(&cell.replace('\'', "\"")) {
            Ok(names) => names,
            Err(e) => {
                warn!("unparseable name list cell: {e}");
                Vec::new()
            }
        },
    }
}

/// Parse a JSON-encoded name → EIN map cell.
pub fn parse_mappings(cell: &str) -> HashMap<String, u64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return HashMap::new();
    }

    match serde_json::from_str::<HashMap<String, u64>>(cell) {
        Ok(mappings) => mappings,
        Err(e) => {
            warn!("unparseable name mapping cell: {e}");
            HashMap::new()
        }
    }
}

/// Decode a CSV row into a record. The persisted completion status is
/// ignored; it is derived state.
pub fn from_row(row: RawRow) -> Record {
    Record {
        ein: row.spons_dfe_ein,
        names: parse_names(&row.unique_names_v2),
        marked: row.marked_names.as_deref().map(parse_names).unwrap_or_default(),
        canonical: row.new_name.filter(|name| !name.trim().is_empty()),
        mappings: row
            .name_ein_mappings
            .as_deref()
            .map(parse_mappings)
            .unwrap_or_default(),
    }
}

/// Encode a record into a CSV row for the working file.
pub fn to_row(record: &Record) -> StoreResult<RawRow> {
    Ok(RawRow {
        spons_dfe_ein: record.ein,
        unique_names_v2: serde_json::to_string(&record.names)?,
        new_name: record.canonical.clone(),
        marked_names: Some(serde_json::to_string(&record.marked)?),
        name_ein_mappings: Some(serde_json::to_string(&record.mappings)?),
        completion_status: Some(record.completion_status().as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_json() {
        assert_eq!(
            parse_names(r#"["ACME CORP", "ACME INC"]"#),
            vec!["ACME CORP".to_string(), "ACME INC".to_string()]
        );
        assert!(parse_names("[]").is_empty());
        assert!(parse_names("").is_empty());
    }

    #[test]
    fn test_parse_names_single_quoted_fallback() {
        assert_eq!(
            parse_names("['ACME CORP', 'ACME INC']"),
            vec!["ACME CORP".to_string(), "ACME INC".to_string()]
        );
    }

    #[test]
    fn test_parse_names_garbage_is_empty() {
        assert!(parse_names("not a list").is_empty());
        assert!(parse_names("[unterminated").is_empty());
    }

    #[test]
    fn test_parse_mappings() {
        let mappings = parse_mappings(r#"{"ACME WEST": 12345}"#);
        assert_eq!(mappings.get("ACME WEST"), Some(&12345));
        assert!(parse_mappings("{}").is_empty());
        assert!(parse_mappings("garbage").is_empty());
    }

    #[test]
    fn test_row_round_trip() {
        let mut record = Record::new(1001, vec!["A".to_string(), "B".to_string()]);
        record.marked = vec!["A".to_string()];
        record.canonical = Some("ALPHA".to_string());
        record.mappings.insert("B".to_string(), 2002);

        let row = to_row(&record).unwrap();
        assert_eq!(row.spons_dfe_ein, 1001);
        assert_eq!(row.completion_status.as_deref(), Some("done"));

        let decoded = from_row(row);
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_from_row_blank_new_name_is_none() {
        let row = RawRow {
            spons_dfe_ein: 1,
            unique_names_v2: "[]".to_string(),
            new_name: Some("  ".to_string()),
            marked_names: None,
            name_ein_mappings: None,
            completion_status: None,
        };
        assert_eq!(from_row(row).canonical, None);
    }
}
