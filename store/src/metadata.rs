//! Metadata sidecar persisted next to the working CSV.
//!
//! Rewritten after every save so callers can read counts without
//! rescanning the table.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub total_records: usize,
    pub edited_records: usize,
    pub last_saved: DateTime<Utc>,
}

impl Metadata {
    pub fn read(path: &Path) -> StoreResult<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write(&self, path: &Path) -> StoreResult<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
