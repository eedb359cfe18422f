//! Wire types for the REST surface
//!
//! Field names match the original editor's JSON payloads so an existing
//! frontend keeps working against this server.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use store::{CompletionStatus, Record, SaveRequest};

/// Summary entry in the paginated EIN list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EinListItem {
    pub ein: u64,
    pub is_edited: bool,
    pub completion_status: CompletionStatus,
}

/// Pagination envelope for the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    /// Compute the envelope for a 1-based page. `page_size` must be
    /// non-zero.
    pub fn new(page: usize, page_size: usize, total_count: usize) -> Self {
        Self {
            page,
            page_size,
            total_count,
            total_pages: total_count.div_ceil(page_size),
            has_next: page.saturating_mul(page_size) < total_count,
            has_previous: page > 1,
        }
    }
}

/// Full record detail returned by `GET /ein/:ein`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EinDetail {
    #[serde(rename = "spons_dfe_ein")]
    pub ein: u64,
    #[serde(rename = "unique_names_v2")]
    pub names: Vec<String>,
    pub marked_names: Vec<String>,
    pub new_name: Option<String>,
    pub total_names: usize,
    pub name_ein_mappings: HashMap<String, u64>,
    pub completion_status: CompletionStatus,
}

impl From<&Record> for EinDetail {
    fn from(record: &Record) -> Self {
        Self {
            ein: record.ein,
            names: record.names.clone(),
            marked_names: record.marked.clone(),
            new_name: record.canonical.clone(),
            total_names: record.names.len(),
            name_ein_mappings: record.mappings.clone(),
            completion_status: record.completion_status(),
        }
    }
}

/// Body of `POST /ein/:ein/save`. Unknown fields (like the EIN echoed by
/// older frontends) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveBody {
    #[serde(default)]
    pub marked_names: Vec<String>,
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub name_ein_mappings: HashMap<String, u64>,
}

impl SaveBody {
    pub fn into_request(self) -> SaveRequest {
        SaveRequest {
            marked_names: self.marked_names,
            new_name: self.new_name,
            name_ein_mappings: self.name_ein_mappings,
        }
    }
}

/// Response of a successful save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
    pub total_names: usize,
    pub marked_count: usize,
    pub new_name: Option<String>,
    pub mappings_count: usize,
    pub transferred_count: usize,
    pub completion_status: CompletionStatus,
}

/// Query parameters of `GET /eins`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}
