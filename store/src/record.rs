//! Record model: one EIN row and its derived review status.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Review progress of a single record, derived from which of its
/// candidate names have been marked or mapped away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Empty,
    NotStarted,
    PartiallyDone,
    Done,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Empty => "empty",
            CompletionStatus::NotStarted => "not_started",
            CompletionStatus::PartiallyDone => "partially_done",
            CompletionStatus::Done => "done",
        }
    }
}

/// One EIN row: the candidate names as originally observed plus the
/// operator's edits.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Record key, unique across the table.
    pub ein: u64,
    /// Ordered candidate names (`unique_names_v2` column).
    pub names: Vec<String>,
    /// Names flagged for review. Always a subset of `names`.
    pub marked: Vec<String>,
    /// Operator-assigned official name, stored trimmed and upper-cased.
    pub canonical: Option<String>,
    /// Name → foreign-EIN assignments for names whose real owner is not
    /// present in the table.
    pub mappings: HashMap<String, u64>,
}

impl Record {
    pub fn new(ein: u64, names: Vec<String>) -> Self {
        Self {
            ein,
            names,
            marked: Vec::new(),
            canonical: None,
            mappings: HashMap::new(),
        }
    }

    /// A record counts as edited once it carries a canonical name.
    pub fn is_edited(&self) -> bool {
        self.canonical.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Derive the review status from marked and mapped names.
    ///
    /// Only names still present in the candidate list count toward
    /// completion, so stale mapping keys cannot push a record to done.
    pub fn completion_status(&self) -> CompletionStatus {
        if self.names.is_empty() {
            return CompletionStatus::Empty;
        }

        let candidates: HashSet<&str> = self.names.iter().map(String::as_str).collect();
        let processed: HashSet<&str> = self
            .marked
            .iter()
            .map(String::as_str)
            .chain(self.mappings.keys().map(String::as_str))
            .filter(|name| candidates.contains(name))
            .collect();

        if processed.is_empty() {
            CompletionStatus::NotStarted
        } else if processed.len() == candidates.len() {
            CompletionStatus::Done
        } else {
            CompletionStatus::PartiallyDone
        }
    }
}
