//! The working-store: in-memory table plus file persistence.
//!
//! The table is loaded once at startup (from the working CSV if present,
//! else migrated from the source CSV), held in memory in stable insertion
//! order, and flushed back to disk on every save. A save either fully
//! succeeds (working file + metadata rewritten) or fails with the prior
//! file contents and in-memory state intact.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codec::{self, RawRow};
use crate::error::{StoreError, StoreResult};
use crate::metadata::Metadata;
use crate::record::{CompletionStatus, Record};

/// File locations the store reads and writes.
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub source_file: PathBuf,
    pub working_file: PathBuf,
}

impl StorePaths {
    pub fn new(source_file: impl Into<PathBuf>, working_file: impl Into<PathBuf>) -> Self {
        Self {
            source_file: source_file.into(),
            working_file: working_file.into(),
        }
    }

    /// Metadata sidecar path: `<working-stem>_metadata.json` next to the
    /// working file.
    pub fn metadata_file(&self) -> PathBuf {
        let stem = self
            .working_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("working_data");
        self.working_file.with_file_name(format!("{stem}_metadata.json"))
    }
}

/// One edit request against a single EIN. All fields are applied in one
/// all-or-nothing save.
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    /// Replacement set of marked names. Must be a subset of the record's
    /// candidate names after reassignments are applied.
    pub marked_names: Vec<String>,
    /// Canonical name to assign. Empty or missing clears it.
    pub new_name: Option<String>,
    /// Name → EIN reassignments to apply before marking.
    pub name_ein_mappings: HashMap<String, u64>,
}

/// Summary of an applied save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Names moved to another record because the target EIN exists.
    pub transferred: usize,
    /// Names mapped to an EIN absent from the table.
    pub newly_mapped: usize,
    pub total_names: usize,
    pub marked_count: usize,
    pub mappings_count: usize,
    pub canonical: Option<String>,
    pub completion_status: CompletionStatus,
}

/// One page of records in stable table order.
#[derive(Debug, Clone)]
pub struct Page {
    pub records: Vec<Record>,
    pub total_count: usize,
}

/// Aggregate statistics over the in-memory table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_eins: usize,
    pub edited_eins: usize,
    pub total_names: usize,
    pub total_mappings: usize,
    pub done_count: usize,
    pub partially_done_count: usize,
    pub not_started_count: usize,
    pub has_saved_data: bool,
    pub last_saved: Option<DateTime<Utc>>,
}

/// The authoritative EIN table.
#[derive(Debug)]
pub struct WorkingStore {
    paths: StorePaths,
    rows: Vec<Record>,
    index: HashMap<u64, usize>,
    edited: HashSet<u64>,
    last_saved: Option<DateTime<Utc>>,
}

impl WorkingStore {
    /// Load the working CSV if present, otherwise migrate from the source
    /// CSV and immediately write the working file plus metadata.
    pub fn open(paths: StorePaths) -> StoreResult<Self> {
        let mut store = Self {
            paths,
            rows: Vec::new(),
            index: HashMap::new(),
            edited: HashSet::new(),
            last_saved: None,
        };

        if store.paths.working_file.exists() {
            store.load_working()?;
            info!(
                "loaded {} records from {}",
                store.rows.len(),
                store.paths.working_file.display()
            );
        } else {
            store.migrate_from_source()?;
            info!(
                "migrated {} records from {} to {}",
                store.rows.len(),
                store.paths.source_file.display(),
                store.paths.working_file.display()
            );
        }

        Ok(store)
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One record by EIN.
    pub fn get(&self, ein: u64) -> StoreResult<&Record> {
        self.index
            .get(&ein)
            .map(|&i| &self.rows[i])
            .ok_or(StoreError::EinNotFound { ein })
    }

    /// 1-based page of records in stable insertion order. Out-of-range
    /// pages return an empty slice with the total count intact.
    pub fn get_page(&self, page: usize, page_size: usize) -> Page {
        let total_count = self.rows.len();
        let page = page.max(1);
        let start = (page - 1).saturating_mul(page_size).min(total_count);
        let end = start.saturating_add(page_size).min(total_count);

        Page {
            records: self.rows[start..end].to_vec(),
            total_count,
        }
    }

    /// Apply one edit request and flush the table to disk.
    ///
    /// Reassignments whose target EIN exists move the name into that
    /// record's candidate list; the rest are stored in the record's
    /// mapping. Marked names are validated against the post-reassignment
    /// candidate list. On any failure nothing is changed.
    pub fn save(&mut self, ein: u64, request: SaveRequest) -> StoreResult<SaveOutcome> {
        let idx = *self
            .index
            .get(&ein)
            .ok_or(StoreError::EinNotFound { ein })?;

        // Snapshots of every record this save touches, for rollback.
        let mut touched: Vec<(usize, Record)> = vec![(idx, self.rows[idx].clone())];

        // Partition reassignment requests by whether the target exists.
        let mut transfers: Vec<(String, usize)> = Vec::new();
        let mut new_mappings: HashMap<String, u64> = HashMap::new();
        for (name, target) in request.name_ein_mappings {
            match self.index.get(&target) {
                Some(&tidx) => transfers.push((name, tidx)),
                None => {
                    new_mappings.insert(name, target);
                }
            }
        }

        // Move names whose target record is in the table.
        let mut transferred = 0;
        for (name, tidx) in transfers {
            let Some(pos) = self.rows[idx].names.iter().position(|n| n == &name) else {
                continue;
            };
            if !touched.iter().any(|(i, _)| *i == tidx) {
                touched.push((tidx, self.rows[tidx].clone()));
            }

            self.rows[idx].names.remove(pos);
            self.rows[idx].marked.retain(|n| n != &name);

            if !self.rows[tidx].names.iter().any(|n| n == &name) {
                self.rows[tidx].names.push(name);
                transferred += 1;
            }
        }

        // Marked names must be a subset of what remains.
        {
            let candidates: HashSet<&str> =
                self.rows[idx].names.iter().map(String::as_str).collect();
            if let Some(unknown) = request
                .marked_names
                .iter()
                .find(|name| !candidates.contains(name.as_str()))
            {
                let name = unknown.clone();
                self.rollback(touched);
                return Err(StoreError::UnknownName { ein, name });
            }
        }
        self.rows[idx].marked = request.marked_names;

        // Canonical name: trimmed and upper-cased; empty clears the edit.
        let canonical = request
            .new_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_uppercase);
        self.rows[idx].canonical = canonical;
        if self.rows[idx].is_edited() {
            self.edited.insert(ein);
        } else {
            self.edited.remove(&ein);
        }

        let newly_mapped = new_mappings.len();
        self.rows[idx].mappings.extend(new_mappings);

        match self.persist() {
            Ok(saved_at) => self.last_saved = Some(saved_at),
            Err(e) => {
                self.rollback(touched);
                return Err(e);
            }
        }

        let record = &self.rows[idx];
        Ok(SaveOutcome {
            transferred,
            newly_mapped,
            total_names: record.names.len(),
            marked_count: record.marked.len(),
            mappings_count: record.mappings.len(),
            canonical: record.canonical.clone(),
            completion_status: record.completion_status(),
        })
    }

    /// Aggregate statistics over the table.
    pub fn stats(&self) -> StoreStats {
        let mut total_names = 0;
        let mut total_mappings = 0;
        let mut done_count = 0;
        let mut partially_done_count = 0;
        let mut not_started_count = 0;

        for record in &self.rows {
            total_names += record.names.len();
            total_mappings += record.mappings.len();
            match record.completion_status() {
                CompletionStatus::Done => done_count += 1,
                CompletionStatus::PartiallyDone => partially_done_count += 1,
                CompletionStatus::NotStarted => not_started_count += 1,
                CompletionStatus::Empty => {}
            }
        }

        StoreStats {
            total_eins: self.rows.len(),
            edited_eins: self.edited.len(),
            total_names,
            total_mappings,
            done_count,
            partially_done_count,
            not_started_count,
            has_saved_data: self.paths.working_file.exists(),
            last_saved: self.last_saved,
        }
    }

    fn load_working(&mut self) -> StoreResult<()> {
        self.read_table(&self.paths.working_file.clone())?;

        let metadata_file = self.paths.metadata_file();
        if metadata_file.exists() {
            match Metadata::read(&metadata_file) {
                Ok(metadata) => self.last_saved = Some(metadata.last_saved),
                Err(e) => warn!("ignoring unreadable metadata sidecar: {e}"),
            }
        }

        Ok(())
    }

    fn migrate_from_source(&mut self) -> StoreResult<()> {
        if !self.paths.source_file.exists() {
            return Err(StoreError::SourceMissing {
                path: self.paths.source_file.clone(),
            });
        }

        self.read_table(&self.paths.source_file.clone())?;
        let saved_at = self.persist()?;
        self.last_saved = Some(saved_at);
        Ok(())
    }

    fn read_table(&mut self, path: &Path) -> StoreResult<()> {
        let mut reader = csv::Reader::from_path(path)?;
        for result in reader.deserialize::<RawRow>() {
            let record = codec::from_row(result?);
            let ein = record.ein;
            if self.index.insert(ein, self.rows.len()).is_some() {
                return Err(StoreError::Malformed {
                    path: path.to_path_buf(),
                    message: format!("duplicate EIN {ein}"),
                });
            }
            if record.is_edited() {
                self.edited.insert(ein);
            }
            self.rows.push(record);
        }
        Ok(())
    }

    /// Write the full table to the working file atomically (temp file in
    /// the same directory, then rename), rewriting the metadata sidecar
    /// just before the rename. The previous working file is never touched
    /// until every other write has succeeded.
    fn persist(&self) -> StoreResult<DateTime<Utc>> {
        let dir = self
            .paths
            .working_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        let tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file());
            for record in &self.rows {
                writer.serialize(codec::to_row(record)?)?;
            }
            writer.flush()?;
        }

        // Sidecar before the rename: if it fails, the previous working
        // file is still on disk and matches the rolled-back table.
        let saved_at = Utc::now();
        let metadata = Metadata {
            total_records: self.rows.len(),
            edited_records: self.edited.len(),
            last_saved: saved_at,
        };
        metadata.write(&self.paths.metadata_file())?;

        tmp.persist(&self.paths.working_file)
            .map_err(|e| StoreError::Io(e.error))?;

        Ok(saved_at)
    }

    fn rollback(&mut self, touched: Vec<(usize, Record)>) {
        for (i, record) in touched {
            if record.is_edited() {
                self.edited.insert(record.ein);
            } else {
                self.edited.remove(&record.ein);
            }
            self.rows[i] = record;
        }
    }
}
