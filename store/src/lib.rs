//! Working-store for the EIN names editor
//!
//! Owns the authoritative table of EIN → name-variant records: loading
//! from the source or working CSV, the edit/merge semantics, and flushing
//! every mutation back to disk together with a JSON metadata sidecar.

pub mod codec;
pub mod error;
pub mod metadata;
pub mod record;
pub mod working;

// Re-export main types
pub use error::{StoreError, StoreResult};
pub use metadata::Metadata;
pub use record::{CompletionStatus, Record};
pub use working::{Page, SaveOutcome, SaveRequest, StorePaths, StoreStats, WorkingStore};
