//! Service trait definitions for dependency injection
//!
//! Store access is abstracted through this trait for testability.

use async_trait::async_trait;
use store::{SaveOutcome, SaveRequest, StoreResult, StoreStats};

use crate::types::{EinDetail, EinListItem};

/// Read/edit access to the working-store.
#[mockall::automock]
#[async_trait]
pub trait EditorStore: Send + Sync {
    /// One page of EIN summaries in stable table order, plus total count.
    async fn list_page(&self, page: usize, page_size: usize) -> (Vec<EinListItem>, usize);

    /// Full detail for one EIN.
    async fn fetch(&self, ein: u64) -> StoreResult<EinDetail>;

    /// Apply an edit and flush the table to disk.
    async fn save(&self, ein: u64, request: SaveRequest) -> StoreResult<SaveOutcome>;

    /// Aggregate statistics over the table.
    async fn stats(&self) -> StoreStats;

    /// Number of records currently loaded.
    async fn record_count(&self) -> usize;
}
