//! Working-store service implementation
//!
//! Wraps the synchronous store behind a tokio `RwLock`: reads share the
//! lock so pagination stays stable under concurrent requests, and save is
//! the single writer.

use std::sync::Arc;

use async_trait::async_trait;
use store::{SaveOutcome, SaveRequest, StoreResult, StoreStats, WorkingStore};
use tokio::sync::RwLock;

use crate::traits::EditorStore;
use crate::types::{EinDetail, EinListItem};

/// Real store service backed by the `store` crate.
#[derive(Clone)]
pub struct RealEditorStore {
    inner: Arc<RwLock<WorkingStore>>,
}

impl RealEditorStore {
    pub fn new(store: WorkingStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }
}

#[async_trait]
impl EditorStore for RealEditorStore {
    async fn list_page(&self, page: usize, page_size: usize) -> (Vec<EinListItem>, usize) {
        let store = self.inner.read().await;
        let slice = store.get_page(page, page_size);
        let items = slice
            .records
            .iter()
            .map(|record| EinListItem {
                ein: record.ein,
                is_edited: record.is_edited(),
                completion_status: record.completion_status(),
            })
            .collect();
        (items, slice.total_count)
    }

    async fn fetch(&self, ein: u64) -> StoreResult<EinDetail> {
        let store = self.inner.read().await;
        store.get(ein).map(EinDetail::from)
    }

    async fn save(&self, ein: u64, request: SaveRequest) -> StoreResult<SaveOutcome> {
        let mut store = self.inner.write().await;
        store.save(ein, request)
    }

    async fn stats(&self) -> StoreStats {
        self.inner.read().await.stats()
    }

    async fn record_count(&self) -> usize {
        self.inner.read().await.len()
    }
}
