//! In-process document store
//!
//! Keeps documents in a shared map. Used for local demos and as the test
//! double for the PostgreSQL and Redis backends.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{DocumentStore, SetOptions, ensure_object, merge_documents};
use crate::error::StoreResult;

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// Read/write counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub reads: usize,
    pub writes: usize,
}

/// Memory-backed document store
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents of a collection, ordered by id
    pub async fn documents(&self, collection: &str) -> Vec<(String, Value)> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|docs| docs.iter().map(|(id, doc)| (id.clone(), doc.clone())).collect())
            .unwrap_or_default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// Total number of documents across all collections
    pub async fn total(&self) -> usize {
        let collections = self.collections.read().await;
        collections.values().map(BTreeMap::len).sum()
    }

    /// Snapshot of every collection
    pub async fn snapshot(&self) -> BTreeMap<String, BTreeMap<String, Value>> {
        self.collections.read().await.clone()
    }

    /// Reads and writes served so far
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: &Value,
        options: SetOptions,
    ) -> StoreResult<()> {
        ensure_object(document)?;
        self.writes.fetch_add(1, Ordering::Relaxed);

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if options.merge {
            if let Some(existing) = docs.get_mut(id) {
                return merge_documents(existing, document);
            }
        }

        docs.insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
