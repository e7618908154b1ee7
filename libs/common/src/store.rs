//! Document store abstraction
//!
//! Documents are JSON objects addressed by a collection name and a string id
//! unique within that collection. Every backend offers the same per-key
//! get/set contract, with an optional merge on write.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use self::memory::{MemoryDocumentStore, StoreStats};
pub use self::postgres::PgDocumentStore;
pub use self::redis::RedisDocumentStore;

/// Options applied to a single write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Merge top-level fields into the existing document instead of
    /// replacing it
    pub merge: bool,
}

impl SetOptions {
    /// Replace the whole document
    pub fn replace() -> Self {
        Self { merge: false }
    }

    /// Merge into the existing document
    pub fn merge() -> Self {
        Self { merge: true }
    }
}

/// Per-key document storage organized into named collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in logs and health responses
    fn backend(&self) -> &'static str;

    /// Read the document at `collection/id`
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Write the document at `collection/id`
    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: &Value,
        options: SetOptions,
    ) -> StoreResult<()>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> StoreResult<bool>;
}

/// Merge the top-level fields of `incoming` into `existing`.
///
/// A non-object `existing` is replaced outright.
pub fn merge_documents(existing: &mut Value, incoming: &Value) -> StoreResult<()> {
    let incoming = incoming.as_object().ok_or_else(|| {
        StoreError::Configuration("documents must be JSON objects".to_string())
    })?;

    match existing.as_object_mut() {
        Some(fields) => {
            for (key, value) in incoming {
                fields.insert(key.clone(), value.clone());
            }
        }
        None => *existing = Value::Object(incoming.clone()),
    }

    Ok(())
}

pub(crate) fn ensure_object(document: &Value) -> StoreResult<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(StoreError::Configuration(
            "documents must be JSON objects".to_string(),
        ))
    }
}
