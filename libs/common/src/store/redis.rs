//! Redis document store
//!
//! Each document is a JSON string stored under `{prefix}:{collection}:{id}`.
//! Merge writes read the current value, merge in process and write back, so
//! concurrent merges on the same key resolve as last write wins.

use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentStore, SetOptions, ensure_object, merge_documents};
use crate::cache::RedisPool;
use crate::error::StoreResult;

/// Redis-backed document store
#[derive(Clone)]
pub struct RedisDocumentStore {
    pool: RedisPool,
    prefix: String,
}

impl RedisDocumentStore {
    /// Create a new store using `prefix` as the key namespace
    pub fn new(pool: RedisPool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    /// Key under which a document is stored
    pub fn key(&self, collection: &str, id: &str) -> String {
        format!("{}:{}:{}", self.prefix, collection, id)
    }
}

#[async_trait]
impl DocumentStore for RedisDocumentStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        match self.pool.get(&self.key(collection, id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        document: &Value,
        options: SetOptions,
    ) -> StoreResult<()> {
        ensure_object(document)?;
        let key = self.key(collection, id);

        let merged = if options.merge {
            match self.pool.get(&key).await? {
                Some(raw) => {
                    let mut existing: Value = serde_json::from_str(&raw)?;
                    merge_documents(&mut existing, document)?;
                    Some(existing)
                }
                None => None,
            }
        } else {
            None
        };

        let payload = serde_json::to_string(merged.as_ref().unwrap_or(document))?;
        self.pool.set(&key, &payload).await
    }

    async fn health_check(&self) -> StoreResult<bool> {
        self.pool.health_check().await
    }
}
