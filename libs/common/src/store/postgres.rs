//! PostgreSQL document store
//!
//! Documents live in the `documents` table as JSONB, keyed by
//! `(collection, id)`. Merge writes rely on the JSONB `||` operator, which
//! merges top-level keys.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row, types::Json};

use super::{DocumentStore, SetOptions, ensure_object};
use crate::database;
use crate::error::{StoreError, StoreResult};

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store on top of an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query(
            r#"
            SELECT data
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        match row {
            Some(row) => {
                let Json(data): Json<Value> = row.try_get("data").map_err(StoreError::Query)?;
                Ok(Some(data))
            }
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

        let sql = if options.merge {
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = documents.data || EXCLUDED.data
            "#
        } else {
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data
            "#
        };

        sqlx::query(sql)
            .bind(collection)
            .bind(id)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        database::health_check(&self.pool).await
    }
}
