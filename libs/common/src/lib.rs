//! Common library for the demo seeder services
//!
//! This crate provides shared storage plumbing used across services:
//! PostgreSQL and Redis connectivity, the store error type, and the
//! collection-oriented document store with its backends.

pub mod cache;
pub mod database;
pub mod error;
pub mod store;

/// Example usage of the document store
///
/// ```rust,no_run
/// use common::database::{DatabaseConfig, ensure_document_schema, init_pool};
/// use common::store::{DocumentStore, PgDocumentStore, SetOptions};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::from_env()?;
///     let pool = init_pool(&config).await?;
///     ensure_document_schema(&pool).await?;
///
///     let store = PgDocumentStore::new(pool);
///     store
///         .set("users", "u1", &json!({"id": "u1"}), SetOptions::merge())
///         .await?;
///     println!("{:?}", store.get("users", "u1").await?);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
