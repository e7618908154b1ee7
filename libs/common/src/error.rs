//! Custom error types for the common library
//!
//! This module defines the error type returned by every document store
//! backend, so services can treat PostgreSQL, Redis and the in-memory store
//! uniformly.

use redis::RedisError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error occurred while connecting to the backing store
    #[error("Store connection error: {0}")]
    Connection(String),

    /// Error occurred during a database query
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during a Redis command
    #[error("Redis command error: {0}")]
    Redis(#[source] RedisError),

    /// A stored or submitted document could not be (de)serialized
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Store configuration error: {0}")]
    Configuration(String),
}

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Redis(err)
        }
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
