//! Seeder service configuration

use anyhow::Result;
use std::collections::HashSet;
use std::str::FromStr;

use crate::fixtures::{DEFAULT_SEED_ACCOUNT_UID, DemoKeys};

/// Backend holding the seeded documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("Unknown DOCUMENT_STORE backend: {}", other),
        }
    }
}

/// Seeder configuration
#[derive(Debug, Clone)]
pub struct SeederConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Document store backend
    pub store_backend: StoreBackend,
    /// Key namespace for the Redis backend
    pub redis_key_prefix: String,
    /// Known account uids when accounts are not backed by PostgreSQL
    pub allowed_accounts: HashSet<String>,
    /// Keys the demo records are written under
    pub demo_keys: DemoKeys,
}

impl SeederConfig {
    /// Create a new SeederConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SEEDER_BIND_ADDR`: listen address (default: "0.0.0.0:3002")
    /// - `DOCUMENT_STORE`: `postgres`, `redis` or `memory` (default: `postgres`)
    /// - `REDIS_KEY_PREFIX`: Redis key namespace (default: "docs")
    /// - `SEED_ALLOWED_ACCOUNTS`: comma-separated account uids, used without PostgreSQL
    /// - `SEED_ACCOUNT_UID`: account the single-user seed writes
    /// - `DEMO_KEY_PREFIX`: namespace prepended to every demo key (default: none)
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("SEEDER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3002".to_string());

        let store_backend = match std::env::var("DOCUMENT_STORE") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::Postgres,
        };

        let redis_key_prefix =
            std::env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "docs".to_string());

        let allowed_accounts = std::env::var("SEED_ALLOWED_ACCOUNTS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|uid| !uid.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut demo_keys = match std::env::var("DEMO_KEY_PREFIX") {
            Ok(prefix) => DemoKeys::namespaced(prefix),
            Err(_) => DemoKeys::default(),
        };
        demo_keys.seed_account_uid = std::env::var("SEED_ACCOUNT_UID")
            .unwrap_or_else(|_| DEFAULT_SEED_ACCOUNT_UID.to_string());

        Ok(SeederConfig {
            bind_addr,
            store_backend,
            redis_key_prefix,
            allowed_accounts,
            demo_keys,
        })
    }
}
