//! Identity provider: bearer token verification and account lookup
//!
//! Tokens are JWTs signed either with RS256 (public key in PEM form) or
//! HS256 (shared secret). Accounts are looked up in the PostgreSQL
//! `accounts` table, or in a fixed allow-list when no database backs the
//! service.

use anyhow::Result;
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;

/// Verified caller identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub uid: String,
}

/// Identity provider failures
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The token failed verification
    #[error("Token rejected: {0}")]
    InvalidToken(String),

    /// The provider could not answer
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Token verifier and account directory consumed by the endpoints
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token and return the actor it was issued to
    async fn verify_token(&self, token: &str) -> Result<Actor, IdentityError>;

    /// Whether an account with this uid exists
    async fn account_exists(&self, uid: &str) -> Result<bool, IdentityError>;
}

/// Key material used to verify tokens
#[derive(Debug, Clone)]
pub enum JwtKey {
    /// RS256 public key (PEM)
    RsaPublicPem(String),
    /// HS256 shared secret
    Secret(String),
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub key: JwtKey,
    /// Required `iss` claim, if any
    pub issuer: Option<String>,
    /// Required `aud` claim, if any
    pub audience: Option<String>,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PUBLIC_KEY`: RS256 public key (PEM format) or path to the key file
    /// - `JWT_SECRET`: HS256 secret, used when `JWT_PUBLIC_KEY` is not set
    /// - `JWT_ISSUER`: expected issuer (optional)
    /// - `JWT_AUDIENCE`: expected audience (optional)
    pub fn from_env() -> Result<Self> {
        let key = match std::env::var("JWT_PUBLIC_KEY") {
            Ok(public_key) => {
                // If the public key looks like a file path, read from file
                let public_key = if public_key.starts_with("-----BEGIN") {
                    public_key
                } else {
                    std::fs::read_to_string(&public_key)
                        .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?
                        .trim()
                        .to_string()
                };
                JwtKey::RsaPublicPem(public_key)
            }
            Err(_) => {
                let secret = std::env::var("JWT_SECRET").map_err(|_| {
                    anyhow::anyhow!("Neither JWT_PUBLIC_KEY nor JWT_SECRET is set")
                })?;
                JwtKey::Secret(secret)
            }
        };

        Ok(JwtConfig {
            key,
            issuer: std::env::var("JWT_ISSUER").ok(),
            audience: std::env::var("JWT_AUDIENCE").ok(),
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account uid
    pub sub: String,
    /// Expiration time
    pub exp: u64,
    /// Issued at time
    #[serde(default)]
    pub iat: Option<u64>,
}

/// Validates bearer tokens
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Result<Self> {
        let (decoding_key, algorithm) = match &config.key {
            JwtKey::RsaPublicPem(pem) => {
                (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256)
            }
            JwtKey::Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;

        // Configured `iss`/`aud` are only checked when present, so require them
        let mut required = vec!["exp", "sub"];
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        validation.set_required_spec_claims(required.as_slice());

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, IdentityError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        if token_data.claims.sub.is_empty() {
            return Err(IdentityError::InvalidToken("empty subject".to_string()));
        }

        Ok(token_data.claims)
    }
}

/// Where account existence is checked
#[derive(Clone)]
pub enum AccountDirectory {
    /// Rows of the `accounts` table
    Postgres(PgPool),
    /// Fixed set of uids
    Static(HashSet<String>),
}

impl AccountDirectory {
    pub async fn exists(&self, uid: &str) -> Result<bool, IdentityError> {
        match self {
            AccountDirectory::Postgres(pool) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM accounts WHERE uid = $1)",
                )
                .bind(uid)
                .fetch_one(pool)
                .await
                .map_err(|e| IdentityError::Unavailable(e.to_string()))
            }
            AccountDirectory::Static(uids) => Ok(uids.contains(uid)),
        }
    }
}

/// JWT-verifying identity provider
#[derive(Clone)]
pub struct JwtIdentityProvider {
    verifier: JwtVerifier,
    accounts: AccountDirectory,
}

impl JwtIdentityProvider {
    pub fn new(config: &JwtConfig, accounts: AccountDirectory) -> Result<Self> {
        let verifier = JwtVerifier::new(config)?;
        info!("Identity provider initialized");
        Ok(Self { verifier, accounts })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Actor, IdentityError> {
        let claims = self.verifier.validate_token(token)?;
        Ok(Actor { uid: claims.sub })
    }

    async fn account_exists(&self, uid: &str) -> Result<bool, IdentityError> {
        self.accounts.exists(uid).await
    }
}
