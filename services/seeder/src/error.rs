//! Custom error types for the seeder service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::seed::PlanError;

/// Request-terminating failures of the seeding endpoints
#[derive(Error, Debug)]
pub enum SeedError {
    /// No usable bearer credential on the request
    #[error("Missing bearer token")]
    Unauthenticated,

    /// The identity provider rejected the credential
    #[error("Invalid token")]
    InvalidCredential,

    /// The identity account to seed does not exist
    #[error("Auth user not found for UID {0}")]
    AccountNotFound(String),

    /// Wrong HTTP method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The identity provider could not be reached
    #[error("Identity provider unavailable: {0}")]
    IdentityUnavailable(String),

    /// Document store I/O failure
    #[error("{0}")]
    StoreUnavailable(#[from] StoreError),

    /// The seed graph would leave dangling references
    #[error("Invalid seed plan: {0}")]
    InvalidPlan(#[from] PlanError),
}

impl SeedError {
    pub fn status(&self) -> StatusCode {
        match self {
            SeedError::Unauthenticated | SeedError::InvalidCredential => StatusCode::UNAUTHORIZED,
            SeedError::AccountNotFound(_) => StatusCode::BAD_REQUEST,
            SeedError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SeedError::IdentityUnavailable(_)
            | SeedError::StoreUnavailable(_)
            | SeedError::InvalidPlan(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SeedError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Error body of the single-user endpoint, which reports `ok: false`
#[derive(Debug)]
pub struct UserSeedError(pub SeedError);

impl From<SeedError> for UserSeedError {
    fn from(err: SeedError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for UserSeedError {
    fn from(err: StoreError) -> Self {
        Self(SeedError::StoreUnavailable(err))
    }
}

impl IntoResponse for UserSeedError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "ok": false,
            "error": self.0.to_string(),
        }));

        (self.0.status(), body).into_response()
    }
}

/// Type alias for seeding results
pub type SeedResult<T> = Result<T, SeedError>;
