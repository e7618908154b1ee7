//! Application state shared across handlers

use chrono::{DateTime, Utc};
use common::store::DocumentStore;
use std::sync::Arc;

use crate::{fixtures::DemoKeys, identity::IdentityProvider};

/// Source of the per-run timestamp baseline
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    #[cfg(test)]
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            #[cfg(test)]
            Clock::Fixed(at) => *at,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub demo_keys: Arc<DemoKeys>,
    pub clock: Clock,
}
