//! User profile document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gender as stored on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

/// User profile stored under `users/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub city: String,
    pub bio: Option<String>,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub total_games_played: u32,
    pub total_matches: u32,
}
