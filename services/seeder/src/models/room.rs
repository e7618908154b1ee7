//! Game room document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Room lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Completed,
}

/// Room stored under `rooms/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    /// References `users/{hostId}`
    pub host_id: String,
    pub city: String,
    pub title: String,
    pub description: String,
    pub max_participants: u32,
    pub status: RoomStatus,
    pub entry_fee: f64,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_participants: u32,
    /// Ordered references to `questions/{id}`
    pub question_ids: Vec<String>,
    pub venue_address: Option<String>,
    pub requires_gender_parity: bool,
}
