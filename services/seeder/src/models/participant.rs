//! Room participant document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Participation status within a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipantStatus {
    Requested,
    Approved,
    Paid,
    Rejected,
    Cancelled,
}

/// Participant stored under `roomParticipants/{roomId}:{userId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomParticipant {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub status: ParticipantStatus,
    pub requested_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_reference: String,
    pub score: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomParticipant {
    /// Composite document id for a room/user pair
    pub fn document_id(room_id: &str, user_id: &str) -> String {
        format!("{}:{}", room_id, user_id)
    }
}
