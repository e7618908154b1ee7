//! Live game session document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of a running game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    Waiting,
    Question,
    Reveal,
    Finished,
}

/// Session stored under `gameSessions/{id}`, one per in-progress room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: String,
    pub room_id: String,
    pub current_question_index: u32,
    pub question_ids: Vec<String>,
    pub game_state: GameState,
    pub question_start_time: DateTime<Utc>,
    pub question_end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_test: bool,
}
