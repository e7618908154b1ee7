//! Trivia question document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Question stored under `questions/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub category: String,
    pub difficulty: String,
    pub time_limit_seconds: u32,
    pub created_at: DateTime<Utc>,
}
