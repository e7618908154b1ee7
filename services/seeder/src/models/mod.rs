//! Document models written by the seeder

use serde::{Deserialize, Serialize};

pub mod game_session;
pub mod participant;
pub mod question;
pub mod room;
pub mod user;

// Re-export for convenience
pub use game_session::{GameSession, GameState};
pub use participant::{ParticipantStatus, RoomParticipant};
pub use question::Question;
pub use room::{Room, RoomStatus};
pub use user::{Gender, User};

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Users,
    Questions,
    Rooms,
    GameSessions,
    RoomParticipants,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Questions,
        Collection::Rooms,
        Collection::GameSessions,
        Collection::RoomParticipants,
    ];

    /// Collection name in the document store
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Questions => "questions",
            Collection::Rooms => "rooms",
            Collection::GameSessions => "gameSessions",
            Collection::RoomParticipants => "roomParticipants",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
