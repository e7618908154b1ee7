//! Static demo data tables and the keys they are seeded under

use crate::models::{Gender, RoomStatus};

/// Default uid of the account the single-user seed writes
pub const DEFAULT_SEED_ACCOUNT_UID: &str = "URcOKBW9c8SXPE6W7pnZeZxAh5o2";

/// Demo user definition
#[derive(Debug)]
pub struct UserFixture {
    pub id: &'static str,
    pub email: &'static str,
    pub username: &'static str,
    pub gender: Gender,
    pub city: &'static str,
    pub bio: &'static str,
}

/// Demo question definition
#[derive(Debug)]
pub struct QuestionFixture {
    pub id: &'static str,
    pub question_text: &'static str,
    pub options: &'static [&'static str],
    pub category: &'static str,
}

/// Room definition; offsets are minutes relative to the run baseline
#[derive(Debug)]
pub struct RoomTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub status: RoomStatus,
    pub scheduled_start_offset_minutes: i64,
    pub actual_start_offset_minutes: Option<i64>,
}

/// Profile written by the single-user seed
#[derive(Debug)]
pub struct SeedProfile {
    pub email: &'static str,
    pub username: &'static str,
    pub city: &'static str,
    pub gender: Gender,
}

pub const DEMO_CITY: &str = "New York, New York, United States";
pub const DEMO_MAX_PARTICIPANTS: u32 = 10;
pub const DEMO_ROOM_QUESTION_COUNT: usize = 5;
pub const QUESTION_DIFFICULTY: &str = "medium";
pub const QUESTION_TIME_LIMIT_SECONDS: u32 = 30;
pub const PAYMENT_REFERENCE: &str = "demo";

/// Participant timeline, minutes before the run baseline
pub const REQUESTED_MINUTES_AGO: i64 = 30;
pub const APPROVED_MINUTES_AGO: i64 = 25;
pub const PAID_MINUTES_AGO: i64 = 20;

pub static DEMO_USERS: &[UserFixture] = &[
    UserFixture {
        id: "u_brooklyn_amy",
        email: "amy.brooklyn@example.com",
        username: "Amy",
        gender: Gender::Female,
        city: "Brooklyn, New York, United States",
        bio: "Coffee lover ☕ | Board games and trivia night",
    },
    UserFixture {
        id: "u_brooklyn_mike",
        email: "mike.brooklyn@example.com",
        username: "Mike",
        gender: Gender::Male,
        city: "Brooklyn, New York, United States",
        bio: "Runner 🏃 | Tech enthusiast",
    },
    UserFixture {
        id: "u_queens_sara",
        email: "sara.queens@example.com",
        username: "Sara",
        gender: Gender::Female,
        city: "Queens, New York, United States",
        bio: "Artist 🎨 | Music festivals",
    },
    UserFixture {
        id: "u_queens_jay",
        email: "jay.queens@example.com",
        username: "Jay",
        gender: Gender::Male,
        city: "Queens, New York, United States",
        bio: "Foodie 🍣 | Knicks fan",
    },
    UserFixture {
        id: "u_nyc_lena",
        email: "lena.nyc@example.com",
        username: "Lena",
        gender: Gender::Female,
        city: "New York, New York, United States",
        bio: "Product designer ✨ | Yoga + travel",
    },
    UserFixture {
        id: "u_nyc_omar",
        email: "omar.nyc@example.com",
        username: "Omar",
        gender: Gender::Male,
        city: "New York, New York, United States",
        bio: "Standup comedy fan 🎤 | Street photography",
    },
];

pub static DEMO_QUESTIONS: &[QuestionFixture] = &[
    QuestionFixture {
        id: "q1",
        question_text: "Which weekend plan sounds most fun?",
        options: &["Museum day", "Hiking", "Cooking class", "Beach hang"],
        category: "vibes",
    },
    QuestionFixture {
        id: "q2",
        question_text: "Pick a New York snack:",
        options: &["Bagel + schmear", "Dollar slice", "Halal cart", "Ramen"],
        category: "food",
    },
    QuestionFixture {
        id: "q3",
        question_text: "Ideal first hangout?",
        options: &["Coffee", "Drinks", "Walk in the park", "Live show"],
        category: "date",
    },
    QuestionFixture {
        id: "q4",
        question_text: "You get one ticket to:",
        options: &["Comedy", "Concert", "Broadway", "Sports"],
        category: "events",
    },
    QuestionFixture {
        id: "q5",
        question_text: "Night owl or early bird?",
        options: &["Night owl", "Early bird", "Depends on the day", "Perpetual napper"],
        category: "lifestyle",
    },
    QuestionFixture {
        id: "q6",
        question_text: "Pick a borough energy:",
        options: &["Manhattan", "Brooklyn", "Queens", "Bronx/Staten"],
        category: "nyc",
    },
    QuestionFixture {
        id: "q7",
        question_text: "How do you recharge?",
        options: &["Solo time", "Close friends", "Outdoors", "Creative work"],
        category: "vibes",
    },
    QuestionFixture {
        id: "q8",
        question_text: "Your texting style:",
        options: &["Short + quick", "Paragraphs", "Voice notes", "Memes/gifs"],
        category: "communication",
    },
];

pub static WAITING_ROOM: RoomTemplate = RoomTemplate {
    title: "NYC EchoMatch Mixer",
    description: "A quick-fire mini game to find great vibes near you.",
    status: RoomStatus::Waiting,
    scheduled_start_offset_minutes: 60,
    actual_start_offset_minutes: None,
};

pub static LIVE_ROOM: RoomTemplate = RoomTemplate {
    title: "NYC Live Game",
    description: "Jump in to test the full flow now.",
    status: RoomStatus::InProgress,
    scheduled_start_offset_minutes: -15,
    actual_start_offset_minutes: Some(-10),
};

pub static SEED_PROFILE: SeedProfile = SeedProfile {
    email: "seed@demo.local",
    username: "citygirl",
    city: "New York",
    gender: Gender::Female,
};

/// Keys the demo records are written under.
///
/// `prefix` is prepended to every seeded id, so tests can isolate their
/// records from the real demo keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoKeys {
    pub prefix: String,
    pub waiting_room_id: String,
    pub live_room_id: String,
    pub live_session_id: String,
    pub host_user_id: String,
    pub seed_account_uid: String,
}

impl Default for DemoKeys {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            waiting_room_id: "nyc_mixer_1".to_string(),
            live_room_id: "nyc_mixer_live".to_string(),
            live_session_id: "gs_nyc_live".to_string(),
            host_user_id: "u_nyc_lena".to_string(),
            seed_account_uid: DEFAULT_SEED_ACCOUNT_UID.to_string(),
        }
    }
}

impl DemoKeys {
    /// Default keys under a namespace prefix
    pub fn namespaced(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Apply the namespace to a base id
    pub fn scoped(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fixture_ids_are_unique() {
        let users: HashSet<_> = DEMO_USERS.iter().map(|u| u.id).collect();
        let questions: HashSet<_> = DEMO_QUESTIONS.iter().map(|q| q.id).collect();

        assert_eq!(users.len(), DEMO_USERS.len());
        assert_eq!(questions.len(), DEMO_QUESTIONS.len());
        assert!(users.contains(DemoKeys::default().host_user_id.as_str()));
        assert!(DEMO_QUESTIONS.len() >= DEMO_ROOM_QUESTION_COUNT);
    }

    #[test]
    fn test_namespaced_keys() {
        let keys = DemoKeys::namespaced("test_");
        assert_eq!(keys.scoped("q1"), "test_q1");
        assert_eq!(keys.waiting_room_id, "nyc_mixer_1");
        assert_eq!(DemoKeys::default().scoped("q1"), "q1");
    }
}
