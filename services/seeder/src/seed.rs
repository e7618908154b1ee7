//! Seed graph builder
//!
//! Turns the static fixture tables into the ordered list of records one
//! seeding run writes. The builder is pure: every timestamp is derived from
//! the single `now` passed in.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::{
    fixtures::{
        self, DEMO_QUESTIONS, DEMO_USERS, DemoKeys, LIVE_ROOM, RoomTemplate, SEED_PROFILE,
        WAITING_ROOM,
    },
    models::{
        Collection, GameSession, GameState, ParticipantStatus, Question, Room, RoomParticipant,
        RoomStatus, User,
    },
};

/// Write stages in dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeedStage {
    Users,
    Questions,
    Rooms,
    GameSessions,
    RoomParticipants,
}

/// A named, self-consistent set of demo records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// One waiting room with paid participants and no session
    WaitingRoom,
    /// One in-progress room with its session on the first question
    LiveGame,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::WaitingRoom, Scenario::LiveGame];
}

/// One record to write
#[derive(Debug, Clone, PartialEq)]
pub enum SeedRecord {
    User(User),
    Question(Question),
    Room(Room),
    GameSession(GameSession),
    Participant(RoomParticipant),
}

impl SeedRecord {
    pub fn stage(&self) -> SeedStage {
        match self {
            SeedRecord::User(_) => SeedStage::Users,
            SeedRecord::Question(_) => SeedStage::Questions,
            SeedRecord::Room(_) => SeedStage::Rooms,
            SeedRecord::GameSession(_) => SeedStage::GameSessions,
            SeedRecord::Participant(_) => SeedStage::RoomParticipants,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            SeedRecord::User(_) => Collection::Users,
            SeedRecord::Question(_) => Collection::Questions,
            SeedRecord::Room(_) => Collection::Rooms,
            SeedRecord::GameSession(_) => Collection::GameSessions,
            SeedRecord::Participant(_) => Collection::RoomParticipants,
        }
    }

    /// Primary key within the collection
    pub fn id(&self) -> &str {
        match self {
            SeedRecord::User(user) => &user.id,
            SeedRecord::Question(question) => &question.id,
            SeedRecord::Room(room) => &room.id,
            SeedRecord::GameSession(session) => &session.id,
            SeedRecord::Participant(participant) => &participant.id,
        }
    }

    /// JSON document written to the store
    pub fn to_document(&self) -> serde_json::Result<Value> {
        match self {
            SeedRecord::User(user) => serde_json::to_value(user),
            SeedRecord::Question(question) => serde_json::to_value(question),
            SeedRecord::Room(room) => serde_json::to_value(room),
            SeedRecord::GameSession(session) => serde_json::to_value(session),
            SeedRecord::Participant(participant) => serde_json::to_value(participant),
        }
    }
}

/// Reasons a plan would leave the store inconsistent
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("{stage:?} record {id} is out of dependency order")]
    OutOfOrder { stage: SeedStage, id: String },

    #[error("duplicate {collection} key {id}")]
    DuplicateKey { collection: Collection, id: String },

    #[error("room {room_id} references missing question {question_id}")]
    MissingQuestion { room_id: String, question_id: String },

    #[error("{record_id} references missing user {user_id}")]
    MissingUser { record_id: String, user_id: String },

    #[error("{record_id} references missing room {room_id}")]
    MissingRoom { record_id: String, room_id: String },

    #[error("session {session_id} belongs to room {room_id} which is not in progress")]
    RoomNotInProgress { session_id: String, room_id: String },

    #[error("room {room_id} has more than one session")]
    DuplicateSession { room_id: String },
}

/// Ordered records for one seeding run
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    records: Vec<SeedRecord>,
}

impl SeedPlan {
    /// Build the plan seeding every scenario in `scenarios`.
    ///
    /// Users and questions are shared by all scenarios and appear once.
    pub fn for_scenarios(scenarios: &[Scenario], keys: &DemoKeys, now: DateTime<Utc>) -> Self {
        let mut records: Vec<SeedRecord> = Vec::new();

        records.extend(DEMO_USERS.iter().map(|fixture| {
            SeedRecord::User(User {
                id: keys.scoped(fixture.id),
                email: fixture.email.to_string(),
                username: fixture.username.to_string(),
                avatar_url: None,
                city: fixture.city.to_string(),
                bio: Some(fixture.bio.to_string()),
                gender: fixture.gender,
                created_at: now,
                updated_at: now,
                is_active: true,
                total_games_played: 0,
                total_matches: 0,
            })
        }));

        records.extend(DEMO_QUESTIONS.iter().map(|fixture| {
            SeedRecord::Question(Question {
                id: keys.scoped(fixture.id),
                question_text: fixture.question_text.to_string(),
                options: fixture.options.iter().map(|o| o.to_string()).collect(),
                category: fixture.category.to_string(),
                difficulty: fixtures::QUESTION_DIFFICULTY.to_string(),
                time_limit_seconds: fixtures::QUESTION_TIME_LIMIT_SECONDS,
                created_at: now,
            })
        }));

        let question_ids: Vec<String> = DEMO_QUESTIONS
            .iter()
            .take(fixtures::DEMO_ROOM_QUESTION_COUNT)
            .map(|q| keys.scoped(q.id))
            .collect();

        let mut seen_scenarios = Vec::new();
        for scenario in scenarios {
            if seen_scenarios.contains(scenario) {
                continue;
            }
            seen_scenarios.push(*scenario);

            match scenario {
                Scenario::WaitingRoom => {
                    let room_id = keys.scoped(&keys.waiting_room_id);
                    records.push(SeedRecord::Room(room(
                        &WAITING_ROOM,
                        room_id,
                        keys,
                        &question_ids,
                        now,
                    )));
                }
                Scenario::LiveGame => {
                    let room_id = keys.scoped(&keys.live_room_id);
                    records.push(SeedRecord::Room(room(
                        &LIVE_ROOM,
                        room_id.clone(),
                        keys,
                        &question_ids,
                        now,
                    )));
                    records.push(SeedRecord::GameSession(GameSession {
                        id: keys.scoped(&keys.live_session_id),
                        room_id,
                        current_question_index: 0,
                        question_ids: question_ids.clone(),
                        game_state: GameState::Question,
                        question_start_time: now,
                        question_end_time: now
                            + Duration::seconds(i64::from(fixtures::QUESTION_TIME_LIMIT_SECONDS)),
                        created_at: now,
                        updated_at: now,
                        is_test: false,
                    }));
                }
            }
        }

        let room_ids: Vec<String> = records
            .iter()
            .filter_map(|record| match record {
                SeedRecord::Room(room) => Some(room.id.clone()),
                _ => None,
            })
            .collect();

        for room_id in &room_ids {
            for user in DEMO_USERS {
                let user_id = keys.scoped(user.id);
                records.push(SeedRecord::Participant(RoomParticipant {
                    id: RoomParticipant::document_id(room_id, &user_id),
                    room_id: room_id.clone(),
                    user_id,
                    status: ParticipantStatus::Paid,
                    requested_at: Some(now - Duration::minutes(fixtures::REQUESTED_MINUTES_AGO)),
                    approved_at: Some(now - Duration::minutes(fixtures::APPROVED_MINUTES_AGO)),
                    paid_at: Some(now - Duration::minutes(fixtures::PAID_MINUTES_AGO)),
                    payment_reference: fixtures::PAYMENT_REFERENCE.to_string(),
                    score: 0,
                    created_at: now,
                    updated_at: now,
                }));
            }
        }

        // Stable: keeps fixture order inside a stage
        records.sort_by_key(SeedRecord::stage);

        Self { records }
    }

    /// Records in write order
    pub fn records(&self) -> &[SeedRecord] {
        &self.records
    }

    /// Check that writing the plan in order never leaves a dangling
    /// reference and respects the session invariants.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut last_stage = SeedStage::Users;
        let mut written: HashSet<(Collection, &str)> = HashSet::new();
        let mut in_progress_rooms: HashSet<&str> = HashSet::new();
        let mut rooms_with_session: HashSet<&str> = HashSet::new();

        for record in &self.records {
            if record.stage() < last_stage {
                return Err(PlanError::OutOfOrder {
                    stage: record.stage(),
                    id: record.id().to_string(),
                });
            }
            last_stage = record.stage();

            match record {
                SeedRecord::User(_) | SeedRecord::Question(_) => {}
                SeedRecord::Room(room) => {
                    if !written.contains(&(Collection::Users, room.host_id.as_str())) {
                        return Err(PlanError::MissingUser {
                            record_id: room.id.clone(),
                            user_id: room.host_id.clone(),
                        });
                    }
                    if let Some(missing) = room
                        .question_ids
                        .iter()
                        .find(|id| !written.contains(&(Collection::Questions, id.as_str())))
                    {
                        return Err(PlanError::MissingQuestion {
                            room_id: room.id.clone(),
                            question_id: missing.clone(),
                        });
                    }
                    if room.status == RoomStatus::InProgress {
                        in_progress_rooms.insert(&room.id);
                    }
                }
                SeedRecord::GameSession(session) => {
                    if !written.contains(&(Collection::Rooms, session.room_id.as_str())) {
                        return Err(PlanError::MissingRoom {
                            record_id: session.id.clone(),
                            room_id: session.room_id.clone(),
                        });
                    }
                    if !in_progress_rooms.contains(session.room_id.as_str()) {
                        return Err(PlanError::RoomNotInProgress {
                            session_id: session.id.clone(),
                            room_id: session.room_id.clone(),
                        });
                    }
                    if !rooms_with_session.insert(&session.room_id) {
                        return Err(PlanError::DuplicateSession {
                            room_id: session.room_id.clone(),
                        });
                    }
                }
                SeedRecord::Participant(participant) => {
                    if !written.contains(&(Collection::Rooms, participant.room_id.as_str())) {
                        return Err(PlanError::MissingRoom {
                            record_id: participant.id.clone(),
                            room_id: participant.room_id.clone(),
                        });
                    }
                    if !written.contains(&(Collection::Users, participant.user_id.as_str())) {
                        return Err(PlanError::MissingUser {
                            record_id: participant.id.clone(),
                            user_id: participant.user_id.clone(),
                        });
                    }
                }
            }

            if !written.insert((record.collection(), record.id())) {
                return Err(PlanError::DuplicateKey {
                    collection: record.collection(),
                    id: record.id().to_string(),
                });
            }
        }

        Ok(())
    }
}

fn room(
    template: &RoomTemplate,
    id: String,
    keys: &DemoKeys,
    question_ids: &[String],
    now: DateTime<Utc>,
) -> Room {
    Room {
        id,
        host_id: keys.scoped(&keys.host_user_id),
        city: fixtures::DEMO_CITY.to_string(),
        title: template.title.to_string(),
        description: template.description.to_string(),
        max_participants: fixtures::DEMO_MAX_PARTICIPANTS,
        status: template.status,
        entry_fee: 0.0,
        scheduled_start: Some(now + Duration::minutes(template.scheduled_start_offset_minutes)),
        actual_start: template
            .actual_start_offset_minutes
            .map(|offset| now + Duration::minutes(offset)),
        actual_end: None,
        scheduled_end: None,
        created_at: now,
        updated_at: now,
        current_participants: DEMO_USERS.len() as u32,
        question_ids: question_ids.to_vec(),
        venue_address: None,
        requires_gender_parity: true,
    }
}

/// Profile the single-user seed merges into `users/{uid}`
pub fn seed_profile(uid: &str, now: DateTime<Utc>) -> User {
    User {
        id: uid.to_string(),
        email: SEED_PROFILE.email.to_string(),
        username: SEED_PROFILE.username.to_string(),
        avatar_url: None,
        city: SEED_PROFILE.city.to_string(),
        bio: None,
        gender: SEED_PROFILE.gender,
        created_at: now,
        updated_at: now,
        is_active: true,
        total_games_played: 0,
        total_matches: 0,
    }
}
