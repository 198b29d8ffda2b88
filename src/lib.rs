//! Tournament brackets service: library with models, bracket logic, storage and the REST API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    bracket_reset_status, generate_bracket, generate_double_elimination, generate_match_id, handle_event,
    spawn_consumer, verify_bracket, BracketSize, BracketTrigger, GenerateFn, GenerationStatus, StatusBoard, TeamAddEvent,
    TriggerOutcome, DEFAULT_BRACKET_SIZE,
};
pub use models::{
    Bracket, BracketError, BracketMatch, Group, GroupId, MatchId, MatchStatus, Team, TeamId, Tournament,
    TournamentId,
};
pub use store::{MatchRepository, MemoryStore, RosterRepository};
