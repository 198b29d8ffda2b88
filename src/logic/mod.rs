//! Bracket business logic: topology generation, the creation trigger, and event handling.

mod bracket_size;
mod consumer;
mod double_elimination;
mod grand_final;
mod match_id;
mod trigger;

pub use bracket_size::{BracketSize, DEFAULT_BRACKET_SIZE};
pub use consumer::{handle_event, spawn_consumer, GenerationStatus, StatusBoard, TeamAddEvent};
pub use double_elimination::{generate_bracket, generate_double_elimination, verify_bracket};
pub use grand_final::bracket_reset_status;
pub use match_id::generate_match_id;
pub use trigger::{BracketTrigger, GenerateFn, TriggerOutcome};
