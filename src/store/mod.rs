//! Collaborator traits the bracket trigger depends on, and an in-memory implementation.

mod memory;

pub use memory::MemoryStore;

use crate::models::{BracketError, BracketMatch, MatchId};
use async_trait::async_trait;

/// Roster lookups.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Number of teams currently in the group. `GroupNotFound` if the group does not exist.
    async fn participant_count(&self, tournament_id: &str, group_id: &str) -> Result<usize, BracketError>;
}

/// Match persistence.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn bracket_exists(&self, tournament_id: &str, group_id: &str) -> Result<bool, BracketError>;

    /// Persist a whole bracket in one write and return the created ids.
    ///
    /// Must be create-if-absent: if the group already has matches the write is rejected with
    /// `Conflict`, and a rejected write leaves nothing behind.
    async fn create_bulk(&self, matches: Vec<BracketMatch>) -> Result<Vec<MatchId>, BracketError>;

    async fn find_by_tournament_and_group(
        &self,
        tournament_id: &str,
        group_id: &str,
    ) -> Result<Vec<BracketMatch>, BracketError>;
}
