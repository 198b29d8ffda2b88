//! Bracket trigger: turns "a team joined" into at most one bracket per group.

use crate::logic::bracket_size::BracketSize;
use crate::logic::double_elimination::{generate_bracket, verify_bracket};
use crate::models::{BracketError, BracketMatch};
use crate::store::{MatchRepository, RosterRepository};
use serde::Serialize;
use std::sync::Arc;

/// What a single trigger invocation did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TriggerOutcome {
    /// The group is not at the required size yet.
    Waiting { current: usize, required: usize },
    /// A bracket was already there, or a concurrent invocation won the write.
    AlreadyCreated,
    /// This invocation created the bracket.
    Created { matches: usize },
}

/// Builds the bracket for a size, tournament and group.
pub type GenerateFn = fn(BracketSize, &str, &str) -> Vec<BracketMatch>;

/// Watches participant counts and generates the group's bracket once it is full.
///
/// Idempotency rests on `MatchRepository::create_bulk` being create-if-absent: the
/// `bracket_exists` check only short-circuits the common case, and a `Conflict` from the write is
/// read as "another invocation already created it".
pub struct BracketTrigger {
    roster: Arc<dyn RosterRepository>,
    matches: Arc<dyn MatchRepository>,
    size: BracketSize,
    generate: GenerateFn,
}

impl BracketTrigger {
    /// Trigger for the default 32-team bracket.
    pub fn new(roster: Arc<dyn RosterRepository>, matches: Arc<dyn MatchRepository>) -> Self {
        Self::with_size(roster, matches, BracketSize::default())
    }

    pub fn with_size(
        roster: Arc<dyn RosterRepository>,
        matches: Arc<dyn MatchRepository>,
        size: BracketSize,
    ) -> Self {
        Self::with_generator(roster, matches, size, generate_bracket)
    }

    /// Trigger with a custom generator. Its output is still verified before anything is written.
    pub fn with_generator(
        roster: Arc<dyn RosterRepository>,
        matches: Arc<dyn MatchRepository>,
        size: BracketSize,
        generate: GenerateFn,
    ) -> Self {
        Self {
            roster,
            matches,
            size,
            generate,
        }
    }

    pub fn size(&self) -> BracketSize {
        self.size
    }

    pub async fn on_participant_added(
        &self,
        tournament_id: &str,
        group_id: &str,
    ) -> Result<TriggerOutcome, BracketError> {
        let current = self.roster.participant_count(tournament_id, group_id).await?;
        let required = self.size.participants() as usize;
        log::info!("Tournament {} group {} has {} teams", tournament_id, group_id, current);

        if current != required {
            log::info!("Waiting for more teams. Current: {}, Required: {}", current, required);
            return Ok(TriggerOutcome::Waiting { current, required });
        }

        if self.matches.bracket_exists(tournament_id, group_id).await? {
            log::info!("Matches already exist for tournament {} group {}", tournament_id, group_id);
            return Ok(TriggerOutcome::AlreadyCreated);
        }

        log::info!("Creating matches for tournament {} group {}", tournament_id, group_id);
        let matches = (self.generate)(self.size, tournament_id, group_id);
        if let Err(e) = verify_bracket(&matches, self.size) {
            log::error!("Refusing to persist bracket for group {}: {}", group_id, e);
            return Err(e);
        }

        let expected = matches.len();
        match self.matches.create_bulk(matches).await {
            Ok(ids) if ids.len() == expected => {
                log::info!("Created {} matches for tournament {} group {}", expected, tournament_id, group_id);
                Ok(TriggerOutcome::Created { matches: expected })
            }
            Ok(ids) => {
                log::error!("Expected to create {} matches, created {}", expected, ids.len());
                Err(BracketError::PartialWrite {
                    expected,
                    created: ids.len(),
                })
            }
            Err(BracketError::RosterChanged { current, required }) => {
                log::info!(
                    "Roster of group {} changed before the bracket was written ({} of {} teams)",
                    group_id,
                    current,
                    required
                );
                Ok(TriggerOutcome::Waiting { current, required })
            }
            Err(BracketError::Conflict { .. }) => {
                log::info!("Bracket for group {} was created concurrently", group_id);
                Ok(TriggerOutcome::AlreadyCreated)
            }
            Err(e) => {
                log::error!("Error creating matches for group {}: {}", group_id, e);
                Err(e)
            }
        }
    }
}
