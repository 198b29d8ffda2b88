//! Bracket match, bracket side, and match status.

use serde::{Deserialize, Serialize};

/// Identifier of a bracket match, derived from tournament, bracket, round and slot.
pub type MatchId = String;

/// Which elimination ladder a match belongs to. Grand-final matches are `Winners` with
/// `is_grand_final` set.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    Winners,
    Losers,
}

impl Bracket {
    /// Single-letter prefix used in match ids.
    pub fn prefix(self) -> &'static str {
        match self {
            Bracket::Winners => "W",
            Bracket::Losers => "L",
        }
    }
}

/// Lifecycle of a match. Generation only ever produces `Pending`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    /// Not played at all (bracket reset when the winners champion takes the first grand final).
    Skipped,
}

/// A single match slot in a double-elimination bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub tournament_id: String,
    pub group_id: String,
    pub bracket: Bracket,
    /// 1-based, increasing toward the final.
    pub round_number: u32,
    /// 0-based slot within the round.
    pub match_number_in_round: u32,
    pub status: MatchStatus,
    /// Where the winner goes. None only for the bracket reset match.
    pub next_match_winner_id: Option<MatchId>,
    /// Where the loser drops. Set on winners matches outside the grand final.
    pub next_match_loser_id: Option<MatchId>,
    pub is_grand_final: bool,
    pub is_bracket_reset: bool,
}

impl BracketMatch {
    pub fn new(
        id: MatchId,
        tournament_id: &str,
        group_id: &str,
        bracket: Bracket,
        round_number: u32,
        match_number_in_round: u32,
    ) -> Self {
        Self {
            id,
            tournament_id: tournament_id.to_string(),
            group_id: group_id.to_string(),
            bracket,
            round_number,
            match_number_in_round,
            status: MatchStatus::Pending,
            next_match_winner_id: None,
            next_match_loser_id: None,
            is_grand_final: false,
            is_bracket_reset: false,
        }
    }
}
