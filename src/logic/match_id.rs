//! Deterministic match ids: `{tournament}_{W|L}R{round}M{slot}`.

use crate::models::{Bracket, MatchId};

/// Build the id of the match at (bracket, round, slot) in a tournament.
///
/// The `R` and `M` separators keep distinct (round, slot) pairs apart, e.g. `R1M12` vs `R11M2`.
pub fn generate_match_id(tournament_id: &str, bracket: Bracket, round: u32, slot: u32) -> MatchId {
    format!("{}_{}R{}M{}", tournament_id, bracket.prefix(), round, slot)
}
