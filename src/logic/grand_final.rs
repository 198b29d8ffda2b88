//! Whether the bracket reset gets played.

use crate::models::{Bracket, MatchStatus};

/// Status of the bracket-reset match once the first grand final is decided.
///
/// The winners-bracket champion has not lost yet, so if they take the first grand final the
/// tournament is over and the reset is skipped. If the losers-bracket champion wins, both
/// finalists have one loss and the reset must be played.
pub fn bracket_reset_status(gf1_winner_from: Bracket) -> MatchStatus {
    match gf1_winner_from {
        Bracket::Winners => MatchStatus::Skipped,
        Bracket::Losers => MatchStatus::Pending,
    }
}
