//! Round-size tables for a double-elimination bracket, derived from the participant count.

use crate::models::BracketError;

/// Participants a group needs before its bracket is generated.
pub const DEFAULT_BRACKET_SIZE: u32 = 32;

/// A supported participant count: a power of two, at least 4.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BracketSize(u32);

impl Default for BracketSize {
    fn default() -> Self {
        Self(DEFAULT_BRACKET_SIZE)
    }
}

impl BracketSize {
    /// Fails fast on sizes that would need byes.
    pub fn new(participants: u32) -> Result<Self, BracketError> {
        if participants < 4 || !participants.is_power_of_two() {
            return Err(BracketError::UnsupportedBracketSize(participants));
        }
        Ok(Self(participants))
    }

    pub fn participants(self) -> u32 {
        self.0
    }

    /// log2 of the participant count.
    pub fn winners_rounds(self) -> u32 {
        self.0.trailing_zeros()
    }

    /// `[N/2, N/4, ..., 1]`.
    pub fn winners_round_sizes(self) -> Vec<u32> {
        (1..=self.winners_rounds()).map(|r| self.0 >> r).collect()
    }

    /// Each width appears twice: an intake-sized round followed by its partner.
    /// For 32 participants: `[8, 8, 4, 4, 2, 2, 1, 1]`.
    pub fn losers_round_sizes(self) -> Vec<u32> {
        (0..self.winners_rounds() - 1)
            .flat_map(|i| {
                let width = self.0 >> (i + 2);
                [width, width]
            })
            .collect()
    }

    /// Losers round (1-based) that receives the losers of a winners round (1-based).
    ///
    /// Round 1 takes the first-round losers among themselves; after that every even losers round
    /// is an intake round and the odd rounds between them consolidate.
    pub fn losers_intake_round(self, winners_round: u32) -> u32 {
        if winners_round <= 1 {
            1
        } else {
            2 * (winners_round - 1)
        }
    }

    /// True if the losers round takes drops from the winners bracket.
    pub fn is_intake_round(self, losers_round: u32) -> bool {
        losers_round == 1 || losers_round % 2 == 0
    }

    pub fn winners_match_count(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn losers_match_count(self) -> usize {
        (self.0 - 2) as usize
    }

    /// Winners + losers + the two grand-final matches (`2N - 1`).
    pub fn match_count(self) -> usize {
        self.winners_match_count() + self.losers_match_count() + 2
    }
}
