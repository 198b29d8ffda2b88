//! Data structures: tournaments, groups and teams, bracket matches, errors.

mod error;
mod game;
mod group;
mod tournament;

pub use error::BracketError;
pub use game::{Bracket, BracketMatch, MatchId, MatchStatus};
pub use group::{Group, GroupId, Team, TeamId};
pub use tournament::{Tournament, TournamentId};
