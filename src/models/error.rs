//! Errors shared by the roster, the bracket generator and the trigger.

/// Errors that can occur while managing rosters or creating brackets.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BracketError {
    /// No tournament with this id.
    #[error("tournament {0} not found")]
    TournamentNotFound(String),

    /// The roster has no record of this group.
    #[error("group {group_id} not found in tournament {tournament_id}")]
    GroupNotFound {
        tournament_id: String,
        group_id: String,
    },

    /// No team with this id in the group.
    #[error("team {0} not found in group")]
    TeamNotFound(String),

    /// A team with this name is already registered (names are unique, case-insensitive).
    #[error("a team named {0:?} is already in this group")]
    DuplicateTeamName(String),

    /// Another tournament already uses this name (case-insensitive).
    #[error("a tournament named {0:?} already exists")]
    DuplicateTournamentName(String),

    /// Another group of the tournament already uses this name (case-insensitive).
    #[error("a group named {0:?} already exists in this tournament")]
    DuplicateGroupName(String),

    /// The group already holds as many teams as its bracket seats.
    #[error("group is full ({capacity} teams)")]
    GroupFull { capacity: usize },

    /// A name was empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// Bracket sizes must be a power of two of at least 4.
    #[error("unsupported bracket size {0}: must be a power of two of at least 4")]
    UnsupportedBracketSize(u32),

    /// A generated bracket broke a structural invariant; nothing is persisted.
    #[error("generated bracket is invalid: {0}")]
    PreconditionFailed(String),

    /// The store already holds a bracket for this group.
    #[error("bracket already exists for group {group_id} in tournament {tournament_id}")]
    Conflict {
        tournament_id: String,
        group_id: String,
    },

    /// The roster no longer seats the bracket's participant count at write time.
    #[error("group has {current} teams, bracket needs {required}")]
    RosterChanged { current: usize, required: usize },

    /// The store created a different number of matches than requested.
    #[error("expected {expected} matches to be created, got {created}")]
    PartialWrite { expected: usize, created: usize },

    /// The backing store failed (transient; safe to retry).
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BracketError {
    pub fn group_not_found(tournament_id: &str, group_id: &str) -> Self {
        BracketError::GroupNotFound {
            tournament_id: tournament_id.to_string(),
            group_id: group_id.to_string(),
        }
    }

    /// True for the "no such entity" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BracketError::TournamentNotFound(_)
                | BracketError::GroupNotFound { .. }
                | BracketError::TeamNotFound(_)
        )
    }

    /// Failures worth retrying as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, BracketError::Storage(_))
    }
}
