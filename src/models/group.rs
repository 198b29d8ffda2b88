//! Group and Team: the roster a bracket is generated for.

use crate::models::error::BracketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a group within a tournament.
pub type GroupId = String;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// A team registered in a group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            joined_at: Utc::now(),
        }
    }
}

/// A group of teams that will play one double-elimination bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tournament_id: String,
    pub name: String,
    /// Number of teams the bracket seats.
    pub capacity: usize,
    pub teams: Vec<Team>,
}

impl Group {
    pub fn new(tournament_id: &str, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tournament_id: tournament_id.to_string(),
            name: name.into(),
            capacity,
            teams: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.teams.len() >= self.capacity
    }

    /// Register a team. Names must be non-empty and unique (case-insensitive).
    pub fn add_team(&mut self, name: &str) -> Result<&Team, BracketError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BracketError::EmptyName);
        }
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(BracketError::DuplicateTeamName(name.to_string()));
        }
        if self.is_full() {
            return Err(BracketError::GroupFull {
                capacity: self.capacity,
            });
        }
        self.teams.push(Team::new(name));
        Ok(&self.teams[self.teams.len() - 1])
    }

    pub fn team(&self, team_id: TeamId) -> Result<&Team, BracketError> {
        self.teams
            .iter()
            .find(|t| t.id == team_id)
            .ok_or_else(|| BracketError::TeamNotFound(team_id.to_string()))
    }

    /// Rename a team. The new name follows the same rules as `add_team`.
    pub fn rename_team(&mut self, team_id: TeamId, name: &str) -> Result<&Team, BracketError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BracketError::EmptyName);
        }
        if self
            .teams
            .iter()
            .any(|t| t.id != team_id && t.name.eq_ignore_ascii_case(name))
        {
            return Err(BracketError::DuplicateTeamName(name.to_string()));
        }
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or_else(|| BracketError::TeamNotFound(team_id.to_string()))?;
        team.name = name.to_string();
        Ok(&*team)
    }

    /// Remove a team by id.
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<Team, BracketError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or_else(|| BracketError::TeamNotFound(team_id.to_string()))?;
        Ok(self.teams.remove(idx))
    }
}
