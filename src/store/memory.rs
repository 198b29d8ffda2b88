//! In-memory store: tournaments, groups and brackets behind `RwLock`s.
//!
//! When both are needed, `brackets` is locked before `groups`. Roster edits that must not follow
//! a bracket hold the `brackets` read lock for their whole duration, and `create_bulk` recounts
//! the roster under the `brackets` write lock, so neither side can slip in between.

use crate::models::{
    BracketError, BracketMatch, Group, GroupId, MatchId, Team, TeamId, Tournament, TournamentId,
};
use crate::store::{MatchRepository, RosterRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

type GroupKey = (TournamentId, GroupId);

fn key(tournament_id: &str, group_id: &str) -> GroupKey {
    (tournament_id.to_string(), group_id.to_string())
}

fn lock_error<T>(_: PoisonError<T>) -> BracketError {
    BracketError::Storage("lock error".to_string())
}

fn trimmed(name: &str) -> Result<&str, BracketError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BracketError::EmptyName);
    }
    Ok(name)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
    groups: RwLock<HashMap<GroupKey, Group>>,
    brackets: RwLock<HashMap<GroupKey, Vec<BracketMatch>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tournament. Names are unique (case-insensitive).
    pub fn create_tournament(&self, name: &str) -> Result<Tournament, BracketError> {
        let name = trimmed(name)?;
        let mut tournaments = self.tournaments.write().map_err(lock_error)?;
        if tournaments.values().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(BracketError::DuplicateTournamentName(name.to_string()));
        }
        let tournament = Tournament::new(name);
        tournaments.insert(tournament.id.clone(), tournament.clone());
        Ok(tournament)
    }

    pub fn get_tournament(&self, tournament_id: &str) -> Result<Tournament, BracketError> {
        self.tournaments
            .read()
            .map_err(lock_error)?
            .get(tournament_id)
            .cloned()
            .ok_or_else(|| BracketError::TournamentNotFound(tournament_id.to_string()))
    }

    /// All tournaments, oldest first.
    pub fn list_tournaments(&self) -> Result<Vec<Tournament>, BracketError> {
        let mut all: Vec<Tournament> = self.tournaments.read().map_err(lock_error)?.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    pub fn rename_tournament(&self, tournament_id: &str, name: &str) -> Result<Tournament, BracketError> {
        let name = trimmed(name)?;
        let mut tournaments = self.tournaments.write().map_err(lock_error)?;
        if tournaments
            .values()
            .any(|t| t.id != tournament_id && t.name.eq_ignore_ascii_case(name))
        {
            return Err(BracketError::DuplicateTournamentName(name.to_string()));
        }
        let tournament = tournaments
            .get_mut(tournament_id)
            .ok_or_else(|| BracketError::TournamentNotFound(tournament_id.to_string()))?;
        tournament.name = name.to_string();
        Ok(tournament.clone())
    }

    /// Create an empty group seating `capacity` teams. The tournament must exist and group names
    /// are unique within it (case-insensitive).
    pub fn create_group(&self, tournament_id: &str, name: &str, capacity: usize) -> Result<Group, BracketError> {
        self.get_tournament(tournament_id)?;
        let name = trimmed(name)?;
        let mut groups = self.groups.write().map_err(lock_error)?;
        if groups
            .values()
            .any(|g| g.tournament_id == tournament_id && g.name.eq_ignore_ascii_case(name))
        {
            return Err(BracketError::DuplicateGroupName(name.to_string()));
        }
        let group = Group::new(tournament_id, name, capacity);
        groups.insert(key(tournament_id, &group.id), group.clone());
        Ok(group)
    }

    pub fn get_group(&self, tournament_id: &str, group_id: &str) -> Result<Group, BracketError> {
        self.groups
            .read()
            .map_err(lock_error)?
            .get(&key(tournament_id, group_id))
            .cloned()
            .ok_or_else(|| BracketError::group_not_found(tournament_id, group_id))
    }

    /// Groups of a tournament, by name.
    pub fn list_groups(&self, tournament_id: &str) -> Result<Vec<Group>, BracketError> {
        self.get_tournament(tournament_id)?;
        let mut groups: Vec<Group> = self
            .groups
            .read()
            .map_err(lock_error)?
            .values()
            .filter(|g| g.tournament_id == tournament_id)
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    pub fn rename_group(&self, tournament_id: &str, group_id: &str, name: &str) -> Result<Group, BracketError> {
        let name = trimmed(name)?;
        let mut groups = self.groups.write().map_err(lock_error)?;
        if groups
            .values()
            .any(|g| g.tournament_id == tournament_id && g.id != group_id && g.name.eq_ignore_ascii_case(name))
        {
            return Err(BracketError::DuplicateGroupName(name.to_string()));
        }
        let group = groups
            .get_mut(&key(tournament_id, group_id))
            .ok_or_else(|| BracketError::group_not_found(tournament_id, group_id))?;
        group.name = name.to_string();
        Ok(group.clone())
    }

    pub fn add_team(&self, tournament_id: &str, group_id: &str, name: &str) -> Result<Team, BracketError> {
        let mut groups = self.groups.write().map_err(lock_error)?;
        let group = groups
            .get_mut(&key(tournament_id, group_id))
            .ok_or_else(|| BracketError::group_not_found(tournament_id, group_id))?;
        group.add_team(name).cloned()
    }

    pub fn get_team(&self, tournament_id: &str, group_id: &str, team_id: TeamId) -> Result<Team, BracketError> {
        self.groups
            .read()
            .map_err(lock_error)?
            .get(&key(tournament_id, group_id))
            .ok_or_else(|| BracketError::group_not_found(tournament_id, group_id))?
            .team(team_id)
            .cloned()
    }

    /// Apply a roster edit unless the group already has a bracket (`Conflict`).
    fn edit_roster<T>(
        &self,
        tournament_id: &str,
        group_id: &str,
        edit: impl FnOnce(&mut Group) -> Result<T, BracketError>,
    ) -> Result<T, BracketError> {
        let group_key = key(tournament_id, group_id);
        let brackets = self.brackets.read().map_err(lock_error)?;
        let mut groups = self.groups.write().map_err(lock_error)?;
        let group = groups
            .get_mut(&group_key)
            .ok_or_else(|| BracketError::group_not_found(tournament_id, group_id))?;
        if brackets.contains_key(&group_key) {
            return Err(BracketError::Conflict {
                tournament_id: group_key.0,
                group_id: group_key.1,
            });
        }
        edit(group)
    }

    /// Remove a team. Refused once the group has a bracket.
    pub fn remove_team(&self, tournament_id: &str, group_id: &str, team_id: TeamId) -> Result<Team, BracketError> {
        self.edit_roster(tournament_id, group_id, |group| group.remove_team(team_id))
    }

    /// Rename a team. Refused once the group has a bracket.
    pub fn rename_team(
        &self,
        tournament_id: &str,
        group_id: &str,
        team_id: TeamId,
        name: &str,
    ) -> Result<Team, BracketError> {
        self.edit_roster(tournament_id, group_id, |group| group.rename_team(team_id, name).cloned())
    }
}

#[async_trait]
impl RosterRepository for MemoryStore {
    async fn participant_count(&self, tournament_id: &str, group_id: &str) -> Result<usize, BracketError> {
        self.get_group(tournament_id, group_id).map(|g| g.teams.len())
    }
}

#[async_trait]
impl MatchRepository for MemoryStore {
    async fn bracket_exists(&self, tournament_id: &str, group_id: &str) -> Result<bool, BracketError> {
        Ok(self
            .brackets
            .read()
            .map_err(lock_error)?
            .contains_key(&key(tournament_id, group_id)))
    }

    /// Besides create-if-absent, a group on this store's roster must still hold exactly the
    /// bracket's participant count (`2N - 1` matches seat `N` teams), else `RosterChanged`.
    async fn create_bulk(&self, matches: Vec<BracketMatch>) -> Result<Vec<MatchId>, BracketError> {
        let first = matches
            .first()
            .ok_or_else(|| BracketError::PreconditionFailed("no matches to create".to_string()))?;
        let group_key = key(&first.tournament_id, &first.group_id);
        if matches
            .iter()
            .any(|m| m.tournament_id != group_key.0 || m.group_id != group_key.1)
        {
            return Err(BracketError::PreconditionFailed(
                "matches span more than one group".to_string(),
            ));
        }

        // Existence check, roster recount and insert happen under one write lock.
        let mut brackets = self.brackets.write().map_err(lock_error)?;
        if brackets.contains_key(&group_key) {
            return Err(BracketError::Conflict {
                tournament_id: group_key.0,
                group_id: group_key.1,
            });
        }
        {
            let groups = self.groups.read().map_err(lock_error)?;
            if let Some(group) = groups.get(&group_key) {
                let required = (matches.len() + 1) / 2;
                let current = group.teams.len();
                if current != required {
                    return Err(BracketError::RosterChanged { current, required });
                }
            }
        }
        let ids = matches.iter().map(|m| m.id.clone()).collect();
        brackets.insert(group_key, matches);
        Ok(ids)
    }

    async fn find_by_tournament_and_group(
        &self,
        tournament_id: &str,
        group_id: &str,
    ) -> Result<Vec<BracketMatch>, BracketError> {
        Ok(self
            .brackets
            .read()
            .map_err(lock_error)?
            .get(&key(tournament_id, group_id))
            .cloned()
            .unwrap_or_default())
    }
}
