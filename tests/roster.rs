//! Integration tests for groups, teams, the in-memory store, and configuration.

use std::collections::HashMap;
use tournament_brackets::{
    generate_bracket, generate_double_elimination, BracketError, BracketSize, Config, Group, MatchRepository,
    MemoryStore, RosterRepository,
};

#[test]
fn team_names_are_trimmed_and_unique_ignoring_case() {
    let mut g = Group::new("t", "A", 4);
    assert_eq!(g.add_team("  Eagles ").unwrap().name, "Eagles");
    assert_eq!(
        g.add_team("eagles"),
        Err(BracketError::DuplicateTeamName("eagles".to_string()))
    );
    assert_eq!(g.add_team("   "), Err(BracketError::EmptyName));
    assert_eq!(g.teams.len(), 1);
}

#[test]
fn full_group_rejects_more_teams() {
    let mut g = Group::new("t", "A", 2);
    g.add_team("One").unwrap();
    g.add_team("Two").unwrap();
    assert!(g.is_full());
    assert_eq!(g.add_team("Three"), Err(BracketError::GroupFull { capacity: 2 }));
}

#[test]
fn removed_team_can_rejoin() {
    let mut g = Group::new("t", "A", 2);
    let id = g.add_team("One").unwrap().id;
    g.remove_team(id).unwrap();
    assert!(g.teams.is_empty());
    assert!(matches!(g.remove_team(id), Err(BracketError::TeamNotFound(_))));
    g.add_team("One").unwrap();
    assert_eq!(g.teams.len(), 1);
}

#[test]
fn groups_need_an_existing_tournament() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.create_group("nope", "A", 32),
        Err(BracketError::TournamentNotFound(_))
    ));
    let t = store.create_tournament("Cup").unwrap();
    let g = store.create_group(&t.id, "A", 32).unwrap();
    assert_eq!(store.get_group(&t.id, &g.id).unwrap().capacity, 32);
    assert!(store.get_group("other", &g.id).unwrap_err().is_not_found());
    assert_eq!(store.list_tournaments().unwrap(), vec![t]);
}

#[tokio::test]
async fn participant_count_follows_roster() {
    let store = MemoryStore::new();
    let t = store.create_tournament("Cup").unwrap();
    let g = store.create_group(&t.id, "A", 32).unwrap();
    assert_eq!(store.participant_count(&t.id, &g.id).await.unwrap(), 0);
    let team = store.add_team(&t.id, &g.id, "One").unwrap();
    store.add_team(&t.id, &g.id, "Two").unwrap();
    assert_eq!(store.participant_count(&t.id, &g.id).await.unwrap(), 2);
    store.remove_team(&t.id, &g.id, team.id).unwrap();
    assert_eq!(store.participant_count(&t.id, &g.id).await.unwrap(), 1);
    assert!(store.participant_count(&t.id, "missing").await.is_err());
}

#[tokio::test]
async fn bulk_create_is_create_if_absent() {
    let store = MemoryStore::new();
    let ids = store.create_bulk(generate_double_elimination("t", "g")).await.unwrap();
    assert_eq!(ids.len(), 63);
    assert!(store.bracket_exists("t", "g").await.unwrap());

    let err = store.create_bulk(generate_double_elimination("t", "g")).await.unwrap_err();
    assert!(matches!(err, BracketError::Conflict { .. }));
    assert_eq!(store.find_by_tournament_and_group("t", "g").await.unwrap().len(), 63);

    // Other groups are independent.
    assert!(!store.bracket_exists("t", "h").await.unwrap());
    store.create_bulk(generate_double_elimination("t", "h")).await.unwrap();
}

#[tokio::test]
async fn bulk_create_rejects_mixed_or_empty_batches() {
    let store = MemoryStore::new();
    let mut mixed = generate_double_elimination("t", "g");
    mixed[10].group_id = "h".to_string();
    assert!(matches!(
        store.create_bulk(mixed).await,
        Err(BracketError::PreconditionFailed(_))
    ));
    assert!(!store.bracket_exists("t", "g").await.unwrap());
    assert!(store.create_bulk(Vec::new()).await.is_err());
}

#[test]
fn teams_can_be_looked_up_and_renamed() {
    let mut g = Group::new("t", "A", 4);
    let eagles = g.add_team("Eagles").unwrap().id;
    g.add_team("Hawks").unwrap();

    assert_eq!(g.team(eagles).unwrap().name, "Eagles");
    assert_eq!(g.rename_team(eagles, "  Falcons ").unwrap().name, "Falcons");
    assert_eq!(g.team(eagles).unwrap().name, "Falcons");
    // Renaming to its own name in another case is fine.
    assert_eq!(g.rename_team(eagles, "FALCONS").unwrap().name, "FALCONS");
    assert_eq!(
        g.rename_team(eagles, "hawks"),
        Err(BracketError::DuplicateTeamName("hawks".to_string()))
    );
    assert_eq!(g.rename_team(eagles, " "), Err(BracketError::EmptyName));
    assert!(matches!(g.team(uuid::Uuid::new_v4()), Err(BracketError::TeamNotFound(_))));
}

#[test]
fn tournament_names_are_unique() {
    let store = MemoryStore::new();
    let cup = store.create_tournament("Cup").unwrap();
    let open = store.create_tournament("Open").unwrap();
    assert_eq!(
        store.create_tournament(" cup "),
        Err(BracketError::DuplicateTournamentName("cup".to_string()))
    );
    assert_eq!(
        store.rename_tournament(&open.id, "CUP"),
        Err(BracketError::DuplicateTournamentName("CUP".to_string()))
    );
    assert_eq!(store.rename_tournament(&cup.id, "Winter Cup").unwrap().name, "Winter Cup");
    assert_eq!(store.get_tournament(&cup.id).unwrap().name, "Winter Cup");
    assert!(store.rename_tournament("nope", "Other").unwrap_err().is_not_found());
}

#[test]
fn group_names_are_unique_per_tournament() {
    let store = MemoryStore::new();
    let cup = store.create_tournament("Cup").unwrap();
    let open = store.create_tournament("Open").unwrap();
    store.create_group(&cup.id, "B", 32).unwrap();
    let a = store.create_group(&cup.id, "A", 32).unwrap();
    assert_eq!(
        store.create_group(&cup.id, "a", 32),
        Err(BracketError::DuplicateGroupName("a".to_string()))
    );
    store.create_group(&open.id, "A", 32).unwrap();

    assert_eq!(
        store.rename_group(&cup.id, &a.id, "b"),
        Err(BracketError::DuplicateGroupName("b".to_string()))
    );
    assert_eq!(store.rename_group(&cup.id, &a.id, "C").unwrap().name, "C");

    let names: Vec<String> = store.list_groups(&cup.id).unwrap().into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["B", "C"]);
    assert_eq!(store.list_groups(&open.id).unwrap().len(), 1);
    assert!(matches!(store.list_groups("nope"), Err(BracketError::TournamentNotFound(_))));
}

#[test]
fn store_finds_teams_by_id() {
    let store = MemoryStore::new();
    let t = store.create_tournament("Cup").unwrap();
    let g = store.create_group(&t.id, "A", 4).unwrap();
    let team = store.add_team(&t.id, &g.id, "Eagles").unwrap();

    assert_eq!(store.get_team(&t.id, &g.id, team.id).unwrap(), team);
    assert_eq!(store.rename_team(&t.id, &g.id, team.id, "Falcons").unwrap().name, "Falcons");
    assert_eq!(store.get_team(&t.id, &g.id, team.id).unwrap().name, "Falcons");
    assert!(store.get_team(&t.id, &g.id, uuid::Uuid::new_v4()).unwrap_err().is_not_found());
    assert!(store.get_team(&t.id, "missing", team.id).unwrap_err().is_not_found());
}

/// Store with a full 4-team group.
fn full_group() -> (MemoryStore, String, String) {
    let store = MemoryStore::new();
    let t = store.create_tournament("Cup").unwrap();
    let g = store.create_group(&t.id, "A", 4).unwrap();
    for name in ["Ants", "Bees", "Cats", "Dogs"] {
        store.add_team(&t.id, &g.id, name).unwrap();
    }
    (store, t.id, g.id)
}

#[tokio::test]
async fn roster_is_frozen_once_the_bracket_exists() {
    let (store, tid, gid) = full_group();
    let size = BracketSize::new(4).unwrap();
    store.create_bulk(generate_bracket(size, &tid, &gid)).await.unwrap();
    let team = store.get_group(&tid, &gid).unwrap().teams[0].clone();

    assert!(matches!(
        store.remove_team(&tid, &gid, team.id),
        Err(BracketError::Conflict { .. })
    ));
    assert!(matches!(
        store.rename_team(&tid, &gid, team.id, "Newts"),
        Err(BracketError::Conflict { .. })
    ));
    assert_eq!(store.get_group(&tid, &gid).unwrap().teams.len(), 4);
    assert_eq!(store.get_team(&tid, &gid, team.id).unwrap().name, team.name);
}

#[tokio::test]
async fn bulk_create_recounts_a_registered_roster() {
    let (store, tid, gid) = full_group();
    let size = BracketSize::new(4).unwrap();
    let leaving = store.get_group(&tid, &gid).unwrap().teams[3].id;
    store.remove_team(&tid, &gid, leaving).unwrap();

    assert_eq!(
        store.create_bulk(generate_bracket(size, &tid, &gid)).await,
        Err(BracketError::RosterChanged { current: 3, required: 4 })
    );
    assert!(!store.bracket_exists(&tid, &gid).await.unwrap());

    store.add_team(&tid, &gid, "Eels").unwrap();
    assert_eq!(store.create_bulk(generate_bracket(size, &tid, &gid)).await.unwrap().len(), 7);
}

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn config_defaults() {
    let config = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.bracket_size, BracketSize::default());
}

#[test]
fn config_reads_overrides() {
    let config = Config::from_lookup(lookup(&[("HOST", "127.0.0.1"), ("PORT", "9000"), ("BRACKET_SIZE", "16")])).unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9000);
    assert_eq!(config.bracket_size.participants(), 16);
}

#[test]
fn config_rejects_bad_values() {
    assert!(matches!(
        Config::from_lookup(lookup(&[("PORT", "eighty")])),
        Err(BracketError::Config(_))
    ));
    assert_eq!(
        Config::from_lookup(lookup(&[("BRACKET_SIZE", "24")])),
        Err(BracketError::UnsupportedBracketSize(24))
    );
}
