//! REST API: tournaments, groups, team registration, and generated brackets.
//!
//! Registering a team publishes a `TeamAddEvent`; the bracket itself is created by the event
//! consumer, not by the request handler.

use crate::logic::{BracketSize, GenerationStatus, StatusBoard, TeamAddEvent};
use crate::models::BracketError;
use crate::store::{MatchRepository, MemoryStore};
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Shared state for every handler.
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub board: Arc<StatusBoard>,
    pub events: mpsc::UnboundedSender<TeamAddEvent>,
    pub bracket_size: BracketSize,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct TournamentPath {
    tournament_id: String,
}

#[derive(Deserialize)]
struct GroupPath {
    tournament_id: String,
    group_id: String,
}

#[derive(Deserialize)]
struct TeamPath {
    tournament_id: String,
    group_id: String,
    team_id: Uuid,
}

/// JSON error body with a status matching the error kind.
pub fn error_response(e: &BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        _ if e.is_not_found() => HttpResponse::NotFound().json(body),
        BracketError::DuplicateTeamName(_)
        | BracketError::DuplicateTournamentName(_)
        | BracketError::DuplicateGroupName(_)
        | BracketError::Conflict { .. }
        | BracketError::RosterChanged { .. } => HttpResponse::Conflict().json(body),
        BracketError::GroupFull { .. }
        | BracketError::EmptyName
        | BracketError::UnsupportedBracketSize(_)
        | BracketError::Config(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-brackets",
    })
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: Data<AppState>, body: Json<NameBody>) -> HttpResponse {
    match state.store.create_tournament(&body.name) {
        Ok(t) => HttpResponse::Created().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: Data<AppState>) -> HttpResponse {
    match state.store.list_tournaments() {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{tournament_id}")]
async fn api_get_tournament(state: Data<AppState>, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.get_tournament(&path.tournament_id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[put("/api/tournaments/{tournament_id}")]
async fn api_rename_tournament(state: Data<AppState>, path: Path<TournamentPath>, body: Json<NameBody>) -> HttpResponse {
    match state.store.rename_tournament(&path.tournament_id, &body.name) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{tournament_id}/groups")]
async fn api_list_groups(state: Data<AppState>, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.list_groups(&path.tournament_id) {
        Ok(groups) => HttpResponse::Ok().json(groups),
        Err(e) => error_response(&e),
    }
}

/// Create a group seating as many teams as the configured bracket size.
#[post("/api/tournaments/{tournament_id}/groups")]
async fn api_create_group(state: Data<AppState>, path: Path<TournamentPath>, body: Json<NameBody>) -> HttpResponse {
    let capacity = state.bracket_size.participants() as usize;
    match state.store.create_group(&path.tournament_id, &body.name, capacity) {
        Ok(g) => HttpResponse::Created().json(g),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{tournament_id}/groups/{group_id}")]
async fn api_get_group(state: Data<AppState>, path: Path<GroupPath>) -> HttpResponse {
    match state.store.get_group(&path.tournament_id, &path.group_id) {
        Ok(g) => HttpResponse::Ok().json(g),
        Err(e) => error_response(&e),
    }
}

/// Register a team and publish a team-added event.
#[post("/api/tournaments/{tournament_id}/groups/{group_id}/teams")]
async fn api_add_team(state: Data<AppState>, path: Path<GroupPath>, body: Json<NameBody>) -> HttpResponse {
    let team = match state.store.add_team(&path.tournament_id, &path.group_id, &body.name) {
        Ok(team) => team,
        Err(e) => return error_response(&e),
    };
    let event = TeamAddEvent {
        tournament_id: path.tournament_id.clone(),
        group_id: path.group_id.clone(),
    };
    if state.events.send(event).is_err() {
        log::error!("Event channel closed; bracket for group {} will not be generated", path.group_id);
    }
    HttpResponse::Created().json(team)
}

#[put("/api/tournaments/{tournament_id}/groups/{group_id}")]
async fn api_rename_group(state: Data<AppState>, path: Path<GroupPath>, body: Json<NameBody>) -> HttpResponse {
    match state.store.rename_group(&path.tournament_id, &path.group_id, &body.name) {
        Ok(g) => HttpResponse::Ok().json(g),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{tournament_id}/groups/{group_id}/teams/{team_id}")]
async fn api_get_team(state: Data<AppState>, path: Path<TeamPath>) -> HttpResponse {
    match state.store.get_team(&path.tournament_id, &path.group_id, path.team_id) {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(e) => error_response(&e),
    }
}

/// Rename a team. Not allowed once the group's bracket exists.
#[put("/api/tournaments/{tournament_id}/groups/{group_id}/teams/{team_id}")]
async fn api_rename_team(state: Data<AppState>, path: Path<TeamPath>, body: Json<NameBody>) -> HttpResponse {
    match state
        .store
        .rename_team(&path.tournament_id, &path.group_id, path.team_id, &body.name)
    {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(e) => error_response(&e),
    }
}

/// Remove a team. Not allowed once the group's bracket exists.
#[delete("/api/tournaments/{tournament_id}/groups/{group_id}/teams/{team_id}")]
async fn api_remove_team(state: Data<AppState>, path: Path<TeamPath>) -> HttpResponse {
    match state.store.remove_team(&path.tournament_id, &path.group_id, path.team_id) {
        Ok(team) => HttpResponse::Ok().json(team),
        Err(e) => error_response(&e),
    }
}

/// Generated bracket matches (empty until the group is full).
#[get("/api/tournaments/{tournament_id}/groups/{group_id}/matches")]
async fn api_list_matches(state: Data<AppState>, path: Path<GroupPath>) -> HttpResponse {
    if let Err(e) = state.store.get_group(&path.tournament_id, &path.group_id) {
        return error_response(&e);
    }
    match state
        .store
        .find_by_tournament_and_group(&path.tournament_id, &path.group_id)
        .await
    {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// "Still waiting", "created" or "failed" for a group.
#[get("/api/tournaments/{tournament_id}/groups/{group_id}/bracket-status")]
async fn api_bracket_status(state: Data<AppState>, path: Path<GroupPath>) -> HttpResponse {
    let group = match state.store.get_group(&path.tournament_id, &path.group_id) {
        Ok(g) => g,
        Err(e) => return error_response(&e),
    };
    // No event handled yet for this group.
    let status = state
        .board
        .get(&path.tournament_id, &path.group_id)
        .unwrap_or(GenerationStatus::Waiting {
            current: group.teams.len(),
            required: group.capacity,
        });
    HttpResponse::Ok().json(status)
}

/// Register every route on an app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_list_tournaments)
        .service(api_get_tournament)
        .service(api_rename_tournament)
        .service(api_list_groups)
        .service(api_create_group)
        .service(api_get_group)
        .service(api_rename_group)
        .service(api_add_team)
        .service(api_get_team)
        .service(api_rename_team)
        .service(api_remove_team)
        .service(api_list_matches)
        .service(api_bracket_status);
}
