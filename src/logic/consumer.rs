//! Team-added events: consumption and per-group generation status.

use crate::logic::trigger::{BracketTrigger, TriggerOutcome};
use crate::models::{BracketError, GroupId, TournamentId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Attempts per event when the store reports a transient failure.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(50);

/// A team joined a group. Delivery may repeat.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamAddEvent {
    pub tournament_id: TournamentId,
    pub group_id: GroupId,
}

/// Bracket generation state of a group, as reported to clients.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum GenerationStatus {
    /// Normal while the group fills.
    Waiting { current: usize, required: usize },
    Created,
    /// Needs operator attention. Transient store failures were already retried; removing a team
    /// and adding it back re-runs the trigger.
    Failed { reason: String },
}

/// Last known generation status per group.
#[derive(Debug, Default)]
pub struct StatusBoard {
    entries: RwLock<HashMap<(TournamentId, GroupId), GenerationStatus>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a trigger result. `Created` is terminal and never overwritten.
    pub fn record(
        &self,
        tournament_id: &str,
        group_id: &str,
        result: &Result<TriggerOutcome, BracketError>,
    ) {
        let status = match result {
            Ok(TriggerOutcome::Waiting { current, required }) => GenerationStatus::Waiting {
                current: *current,
                required: *required,
            },
            Ok(TriggerOutcome::Created { .. }) | Ok(TriggerOutcome::AlreadyCreated) => GenerationStatus::Created,
            Err(e) => GenerationStatus::Failed { reason: e.to_string() },
        };
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(_) => {
                log::warn!("Status board lock error, dropping status for group {}", group_id);
                return;
            }
        };
        let entry = entries
            .entry((tournament_id.to_string(), group_id.to_string()))
            .or_insert_with(|| status.clone());
        if *entry != GenerationStatus::Created {
            *entry = status;
        }
    }

    pub fn get(&self, tournament_id: &str, group_id: &str) -> Option<GenerationStatus> {
        self.entries
            .read()
            .ok()?
            .get(&(tournament_id.to_string(), group_id.to_string()))
            .cloned()
    }
}

/// Run the trigger for one event and record the result. Transient failures are retried with a
/// growing delay; retrying is safe because creation is idempotent.
pub async fn handle_event(
    trigger: &BracketTrigger,
    board: &StatusBoard,
    event: &TeamAddEvent,
) -> Result<TriggerOutcome, BracketError> {
    let mut attempt = 1;
    let result = loop {
        let result = trigger
            .on_participant_added(&event.tournament_id, &event.group_id)
            .await;
        let error = match result {
            Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => e,
            other => break other,
        };
        log::warn!(
            "Attempt {} for group {} failed ({}), retrying",
            attempt,
            event.group_id,
            error
        );
        tokio::time::sleep(RETRY_DELAY * attempt).await;
        attempt += 1;
    };
    if let Err(e) = &result {
        log::error!(
            "Bracket generation failed for tournament {} group {}: {}",
            event.tournament_id,
            event.group_id,
            e
        );
    }
    board.record(&event.tournament_id, &event.group_id, &result);
    result
}

/// Consume events until every sender is dropped. Each event is handled in its own task, so the
/// same group may be processed concurrently.
pub fn spawn_consumer(
    trigger: Arc<BracketTrigger>,
    board: Arc<StatusBoard>,
    mut events: mpsc::UnboundedReceiver<TeamAddEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let trigger = trigger.clone();
            let board = board.clone();
            tokio::spawn(async move {
                let _ = handle_event(&trigger, &board, &event).await;
            });
        }
        log::info!("Event channel closed, consumer stopping");
    })
}
