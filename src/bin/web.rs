//! Single binary web server for tournament brackets.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, BRACKET_SIZE.

use actix_web::{web::Data, App, HttpServer};
use std::sync::Arc;
use tokio::sync::mpsc;
use tournament_brackets::{api, spawn_consumer, BracketTrigger, Config, MemoryStore, StatusBoard};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    log::info!(
        "Starting server at http://{}:{} ({}-team brackets)",
        config.host,
        config.port,
        config.bracket_size.participants()
    );

    let store = Arc::new(MemoryStore::new());
    let board = Arc::new(StatusBoard::new());
    let trigger = Arc::new(BracketTrigger::with_size(
        store.clone(),
        store.clone(),
        config.bracket_size,
    ));

    // Team-added events are handled off the request path.
    let (events, receiver) = mpsc::unbounded_channel();
    spawn_consumer(trigger, board.clone(), receiver);

    let state = Data::new(api::AppState {
        store,
        board,
        events,
        bracket_size: config.bracket_size,
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
