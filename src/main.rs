//! Scoreboard binary entrypoint wiring configuration, the file store and the console.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoreboard_back::{
    config::AppConfig, console, dao::kv_store::FileKvStore, services::score_service,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = Arc::new(FileKvStore::new(config.store_dir()));
    info!(
        store_dir = %config.store_dir().display(),
        teams = config.teams().len(),
        "starting scoreboard"
    );

    let app_state = AppState::new(config, store);

    // Surface backend failures before the first prompt.
    let board = score_service::load_board(&app_state)
        .await
        .context("loading scoreboard state")?;
    info!(history_len = board.history.len(), "scoreboard state loaded");

    console::run(app_state, BufReader::new(io::stdin()), io::stdout())
        .await
        .context("running console")?;

    info!("console closed; shutting down");
    Ok(())
}

/// Configure tracing subscribers; logs go to stderr so stdout carries replies only.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
