/// Teams, ledger, history log and the board aggregate.
pub mod board;
/// Timestamp sources.
pub mod clock;
/// Per-session identity and pending change.
pub mod session;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::AppConfig,
    dao::{board::BoardRepository, kv_store::KeyValueStore},
    error::ServiceError,
    state::{
        board::BoardState,
        clock::{Clock, SystemClock},
    },
};

pub use self::session::{PendingChange, SessionContext, SessionIdentity};

/// Shared handle passed to services.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, board persistence and the write gate.
///
/// Session data is deliberately absent; it lives in a [`SessionContext`] owned by the
/// presentation layer.
pub struct AppState {
    config: Arc<AppConfig>,
    board: BoardRepository,
    clock: Arc<dyn Clock>,
    write_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, store: Arc<dyn KeyValueStore>) -> SharedState {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Same as [`AppState::new`] with an explicit timestamp source.
    pub fn with_clock(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> SharedState {
        Arc::new(Self {
            config: Arc::new(config),
            board: BoardRepository::new(store),
            clock,
            write_gate: Mutex::new(()),
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Read the board straight from the store.
    pub async fn read_board(&self) -> Result<BoardState, ServiceError> {
        Ok(self.board.load(self.config.teams()).await?)
    }

    /// Load the board, let `f` mutate it, and persist the result when `f` asks for it.
    ///
    /// The whole sequence runs under the write gate, so a save always completes before
    /// the next mutation loads.
    pub async fn with_board_mut<F, T>(&self, f: F) -> Result<(BoardState, T), ServiceError>
    where
        F: FnOnce(&mut BoardState) -> (bool, T),
    {
        let _gate = self.write_gate.lock().await;
        let mut board = self.board.load(self.config.teams()).await?;
        let (changed, value) = f(&mut board);
        if changed {
            self.board.save(&board).await?;
        }
        Ok((board, value))
    }
}
