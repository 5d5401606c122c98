use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    dao::{
        kv_store::KeyValueStore,
        models::{BOARD_SCHEMA_VERSION, BoardStateEntity},
        storage::{StorageError, StorageResult},
    },
    state::board::{BoardState, Team},
};

/// Fixed key under which the whole board is stored.
pub const BOARD_STATE_KEY: &str = "scoreboard_state";

/// Data Access Object reading and writing the board as one serialized blob.
#[derive(Clone)]
pub struct BoardRepository {
    store: Arc<dyn KeyValueStore>,
}

impl BoardRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted board for the configured `teams`.
    ///
    /// A missing or unusable document yields a fresh board; corruption is logged and
    /// never reported as an error. Only backend failures are returned.
    pub async fn load(&self, teams: &[Team]) -> StorageResult<BoardState> {
        let Some(raw) = self.store.get(BOARD_STATE_KEY).await? else {
            debug!(key = BOARD_STATE_KEY, "no persisted board; starting fresh");
            return Ok(BoardState::new(teams));
        };

        let entity = match serde_json::from_str::<BoardStateEntity>(&raw) {
            Ok(entity) => entity,
            Err(err) => {
                warn!(
                    key = BOARD_STATE_KEY,
                    error = %err,
                    "persisted board is corrupted; discarding it"
                );
                return Ok(BoardState::new(teams));
            }
        };

        if entity.version != BOARD_SCHEMA_VERSION {
            warn!(
                key = BOARD_STATE_KEY,
                found = entity.version,
                expected = BOARD_SCHEMA_VERSION,
                "persisted board has an unsupported schema version; discarding it"
            );
            return Ok(BoardState::new(teams));
        }

        let mut board: BoardState = entity.into();

        let dropped = board.normalize(teams);
        if !dropped.is_empty() {
            warn!(teams = ?dropped, "dropping scores of teams that are no longer configured");
        }

        let expected = board.expected_last_update();
        if board.last_update != expected {
            warn!(
                stored = ?board.last_update,
                expected = ?expected,
                "last update does not match the history log; repairing it"
            );
            board.last_update = expected;
        }

        Ok(board)
    }

    /// Overwrite the persisted board with `board`.
    pub async fn save(&self, board: &BoardState) -> StorageResult<()> {
        let entity = BoardStateEntity::from(board.clone());
        let raw = serde_json::to_string(&entity)
            .map_err(|source| StorageError::Serialization { source })?;
        self.store.set(BOARD_STATE_KEY, raw).await
    }

    /// Remove the persisted board entirely.
    pub async fn clear(&self) -> StorageResult<()> {
        self.store.remove(BOARD_STATE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::{
        dao::kv_store::{MemoryKvStore, failing::FailingKvStore},
        state::board::{ScoreChange, Team},
    };

    fn teams() -> Vec<Team> {
        vec![Team::new("RED", "#e53935"), Team::new("BLUE", "#1e88e5")]
    }

    fn repository() -> (MemoryKvStore, BoardRepository) {
        let store = MemoryKvStore::new();
        let repository = BoardRepository::new(Arc::new(store.clone()));
        (store, repository)
    }

    #[tokio::test]
    async fn missing_key_loads_fresh_board() {
        let (_, repository) = repository();
        let board = repository.load(&teams()).await.unwrap();
        assert_eq!(board, BoardState::new(&teams()));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (_, repository) = repository();
        let mut board = BoardState::new(&teams());
        board.apply_change(
            ScoreChange::new("BLUE", 10, Some("kickoff".into())),
            "Pailin",
            datetime!(2026-10-17 12:00:00.123456789 UTC),
        );
        board.apply_change(
            ScoreChange::new("RED", -4, None),
            "Somchai",
            datetime!(2026-10-17 12:03:30 UTC),
        );

        repository.save(&board).await.unwrap();

        assert_eq!(repository.load(&teams()).await.unwrap(), board);
    }

    #[tokio::test]
    async fn unparseable_blob_loads_same_default_as_missing_key() {
        let (store, repository) = repository();
        store
            .set(BOARD_STATE_KEY, "{not json".into())
            .await
            .unwrap();

        let corrupted = repository.load(&teams()).await.unwrap();
        repository.clear().await.unwrap();
        let missing = repository.load(&teams()).await.unwrap();

        assert_eq!(corrupted, missing);
    }

    #[tokio::test]
    async fn shape_mismatch_is_treated_as_corruption() {
        let (store, repository) = repository();
        store
            .set(
                BOARD_STATE_KEY,
                r#"{"version":1,"scores":{"RED":"ten"},"history":[]}"#.into(),
            )
            .await
            .unwrap();

        let board = repository.load(&teams()).await.unwrap();
        assert_eq!(board, BoardState::new(&teams()));
    }

    #[tokio::test]
    async fn unknown_version_is_discarded() {
        let (store, repository) = repository();
        store
            .set(
                BOARD_STATE_KEY,
                r#"{"version":99,"scores":{"RED":5,"BLUE":1},"history":[]}"#.into(),
            )
            .await
            .unwrap();

        let board = repository.load(&teams()).await.unwrap();
        assert_eq!(board, BoardState::new(&teams()));
    }

    #[tokio::test]
    async fn load_normalizes_ledger_to_configured_teams() {
        let (store, repository) = repository();
        store
            .set(
                BOARD_STATE_KEY,
                r#"{"version":1,"scores":{"BLUE":3,"ORANGE":8},"history":[]}"#.into(),
            )
            .await
            .unwrap();

        let board = repository.load(&teams()).await.unwrap();

        let scores: Vec<_> = board.ledger.iter().collect();
        assert_eq!(scores, vec![("RED", 0), ("BLUE", 3)]);
    }

    #[tokio::test]
    async fn stale_last_update_is_repaired_from_history() {
        let (store, repository) = repository();
        store
            .set(
                BOARD_STATE_KEY,
                r#"{
                    "version": 1,
                    "scores": {"RED": 2, "BLUE": 0},
                    "history": [{
                        "timestamp": "2026-10-17T09:15:00Z",
                        "actor": "Pailin",
                        "team": "RED",
                        "delta": 2
                    }],
                    "last_update": null
                }"#
                .into(),
            )
            .await
            .unwrap();

        let board = repository.load(&teams()).await.unwrap();
        assert_eq!(board.last_update, Some(datetime!(2026-10-17 09:15:00 UTC)));
    }

    #[tokio::test]
    async fn backend_read_failure_is_reported_not_reset() {
        let repository = BoardRepository::new(Arc::new(FailingKvStore::failing_reads()));

        let err = repository.load(&teams()).await.unwrap_err();

        assert!(matches!(err, StorageError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn backend_write_failure_is_reported() {
        let repository = BoardRepository::new(Arc::new(FailingKvStore::failing_writes()));

        let err = repository.save(&BoardState::new(&teams())).await.unwrap_err();

        assert!(matches!(err, StorageError::Unavailable { .. }));
    }
}
