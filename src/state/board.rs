use indexmap::IndexMap;
use time::OffsetDateTime;

/// Team participating in the scoreboard, defined once by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Stable identifier, also used as the display label (e.g. `BLUE`).
    pub name: String,
    /// CSS color used by the presentation layer.
    pub color: String,
}

impl Team {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Current point total per team, kept in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    scores: IndexMap<String, i64>,
}

impl ScoreLedger {
    /// Build a ledger holding a zero score for every team.
    pub fn zeroed(teams: &[Team]) -> Self {
        Self {
            scores: teams.iter().map(|team| (team.name.clone(), 0)).collect(),
        }
    }

    /// Score of `team`, or `None` when the team is not on the ledger.
    pub fn score(&self, team: &str) -> Option<i64> {
        self.scores.get(team).copied()
    }

    /// Iterate over `(team, score)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(team, score)| (team.as_str(), *score))
    }

    fn set(&mut self, team: &str, score: i64) {
        if let Some(slot) = self.scores.get_mut(team) {
            *slot = score;
        }
    }

    fn zero_all(&mut self) {
        self.scores.values_mut().for_each(|score| *score = 0);
    }
}

impl From<IndexMap<String, i64>> for ScoreLedger {
    fn from(scores: IndexMap<String, i64>) -> Self {
        Self { scores }
    }
}

impl From<ScoreLedger> for IndexMap<String, i64> {
    fn from(ledger: ScoreLedger) -> Self {
        ledger.scores
    }
}

/// Immutable audit record of one committed score change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Moment the change was committed.
    pub timestamp: OffsetDateTime,
    /// Admin identity that confirmed the change.
    pub actor: String,
    pub team: String,
    pub delta: i64,
    pub note: Option<String>,
}

/// Score change requested against the board, before it is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreChange {
    pub team: String,
    pub delta: i64,
    pub note: Option<String>,
}

impl ScoreChange {
    pub fn new(team: impl Into<String>, delta: i64, note: Option<String>) -> Self {
        Self {
            team: team.into(),
            delta,
            note: normalize_note(note),
        }
    }
}

/// Blank notes carry no information and are stored as absent.
fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|text| !text.trim().is_empty())
}

/// Result of applying a [`ScoreChange`] to a [`BoardState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The ledger was updated and the entry appended to the history log.
    Applied(HistoryEntry),
    /// The change targeted a team outside the configured set; nothing changed.
    UnknownTeam,
    /// The new score would not fit in an `i64`; nothing changed.
    OutOfRange,
}

/// Aggregate persisted between sessions: ledger, history log and last update.
///
/// `last_update` is `None` exactly when `history` is empty, otherwise it holds the
/// timestamp of the most recent entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub ledger: ScoreLedger,
    /// Committed changes, oldest first. Append-only apart from reset.
    pub history: Vec<HistoryEntry>,
    pub last_update: Option<OffsetDateTime>,
}

impl BoardState {
    /// Fresh board: every team at zero, empty log, no last update.
    pub fn new(teams: &[Team]) -> Self {
        Self {
            ledger: ScoreLedger::zeroed(teams),
            history: Vec::new(),
            last_update: None,
        }
    }

    /// Apply `change` on behalf of `actor`, stamping the history entry with `at`.
    ///
    /// Unknown teams and overflowing scores leave the board untouched. A zero delta is
    /// accepted and still recorded in the history log.
    pub fn apply_change(
        &mut self,
        change: ScoreChange,
        actor: &str,
        at: OffsetDateTime,
    ) -> ChangeOutcome {
        let ScoreChange { team, delta, note } = change;
        let Some(current) = self.ledger.score(&team) else {
            return ChangeOutcome::UnknownTeam;
        };
        let Some(updated) = current.checked_add(delta) else {
            return ChangeOutcome::OutOfRange;
        };
        self.ledger.set(&team, updated);

        let entry = HistoryEntry {
            timestamp: at,
            actor: actor.to_owned(),
            team,
            delta,
            note: normalize_note(note),
        };
        self.history.push(entry.clone());
        self.last_update = Some(at);
        ChangeOutcome::Applied(entry)
    }

    /// Zero every score and drop the whole history log. Irreversible.
    pub fn reset_all(&mut self) {
        self.ledger.zero_all();
        self.history.clear();
        self.last_update = None;
    }

    /// Align the ledger with the configured teams.
    ///
    /// Missing teams are added at zero and entries for teams no longer configured are
    /// dropped. Returns the names of the dropped teams.
    pub fn normalize(&mut self, teams: &[Team]) -> Vec<String> {
        let mut previous: IndexMap<String, i64> = std::mem::take(&mut self.ledger).into();
        let scores = teams
            .iter()
            .map(|team| {
                let score = previous.shift_remove(&team.name).unwrap_or(0);
                (team.name.clone(), score)
            })
            .collect::<IndexMap<_, _>>();
        self.ledger = scores.into();
        previous.into_keys().collect()
    }

    /// Timestamp that `last_update` must hold according to the history log.
    pub fn expected_last_update(&self) -> Option<OffsetDateTime> {
        self.history.last().map(|entry| entry.timestamp)
    }
}
