use tracing::{Instrument, debug, info_span, warn};
use validator::Validate;

use crate::{
    console::csv,
    dto::{
        admin::{PendingChangeSummary, ResetRequest, StageRequest},
        console::{ConsoleCommand, ConsoleReply, Notice, SessionSummary},
        public::ScoreboardView,
    },
    error::ServiceError,
    services::{
        auth_service, export_service, public_service, score_service, staging_service,
    },
    state::{SessionContext, SharedState, board::BoardState},
};

/// Presentation controller for one console: owns the session context and gates every
/// command on the session identity before calling into the services.
pub struct ConsoleHandler {
    state: SharedState,
    session: SessionContext,
}

impl ConsoleHandler {
    /// Handler with a fresh, unauthenticated session.
    pub fn new(state: SharedState) -> Self {
        Self {
            state,
            session: SessionContext::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Parse one input line and run it. Malformed input yields an error notice.
    pub async fn handle_line(&mut self, line: &str) -> ConsoleReply {
        match serde_json::from_str::<ConsoleCommand>(line) {
            Ok(command) => self.handle(command).await,
            Err(err) => {
                debug!(error = %err, "rejecting malformed command");
                Notice::error(format!("malformed command: {err}")).into()
            }
        }
    }

    /// Run `command` against the session and the board.
    pub async fn handle(&mut self, command: ConsoleCommand) -> ConsoleReply {
        let span = info_span!("command", session_id = %self.session.id());
        match self.dispatch(command).instrument(span).await {
            Ok(reply) => reply,
            Err(err) => {
                if matches!(err, ServiceError::Unavailable(_) | ServiceError::Encoding(_)) {
                    warn!(error = %err, "command failed");
                }
                err.into()
            }
        }
    }

    async fn dispatch(&mut self, command: ConsoleCommand) -> Result<ConsoleReply, ServiceError> {
        match command {
            ConsoleCommand::Login { identity, secret } => {
                auth_service::authenticate(&self.state, &mut self.session, &identity, &secret)?;
                Ok(self.session_reply())
            }
            ConsoleCommand::Visitor => {
                auth_service::enter_visitor_mode(&mut self.session);
                Ok(self.session_reply())
            }
            ConsoleCommand::Logout => {
                auth_service::logout(&mut self.session);
                Ok(self.session_reply())
            }
            ConsoleCommand::Whoami => Ok(self.session_reply()),
            ConsoleCommand::Stage(request) => self.stage(request),
            ConsoleCommand::Confirm => self.confirm().await,
            ConsoleCommand::Cancel => Ok(self.cancel()),
            ConsoleCommand::Reset(request) => self.reset(request).await,
            ConsoleCommand::Scoreboard => {
                auth_service::require_viewer(&self.session)?;
                let view = public_service::get_scoreboard(&self.state).await?;
                Ok(ConsoleReply::Scoreboard(view))
            }
            ConsoleCommand::Standings => {
                auth_service::require_viewer(&self.session)?;
                let standings = public_service::get_standings(&self.state).await?;
                Ok(ConsoleReply::Standings { standings })
            }
            ConsoleCommand::History { limit } => {
                auth_service::require_viewer(&self.session)?;
                let view = public_service::get_history(&self.state, limit).await?;
                Ok(ConsoleReply::History(view))
            }
            ConsoleCommand::Export => self.export().await,
            ConsoleCommand::Unknown => Ok(Notice::warning("unknown command").into()),
        }
    }

    fn session_reply(&self) -> ConsoleReply {
        ConsoleReply::Session(SessionSummary::from(self.session.identity()))
    }

    fn scoreboard_reply(&self, board: &BoardState) -> ConsoleReply {
        ConsoleReply::Scoreboard(ScoreboardView::build(self.state.config().teams(), board))
    }

    fn stage(&mut self, request: StageRequest) -> Result<ConsoleReply, ServiceError> {
        auth_service::require_admin(&self.session)?;
        request.validate()?;

        let StageRequest { team, delta, note } = request;
        if self.state.config().team(&team).is_none() {
            return Err(ServiceError::InvalidInput(format!("unknown team: {team}")));
        }
        let pending = staging_service::stage(&mut self.session, &team, delta, note);
        Ok(ConsoleReply::Staged {
            pending: PendingChangeSummary::from(&pending),
        })
    }

    async fn confirm(&mut self) -> Result<ConsoleReply, ServiceError> {
        let actor = auth_service::require_admin(&self.session)?.to_string();
        match staging_service::confirm(&self.state, &mut self.session, &actor).await? {
            Some(board) => Ok(self.scoreboard_reply(&board)),
            None => Ok(Notice::info("no pending change to confirm").into()),
        }
    }

    fn cancel(&mut self) -> ConsoleReply {
        match staging_service::cancel(&mut self.session) {
            Some(change) => Notice::info(format!(
                "change cancelled: {} {:+}",
                change.team, change.delta
            ))
            .into(),
            None => Notice::info("no pending change to cancel").into(),
        }
    }

    async fn reset(&mut self, request: ResetRequest) -> Result<ConsoleReply, ServiceError> {
        auth_service::require_admin(&self.session)?;
        if !request.confirm {
            return Ok(Notice::warning(
                "reset wipes every score and the whole history; resend with \"confirm\": true",
            )
            .into());
        }

        let board = score_service::reset_all(&self.state).await?;
        Ok(self.scoreboard_reply(&board))
    }

    async fn export(&mut self) -> Result<ConsoleReply, ServiceError> {
        auth_service::require_admin(&self.session)?;
        let rows = export_service::export_history(&self.state).await?;

        let config = self.state.config();
        match csv::write_export(config.export_dir(), &rows).await {
            Ok(path) => Ok(ConsoleReply::Exported {
                path: path.display().to_string(),
                rows: rows.len(),
            }),
            Err(err) => {
                warn!(
                    dir = %config.export_dir().display(),
                    error = %err,
                    "failed to write history export"
                );
                Ok(Notice::error(format!("failed to write history export: {err}")).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::datetime;

    use super::*;
    use crate::{
        config::{AdminCredential, AppConfig},
        dao::kv_store::MemoryKvStore,
        dto::console::NoticeLevel,
        state::{AppState, SessionIdentity, board::Team, clock::FixedClock},
    };

    fn handler(export_dir: &std::path::Path) -> ConsoleHandler {
        let config = AppConfig::new(
            vec![Team::new("RED", "#e53935"), Team::new("BLUE", "#1e88e5")],
            vec![AdminCredential::new("Pailin", "secret")],
        )
        .with_export_dir(export_dir);
        ConsoleHandler::new(AppState::with_clock(
            config,
            Arc::new(MemoryKvStore::new()),
            Arc::new(FixedClock(datetime!(2026-10-17 12:00:00 UTC))),
        ))
    }

    fn notice_level(reply: &ConsoleReply) -> Option<&NoticeLevel> {
        match reply {
            ConsoleReply::Notice(notice) => Some(&notice.level),
            _ => None,
        }
    }

    async fn send(handler: &mut ConsoleHandler, line: &str) -> ConsoleReply {
        handler.handle_line(line).await
    }

    #[tokio::test]
    async fn anonymous_session_cannot_read_or_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());

        let reply = send(&mut handler, r#"{"type":"scoreboard"}"#).await;
        assert_eq!(notice_level(&reply), Some(&NoticeLevel::Warning));

        let reply = send(&mut handler, r#"{"type":"stage","team":"RED","delta":1}"#).await;
        assert_eq!(notice_level(&reply), Some(&NoticeLevel::Warning));
    }

    #[tokio::test]
    async fn visitor_reads_but_cannot_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        send(&mut handler, r#"{"type":"visitor"}"#).await;

        let reply = send(&mut handler, r#"{"type":"scoreboard"}"#).await;
        assert!(matches!(reply, ConsoleReply::Scoreboard(_)));

        let reply = send(&mut handler, r#"{"type":"stage","team":"RED","delta":1}"#).await;
        assert_eq!(notice_level(&reply), Some(&NoticeLevel::Warning));
        assert!(handler.session().pending().is_none());
    }

    #[tokio::test]
    async fn admin_stages_and_confirms_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        let reply = send(
            &mut handler,
            r#"{"type":"login","identity":"Pailin","secret":"secret"}"#,
        )
        .await;
        assert_eq!(
            reply,
            ConsoleReply::Session(SessionSummary::Admin {
                identity: "Pailin".into()
            })
        );

        let reply = send(
            &mut handler,
            r#"{"type":"stage","team":"BLUE","delta":10,"note":"kickoff"}"#,
        )
        .await;
        assert!(matches!(reply, ConsoleReply::Staged { .. }));

        let ConsoleReply::Scoreboard(view) = send(&mut handler, r#"{"type":"confirm"}"#).await
        else {
            panic!("expected scoreboard after confirm");
        };
        assert_eq!(view.leaders, vec!["BLUE".to_string()]);
        assert_eq!(view.history_len, 1);
        assert!(handler.session().pending().is_none());
    }

    #[tokio::test]
    async fn zero_delta_is_rejected_at_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        send(
            &mut handler,
            r#"{"type":"login","identity":"Pailin","secret":"secret"}"#,
        )
        .await;

        let reply = send(&mut handler, r#"{"type":"stage","team":"BLUE","delta":0}"#).await;

        assert_eq!(notice_level(&reply), Some(&NoticeLevel::Warning));
        assert!(handler.session().pending().is_none());
    }

    #[tokio::test]
    async fn unconfigured_team_cannot_be_staged() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        send(
            &mut handler,
            r#"{"type":"login","identity":"Pailin","secret":"secret"}"#,
        )
        .await;

        let reply = send(&mut handler, r#"{"type":"stage","team":"PURPLE","delta":4}"#).await;

        assert_eq!(
            reply,
            ConsoleReply::Notice(Notice::warning("invalid input: unknown team: PURPLE"))
        );
        assert!(handler.session().pending().is_none());
    }

    #[tokio::test]
    async fn cancel_reports_the_discarded_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        send(
            &mut handler,
            r#"{"type":"login","identity":"Pailin","secret":"secret"}"#,
        )
        .await;
        send(&mut handler, r#"{"type":"stage","team":"RED","delta":-2}"#).await;

        let reply = send(&mut handler, r#"{"type":"cancel"}"#).await;

        assert_eq!(
            reply,
            ConsoleReply::Notice(Notice::info("change cancelled: RED -2"))
        );
    }

    #[tokio::test]
    async fn reset_requires_explicit_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        send(
            &mut handler,
            r#"{"type":"login","identity":"Pailin","secret":"secret"}"#,
        )
        .await;
        send(&mut handler, r#"{"type":"stage","team":"RED","delta":3}"#).await;
        send(&mut handler, r#"{"type":"confirm"}"#).await;

        let reply = send(&mut handler, r#"{"type":"reset"}"#).await;
        assert_eq!(notice_level(&reply), Some(&NoticeLevel::Warning));

        let ConsoleReply::Scoreboard(view) =
            send(&mut handler, r#"{"type":"reset","confirm":true}"#).await
        else {
            panic!("expected scoreboard after reset");
        };
        assert_eq!(view.history_len, 0);
        assert!(view.teams.iter().all(|team| team.score == 0));
    }

    #[tokio::test]
    async fn export_writes_csv_or_reports_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        send(
            &mut handler,
            r#"{"type":"login","identity":"Pailin","secret":"secret"}"#,
        )
        .await;

        let reply = send(&mut handler, r#"{"type":"export"}"#).await;
        assert_eq!(
            reply,
            ConsoleReply::Notice(Notice::warning(ServiceError::EmptyExport.to_string()))
        );
        assert!(!dir.path().join("score_history.csv").exists());

        send(&mut handler, r#"{"type":"stage","team":"BLUE","delta":5}"#).await;
        send(&mut handler, r#"{"type":"confirm"}"#).await;
        let reply = send(&mut handler, r#"{"type":"export"}"#).await;

        assert!(matches!(reply, ConsoleReply::Exported { rows: 1, .. }));
        let contents = std::fs::read_to_string(dir.path().join("score_history.csv")).unwrap();
        assert!(contents.contains("2026-10-17 12:00:00,BLUE,+5,Pailin,"));
    }

    #[tokio::test]
    async fn logout_clears_identity_and_pending_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());
        send(
            &mut handler,
            r#"{"type":"login","identity":"Pailin","secret":"secret"}"#,
        )
        .await;
        send(&mut handler, r#"{"type":"stage","team":"RED","delta":3}"#).await;

        let reply = send(&mut handler, r#"{"type":"logout"}"#).await;

        assert_eq!(reply, ConsoleReply::Session(SessionSummary::None));
        assert_eq!(handler.session().identity(), &SessionIdentity::None);
        assert!(handler.session().pending().is_none());
    }

    #[tokio::test]
    async fn malformed_and_unknown_commands_produce_notices() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler(dir.path());

        let reply = send(&mut handler, "not json").await;
        assert_eq!(notice_level(&reply), Some(&NoticeLevel::Error));

        let reply = send(&mut handler, r#"{"type":"undo"}"#).await;
        assert_eq!(reply, ConsoleReply::Notice(Notice::warning("unknown command")));
    }
}
