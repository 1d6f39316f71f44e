//! One game as seen from the client: board, scores and turn state.

use crate::board::BoardModel;
use crate::config::ClientConfig;
use crate::coordinator::{CpuOutcome, MoveCoordinator, TurnOutcome};
use crate::error::SessionError;
use crate::observer::SessionObserver;
use crate::protocol::{Position, Sentinels};
use crate::refresh::{Refresh, RefreshContext, RefreshReport};
use crate::score::ScoreAggregator;
use crate::server::GameServer;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Top-level synchronizer between the rules server and a renderer.
///
/// The session exclusively owns its board and scores. Renderers learn
/// about changes through the [`SessionObserver`] passed at construction
/// or take snapshots with [`GameSession::board`] and
/// [`GameSession::scores`].
pub struct GameSession<S> {
    server: S,
    sentinels: Sentinels,
    refresh_retries: u32,
    board: Mutex<BoardModel>,
    scores: Mutex<ScoreAggregator>,
    coordinator: MoveCoordinator,
    observer: Arc<dyn SessionObserver>,
}

impl<S: GameServer> GameSession<S> {
    /// Creates a session with an empty board.
    #[instrument(skip_all, fields(server_url = %config.server_url()))]
    pub fn new(server: S, config: &ClientConfig, observer: Arc<dyn SessionObserver>) -> Self {
        info!("Creating game session");
        Self {
            server,
            sentinels: config.sentinels().clone(),
            refresh_retries: *config.refresh_retries(),
            board: Mutex::new(BoardModel::new()),
            scores: Mutex::new(ScoreAggregator::new()),
            coordinator: MoveCoordinator::new(
                config.sentinels().clone(),
                *config.max_consecutive_passes(),
                Arc::clone(&observer),
            ),
            observer,
        }
    }

    /// Re-reads the board and both scores.
    ///
    /// Board and score queries run concurrently with no ordering between
    /// them. Overlapping refreshes of the same model queue behind each other.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshReport {
        let ctx = RefreshContext {
            sentinels: &self.sentinels,
            retries: self.refresh_retries,
            observer: self.observer.as_ref(),
        };

        let board = async {
            let mut board = self.board.lock().await;
            board.refresh(&self.server, ctx).await
        };
        let scores = async {
            let mut scores = self.scores.lock().await;
            scores.refresh(&self.server, ctx).await
        };
        let (board_report, score_report) = tokio::join!(board, scores);

        let report = board_report.merge(score_report);
        debug!(
            changed = report.changed,
            failed = report.failures.len(),
            "Session refreshed"
        );
        report
    }

    /// Submits a human move and, if accepted, plays out the CPU's reply.
    #[instrument(skip(self))]
    pub async fn submit_move(&self, position: Position) -> Result<TurnOutcome, SessionError> {
        self.coordinator
            .submit_move(&self.server, self, position)
            .await
    }

    /// Lets the CPU move without a preceding human move.
    #[instrument(skip(self))]
    pub async fn run_cpu_loop(&self) -> Result<CpuOutcome, SessionError> {
        self.coordinator.run_cpu_loop(&self.server, self).await
    }

    /// True while a move submission or CPU turn is outstanding.
    pub fn is_turn_pending(&self) -> bool {
        self.coordinator.is_turn_pending()
    }

    /// Snapshot of the board.
    pub async fn board(&self) -> BoardModel {
        self.board.lock().await.clone()
    }

    /// Snapshot of the scores.
    pub async fn scores(&self) -> ScoreAggregator {
        self.scores.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl<S: GameServer> Refresh for GameSession<S> {
    async fn refresh(&self) -> RefreshReport {
        GameSession::refresh(self).await
    }
}
