//! Move submission and the CPU-response loop.

use crate::error::{ProtocolError, SessionError};
use crate::observer::{SessionEvent, SessionObserver};
use crate::protocol::{CpuAnswer, MoveAnswer, Position, Sentinels};
use crate::refresh::Refresh;
use crate::server::GameServer;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// How the CPU's turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuOutcome {
    /// Pass answers received before the final one.
    pub passes: u32,
    /// Opaque acknowledgement of the final answer.
    pub ack: String,
}

/// How a move submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The server refused the move; nothing else happened.
    Rejected,
    /// The move was played and the CPU answered.
    Completed {
        /// Opaque acknowledgement of the move.
        ack: String,
        /// The CPU's turn that followed.
        cpu: CpuOutcome,
    },
}

/// Drives one turn at a time: the human move, then the CPU's reply chain.
///
/// A turn holds the gate from the move request until the CPU loop ends,
/// so a second submission while one is outstanding fails with
/// [`SessionError::Busy`] instead of interleaving with it.
pub struct MoveCoordinator {
    sentinels: Sentinels,
    max_consecutive_passes: u32,
    observer: Arc<dyn SessionObserver>,
    turn_gate: Mutex<()>,
}

impl MoveCoordinator {
    /// Creates a coordinator.
    pub fn new(
        sentinels: Sentinels,
        max_consecutive_passes: u32,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            sentinels,
            max_consecutive_passes,
            observer,
            turn_gate: Mutex::new(()),
        }
    }

    /// True while a move submission or CPU turn is outstanding.
    pub fn is_turn_pending(&self) -> bool {
        self.turn_gate.try_lock().is_err()
    }

    /// Submits a human move; on acceptance refreshes and runs the CPU loop.
    ///
    /// A rejected move triggers neither a refresh nor a CPU turn. A failed
    /// request leaves the board as it was.
    #[instrument(skip(self, server, refresher))]
    pub async fn submit_move<S, R>(
        &self,
        server: &S,
        refresher: &R,
        position: Position,
    ) -> Result<TurnOutcome, SessionError>
    where
        S: GameServer + ?Sized,
        R: Refresh + ?Sized,
    {
        let Ok(_turn) = self.turn_gate.try_lock() else {
            warn!(%position, "Move refused, a turn is already in progress");
            self.observer.on_event(SessionEvent::Busy(position));
            return Err(SessionError::Busy);
        };

        info!(%position, "Submitting move");
        let answer = server
            .play(position)
            .await
            .inspect_err(|e| self.report_failure("Move submission failed", e))?;

        match self.sentinels.move_answer(answer) {
            MoveAnswer::Rejected => {
                info!(%position, "Move rejected as illegal");
                self.observer.on_event(SessionEvent::MoveRejected(position));
                Ok(TurnOutcome::Rejected)
            }
            MoveAnswer::Accepted(ack) => {
                info!(%position, ack = %ack, "Move accepted");
                self.observer.on_event(SessionEvent::MoveAccepted {
                    position,
                    ack: ack.clone(),
                });
                refresher.refresh().await;
                let cpu = self.cpu_loop(server, refresher).await?;
                Ok(TurnOutcome::Completed { ack, cpu })
            }
        }
    }

    /// Asks the CPU to move, on its own, outside a move submission.
    #[instrument(skip_all)]
    pub async fn run_cpu_loop<S, R>(
        &self,
        server: &S,
        refresher: &R,
    ) -> Result<CpuOutcome, SessionError>
    where
        S: GameServer + ?Sized,
        R: Refresh + ?Sized,
    {
        let Ok(_turn) = self.turn_gate.try_lock() else {
            warn!("CPU turn refused, a turn is already in progress");
            return Err(SessionError::Busy);
        };
        self.cpu_loop(server, refresher).await
    }

    /// Requests CPU turns until an answer other than a pass arrives.
    ///
    /// Every answer is followed by a refresh. More than
    /// `max_consecutive_passes` passes is a protocol violation.
    async fn cpu_loop<S, R>(&self, server: &S, refresher: &R) -> Result<CpuOutcome, SessionError>
    where
        S: GameServer + ?Sized,
        R: Refresh + ?Sized,
    {
        let mut passes: u32 = 0;
        loop {
            debug!(passes, "Requesting CPU turn");
            let answer = server
                .respond()
                .await
                .inspect_err(|e| self.report_failure("CPU turn failed", e))?;

            match self.sentinels.cpu_answer(answer) {
                CpuAnswer::Pass => {
                    passes += 1;
                    if passes > self.max_consecutive_passes {
                        let err = ProtocolError::violation(format!(
                            "Server passed {} times in a row, limit is {}",
                            passes, self.max_consecutive_passes
                        ));
                        self.report_failure("CPU turn aborted", &err);
                        return Err(err.into());
                    }
                    info!(passes, "Human has no move, CPU moves again");
                    self.observer.on_event(SessionEvent::CpuPassed { passes });
                    refresher.refresh().await;
                }
                CpuAnswer::Moved(ack) => {
                    info!(passes, ack = %ack, "CPU turn complete");
                    self.observer
                        .on_event(SessionEvent::CpuMoved { ack: ack.clone() });
                    refresher.refresh().await;
                    return Ok(CpuOutcome { passes, ack });
                }
            }
        }
    }

    fn report_failure(&self, context: &str, err: &ProtocolError) {
        error!(error = %err, "{}", context);
        self.observer
            .on_event(SessionEvent::TurnFailed(format!("{}: {}", context, err)));
    }
}
