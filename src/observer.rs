//! Change notifications for whatever renders the session.

use crate::board::CellState;
use crate::error::ProtocolError;
use crate::protocol::{Color, Position};
use crate::score::Score;
use derive_more::Display;
use tokio::sync::mpsc;
use tracing::debug;

/// What a failed refresh query was reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RefreshTarget {
    /// A board square.
    #[display("cell {_0}")]
    Cell(Position),
    /// A color's score.
    #[display("{_0} score")]
    Score(Color),
}

/// Messages sent from the session to the renderer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A square's occupancy changed.
    CellChanged(CellState),
    /// A score value changed.
    ScoreChanged(Score),
    /// A cell or score query failed after its retries.
    RefreshFailed {
        /// What was being read.
        target: RefreshTarget,
        /// Why it failed.
        error: ProtocolError,
    },
    /// A move was refused because another turn is still running.
    Busy(Position),
    /// The server refused the move as illegal.
    MoveRejected(Position),
    /// The server accepted the move.
    MoveAccepted {
        /// Where the human played.
        position: Position,
        /// Opaque acknowledgement.
        ack: String,
    },
    /// The human had no reply and the CPU is asked to move again.
    CpuPassed {
        /// Consecutive passes so far in this turn.
        passes: u32,
    },
    /// The CPU finished its turn.
    CpuMoved {
        /// Opaque acknowledgement.
        ack: String,
    },
    /// A move submission or CPU turn aborted.
    TurnFailed(String),
}

/// Receives [`SessionEvent`]s. Implementations must not block.
pub trait SessionObserver: Send + Sync {
    /// Called once per event, in the order the session produced them.
    fn on_event(&self, event: SessionEvent);
}

impl SessionObserver for mpsc::UnboundedSender<SessionEvent> {
    fn on_event(&self, event: SessionEvent) {
        if self.send(event).is_err() {
            debug!("Observer channel closed, dropping event");
        }
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_event(&self, _event: SessionEvent) {}
}
