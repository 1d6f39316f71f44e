//! Othello client library - keeps a local board in sync with a rules server
//!
//! The server owns the rules, legality checks and the CPU opponent. This
//! crate polls it for board and score state, submits human moves and
//! drives the hand-off to the CPU, including chains of passes.
//!
//! # Architecture
//!
//! - **Protocol**: coordinates, colors and the sentinel vocabulary
//! - **Server**: the four server queries, over HTTP or any other transport
//! - **Board / Score**: the models refreshed from server answers
//! - **Coordinator**: move submission and the CPU-response loop
//! - **Session**: composes the above and notifies an observer of changes
//!
//! # Example
//!
//! ```no_run
//! use othello_client::{ClientConfig, GameSession, HttpGameServer, NoopObserver, Position};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let server = HttpGameServer::new(&config)?;
//! let session = GameSession::new(server, &config, Arc::new(NoopObserver));
//!
//! session.refresh().await;
//! session.submit_move(Position::new(2, 3)?).await?;
//! println!("{}", session.board().await.render());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod config;
mod coordinator;
mod error;
mod observer;
mod protocol;
mod refresh;
mod score;
mod server;
mod session;

// Crate-level exports - Protocol vocabulary
pub use protocol::{
    BOARD_SIZE, CELL_COUNT, Color, CpuAnswer, MoveAnswer, Position, Sentinels,
};

// Crate-level exports - Errors
pub use error::{ProtocolError, ProtocolErrorKind, SessionError};

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, SERVER_URL_ENV};

// Crate-level exports - Server transport
pub use server::{GameServer, HttpGameServer};

// Crate-level exports - Models
pub use board::{BoardModel, CellState, Occupancy};
pub use score::{Score, ScoreAggregator};

// Crate-level exports - Session and turn flow
pub use coordinator::{CpuOutcome, MoveCoordinator, TurnOutcome};
pub use observer::{NoopObserver, RefreshTarget, SessionEvent, SessionObserver};
pub use refresh::{RETRY_BACKOFF, Refresh, RefreshContext, RefreshFailure, RefreshReport};
pub use session::GameSession;
