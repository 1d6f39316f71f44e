//! Application state and logic.

use crossterm::event::KeyCode;
use othello_client::{CELL_COUNT, Color, Occupancy, Position, SessionEvent};
use tracing::debug;

use super::input::move_cursor;

/// What the terminal shows, rebuilt purely from session events.
pub struct App {
    cells: [Occupancy; CELL_COUNT],
    black_score: String,
    white_score: String,
    cursor: Position,
    status_message: String,
}

impl App {
    /// Creates an empty view with the cursor near the centre.
    pub fn new() -> Self {
        Self {
            cells: [Occupancy::Empty; CELL_COUNT],
            black_score: String::new(),
            white_score: String::new(),
            cursor: Position::new(2, 3).unwrap_or_default(),
            status_message: "Loading board...".to_string(),
        }
    }

    /// What sits on `position`.
    pub fn occupancy(&self, position: Position) -> Occupancy {
        self.cells[position.index()]
    }

    /// Score text for `color`.
    pub fn score(&self, color: Color) -> &str {
        match color {
            Color::Black => &self.black_score,
            Color::White => &self.white_score,
        }
    }

    /// Square the next move goes to.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Replaces the status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Moves the cursor for an arrow key; other keys are ignored.
    pub fn handle_key(&mut self, key: KeyCode) {
        self.cursor = move_cursor(self.cursor, key);
    }

    /// Handles an event from the session.
    pub fn handle_event(&mut self, event: SessionEvent) {
        debug!(?event, "Handling session event");

        match event {
            SessionEvent::CellChanged(cell) => {
                self.cells[cell.position().index()] = cell.occupancy();
            }
            SessionEvent::ScoreChanged(score) => match score.color() {
                Color::Black => self.black_score = score.value().to_string(),
                Color::White => self.white_score = score.value().to_string(),
            },
            SessionEvent::RefreshFailed { target, error } => {
                self.status_message = format!("Could not read {}: {}", target, error.kind);
            }
            SessionEvent::Busy(position) => {
                self.status_message =
                    format!("CPU is still playing, move at {} ignored", position);
            }
            SessionEvent::MoveRejected(position) => {
                self.status_message = format!("{} is not a legal move", position);
            }
            SessionEvent::MoveAccepted { position, .. } => {
                self.status_message = format!("You played {}. CPU is thinking...", position);
            }
            SessionEvent::CpuPassed { passes } => {
                self.status_message =
                    format!("You have no move, CPU plays again (pass {})", passes);
            }
            SessionEvent::CpuMoved { .. } => {
                self.status_message = "Your move".to_string();
            }
            SessionEvent::TurnFailed(message) => {
                self.status_message = message;
            }
        }
    }
}
