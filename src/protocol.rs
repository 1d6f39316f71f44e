//! Board coordinates, piece colors and the server's wire vocabulary.

use crate::error::SessionError;
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: u8 = 8;

/// Number of squares on the board.
pub const CELL_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Piece color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// The human side.
    Black,
    /// The CPU side.
    White,
}

/// A square on the 8x8 board, always in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("({row}, {col})")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, rejecting coordinates outside the board.
    pub fn new(row: u8, col: u8) -> Result<Self, SessionError> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Self { row, col })
        } else {
            Err(SessionError::InvalidPosition { row, col })
        }
    }

    /// Row index (0-7).
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column index (0-7).
    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major index (0-63).
    pub fn index(self) -> usize {
        usize::from(self.row) * usize::from(BOARD_SIZE) + usize::from(self.col)
    }

    /// All 64 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }

    /// Neighbouring position, or `None` past the edge.
    pub fn offset(self, rows: i8, cols: i8) -> Option<Position> {
        let row = self.row.checked_add_signed(rows)?;
        let col = self.col.checked_add_signed(cols)?;
        Position::new(row, col).ok()
    }
}

/// Interpreted answer to a move submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveAnswer {
    /// The server refused the move as illegal.
    Rejected,
    /// The move was played; the payload is the server's opaque acknowledgement.
    Accepted(String),
}

/// Interpreted answer to a CPU-turn request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuAnswer {
    /// The human has no reply, so the CPU moves again.
    Pass,
    /// The CPU moved and the turn is back with the human.
    Moved(String),
}

/// The wire vocabulary: piece codes and the two structural sentinels.
///
/// Every other answer is free-form text. Sentinel comparison ignores
/// surrounding whitespace; other answers are kept exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_new::new)]
#[serde(default)]
pub struct Sentinels {
    /// Code for a black piece.
    black: String,
    /// Code for a white piece.
    white: String,
    /// Move-submission answer meaning "illegal move".
    rejected: String,
    /// CPU-turn answer meaning "you pass".
    pass: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            black: "x".to_string(),
            white: "o".to_string(),
            rejected: "0".to_string(),
            pass: "you pass".to_string(),
        }
    }
}

impl Sentinels {
    /// Wire code used for `color` in score queries.
    pub fn code(&self, color: Color) -> &str {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// Which color occupies a cell, if the answer names one.
    #[instrument(level = "trace", skip(self))]
    pub fn occupancy(&self, answer: &str) -> Option<Color> {
        let answer = answer.trim();
        if answer == self.black {
            Some(Color::Black)
        } else if answer == self.white {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Interprets a move-submission answer.
    #[instrument(skip(self))]
    pub fn move_answer(&self, answer: String) -> MoveAnswer {
        if answer.trim() == self.rejected {
            MoveAnswer::Rejected
        } else {
            MoveAnswer::Accepted(answer)
        }
    }

    /// Interprets a CPU-turn answer.
    #[instrument(skip(self))]
    pub fn cpu_answer(&self, answer: String) -> CpuAnswer {
        if answer.trim() == self.pass {
            CpuAnswer::Pass
        } else {
            CpuAnswer::Moved(answer)
        }
    }
}
