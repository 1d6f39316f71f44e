//! The 8x8 board as last reported by the server.

use crate::observer::{RefreshTarget, SessionEvent};
use crate::protocol::{BOARD_SIZE, CELL_COUNT, Color, Position};
use crate::refresh::{RefreshContext, RefreshReport, with_retries};
use crate::server::GameServer;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// What sits on a square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    /// No piece reported yet.
    #[default]
    Empty,
    /// A black piece.
    Black,
    /// A white piece.
    White,
}

impl Occupancy {
    /// Color of the piece, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Occupancy::Empty => None,
            Occupancy::Black => Some(Color::Black),
            Occupancy::White => Some(Color::White),
        }
    }
}

impl From<Color> for Occupancy {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Occupancy::Black,
            Color::White => Occupancy::White,
        }
    }
}

/// One square and its occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_new::new)]
pub struct CellState {
    position: Position,
    occupancy: Occupancy,
}

impl CellState {
    /// Where the square is.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Row index (0-7).
    pub fn row(&self) -> u8 {
        self.position.row()
    }

    /// Column index (0-7).
    pub fn col(&self) -> u8 {
        self.position.col()
    }

    /// What sits on it.
    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }
}

/// All 64 squares, each present exactly once in row-major order.
///
/// Squares only ever move from empty to a color or between colors; the
/// server has no answer that clears a square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardModel {
    cells: [CellState; CELL_COUNT],
}

impl Default for BoardModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardModel {
    /// Creates an all-empty board.
    pub fn new() -> Self {
        let mut cells = [CellState::new(Position::default(), Occupancy::Empty); CELL_COUNT];
        for position in Position::all() {
            cells[position.index()] = CellState::new(position, Occupancy::Empty);
        }
        Self { cells }
    }

    /// State of one square.
    pub fn cell(&self, position: Position) -> CellState {
        self.cells[position.index()]
    }

    /// All squares in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Number of squares holding `color`.
    pub fn count(&self, color: Color) -> usize {
        let occupancy = Occupancy::from(color);
        self.cells
            .iter()
            .filter(|cell| cell.occupancy == occupancy)
            .count()
    }

    /// Puts a `color` piece on `position`. Returns the cell if it changed.
    pub fn apply(&mut self, position: Position, color: Color) -> Option<CellState> {
        let cell = &mut self.cells[position.index()];
        let occupancy = Occupancy::from(color);
        if cell.occupancy == occupancy {
            return None;
        }
        cell.occupancy = occupancy;
        Some(*cell)
    }

    /// Asks the server about every square at once and applies each answer
    /// as it arrives.
    ///
    /// Answers land in completion order, not board order. A color code
    /// sets the square; anything else leaves it untouched. A square whose
    /// query keeps failing is reported without holding up the others.
    #[instrument(skip_all)]
    pub async fn refresh<S: GameServer + ?Sized>(
        &mut self,
        server: &S,
        ctx: RefreshContext<'_>,
    ) -> RefreshReport {
        let retries = ctx.retries;
        let mut pending: FuturesUnordered<_> = Position::all()
            .map(move |position| async move {
                let answer = with_retries(retries, || server.cell(position)).await;
                (position, answer)
            })
            .collect();

        let mut report = RefreshReport::default();
        while let Some((position, answer)) = pending.next().await {
            match answer {
                Ok(answer) => match ctx.sentinels.occupancy(&answer) {
                    Some(color) => {
                        if let Some(cell) = self.apply(position, color) {
                            report.changed += 1;
                            ctx.observer.on_event(SessionEvent::CellChanged(cell));
                        }
                    }
                    None => trace!(%position, answer = %answer, "No piece reported"),
                },
                Err(error) => {
                    report.record_failure(RefreshTarget::Cell(position), error, ctx.observer)
                }
            }
        }

        debug!(
            changed = report.changed,
            failed = report.failures.len(),
            "Board refreshed"
        );
        report
    }

    /// Formats the board as a text grid with row and column labels.
    pub fn render(&self) -> String {
        let mut result = String::from(" ");
        for col in 0..BOARD_SIZE {
            result.push_str(&format!(" {}", col));
        }
        for row in self.cells.chunks(usize::from(BOARD_SIZE)) {
            result.push('\n');
            result.push_str(&row[0].row().to_string());
            for cell in row {
                let symbol = match cell.occupancy {
                    Occupancy::Empty => '.',
                    Occupancy::Black => 'x',
                    Occupancy::White => 'o',
                };
                result.push(' ');
                result.push(symbol);
            }
        }
        result
    }
}
