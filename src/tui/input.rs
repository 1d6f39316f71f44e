//! Cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use othello_client::Position;

/// Moves cursor based on arrow keys (or vi keys), stopping at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (rows, cols) = match key {
        KeyCode::Up | KeyCode::Char('k') => (-1, 0),
        KeyCode::Down | KeyCode::Char('j') => (1, 0),
        KeyCode::Left | KeyCode::Char('h') => (0, -1),
        KeyCode::Right | KeyCode::Char('l') => (0, 1),
        _ => return cursor,
    };
    cursor.offset(rows, cols).unwrap_or(cursor)
}
