//! Stateless UI rendering for the Othello board.

use othello_client::{BOARD_SIZE, Color, Occupancy, Position};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color as UiColor, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::app::App;

/// Draws the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Min(11),    // Board
            Constraint::Length(3),  // Scores
            Constraint::Length(3),  // Status
            Constraint::Length(3),  // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Othello")
        .style(Style::default().fg(UiColor::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], app);

    let scores = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(UiColor::Black).bg(UiColor::Green)),
        Span::raw(format!(" = {}     ", app.score(Color::Black))),
        Span::styled("● ", Style::default().fg(UiColor::White).bg(UiColor::Green)),
        Span::raw(format!(" = {}", app.score(Color::White))),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Score"));
    frame.render_widget(scores, chunks[2]);

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(UiColor::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new("Arrows/hjkl: Move | Enter/Space: Play | R: Refresh | Q: Quit")
        .style(Style::default().fg(UiColor::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[4]);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::with_capacity(usize::from(BOARD_SIZE) + 1);

    let mut header = vec![Span::raw("  ")];
    for col in 0..BOARD_SIZE {
        header.push(Span::styled(
            format!(" {} ", col),
            Style::default().fg(UiColor::DarkGray),
        ));
    }
    lines.push(Line::from(header));

    for row in 0..BOARD_SIZE {
        let mut spans = vec![Span::styled(
            format!("{} ", row),
            Style::default().fg(UiColor::DarkGray),
        )];
        for position in Position::all().filter(|p| p.row() == row) {
            spans.push(cell_span(app, position));
        }
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Board"));
    frame.render_widget(board, area);
}

fn cell_span(app: &App, position: Position) -> Span<'static> {
    let (symbol, base_style) = match app.occupancy(position) {
        Occupancy::Empty => (" · ", Style::default().fg(UiColor::DarkGray)),
        Occupancy::Black => (
            " ● ",
            Style::default().fg(UiColor::Black).add_modifier(Modifier::BOLD),
        ),
        Occupancy::White => (
            " ● ",
            Style::default().fg(UiColor::White).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if position == app.cursor() {
        base_style.bg(UiColor::Yellow)
    } else {
        base_style.bg(UiColor::Green)
    };

    Span::styled(symbol, style)
}
