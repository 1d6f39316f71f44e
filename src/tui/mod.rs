//! Terminal UI for the Othello client

mod app;
mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use othello_client::{ClientConfig, GameSession, HttpGameServer, Position, SessionEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use app::App;

type Session = GameSession<HttpGameServer>;

/// Run the TUI client
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create("othello_client_tui.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(server_url = %config.server_url(), "Starting Othello TUI");

    // The session reports every change through this channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let server = HttpGameServer::new(&config)?;
    let session = Arc::new(GameSession::new(server, &config, Arc::new(event_tx)));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_game(&mut terminal, session, event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Draws session state and turns key presses into session calls.
#[instrument(skip_all)]
async fn run_game(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    session: Arc<Session>,
    mut event_rx: mpsc::UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    let mut app = App::new();
    spawn_refresh(&session);

    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        // Check for keyboard input (non-blocking)
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("User quit");
                return Ok(());
            }
            KeyCode::Char('r') => spawn_refresh(&session),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let position = app.cursor();
                if session.is_turn_pending() {
                    app.set_status("CPU is still playing, please wait");
                } else {
                    app.set_status(format!("Playing {}...", position));
                    spawn_move(&session, position);
                }
            }
            code => app.handle_key(code),
        }
    }
}

fn spawn_refresh(session: &Arc<Session>) {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        let report = session.refresh().await;
        if !report.is_complete() {
            warn!(failed = report.failures.len(), "Refresh incomplete");
        }
    });
}

fn spawn_move(session: &Arc<Session>, position: Position) {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        match session.submit_move(position).await {
            Ok(outcome) => debug!(?outcome, "Turn finished"),
            Err(e) => warn!(error = %e, %position, "Turn ended with error"),
        }
    });
}
