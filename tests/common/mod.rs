//! Scripted in-process rules server shared by the integration tests.

#![allow(dead_code)]

use othello_client::{
    ClientConfig, Color, GameServer, Position, ProtocolError, Refresh, RefreshReport,
    SessionEvent,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore, mpsc};

/// Answers queries from fixed tables and queues, counting every call.
#[derive(Default)]
pub struct ScriptedServer {
    cells: HashMap<Position, String>,
    cell_failures: Mutex<HashMap<Position, VecDeque<ProtocolError>>>,
    scores: HashMap<Color, String>,
    score_failures: Mutex<HashMap<Color, VecDeque<ProtocolError>>>,
    play_answers: Mutex<VecDeque<Result<String, ProtocolError>>>,
    respond_answers: Mutex<VecDeque<Result<String, ProtocolError>>>,
    always_pass: bool,
    respond_gate: Option<Arc<Semaphore>>,
    pub respond_entered: Arc<Notify>,
    pub cell_queries: Mutex<Vec<Position>>,
    pub play_calls: AtomicUsize,
    pub respond_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
}

impl ScriptedServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell(mut self, row: u8, col: u8, answer: &str) -> Self {
        self.cells.insert(pos(row, col), answer.to_string());
        self
    }

    pub fn with_cell_failures(self, row: u8, col: u8, errors: Vec<ProtocolError>) -> Self {
        self.cell_failures
            .lock()
            .unwrap()
            .insert(pos(row, col), errors.into());
        self
    }

    pub fn with_score(mut self, color: Color, answer: &str) -> Self {
        self.scores.insert(color, answer.to_string());
        self
    }

    pub fn with_score_failures(self, color: Color, errors: Vec<ProtocolError>) -> Self {
        self.score_failures
            .lock()
            .unwrap()
            .insert(color, errors.into());
        self
    }

    pub fn with_play(self, answer: Result<&str, ProtocolError>) -> Self {
        self.play_answers
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
        self
    }

    pub fn with_respond(self, answers: &[&str]) -> Self {
        {
            let mut queue = self.respond_answers.lock().unwrap();
            for answer in answers {
                queue.push_back(Ok(answer.to_string()));
            }
        }
        self
    }

    pub fn with_respond_error(self, error: ProtocolError) -> Self {
        self.respond_answers.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn always_passing(mut self) -> Self {
        self.always_pass = true;
        self
    }

    /// Makes `respond` wait for a permit on `gate` before answering.
    pub fn with_respond_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.respond_gate = Some(gate);
        self
    }

    pub fn cell_query_count(&self) -> usize {
        self.cell_queries.lock().unwrap().len()
    }

    /// Full board refreshes seen so far.
    pub fn board_refreshes(&self) -> usize {
        self.cell_query_count() / 64
    }
}

#[async_trait::async_trait]
impl GameServer for ScriptedServer {
    async fn cell(&self, position: Position) -> Result<String, ProtocolError> {
        self.cell_queries.lock().unwrap().push(position);
        let failure = self
            .cell_failures
            .lock()
            .unwrap()
            .get_mut(&position)
            .and_then(VecDeque::pop_front);
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(self.cells.get(&position).cloned().unwrap_or_default())
    }

    async fn play(&self, _position: Position) -> Result<String, ProtocolError> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        self.play_answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("1".to_string()))
    }

    async fn respond(&self) -> Result<String, ProtocolError> {
        self.respond_calls.fetch_add(1, Ordering::SeqCst);
        self.respond_entered.notify_one();
        if let Some(gate) = &self.respond_gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }
        if self.always_pass {
            return Ok("you pass".to_string());
        }
        self.respond_answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("2".to_string()))
    }

    async fn count(&self, color: Color) -> Result<String, ProtocolError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .score_failures
            .lock()
            .unwrap()
            .get_mut(&color)
            .and_then(VecDeque::pop_front);
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(self.scores.get(&color).cloned().unwrap_or_default())
    }
}

/// Refresher that only counts how often it was asked.
#[derive(Default)]
pub struct CountingRefresher {
    pub calls: AtomicUsize,
}

impl CountingRefresher {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Refresh for CountingRefresher {
    async fn refresh(&self) -> RefreshReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        RefreshReport::default()
    }
}

pub fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col).expect("test position on board")
}

pub fn test_config() -> ClientConfig {
    ClientConfig::default().with_refresh_retries(0)
}

/// Collects everything currently queued on an observer channel.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
