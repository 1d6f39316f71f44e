//! Per-color scores, shown exactly as the server reports them.

use crate::observer::{RefreshTarget, SessionEvent};
use crate::protocol::Color;
use crate::refresh::{RefreshContext, RefreshReport, with_retries};
use crate::server::GameServer;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// A color's score. The value is opaque display text, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Score {
    color: Color,
    value: String,
}

impl Score {
    /// Which side this score belongs to.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The text to display. Empty until the first answer.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// One score slot per color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAggregator {
    black: Score,
    white: Score,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreAggregator {
    /// Creates both slots with no value yet.
    pub fn new() -> Self {
        Self {
            black: Score::new(Color::Black, String::new()),
            white: Score::new(Color::White, String::new()),
        }
    }

    /// Current score for `color`.
    pub fn score(&self, color: Color) -> &Score {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// Replaces the value for `color` verbatim. Returns the score if it changed.
    pub fn apply(&mut self, color: Color, value: String) -> Option<Score> {
        let slot = match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        if slot.value == value {
            return None;
        }
        slot.value = value;
        Some(slot.clone())
    }

    /// Queries both colors concurrently, applying each answer on arrival.
    #[instrument(skip_all)]
    pub async fn refresh<S: GameServer + ?Sized>(
        &mut self,
        server: &S,
        ctx: RefreshContext<'_>,
    ) -> RefreshReport {
        let retries = ctx.retries;
        let mut pending: FuturesUnordered<_> = Color::iter()
            .map(move |color| async move {
                let answer = with_retries(retries, || server.count(color)).await;
                (color, answer)
            })
            .collect();

        let mut report = RefreshReport::default();
        while let Some((color, answer)) = pending.next().await {
            match answer {
                Ok(value) => {
                    if let Some(score) = self.apply(color, value) {
                        report.changed += 1;
                        ctx.observer.on_event(SessionEvent::ScoreChanged(score));
                    }
                }
                Err(error) => {
                    report.record_failure(RefreshTarget::Score(color), error, ctx.observer)
                }
            }
        }

        debug!(
            black = %self.black.value,
            white = %self.white.value,
            "Scores refreshed"
        );
        report
    }
}
