use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, trace};

use crate::clock::{Clock, SystemClock};
use crate::history::History;
use crate::metrics;
use crate::record::SessionRecord;
use crate::session::Session;
use crate::snippet::Snippet;

/// Owns the current typing session and the history of finished ones.
///
/// Every operation is total: invalid calls are ignored rather than reported,
/// so the front end can forward raw input without pre-validation.
#[derive(Debug)]
pub struct SessionTracker<C: Clock = SystemClock> {
    session: Session,
    history: History,
    clock: C,
    completed: u64,
}

impl SessionTracker<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SessionTracker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SessionTracker<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            session: Session::default(),
            history: History::new(),
            clock,
            completed: 0,
        }
    }

    /// Replace the history, e.g. with records loaded from disk
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// Begin a new session, silently discarding any unfinished one
    pub fn start(&mut self, snippet: Snippet) {
        if self.session.active {
            debug!(
                input_len = self.session.input_len(),
                "discarding unfinished session"
            );
        }
        debug!(snippet = %snippet.id, chars = snippet.len(), "session started");
        self.session = Session::begin(snippet, self.clock.now());
    }

    /// Replace the input with `candidate`, scoring only the characters past
    /// the previous input length. Completes the session on an exact match.
    pub fn update(&mut self, candidate: &str) {
        let Some(snippet) = self.session.snippet.as_ref() else {
            trace!("update ignored: no snippet bound");
            return;
        };

        let candidate_len = candidate.chars().count();
        if candidate_len > snippet.len() {
            trace!(
                candidate_len,
                limit = snippet.len(),
                "update ignored: longer than snippet"
            );
            return;
        }

        let prev_len = self.session.input_len();
        for (typed, expected) in candidate.chars().zip(snippet.body.chars()).skip(prev_len) {
            if typed == expected {
                self.session.correct_count = self.session.correct_count.saturating_add(1);
            } else {
                self.session.error_count = self.session.error_count.saturating_add(1);
            }
        }

        let finished = candidate == snippet.body;
        self.session.input = candidate.to_string();

        if finished {
            self.complete();
        }
    }

    /// Archive the active session. No-op without an active, started session.
    pub fn complete(&mut self) {
        if !self.session.active {
            trace!("complete ignored: no active session");
            return;
        }
        let (Some(snippet), Some(started_at)) =
            (self.session.snippet.as_ref(), self.session.started_at)
        else {
            trace!("complete ignored: session not started");
            return;
        };

        let ended_at = self.clock.now();
        self.completed += 1;
        let id = format!("{}-{}", ended_at.timestamp_millis(), self.completed);

        let record = SessionRecord::new(
            id,
            snippet.clone(),
            started_at,
            ended_at,
            self.session.correct_count,
            self.session.error_count,
        );
        info!(
            snippet = %record.snippet.id,
            wpm = record.wpm,
            accuracy = record.accuracy,
            errors = record.error_count,
            "session completed"
        );

        self.history.push(record);
        self.session.active = false;
    }

    /// Drop progress without archiving; keeps the snippet and history
    pub fn reset(&mut self) {
        self.session.clear();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snippet(&self) -> Option<&Snippet> {
        self.session.snippet.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.session.input
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.session.started_at
    }

    pub fn error_count(&self) -> u32 {
        self.session.error_count
    }

    pub fn correct_count(&self) -> u32 {
        self.session.correct_count
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current time according to the tracker's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Time since start while a session is active
    pub fn elapsed(&self) -> Option<Duration> {
        if !self.session.active {
            return None;
        }
        self.session
            .started_at
            .map(|started_at| self.clock.now() - started_at)
    }

    pub fn live_wpm(&self) -> u32 {
        self.elapsed()
            .map(|elapsed| metrics::live_wpm(self.session.input_len(), elapsed))
            .unwrap_or(0)
    }

    pub fn live_accuracy(&self) -> u32 {
        metrics::live_accuracy(self.session.correct_count, self.session.input_len())
    }

    /// Percentage of the bound snippet already typed
    pub fn progress(&self) -> f64 {
        self.snippet()
            .map(|s| metrics::progress(self.session.input_len(), s.len()))
            .unwrap_or(0.0)
    }
}
