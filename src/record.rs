use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{self, Performance};
use crate::snippet::Snippet;

/// Archived summary of a finished session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub snippet: Snippet,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub wpm: u32,
    pub accuracy: u32,
    pub total_characters: usize,
    pub correct_characters: u32,
    pub error_count: u32,
    pub completed: bool,
}

impl SessionRecord {
    /// Build a record, deriving wpm and accuracy from the inputs
    pub fn new(
        id: String,
        snippet: Snippet,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        correct_characters: u32,
        error_count: u32,
    ) -> Self {
        let total_characters = snippet.len();
        let elapsed = ended_at - started_at;

        Self {
            id,
            snippet,
            started_at,
            ended_at,
            wpm: metrics::words_per_minute(total_characters, elapsed),
            accuracy: metrics::accuracy(correct_characters, total_characters),
            total_characters,
            correct_characters,
            error_count,
            completed: true,
        }
    }

    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// True when the stored metrics match what the record's own fields yield
    pub fn is_consistent(&self) -> bool {
        self.wpm == metrics::words_per_minute(self.total_characters, self.duration())
            && self.accuracy == metrics::accuracy(self.correct_characters, self.total_characters)
    }

    pub fn performance(&self) -> Performance {
        Performance::rate(self.wpm, self.accuracy)
    }
}
