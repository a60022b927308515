use itertools::Itertools;

use crate::record::SessionRecord;
use crate::time_series::ProgressPoint;
use crate::util::{mean, std_dev};

/// How many of the most recent sessions the progress chart shows
pub const CHART_WINDOW: usize = 10;

/// Append-only, chronologically ordered log of finished sessions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<SessionRecord>,
    limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySummary {
    pub sessions: usize,
    pub average_wpm: u32,
    pub average_accuracy: u32,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub wpm_std_dev: f64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` records, evicting the oldest first
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            limit,
        }
    }

    /// Seed from previously persisted records (already in chronological order)
    pub fn from_records(records: Vec<SessionRecord>, limit: Option<usize>) -> Self {
        let mut history = Self { records, limit };
        history.enforce_limit();
        history
    }

    pub fn push(&mut self, record: SessionRecord) {
        self.records.push(record);
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.records.len() > limit {
                let excess = self.records.len() - limit;
                self.records.drain(..excess);
            }
        }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&SessionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> Option<HistorySummary> {
        if self.records.is_empty() {
            return None;
        }

        let wpms = self.records.iter().map(|r| r.wpm as f64).collect_vec();
        let accuracies = self
            .records
            .iter()
            .map(|r| r.accuracy as f64)
            .collect_vec();

        Some(HistorySummary {
            sessions: self.records.len(),
            average_wpm: mean(&wpms).unwrap_or(0.0).round() as u32,
            average_accuracy: mean(&accuracies).unwrap_or(0.0).round() as u32,
            best_wpm: self.records.iter().map(|r| r.wpm).max().unwrap_or(0),
            best_accuracy: self.records.iter().map(|r| r.accuracy).max().unwrap_or(0),
            wpm_std_dev: std_dev(&wpms).unwrap_or(0.0),
        })
    }

    /// Chart series over the last [`CHART_WINDOW`] sessions, numbered from 1
    pub fn progress_points(&self) -> Vec<ProgressPoint> {
        let start = self.records.len().saturating_sub(CHART_WINDOW);
        self.records[start..]
            .iter()
            .enumerate()
            .map(|(i, r)| ProgressPoint::new((i + 1) as f64, r.wpm as f64, r.accuracy as f64))
            .collect()
    }
}
