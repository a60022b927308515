use chrono::{DateTime, Utc};

use crate::snippet::Snippet;

/// The single in-progress (or last) transcription attempt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub snippet: Option<Snippet>,
    pub input: String,
    pub active: bool,
    pub started_at: Option<DateTime<Utc>>,
    // Scored once per newly typed character, never decremented
    pub error_count: u32,
    pub correct_count: u32,
}

impl Session {
    /// Fresh active session on `snippet`
    pub fn begin(snippet: Snippet, started_at: DateTime<Utc>) -> Self {
        Self {
            snippet: Some(snippet),
            input: String::new(),
            active: true,
            started_at: Some(started_at),
            error_count: 0,
            correct_count: 0,
        }
    }

    /// Drop progress but keep the bound snippet
    pub fn clear(&mut self) {
        self.input.clear();
        self.active = false;
        self.started_at = None;
        self.error_count = 0;
        self.correct_count = 0;
    }

    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_inactive_without_snippet() {
        let session = Session::default();
        assert!(!session.active);
        assert!(session.snippet.is_none());
        assert!(session.started_at.is_none());
        assert_eq!(session.input_len(), 0);
    }

    #[test]
    fn test_clear_keeps_snippet() {
        let mut session = Session::begin(Snippet::custom("abc"), Utc::now());
        session.input.push('a');
        session.correct_count = 1;
        session.error_count = 2;

        session.clear();

        assert_eq!(session.snippet, Some(Snippet::custom("abc")));
        assert!(session.input.is_empty());
        assert!(!session.active);
        assert!(session.started_at.is_none());
        assert_eq!(session.correct_count, 0);
        assert_eq!(session.error_count, 0);
    }
}
