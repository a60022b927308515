use chrono::Duration;
use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::history::History;
use crate::history_db::HistoryDb;
use crate::input_policy::candidate_input;
use crate::snippet::{Snippet, SnippetSource};
use crate::tracker::SessionTracker;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Typing,
    Results,
    History,
}

/// Front-end state wrapped around the session tracker
pub struct App<C: Clock = SystemClock> {
    pub tracker: SessionTracker<C>,
    /// Snippet on screen; bound to the tracker on the first keystroke
    pub snippet: Snippet,
    pub settings: Settings,
    pub state: AppState,
    pub history_scroll: usize,
    /// The last session was cut off by the time limit rather than finished
    pub timed_out: bool,
    return_state: AppState,
    source: Box<dyn SnippetSource>,
    history_db: Option<HistoryDb>,
}

impl App<SystemClock> {
    pub fn new(
        source: Box<dyn SnippetSource>,
        settings: Settings,
        history_db: Option<HistoryDb>,
    ) -> Self {
        Self::with_clock(source, settings, history_db, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(
        source: Box<dyn SnippetSource>,
        settings: Settings,
        history_db: Option<HistoryDb>,
        clock: C,
    ) -> Self {
        let records = match history_db.as_ref().map(HistoryDb::load_all) {
            Some(Ok(records)) => records,
            Some(Err(e)) => {
                warn!(error = %e, "could not load session history");
                Vec::new()
            }
            None => Vec::new(),
        };
        debug!(records = records.len(), "history loaded");
        let history = History::from_records(records, settings.history_limit);

        let snippet = pick(source.as_ref(), &settings);
        Self {
            tracker: SessionTracker::with_clock(clock).with_history(history),
            snippet,
            settings,
            state: AppState::Typing,
            history_scroll: 0,
            timed_out: false,
            return_state: AppState::Typing,
            source,
            history_db,
        }
    }

    /// Handle one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return true;
        }

        match self.state {
            AppState::Typing => match key.code {
                KeyCode::Left => self.retry(),
                KeyCode::Right => self.new_snippet(),
                _ => self.type_key(&key),
            },
            AppState::Results => match key.code {
                KeyCode::Char('r') | KeyCode::Left => self.retry(),
                KeyCode::Char('n') | KeyCode::Right => self.new_snippet(),
                KeyCode::Char('h') => self.show_history(),
                KeyCode::Char('l') => {
                    self.settings.language = next_variant(self.settings.language);
                    self.new_snippet();
                }
                KeyCode::Char('d') => {
                    self.settings.difficulty = next_variant(self.settings.difficulty);
                    self.new_snippet();
                }
                _ => {}
            },
            AppState::History => match key.code {
                KeyCode::Char('b') | KeyCode::Backspace => self.state = self.return_state,
                KeyCode::Char('r') => self.retry(),
                KeyCode::Char('n') => self.new_snippet(),
                KeyCode::Up => self.history_scroll = self.history_scroll.saturating_sub(1),
                // Upper bound is clamped when rendering
                KeyCode::Down => self.history_scroll += 1,
                KeyCode::PageUp => self.history_scroll = self.history_scroll.saturating_sub(10),
                KeyCode::PageDown => self.history_scroll += 10,
                KeyCode::Home => self.history_scroll = 0,
                _ => {}
            },
        }
        false
    }

    /// Periodic poll: enforces the optional time limit
    pub fn on_tick(&mut self) {
        if self.state != AppState::Typing || !self.tracker.is_active() {
            return;
        }
        let Some(limit) = self.settings.time_limit_secs else {
            return;
        };
        let timed_out = self
            .tracker
            .elapsed()
            .is_some_and(|elapsed| elapsed >= Duration::seconds(limit as i64));
        if timed_out {
            debug!(limit, "time limit reached");
            self.tracker.complete();
            self.timed_out = true;
            self.finish_session();
        }
    }

    fn type_key(&mut self, key: &KeyEvent) {
        let Some(candidate) = candidate_input(self.tracker.input(), key) else {
            return;
        };

        if !self.tracker.is_active() {
            if candidate.is_empty() {
                return;
            }
            self.tracker.start(self.snippet.clone());
            self.timed_out = false;
        }

        self.tracker.update(&candidate);
        if !self.tracker.is_active() {
            self.finish_session();
        }
    }

    fn finish_session(&mut self) {
        if let (Some(db), Some(record)) = (self.history_db.as_ref(), self.tracker.history().last()) {
            if let Err(e) = db.append(record) {
                warn!(error = %e, "could not save session record");
            }
            if let Some(limit) = self.settings.history_limit {
                if let Err(e) = db.prune_to(limit) {
                    warn!(error = %e, "could not prune history");
                }
            }
        }
        self.state = AppState::Results;
    }

    /// Same snippet again from scratch
    pub fn retry(&mut self) {
        self.tracker.reset();
        self.state = AppState::Typing;
    }

    pub fn new_snippet(&mut self) {
        self.tracker.reset();
        self.snippet = pick(self.source.as_ref(), &self.settings);
        self.state = AppState::Typing;
    }

    pub fn show_history(&mut self) {
        self.return_state = self.state;
        self.history_scroll = 0;
        self.state = AppState::History;
    }

    /// Seconds left under the time limit while typing
    pub fn seconds_remaining(&self) -> Option<i64> {
        let limit = self.settings.time_limit_secs? as i64;
        let elapsed = self.tracker.elapsed().map_or(0, |e| e.num_seconds());
        Some((limit - elapsed).max(0))
    }
}

fn pick(source: &dyn SnippetSource, settings: &Settings) -> Snippet {
    source.pick(Some(&settings.language.as_tag()), Some(settings.difficulty))
}

/// Cycle through a value enum's variants
fn next_variant<T: ValueEnum + PartialEq + Copy>(current: T) -> T {
    let variants = T::value_variants();
    let idx = variants.iter().position(|v| *v == current).unwrap_or(0);
    variants[(idx + 1) % variants.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::snippet::{Difficulty, FixedSource, Language, SnippetLibrary};
    use chrono::{TimeZone, Utc};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str<C: Clock>(app: &mut App<C>, s: &str) {
        for c in s.chars() {
            let code = match c {
                '\n' => KeyCode::Enter,
                c => KeyCode::Char(c),
            };
            assert!(!app.handle_key(key(code)));
        }
    }

    fn fixed_app(body: &str) -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let app = App::with_clock(
            Box::new(FixedSource(Snippet::custom(body))),
            Settings::default(),
            Some(HistoryDb::open_in_memory().unwrap()),
            clock.clone(),
        );
        (app, clock)
    }

    #[test]
    fn test_new_app_shows_snippet_without_session() {
        let (app, _) = fixed_app("hi");
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.snippet.body, "hi");
        assert!(!app.tracker.is_active());
        assert!(app.tracker.snippet().is_none());
    }

    #[test]
    fn test_first_keystroke_starts_session() {
        let (mut app, _) = fixed_app("hello");
        type_str(&mut app, "h");

        assert!(app.tracker.is_active());
        assert_eq!(app.tracker.input(), "h");
        assert_eq!(app.tracker.correct_count(), 1);
    }

    #[test]
    fn test_backspace_before_start_does_nothing() {
        let (mut app, _) = fixed_app("hello");
        app.handle_key(key(KeyCode::Backspace));
        assert!(!app.tracker.is_active());
    }

    #[test]
    fn test_completing_snippet_shows_results_and_persists() {
        let (mut app, clock) = fixed_app("a\nb");
        type_str(&mut app, "a");
        clock.advance(Duration::seconds(2));
        type_str(&mut app, "\nb");

        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.tracker.history().len(), 1);
        let db = app.history_db.as_ref().unwrap();
        assert_eq!(db.count().unwrap(), 1);
        assert_eq!(db.load_all().unwrap()[0], app.tracker.history().records()[0]);
    }

    #[test]
    fn test_overlong_input_is_ignored() {
        let (mut app, _) = fixed_app("ab");
        type_str(&mut app, "ax");
        assert_eq!(app.state, AppState::Typing);

        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.tracker.input(), "ax");

        app.handle_key(key(KeyCode::Backspace));
        type_str(&mut app, "b");
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.tracker.history().last().unwrap().error_count, 1);
    }

    #[test]
    fn test_retry_keeps_snippet() {
        let (mut app, _) = fixed_app("hi");
        type_str(&mut app, "hi");
        assert_eq!(app.state, AppState::Results);

        app.handle_key(key(KeyCode::Char('r')));

        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.tracker.input(), "");
        assert_eq!(app.snippet.body, "hi");
        type_str(&mut app, "hi");
        assert_eq!(app.tracker.history().len(), 2);
    }

    #[test]
    fn test_left_during_typing_discards_progress() {
        let (mut app, _) = fixed_app("hello");
        type_str(&mut app, "hel");
        app.handle_key(key(KeyCode::Left));

        assert!(!app.tracker.is_active());
        assert_eq!(app.tracker.input(), "");
        assert!(app.tracker.history().is_empty());
    }

    #[test]
    fn test_new_snippet_uses_settings_filters() {
        let mut app = App::new(
            Box::new(SnippetLibrary::embedded().unwrap()),
            Settings {
                language: Language::Python,
                difficulty: Difficulty::Hard,
                ..Settings::default()
            },
            None,
        );
        assert_eq!(app.snippet.language, "python");

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.snippet.language, "python");
        assert_eq!(app.snippet.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_results_keys_cycle_settings() {
        let (mut app, _) = fixed_app("a");
        type_str(&mut app, "a");

        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.settings.language, Language::Typescript);
        assert_eq!(app.state, AppState::Typing);

        type_str(&mut app, "a");
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.settings.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_history_navigation() {
        let (mut app, _) = fixed_app("a");
        type_str(&mut app, "a");
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.state, AppState::History);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.history_scroll, 1);
        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.history_scroll, 0);

        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.state, AppState::Results);
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _) = fixed_app("a");
        assert!(app.handle_key(key(KeyCode::Esc)));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!app.tracker.is_active());
    }

    #[test]
    fn test_time_limit_completes_session() {
        let (mut app, clock) = fixed_app("hello world");
        app.settings.time_limit_secs = Some(5);
        assert_eq!(app.seconds_remaining(), Some(5));

        type_str(&mut app, "hel");
        clock.advance(Duration::seconds(3));
        app.on_tick();
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.seconds_remaining(), Some(2));

        clock.advance(Duration::seconds(2));
        app.on_tick();
        assert_eq!(app.state, AppState::Results);

        assert!(app.timed_out);
        let record = app.tracker.history().last().unwrap();
        assert_eq!(record.total_characters, 11);
        assert_eq!(record.correct_characters, 3);
        assert_eq!(record.accuracy, 27);
    }

    #[test]
    fn test_finishing_in_time_clears_timeout_flag() {
        let (mut app, clock) = fixed_app("ab");
        app.settings.time_limit_secs = Some(1);
        type_str(&mut app, "a");
        clock.advance(Duration::seconds(1));
        app.on_tick();
        assert!(app.timed_out);

        app.retry();
        type_str(&mut app, "ab");
        assert_eq!(app.state, AppState::Results);
        assert!(!app.timed_out);
    }

    #[test]
    fn test_tick_without_limit_is_noop() {
        let (mut app, clock) = fixed_app("hello");
        type_str(&mut app, "h");
        clock.advance(Duration::hours(1));
        app.on_tick();
        assert_eq!(app.state, AppState::Typing);
        assert!(app.tracker.is_active());
    }

    #[test]
    fn test_history_loaded_and_limited_from_db() {
        let (mut seed, _) = fixed_app("a");
        for _ in 0..3 {
            type_str(&mut seed, "a");
            seed.retry();
        }
        let db = seed.history_db.take().unwrap();
        assert_eq!(db.count().unwrap(), 3);

        let settings = Settings {
            history_limit: Some(2),
            ..Settings::default()
        };
        let mut app = App::new(Box::new(FixedSource(Snippet::custom("b"))), settings, Some(db));
        assert_eq!(app.tracker.history().len(), 2);

        type_str(&mut app, "b");
        assert_eq!(app.tracker.history().len(), 2);
        assert_eq!(app.history_db.as_ref().unwrap().count().unwrap(), 2);
        assert_eq!(app.tracker.history().last().unwrap().snippet.body, "b");
    }

    #[test]
    fn test_corrupt_row_keeps_other_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        {
            let (mut seed, _) = fixed_app("a");
            seed.history_db = Some(HistoryDb::open(&path).unwrap());
            for _ in 0..3 {
                type_str(&mut seed, "a");
                seed.retry();
            }
        }
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute("UPDATE sessions SET ended_at = 'garbage' WHERE id = 2", [])
            .unwrap();

        let app = App::new(
            Box::new(FixedSource(Snippet::custom("b"))),
            Settings::default(),
            Some(HistoryDb::open(&path).unwrap()),
        );
        assert_eq!(app.tracker.history().len(), 2);
    }

    #[test]
    fn test_next_variant_wraps() {
        assert_eq!(next_variant(Difficulty::Hard), Difficulty::Easy);
        assert_eq!(next_variant(Language::Rust), Language::Javascript);
    }
}
