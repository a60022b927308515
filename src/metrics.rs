use chrono::Duration;

/// Characters per "word" in the standard WPM formula
pub const CHARS_PER_WORD: f64 = 5.0;

/// Final WPM for a finished session: every character of the snippet counts.
/// Zero (or negative) elapsed time reports 0 instead of an infinite rate.
pub fn words_per_minute(total_chars: usize, elapsed: Duration) -> u32 {
    let elapsed_ms = elapsed.num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }

    let minutes = elapsed_ms as f64 / 60_000.0;
    let wpm = ((total_chars as f64 / CHARS_PER_WORD) / minutes).round();
    if wpm.is_finite() {
        wpm as u32
    } else {
        0
    }
}

/// Share of correctly typed characters, as a whole percentage in [0, 100].
/// An empty snippet has nothing to get wrong and scores 100.
pub fn accuracy(correct: u32, total_chars: usize) -> u32 {
    if total_chars == 0 {
        return 100;
    }

    let pct = ((correct as f64 / total_chars as f64) * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

/// Running WPM while typing, based on whole elapsed seconds.
/// Stays at 0 during the first second.
pub fn live_wpm(typed_chars: usize, elapsed: Duration) -> u32 {
    let secs = elapsed.num_seconds();
    if secs <= 0 {
        return 0;
    }

    let minutes = secs as f64 / 60.0;
    ((typed_chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Running accuracy against what is currently in the input box
pub fn live_accuracy(correct: u32, typed_chars: usize) -> u32 {
    if typed_chars == 0 {
        return 100;
    }

    let pct = ((correct as f64 / typed_chars as f64) * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

/// How far through the snippet the input is, 0.0 to 100.0
pub fn progress(typed_chars: usize, total_chars: usize) -> f64 {
    if total_chars == 0 {
        return 0.0;
    }
    (typed_chars as f64 / total_chars as f64 * 100.0).min(100.0)
}

/// Format a duration as `m:ss`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Outstanding,
    Great,
    Good,
    KeepPracticing,
}

impl Performance {
    pub fn rate(wpm: u32, accuracy: u32) -> Self {
        if wpm >= 60 && accuracy >= 95 {
            Performance::Outstanding
        } else if wpm >= 40 && accuracy >= 90 {
            Performance::Great
        } else if wpm >= 25 && accuracy >= 80 {
            Performance::Good
        } else {
            Performance::KeepPracticing
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Performance::Outstanding => "Outstanding performance!",
            Performance::Great => "Great job! Keep it up!",
            Performance::Good => "Good progress!",
            Performance::KeepPracticing => "Keep practicing!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_per_minute() {
        // 300 chars = 60 words in one minute
        assert_eq!(words_per_minute(300, Duration::minutes(1)), 60);
        // 50 chars = 10 words in 30 secs
        assert_eq!(words_per_minute(50, Duration::seconds(30)), 20);
    }

    #[test]
    fn test_words_per_minute_rounds() {
        // 3 chars in 10 secs -> 0.6 words / (1/6) min = 3.6
        assert_eq!(words_per_minute(3, Duration::seconds(10)), 4);
    }

    #[test]
    fn test_words_per_minute_zero_elapsed() {
        assert_eq!(words_per_minute(100, Duration::zero()), 0);
        assert_eq!(words_per_minute(100, Duration::milliseconds(-5)), 0);
    }

    #[test]
    fn test_words_per_minute_tiny_elapsed_is_finite() {
        let wpm = words_per_minute(2, Duration::milliseconds(1));
        assert_eq!(wpm, 24_000);
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(1, 3), 33);
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(3, 3), 100);
        assert_eq!(accuracy(0, 3), 0);
    }

    #[test]
    fn test_accuracy_is_clamped() {
        // more correct keystrokes than characters after retyping
        assert_eq!(accuracy(7, 3), 100);
    }

    #[test]
    fn test_accuracy_empty_snippet() {
        assert_eq!(accuracy(0, 0), 100);
    }

    #[test]
    fn test_live_wpm() {
        assert_eq!(live_wpm(10, Duration::milliseconds(900)), 0);
        assert_eq!(live_wpm(50, Duration::seconds(60)), 10);
        assert_eq!(live_wpm(25, Duration::milliseconds(30_999)), 10);
    }

    #[test]
    fn test_live_accuracy() {
        assert_eq!(live_accuracy(0, 0), 100);
        assert_eq!(live_accuracy(3, 4), 75);
        assert_eq!(live_accuracy(9, 4), 100);
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(0, 10), 0.0);
        assert_eq!(progress(5, 10), 50.0);
        assert_eq!(progress(10, 10), 100.0);
        assert_eq!(progress(0, 0), 0.0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::seconds(0)), "0:00");
        assert_eq!(format_elapsed(Duration::seconds(7)), "0:07");
        assert_eq!(format_elapsed(Duration::seconds(125)), "2:05");
    }

    #[test]
    fn test_performance_rating() {
        assert_eq!(Performance::rate(60, 95), Performance::Outstanding);
        assert_eq!(Performance::rate(80, 94), Performance::Great);
        assert_eq!(Performance::rate(40, 90), Performance::Great);
        assert_eq!(Performance::rate(25, 80), Performance::Good);
        assert_eq!(Performance::rate(24, 100), Performance::KeepPracticing);
        assert_eq!(Performance::rate(100, 50), Performance::KeepPracticing);
    }
}
