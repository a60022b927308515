use serde::Serialize;
use std::io::Write;

use crate::error::Result;
use crate::record::SessionRecord;

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    snippet_id: &'a str,
    title: &'a str,
    language: &'a str,
    difficulty: String,
    started: String,
    ended: String,
    duration_secs: String,
    wpm: u32,
    accuracy: u32,
    total_characters: usize,
    correct_characters: u32,
    errors: u32,
}

impl<'a> From<&'a SessionRecord> for CsvRow<'a> {
    fn from(r: &'a SessionRecord) -> Self {
        CsvRow {
            id: &r.id,
            snippet_id: &r.snippet.id,
            title: &r.snippet.title,
            language: &r.snippet.language,
            difficulty: r.snippet.difficulty.to_string(),
            started: r.started_at.to_rfc3339(),
            ended: r.ended_at.to_rfc3339(),
            duration_secs: format!("{:.2}", r.duration().num_milliseconds() as f64 / 1000.0),
            wpm: r.wpm,
            accuracy: r.accuracy,
            total_characters: r.total_characters,
            correct_characters: r.correct_characters,
            errors: r.error_count,
        }
    }
}

/// Write the history as CSV with a header row; returns the number of records
pub fn write_history_csv<W: Write>(records: &[SessionRecord], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush()?;
    Ok(records.len())
}
