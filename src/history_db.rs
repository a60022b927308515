use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::record::SessionRecord;
use crate::snippet::{Difficulty, Snippet};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        record_id TEXT NOT NULL,
        snippet_id TEXT NOT NULL,
        snippet_title TEXT NOT NULL,
        language TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        body TEXT NOT NULL,
        started_at TEXT NOT NULL,
        ended_at TEXT NOT NULL,
        wpm INTEGER NOT NULL,
        accuracy INTEGER NOT NULL,
        total_characters INTEGER NOT NULL,
        correct_characters INTEGER NOT NULL,
        error_count INTEGER NOT NULL,
        completed BOOLEAN NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_sessions_ended_at ON sessions(ended_at);
"#;

const SELECT_SESSIONS: &str = "SELECT id, record_id, snippet_id, snippet_title, language, difficulty, body, \
     started_at, ended_at, wpm, accuracy, total_characters, correct_characters, error_count, completed \
     FROM sessions";

/// SQLite-backed archive of session records
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

/// Raw column values, validated by `into_record`
struct SessionRow {
    rowid: i64,
    record_id: String,
    snippet_id: String,
    snippet_title: String,
    language: String,
    difficulty: String,
    body: String,
    started_at: String,
    ended_at: String,
    wpm: i64,
    accuracy: i64,
    total_characters: i64,
    correct_characters: i64,
    error_count: i64,
    completed: bool,
}

impl HistoryDb {
    /// Open (or create) the database file, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(HistoryDb { conn })
    }

    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO sessions
            (record_id, snippet_id, snippet_title, language, difficulty, body,
             started_at, ended_at, wpm, accuracy, total_characters,
             correct_characters, error_count, completed)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                record.id,
                record.snippet.id,
                record.snippet.title,
                record.snippet.language,
                record.snippet.difficulty.to_string(),
                record.snippet.body,
                record.started_at.to_rfc3339(),
                record.ended_at.to_rfc3339(),
                record.wpm as i64,
                record.accuracy as i64,
                record.total_characters as i64,
                record.correct_characters as i64,
                record.error_count as i64,
                record.completed,
            ],
        )?;
        Ok(())
    }

    /// All readable records, oldest first. Corrupt rows are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SESSIONS} ORDER BY id ASC"))?;
        let rows = stmt.query_map([], SessionRow::from_row)?;

        let mut records = Vec::new();
        for mapped in rows {
            match mapped?.into_record() {
                Ok(record) => records.push(record),
                Err(StoreError::Corrupt { row, reason }) => {
                    warn!(row, %reason, "skipping corrupt history row");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Delete all but the newest `limit` records
    pub fn prune_to(&self, limit: usize) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM sessions WHERE id NOT IN (SELECT id FROM sessions ORDER BY id DESC LIMIT ?1)",
            [limit as i64],
        )?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM sessions", [])?;
        Ok(())
    }
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(SessionRow {
            rowid: row.get(0)?,
            record_id: row.get(1)?,
            snippet_id: row.get(2)?,
            snippet_title: row.get(3)?,
            language: row.get(4)?,
            difficulty: row.get(5)?,
            body: row.get(6)?,
            started_at: row.get(7)?,
            ended_at: row.get(8)?,
            wpm: row.get(9)?,
            accuracy: row.get(10)?,
            total_characters: row.get(11)?,
            correct_characters: row.get(12)?,
            error_count: row.get(13)?,
            completed: row.get(14)?,
        })
    }

    fn into_record(self) -> Result<SessionRecord> {
        let rowid = self.rowid;
        let corrupt = |reason: String| StoreError::Corrupt { row: rowid, reason };

        let difficulty = Difficulty::from_str(&self.difficulty, true)
            .map_err(|_| corrupt(format!("unknown difficulty {:?}", self.difficulty)))?;
        let started_at = parse_timestamp(&self.started_at).ok_or_else(|| corrupt("bad started_at".into()))?;
        let ended_at = parse_timestamp(&self.ended_at).ok_or_else(|| corrupt("bad ended_at".into()))?;

        Ok(SessionRecord {
            id: self.record_id,
            snippet: Snippet {
                id: self.snippet_id,
                title: self.snippet_title,
                language: self.language,
                difficulty,
                body: self.body,
            },
            started_at,
            ended_at,
            wpm: to_u32(self.wpm).ok_or_else(|| corrupt("bad wpm".into()))?,
            accuracy: to_u32(self.accuracy).ok_or_else(|| corrupt("bad accuracy".into()))?,
            total_characters: usize::try_from(self.total_characters)
                .map_err(|_| corrupt("bad total_characters".into()))?,
            correct_characters: to_u32(self.correct_characters)
                .ok_or_else(|| corrupt("bad correct_characters".into()))?,
            error_count: to_u32(self.error_count).ok_or_else(|| corrupt("bad error_count".into()))?,
            completed: self.completed,
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn to_u32(v: i64) -> Option<u32> {
    u32::try_from(v).ok()
}
