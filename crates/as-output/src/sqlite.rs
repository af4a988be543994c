//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `plans` and `stage_timings`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::PlanWriter;
use crate::{OutputResult, PlanRow, StageTimingRow};

/// Writes plans and stage timings to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS plans (
                 personId         INTEGER NOT NULL,
                 planElement      TEXT    NOT NULL,
                 planElementIndex INTEGER NOT NULL,
                 activityType     TEXT,
                 x                REAL,
                 y                REAL,
                 endTime          REAL
             );
             CREATE TABLE IF NOT EXISTS stage_timings (
                 stage_index INTEGER PRIMARY KEY,
                 stage       TEXT NOT NULL,
                 elapsed_ms  REAL NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl PlanWriter for SqliteWriter {
    fn write_plans(&mut self, rows: &[PlanRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO plans \
                 (personId, planElement, planElementIndex, activityType, x, y, endTime) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.person_id.0 as i64,
                    row.element,
                    row.index,
                    row.activity_type.map(|a| a.as_str()),
                    row.x,
                    row.y,
                    row.end_time,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_stage_timing(&mut self, row: &StageTimingRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO stage_timings (stage_index, stage, elapsed_ms) VALUES (?1, ?2, ?3)",
            rusqlite::params![row.stage_index, row.stage, row.elapsed_ms],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
