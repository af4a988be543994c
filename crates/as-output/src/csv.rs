//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `plans.csv`
//! - `stage_timings.csv`
//!
//! Leg rows and the final activity leave their empty columns blank.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::{PLAN_COLUMNS, STAGE_TIMING_COLUMNS};
use crate::writer::PlanWriter;
use crate::{OutputResult, PlanRow, StageTimingRow};

/// Writes plans and stage timings to two CSV files.
pub struct CsvWriter {
    plans:    Writer<File>,
    timings:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut plans = Writer::from_path(dir.join("plans.csv"))?;
        plans.write_record(PLAN_COLUMNS)?;

        let mut timings = Writer::from_path(dir.join("stage_timings.csv"))?;
        timings.write_record(STAGE_TIMING_COLUMNS)?;

        Ok(Self { plans, timings, finished: false })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl PlanWriter for CsvWriter {
    fn write_plans(&mut self, rows: &[PlanRow]) -> OutputResult<()> {
        for row in rows {
            self.plans.write_record(&[
                row.person_id.0.to_string(),
                row.element.to_string(),
                row.index.to_string(),
                opt(row.activity_type.map(|a| a.as_str())),
                opt(row.x),
                opt(row.y),
                opt(row.end_time),
            ])?;
        }
        Ok(())
    }

    fn write_stage_timing(&mut self, row: &StageTimingRow) -> OutputResult<()> {
        self.timings.write_record(&[
            row.stage_index.to_string(),
            row.stage.clone(),
            format!("{:.3}", row.elapsed_ms),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.plans.flush()?;
        self.timings.flush()?;
        Ok(())
    }
}
