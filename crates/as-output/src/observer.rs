//! `PlanOutputObserver<W>`: bridges `PipelineObserver` to a `PlanWriter`.

use std::time::Duration;

use as_pipeline::{DataContext, PipelineObserver};

use crate::row::{PlanRow, StageTimingRow};
use crate::writer::PlanWriter;
use crate::{OutputError, OutputResult};

/// A [`PipelineObserver`] that records stage timings while the run
/// progresses and writes every generated plan once it ends.
///
/// Errors from the writer are stored internally because `PipelineObserver`
/// methods have no return value.  After `pipeline.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct PlanOutputObserver<W: PlanWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: PlanWriter> PlanOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `pipeline.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: PlanWriter> PipelineObserver for PlanOutputObserver<W> {
    fn on_stage_end(&mut self, index: usize, stage: &str, elapsed: Duration) {
        let row = StageTimingRow {
            stage_index: index as u32,
            stage:       stage.to_string(),
            elapsed_ms:  elapsed.as_secs_f64() * 1000.0,
        };
        let result = self.writer.write_stage_timing(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, ctx: &DataContext) {
        let rows: Vec<PlanRow> = ctx.plans.iter().flat_map(|p| p.rows()).collect();
        let result = self.writer.write_plans(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
        log::info!("wrote {} plans ({} rows)", ctx.plans.len(), rows.len());
    }
}
