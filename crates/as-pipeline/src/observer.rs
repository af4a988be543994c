//! Pipeline observer trait for progress reporting and output.

use std::time::Duration;

use crate::DataContext;

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] around each
/// stage.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait PipelineObserver {
    /// Called before stage `index` runs.
    fn on_stage_start(&mut self, _index: usize, _stage: &str) {}

    /// Called after stage `index` succeeds.
    fn on_stage_end(&mut self, _index: usize, _stage: &str, _elapsed: Duration) {}

    /// Called once after the last stage, with read access to everything the
    /// run produced.
    fn on_run_end(&mut self, _ctx: &DataContext) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
