//! The `Pipeline` struct and its run loop.

use std::collections::BTreeSet;
use std::time::Instant;

use crate::stage::stage_seed;
use crate::{DataContext, PipelineError, PipelineObserver, PipelineResult, Stage};

/// An ordered list of stages.
///
/// Create via [`PipelineBuilder`][crate::PipelineBuilder].
pub struct Pipeline {
    pub(crate) stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|s| s.name())
    }

    /// Check that every stage input is available in `ctx` or produced by an
    /// earlier stage.
    pub fn validate(&self, ctx: &DataContext) -> PipelineResult<()> {
        let mut available: BTreeSet<&str> = ctx.available().collect();
        for stage in &self.stages {
            if let Some(missing) = stage.inputs().iter().find(|t| !available.contains(**t)) {
                return Err(PipelineError::MissingInput {
                    stage: stage.name().to_string(),
                    table: missing.to_string(),
                });
            }
            available.extend(stage.outputs().iter().copied());
        }
        Ok(())
    }

    /// Validate, then run every stage in order.
    ///
    /// Stops at the first failing stage; `on_run_end` is only called after
    /// a complete run.
    pub fn run<O: PipelineObserver>(&self, ctx: &mut DataContext, observer: &mut O) -> PipelineResult<()> {
        self.validate(ctx)?;
        let run_start = Instant::now();

        for (i, stage) in self.stages.iter().enumerate() {
            let name = stage.name();
            observer.on_stage_start(i, name);
            log::info!("running stage {}/{}: {name}", i + 1, self.stages.len());

            ctx.stage_seed = stage_seed(ctx.config.seed, name);
            let start = Instant::now();
            stage.run(ctx)?;
            let elapsed = start.elapsed();

            for table in stage.outputs() {
                ctx.provide(table);
            }
            log::info!("stage {name} finished in {:.2?}", elapsed);
            observer.on_stage_end(i, name, elapsed);
        }

        log::info!("pipeline finished in {:.2?}", run_start.elapsed());
        observer.on_run_end(ctx);
        Ok(())
    }
}
