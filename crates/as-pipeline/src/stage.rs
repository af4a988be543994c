//! The `Stage` trait, one simulation step of the pipeline.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use as_core::stream_seed;

use crate::{DataContext, PipelineResult};

/// One step of the pipeline.
///
/// A stage declares the tables it reads and writes (see
/// [`tables`](crate::context::tables)).  [`Pipeline`](crate::Pipeline)
/// checks the declarations before running and marks `outputs` available
/// after `run` succeeds.
pub trait Stage {
    fn name(&self) -> &'static str;

    fn inputs(&self) -> &'static [&'static str];

    fn outputs(&self) -> &'static [&'static str];

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()>;
}

/// Seed of the stage called `name` within a run seeded by `seed`.
///
/// Derived from the name rather than the position, so adding or removing
/// other stages does not change a stage's draws.
pub fn stage_seed(seed: u64, name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(name.as_bytes());
    stream_seed(seed, hasher.finish())
}
