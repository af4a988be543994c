//! Fluent builder for constructing a [`Pipeline`].

use crate::config::RunConfig;
use crate::stages;
use crate::{Pipeline, PipelineError, PipelineResult, Stage};

/// Fluent builder for [`Pipeline`].
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::from_config(&config)?.build()?;
/// let mut ctx = DataContext::load(config)?;
/// pipeline.run(&mut ctx, &mut NoopObserver)?;
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder holding the stages `config` names, in order.
    pub fn from_config(config: &RunConfig) -> PipelineResult<Self> {
        let mut builder = Self::new();
        for name in config.stage_names() {
            builder = builder.named(&name)?;
        }
        Ok(builder)
    }

    /// Append a stage.
    pub fn stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append the built-in stage called `name`.
    pub fn named(self, name: &str) -> PipelineResult<Self> {
        let stage = stages::by_name(name)?;
        Ok(self.stage(stage))
    }

    pub fn build(self) -> PipelineResult<Pipeline> {
        if self.stages.is_empty() {
            return Err(PipelineError::Config("pipeline has no stages".into()));
        }
        Ok(Pipeline { stages: self.stages })
    }
}
