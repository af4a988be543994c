//! `as-pipeline`: stage pipeline that turns a synthetic population into
//! home-work-home activity plans.
//!
//! # Run order
//!
//! ```text
//! initialize_network_{small,walk}       load drive + walk networks
//! network_aggregations_{small,walk}     node accessibility tables
//!   (or load_precomputed_accessibilities)
//! impute_skims                          complete zone-pair skims
//! wlcm_simulate                         persons.job_id
//! tod_category_simulate                 persons.TOD
//! tod_dwell_simulate                    persons.dwell_work
//! tod_distribution_simulate             persons.HW_ET / WH_ST
//! auto_ownership_simulate               households.cars_alt
//! primary_mode_choice_simulate          persons.primary_commute_mode
//! school_choice_simulate                persons.school_id
//! generate_activity_plans               plans
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`config`]   | `RunConfig` and its JSON sections                       |
//! | [`context`]  | `DataContext`, table and column names                   |
//! | [`stage`]    | `Stage` trait, per-stage seeds                          |
//! | [`pipeline`] | `Pipeline` (validate + run loop)                        |
//! | [`builder`]  | `PipelineBuilder`                                       |
//! | [`observer`] | `PipelineObserver`, `NoopObserver`                      |
//! | [`stages`]   | every built-in stage, lookup by name                    |
//! | [`error`]    | `PipelineError`, `PipelineResult<T>`                    |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Network searches run on Rayon's thread pool.           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use as_pipeline::{DataContext, NoopObserver, PipelineBuilder, RunConfig};
//!
//! let config = RunConfig::from_json_path("run.json".as_ref())?;
//! let pipeline = PipelineBuilder::from_config(&config)?.build()?;
//! let mut ctx = DataContext::load(config)?;
//! pipeline.run(&mut ctx, &mut NoopObserver)?;
//! println!("{} plans", ctx.plans.len());
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod stage;
pub mod stages;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::PipelineBuilder;
pub use config::{AccessibilitiesMode, OutputFormat, RunConfig, SchoolChoiceConfig};
pub use context::{DataContext, columns, tables};
pub use error::{PipelineError, PipelineResult};
pub use observer::{NoopObserver, PipelineObserver};
pub use pipeline::Pipeline;
pub use stage::{Stage, stage_seed};
