//! `as-output`: writers for the plans and stage timings of a pipeline run.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                 |
//! |-----------|---------|-----------------------------------------------|
//! | *(none)*  | CSV     | `plans.csv`, `stage_timings.csv`              |
//! | `sqlite`  | SQLite  | `output.db`                                   |
//! | `parquet` | Parquet | `plans.parquet`, `stage_timings.parquet`      |
//!
//! All backends implement [`PlanWriter`] and are driven by
//! [`PlanOutputObserver`], which implements `as_pipeline::PipelineObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use as_output::{CsvWriter, PlanOutputObserver};
//!
//! let writer = CsvWriter::new(&config.output_dir)?;
//! let mut obs = PlanOutputObserver::new(writer);
//! pipeline.run(&mut ctx, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::PlanOutputObserver;
pub use row::{PLAN_COLUMNS, PlanRow, STAGE_TIMING_COLUMNS, StageTimingRow};
pub use writer::PlanWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
