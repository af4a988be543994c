//! activitysynth: run the activity synthesis pipeline from a JSON config.
//!
//! ```text
//! activitysynth run.json --seed 7 --format parquet
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-stage
//! detail.  Plans and stage timings land in the configured output directory.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use memory_stats::memory_stats;

use as_output::{CsvWriter, PlanOutputObserver, PlanWriter};
use as_pipeline::{DataContext, OutputFormat, Pipeline, PipelineBuilder, PipelineObserver, RunConfig};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "Synthesize home-work-home activity plans for a synthetic population")]
struct Args {
    /// Run configuration (JSON).
    config: PathBuf,

    /// Override the master seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the input data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output backend: csv, parquet or sqlite.
    #[arg(long)]
    format: Option<String>,

    /// Comma-separated stage names to run instead of the configured list.
    #[arg(long, value_delimiter = ',')]
    stages: Vec<String>,
}

// ── Memory helper ─────────────────────────────────────────────────────────────

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Logs resident memory after each stage and forwards everything to the
/// output observer.
struct ProgressObserver<W: PlanWriter> {
    inner: PlanOutputObserver<W>,
    plans: usize,
}

impl<W: PlanWriter> PipelineObserver for ProgressObserver<W> {
    fn on_stage_start(&mut self, index: usize, stage: &str) {
        self.inner.on_stage_start(index, stage);
    }

    fn on_stage_end(&mut self, index: usize, stage: &str, elapsed: Duration) {
        log::debug!("after {stage}: {:.0} MB resident", mem_mb());
        self.inner.on_stage_end(index, stage, elapsed);
    }

    fn on_run_end(&mut self, ctx: &DataContext) {
        self.plans = ctx.plans.len();
        self.inner.on_run_end(ctx);
    }
}

fn run_with<W: PlanWriter>(pipeline: &Pipeline, ctx: &mut DataContext, writer: W) -> Result<usize> {
    let mut obs = ProgressObserver { inner: PlanOutputObserver::new(writer), plans: 0 };
    pipeline.run(ctx, &mut obs)?;
    if let Some(e) = obs.inner.take_error() {
        bail!("writing output failed: {e}");
    }
    Ok(obs.plans)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = RunConfig::from_json_path(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(format) = args.format {
        config.output_format = format.parse::<OutputFormat>()?;
    }
    if !args.stages.is_empty() {
        config.stages = args.stages;
        config.validate()?;
    }

    let pipeline = PipelineBuilder::from_config(&config)?.build()?;
    log::info!("stages: {}", pipeline.stage_names().collect::<Vec<_>>().join(", "));

    let out_dir = config.output_dir.clone();
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let format = config.output_format;

    let t0 = Instant::now();
    let mut ctx = DataContext::load(config).context("loading input data")?;
    log::info!("inputs loaded in {:.2?} ({:.0} MB resident)", t0.elapsed(), mem_mb());

    let plans = match format {
        OutputFormat::Csv => run_with(&pipeline, &mut ctx, CsvWriter::new(&out_dir)?)?,
        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => run_with(&pipeline, &mut ctx, as_output::ParquetWriter::new(&out_dir)?)?,
        #[cfg(feature = "sqlite")]
        OutputFormat::Sqlite => run_with(&pipeline, &mut ctx, as_output::SqliteWriter::new(&out_dir)?)?,
        #[allow(unreachable_patterns)]
        other => bail!("output format {other:?} needs the matching cargo feature of activitysynth"),
    };

    log::info!(
        "{plans} plans written to {} in {:.2?} ({:.0} MB resident)",
        out_dir.display(),
        t0.elapsed(),
        mem_mb()
    );
    Ok(())
}
