//! Run configuration.
//!
//! Loaded from a JSON file by the application crate.  Every field except
//! `data_dir` has a default, so the smallest valid file is
//!
//! ```json
//! { "data_dir": "./data" }
//! ```
//!
//! File names are relative to `data_dir`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use as_network::NetworkSpec;
use as_population::PopulationFiles;
use as_skims::{DEFAULT_DISTANCE_COLUMN, ImputeOptions, SkimAccessSpec};

use crate::stages;
use crate::{PipelineError, PipelineResult};

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Where the node accessibility tables come from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessibilitiesMode {
    /// Aggregate over the networks and write the tables for later runs.
    #[default]
    Compute,
    /// Read the tables a previous `compute` run wrote.
    Precomputed,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
    Sqlite,
}

impl std::str::FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> PipelineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv"     => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            "sqlite"  => Ok(OutputFormat::Sqlite),
            other => Err(PipelineError::Config(format!(
                "unknown output format {other:?}: expected csv, parquet or sqlite"
            ))),
        }
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NetworksConfig {
    /// Drive network: directed, 25 km horizon.
    pub small: NetworkSpec,
    /// Walk network: two-way, 2.5 km horizon.
    pub walk:  NetworkSpec,
}

impl Default for NetworksConfig {
    fn default() -> Self {
        let small = NetworkSpec::new(
            "bay_area_tertiary_strongly_nodes.csv",
            "bay_area_tertiary_strongly_edges.csv",
            25_000.0,
        );
        let mut walk = NetworkSpec::new("bayarea_walk_nodes.csv", "bayarea_walk_edges.csv", 2_500.0);
        walk.two_way = true;
        Self { small, walk }
    }
}

/// Aggregation spec files and the node tables they produce.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AccessibilityFiles {
    pub small_spec: String,
    pub walk_spec:  String,
    /// Written in `compute` mode, read in `precomputed` mode.
    pub small_vars: String,
    pub walk_vars:  String,
}

impl Default for AccessibilityFiles {
    fn default() -> Self {
        Self {
            small_spec: "network_aggregations_small.json".into(),
            walk_spec:  "network_aggregations_walk.json".into(),
            small_vars: "drive_net_vars.csv".into(),
            walk_vars:  "walk_net_vars.csv".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SkimFiles {
    /// Hourly observed skims.
    pub raw:       String,
    /// Dense reference zone-pair distances.
    pub reference: String,
    /// Imputed table cache; written on first run.
    pub imputed:   String,
    pub distance_column: String,
    /// Wide skims with `_EA`/`_AM`/... suffixed columns, for mode choice.
    pub period:    String,
    /// Zonal accessibility measures joined onto mode-choice origins.
    pub zone_accessibility: Option<String>,
    pub zone_id_column: String,
    /// Accessibility columns computed from the imputed skims and added to
    /// the zone table before mode choice.  Needs `zone_accessibility`.
    pub skim_access: Vec<SkimAccessSpec>,
    /// Mode whose imputed time, distance and cost feed location choices.
    pub location_mode: String,
}

impl Default for SkimFiles {
    fn default() -> Self {
        Self {
            raw:                "skims_raw.csv".into(),
            reference:          "skims_reference.csv".into(),
            imputed:            "skims_imputed.csv".into(),
            distance_column:    DEFAULT_DISTANCE_COLUMN.into(),
            period:             "skims_period.csv".into(),
            zone_accessibility: Some("MTC_TAZ_accessibility.csv".into()),
            zone_id_column:     "taz1454".into(),
            skim_access:        Vec::new(),
            location_mode:      "CAR".into(),
        }
    }
}

/// Nearest-school query limits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SchoolChoiceConfig {
    pub public_distance:  f64,
    pub public_count:     usize,
    pub private_distance: f64,
    pub private_count:    usize,
    /// Ranks at which the running mean school distance becomes a chooser
    /// variable (`public_school_mean_dist_5`, ...).
    pub rolling_ranks:    Vec<usize>,
}

impl Default for SchoolChoiceConfig {
    fn default() -> Self {
        Self {
            public_distance:  200_000.0,
            public_count:     50,
            private_distance: 100_000.0,
            private_count:    100,
            rolling_ranks:    vec![1, 5, 10],
        }
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    pub data_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Master seed.  The same seed always produces identical plans.
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub accessibilities: AccessibilitiesMode,

    #[serde(default)]
    pub networks: NetworksConfig,

    #[serde(default)]
    pub accessibility_files: AccessibilityFiles,

    #[serde(default)]
    pub skims: SkimFiles,

    #[serde(default)]
    pub impute: ImputeOptions,

    /// Directory of `*.json` model specs, relative to `data_dir`.
    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    #[serde(default)]
    pub school_choice: SchoolChoiceConfig,

    #[serde(default)]
    pub population: PopulationFiles,

    /// Stage names in run order.  Empty selects the default order for the
    /// accessibilities mode.
    #[serde(default)]
    pub stages: Vec<String>,

    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_seed()       -> u64     { 42 }
fn default_model_dir()  -> String  { "models".into() }

impl RunConfig {
    /// A configuration with every default, reading from `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir:            data_dir.into(),
            output_dir:          default_output_dir(),
            seed:                default_seed(),
            accessibilities:     AccessibilitiesMode::default(),
            networks:            NetworksConfig::default(),
            accessibility_files: AccessibilityFiles::default(),
            skims:               SkimFiles::default(),
            impute:              ImputeOptions::default(),
            model_dir:           default_model_dir(),
            school_choice:       SchoolChoiceConfig::default(),
            population:          PopulationFiles::default(),
            stages:              Vec::new(),
            output_format:       OutputFormat::default(),
        }
    }

    pub fn from_json_str(json: &str) -> PipelineResult<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: &Path) -> PipelineResult<Self> {
        let file = File::open(path)?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        log::info!("loaded run configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        for (name, spec) in [("small", &self.networks.small), ("walk", &self.networks.walk)] {
            if !(spec.horizon > 0.0) {
                return Err(PipelineError::Config(format!(
                    "network {name}: horizon must be positive, got {}",
                    spec.horizon
                )));
            }
        }
        let sc = &self.school_choice;
        if sc.public_count == 0 || sc.private_count == 0 {
            return Err(PipelineError::Config("school choice POI counts must be positive".into()));
        }
        if !(sc.public_distance > 0.0 && sc.private_distance > 0.0) {
            return Err(PipelineError::Config("school choice distances must be positive".into()));
        }
        if let Some(&k) = sc.rolling_ranks.iter().find(|&&k| k == 0) {
            return Err(PipelineError::Config(format!("rolling rank {k} is not a rank")));
        }
        for name in &self.stages {
            if !stages::is_known(name) {
                return Err(PipelineError::UnknownStage(name.clone()));
            }
        }
        Ok(())
    }

    /// The configured stage list, or the default for the accessibilities
    /// mode.
    pub fn stage_names(&self) -> Vec<String> {
        if !self.stages.is_empty() {
            return self.stages.clone();
        }
        stages::default_order(self.accessibilities).iter().map(|s| s.to_string()).collect()
    }

    /// `file` resolved against the data directory.
    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}
