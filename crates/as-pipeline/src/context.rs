//! The data every stage reads and writes.
//!
//! [`DataContext`] is passed explicitly to each stage.  It owns the
//! population, the loaded networks and node tables, the imputed skims, the
//! choice models, and the generated plans.  It also tracks which named
//! tables are available so the pipeline can check stage dependencies
//! before running anything.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use as_choice::ModelRegistry;
use as_network::{AccessibilityNetwork, NodeTable};
use as_plans::Plan;
use as_population::Population;
use as_skims::ImputedSkims;

use crate::config::RunConfig;
use crate::{PipelineError, PipelineResult};

/// Names of the tables and derived columns stages exchange.
///
/// Dotted names are columns added to an existing table.
pub mod tables {
    pub const HOUSEHOLDS: &str = "households";
    pub const PERSONS:    &str = "persons";
    pub const JOBS:       &str = "jobs";
    pub const BUILDINGS:  &str = "buildings";
    pub const UNITS:      &str = "units";
    pub const PARCELS:    &str = "parcels";
    pub const SCHOOLS:    &str = "schools";

    pub const NET_SMALL:   &str = "netsmall";
    pub const NET_WALK:    &str = "netwalk";
    pub const NODES_SMALL: &str = "nodessmall";
    pub const NODES_WALK:  &str = "nodeswalk";
    pub const SKIMS:       &str = "skims";

    pub const PERSON_JOB:    &str = "persons.job_id";
    pub const PERSON_TOD:    &str = "persons.TOD";
    pub const PERSON_DWELL:  &str = "persons.dwell_work";
    pub const PERSON_TIMES:  &str = "persons.HW_ET";
    pub const PERSON_MODE:   &str = "persons.primary_commute_mode";
    pub const PERSON_SCHOOL: &str = "persons.school_id";
    pub const HOUSEHOLD_CARS: &str = "households.cars_alt";

    pub const PLANS: &str = "plans";
}

/// Column names written onto the population tables.
pub mod columns {
    pub const TOD:          &str = "TOD";
    pub const DWELL_WORK:   &str = "dwell_work";
    pub const DWELL_EXACT:  &str = "dwell_exact";
    pub const DEPARTURE:    &str = "HW_ET";
    pub const WORK_END:     &str = "WH_ST";
    pub const CARS:         &str = "cars_alt";
    pub const COMMUTE_MODE: &str = "primary_commute_mode";
    pub const SCHOOL:       &str = "school_id";
}

pub struct DataContext {
    pub config:      RunConfig,
    pub population:  Population,
    pub models:      ModelRegistry,
    /// Keyed by [`tables::NET_SMALL`] / [`tables::NET_WALK`].
    pub networks:    FxHashMap<String, AccessibilityNetwork>,
    /// Keyed by [`tables::NODES_SMALL`] / [`tables::NODES_WALK`].
    pub node_tables: FxHashMap<String, NodeTable>,
    pub skims:       Option<ImputedSkims>,
    pub plans:       Vec<Plan>,
    /// Seed of the stage currently running; set by the pipeline.
    pub stage_seed:  u64,
    available:       BTreeSet<String>,
}

impl DataContext {
    /// A context over an in-memory population and model set.
    ///
    /// Population tables are registered as available; so is
    /// [`tables::PERSON_JOB`] when some person already carries a job.
    pub fn new(config: RunConfig, population: Population, models: ModelRegistry) -> Self {
        let mut ctx = Self {
            stage_seed:  config.seed,
            config,
            population,
            models,
            networks:    FxHashMap::default(),
            node_tables: FxHashMap::default(),
            skims:       None,
            plans:       Vec::new(),
            available:   BTreeSet::new(),
        };
        for name in [
            tables::HOUSEHOLDS,
            tables::PERSONS,
            tables::JOBS,
            tables::BUILDINGS,
            tables::UNITS,
            tables::PARCELS,
        ] {
            ctx.provide(name);
        }
        if !ctx.population.schools.is_empty() {
            ctx.provide(tables::SCHOOLS);
        }
        if ctx.population.persons.iter().any(|p| p.job_id.is_some_and(|j| j.is_valid())) {
            ctx.provide(tables::PERSON_JOB);
        }
        ctx
    }

    /// Load the population and the model directory named by `config`.
    ///
    /// A missing model directory leaves the registry empty; stages that
    /// need a model then fail when they look it up.
    pub fn load(config: RunConfig) -> PipelineResult<Self> {
        let population = Population::load(&config.data_dir, &config.population)?;
        population.validate()?;
        let model_dir = config.data_path(&config.model_dir);
        let models = if model_dir.is_dir() {
            ModelRegistry::load_dir(&model_dir)?
        } else {
            log::warn!("model directory {} not found; no models loaded", model_dir.display());
            ModelRegistry::new()
        };
        Ok(Self::new(config, population, models))
    }

    // ── Availability ──────────────────────────────────────────────────────

    pub fn provide(&mut self, name: &str) {
        self.available.insert(name.to_string());
    }

    pub fn has(&self, name: &str) -> bool {
        self.available.contains(name)
    }

    pub fn available(&self) -> impl Iterator<Item = &str> + '_ {
        self.available.iter().map(String::as_str)
    }

    // ── Typed access ──────────────────────────────────────────────────────

    pub fn network(&self, name: &str) -> PipelineResult<&AccessibilityNetwork> {
        self.networks.get(name).ok_or_else(|| PipelineError::NotLoaded(name.to_string()))
    }

    pub fn network_mut(&mut self, name: &str) -> PipelineResult<&mut AccessibilityNetwork> {
        self.networks.get_mut(name).ok_or_else(|| PipelineError::NotLoaded(name.to_string()))
    }

    pub fn node_table(&self, name: &str) -> PipelineResult<&NodeTable> {
        self.node_tables.get(name).ok_or_else(|| PipelineError::NotLoaded(name.to_string()))
    }

    pub fn skims(&self) -> PipelineResult<&ImputedSkims> {
        self.skims.as_ref().ok_or_else(|| PipelineError::NotLoaded(tables::SKIMS.to_string()))
    }
}
