//! Unit and integration tests for as-pipeline.
//!
//! Fixtures are built in memory: a five-node line network, a two-household
//! population, and toy logit models.  Stages that read files get them from
//! a temporary data directory.

#[cfg(test)]
mod helpers {
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    use as_choice::{MnlModel, ModelRegistry};
    use as_core::{GeoPoint, NodeId};
    use as_network::{AccessibilityNetwork, Network, NetworkBuilder};
    use as_population::{Population, Table};

    use crate::{DataContext, RunConfig};

    pub const HOUSEHOLDS: &str = "household_id,unit_id,building_id,persons,income,tenure\n\
                                  1,,20,2,50000,1\n\
                                  2,,21,2,150000,2\n";
    pub const PERSONS: &str = "person_id,household_id,age,sex,race_id,edu,worker,student,job_id\n\
                               100,1,40,1,1,21,1,0,1000\n\
                               101,1,10,2,1,,0,1,\n\
                               102,2,35,2,6,18,1,0,1001\n\
                               103,2,16,1,6,,0,1,\n";
    pub const BUILDINGS: &str = "building_id,parcel_id\n20,500\n21,501\n";
    pub const PARCELS: &str = "primary_id,zone_id,x,y,node_id_small,node_id_walk\n\
                               500,1,0.0,0.0,100,100\n\
                               501,2,4.0,0.0,104,104\n";
    pub const JOBS: &str = "job_id,building_id,sector_id\n1000,21,44\n1001,20,31\n1002,21,44\n";
    pub const SCHOOLS: &str = "school_id,type,x,y,zone_id,\
grade_k,grade_1,grade_2,grade_3,grade_4,grade_5,grade_6,grade_7,grade_8,grade_9,grade_10,grade_11,grade_12\n\
1,public,1.0,0.0,1,1,1,1,1,1,1,1,1,1,1,1,1,1\n\
2,private,3.0,0.0,2,0,0,0,0,0,0,0,0,0,1,1,1,1\n";

    /// Every zone pair of zones 1 and 2; 4 km between zones.
    pub const SKIMS: &str = "from_zone_id,to_zone_id,dist,gen_cost_CAR,gen_tt_CAR\n\
                             1,1,500,1,2\n\
                             1,2,4000,3,10\n\
                             2,1,4000,3,10\n\
                             2,2,500,1,2\n";

    pub fn population() -> Population {
        Population {
            households: Table::from_reader(Cursor::new(HOUSEHOLDS)).unwrap(),
            persons:    Table::from_reader(Cursor::new(PERSONS)).unwrap(),
            buildings:  Table::from_reader(Cursor::new(BUILDINGS)).unwrap(),
            parcels:    Table::from_reader(Cursor::new(PARCELS)).unwrap(),
            jobs:       Table::from_reader(Cursor::new(JOBS)).unwrap(),
            schools:    Table::from_reader(Cursor::new(SCHOOLS)).unwrap(),
            ..Population::default()
        }
    }

    /// Nodes 100..=104 at x = 0..=4, two-way edges of 100 between
    /// neighbours.
    pub fn line_network() -> Network {
        let mut b = NetworkBuilder::new();
        let mut ids = [NodeId::INVALID; 5];
        for (i, id) in ids.iter_mut().enumerate() {
            *id = b.add_node(100 + i as i64, GeoPoint::new(i as f64, 0.0)).unwrap();
        }
        for w in ids.windows(2) {
            b.add_two_way(w[0], w[1], 100.0);
        }
        b.build()
    }

    pub fn accessibility() -> AccessibilityNetwork {
        AccessibilityNetwork::new(line_network())
    }

    pub fn registry(models: &[&str]) -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        for json in models {
            registry.insert(Box::new(MnlModel::from_json_str(json).unwrap()));
        }
        registry
    }

    /// A model over `n` built-in alternatives that all but certainly picks
    /// `pick`.
    pub fn fixed_choice(name: &str, n: usize, pick: usize, coefficients: &str) -> String {
        let alts: Vec<String> = (0..n)
            .map(|i| {
                let constant = if i == pick { 50.0 } else { 0.0 };
                format!(r#"{{ "name": "alt{i}", "constant": {constant} }}"#)
            })
            .collect();
        format!(
            r#"{{ "name": "{name}", "alternatives": [{}], "coefficients": {coefficients} }}"#,
            alts.join(", ")
        )
    }

    pub fn context(dir: &Path, models: &[&str]) -> DataContext {
        let mut config = RunConfig::new(dir);
        config.skims.zone_accessibility = None;
        DataContext::new(config, population(), registry(models))
    }

    pub fn write_skims(dir: &Path) {
        fs::write(dir.join("skims_imputed.csv"), SKIMS).unwrap();
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::{AccessibilitiesMode, OutputFormat, PipelineError, RunConfig};

    #[test]
    fn minimal_file_gets_defaults() {
        let config = RunConfig::from_json_str(r#"{ "data_dir": "./data" }"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.accessibilities, AccessibilitiesMode::Compute);
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.networks.small.horizon, 25_000.0);
        assert!(config.networks.walk.two_way);
        assert_eq!(config.school_choice.public_count, 50);
        assert_eq!(config.data_path("x.csv"), std::path::Path::new("./data/x.csv"));

        let stages = config.stage_names();
        assert_eq!(stages.first().map(String::as_str), Some("initialize_network_small"));
        assert_eq!(stages.last().map(String::as_str), Some("generate_activity_plans"));
        assert!(stages.iter().any(|s| s == "network_aggregations_walk"));
    }

    #[test]
    fn precomputed_mode_swaps_aggregations_for_loading() {
        let config = RunConfig::from_json_str(
            r#"{ "data_dir": ".", "accessibilities": "precomputed", "seed": 7, "output_format": "parquet" }"#,
        )
        .unwrap();
        let stages = config.stage_names();
        assert!(stages.iter().any(|s| s == "load_precomputed_accessibilities"));
        assert!(!stages.iter().any(|s| s.starts_with("network_aggregations")));
        assert_eq!(config.seed, 7);
        assert_eq!(config.output_format, OutputFormat::Parquet);
    }

    #[test]
    fn explicit_stage_list_is_kept() {
        let config =
            RunConfig::from_json_str(r#"{ "data_dir": ".", "stages": ["impute_skims", "wlcm_simulate"] }"#)
                .unwrap();
        assert_eq!(config.stage_names(), vec!["impute_skims".to_string(), "wlcm_simulate".to_string()]);
    }

    #[test]
    fn invalid_values_rejected() {
        let unknown = RunConfig::from_json_str(r#"{ "data_dir": ".", "stages": ["teleport"] }"#);
        assert!(matches!(unknown, Err(PipelineError::UnknownStage(s)) if s == "teleport"));

        let zero_rank =
            RunConfig::from_json_str(r#"{ "data_dir": ".", "school_choice": { "rolling_ranks": [0] } }"#);
        assert!(matches!(zero_rank, Err(PipelineError::Config(_))));

        let mut config = RunConfig::new(".");
        config.networks.walk.horizon = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn skim_access_list_parsed() {
        let config = RunConfig::from_json_str(
            r#"{ "data_dir": ".", "skims": { "skim_access": [
                { "name": "jobs_30", "variable": "jobs", "impedance": "gen_tt_CAR", "threshold": 30, "agg": "mean" }
            ] } }"#,
        )
        .unwrap();
        let access = &config.skims.skim_access;
        assert_eq!(access.len(), 1);
        assert_eq!(access[0].agg, as_skims::ZoneAgg::Mean);
        assert!(!access[0].log);
        assert_eq!(config.skims.zone_id_column, "taz1454");
        assert!(RunConfig::new(".").skims.skim_access.is_empty());
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("SQLite".parse::<OutputFormat>().unwrap(), OutputFormat::Sqlite);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}

// ── Stage registry & builder ──────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use crate::config::AccessibilitiesMode;
    use crate::stages::{by_name, default_order, is_known};
    use crate::{PipelineBuilder, PipelineError, RunConfig, stage_seed};

    #[test]
    fn default_orders_are_all_known() {
        for mode in [AccessibilitiesMode::Compute, AccessibilitiesMode::Precomputed] {
            for name in default_order(mode) {
                let stage = by_name(name).unwrap();
                assert_eq!(stage.name(), *name);
            }
        }
        assert!(!is_known("nope"));
    }

    #[test]
    fn builder_rejects_unknown_and_empty() {
        assert!(matches!(PipelineBuilder::new().named("nope"), Err(PipelineError::UnknownStage(_))));
        assert!(matches!(PipelineBuilder::new().build(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn builder_from_config_keeps_order() {
        let pipeline = PipelineBuilder::from_config(&RunConfig::new(".")).unwrap().build().unwrap();
        let names: Vec<_> = pipeline.stage_names().collect();
        assert_eq!(names.len(), default_order(AccessibilitiesMode::Compute).len());
        assert_eq!(names, default_order(AccessibilitiesMode::Compute));
    }

    #[test]
    fn stage_seeds_depend_on_name_and_seed() {
        assert_eq!(stage_seed(42, "wlcm_simulate"), stage_seed(42, "wlcm_simulate"));
        assert_ne!(stage_seed(42, "wlcm_simulate"), stage_seed(42, "tod_dwell_simulate"));
        assert_ne!(stage_seed(42, "wlcm_simulate"), stage_seed(43, "wlcm_simulate"));
    }
}

// ── Pipeline validation & observer ────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use std::time::Duration;

    use super::helpers::context;
    use crate::context::tables;
    use crate::{DataContext, PipelineBuilder, PipelineError, PipelineObserver};

    #[test]
    fn missing_input_reported_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path(), &[]);
        let pipeline = PipelineBuilder::new().named("tod_distribution_simulate").unwrap().build().unwrap();
        let err = pipeline.run(&mut ctx, &mut crate::NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingInput { ref stage, ref table }
                if stage == "tod_distribution_simulate" && table == tables::PERSON_TOD
        ));
    }

    #[test]
    fn earlier_outputs_satisfy_later_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), &[]);
        assert!(ctx.has(tables::PERSON_JOB));
        assert!(ctx.has(tables::SCHOOLS));
        assert!(!ctx.has(tables::SKIMS));

        let pipeline = PipelineBuilder::new()
            .named("tod_category_simulate")
            .unwrap()
            .named("tod_dwell_simulate")
            .unwrap()
            .named("tod_distribution_simulate")
            .unwrap()
            .build()
            .unwrap();
        pipeline.validate(&ctx).unwrap();
    }

    #[derive(Default)]
    struct Recorder {
        started:  Vec<String>,
        finished: Vec<String>,
        plans:    Option<usize>,
    }

    impl PipelineObserver for Recorder {
        fn on_stage_start(&mut self, _index: usize, stage: &str) {
            self.started.push(stage.to_string());
        }

        fn on_stage_end(&mut self, _index: usize, stage: &str, _elapsed: Duration) {
            self.finished.push(stage.to_string());
        }

        fn on_run_end(&mut self, ctx: &DataContext) {
            self.plans = Some(ctx.plans.len());
        }
    }

    #[test]
    fn failing_stage_stops_run() {
        let dir = tempfile::tempdir().unwrap();
        // No models registered: the first stage fails on lookup.
        let mut ctx = context(dir.path(), &[]);
        let pipeline = PipelineBuilder::new()
            .named("tod_category_simulate")
            .unwrap()
            .named("tod_dwell_simulate")
            .unwrap()
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        assert!(matches!(pipeline.run(&mut ctx, &mut rec), Err(PipelineError::Choice(_))));
        assert_eq!(rec.started, vec!["tod_category_simulate".to_string()]);
        assert!(rec.finished.is_empty());
        assert_eq!(rec.plans, None);
        assert!(!ctx.has(tables::PERSON_TOD));
    }

    #[test]
    fn observer_sees_every_stage() {
        let dir = tempfile::tempdir().unwrap();
        let tod = super::helpers::fixed_choice("work_TOD_choice", 5, 1, "{}");
        let mut ctx = context(dir.path(), &[&tod]);
        let pipeline = PipelineBuilder::new().named("tod_category_simulate").unwrap().build().unwrap();
        let mut rec = Recorder::default();
        pipeline.run(&mut ctx, &mut rec).unwrap();
        assert_eq!(rec.started, rec.finished);
        assert_eq!(rec.plans, Some(0));
        assert!(ctx.has(tables::PERSON_TOD));
    }
}

// ── Time of day & plans ───────────────────────────────────────────────────────

#[cfg(test)]
mod time_of_day {
    use as_core::{DwellCategory, TodPeriod};
    use as_plans::ActivityType;

    use super::helpers::{context, fixed_choice};
    use crate::context::{columns, tables};
    use crate::{NoopObserver, PipelineBuilder, PipelineError};

    fn run_tod_and_plans(seed: u64) -> crate::DataContext {
        let dir = tempfile::tempdir().unwrap();
        let tod = fixed_choice("work_TOD_choice", 5, 1, r#"{ "sector_id": 0.0, "income_2": 0.0 }"#);
        let dwell = fixed_choice("dwell_work", 5, 2, "{}");
        let mut ctx = context(dir.path(), &[&tod, &dwell]);
        ctx.config.seed = seed;
        let pipeline = PipelineBuilder::new()
            .named("tod_category_simulate")
            .unwrap()
            .named("tod_dwell_simulate")
            .unwrap()
            .named("tod_distribution_simulate")
            .unwrap()
            .named("generate_activity_plans")
            .unwrap()
            .build()
            .unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();
        ctx
    }

    #[test]
    fn categories_and_exact_times() {
        let ctx = run_tod_and_plans(42);
        let persons = &ctx.population.persons;
        for key in [100, 102] {
            assert_eq!(persons.var(key, columns::TOD), Some(f64::from(TodPeriod::AmPeak.code())));
            assert_eq!(persons.var(key, columns::DWELL_WORK), Some(3.0));
            let dep = persons.var(key, columns::DEPARTURE).unwrap();
            let dwell = persons.var(key, columns::DWELL_EXACT).unwrap();
            let end = persons.var(key, columns::WORK_END).unwrap();
            assert!(TodPeriod::AmPeak.contains(dep), "departure {dep}");
            assert!(DwellCategory::FullDay.contains(dwell), "dwell {dwell}");
            approx::assert_relative_eq!(end, dep + dwell, max_relative = 1e-12);
        }
        // No job, no times.
        assert!(persons.var(101, columns::TOD).is_some_and(f64::is_nan));
        assert!(persons.var(101, columns::DEPARTURE).is_some_and(f64::is_nan));
        assert!(ctx.has(tables::PERSON_TIMES));
    }

    #[test]
    fn plans_for_every_commuter() {
        let ctx = run_tod_and_plans(42);
        assert_eq!(ctx.plans.len(), 2);
        assert!(ctx.plans.windows(2).all(|w| w[0].person_id < w[1].person_id));

        let rows: Vec<_> = ctx.plans[0].rows().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].activity_type, Some(ActivityType::Home));
        assert_eq!(rows[0].x, Some(0.0));
        // Person 100 works at job 1000, on the parcel at x = 4.
        assert_eq!(rows[2].activity_type, Some(ActivityType::Work));
        assert_eq!(rows[2].x, Some(4.0));
        assert_eq!(rows[4].end_time, None);
        assert_eq!(
            rows[0].end_time,
            ctx.population.persons.var(100, columns::DEPARTURE)
        );
    }

    #[test]
    fn same_seed_same_draws() {
        let a = run_tod_and_plans(5);
        let b = run_tod_and_plans(5);
        let c = run_tod_and_plans(6);
        let dep = |ctx: &crate::DataContext| ctx.population.persons.column(columns::DEPARTURE);
        assert_eq!(dep(&a), dep(&b));
        assert_ne!(dep(&a)[0], dep(&c)[0]);
    }

    #[test]
    fn wrong_alternative_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tod = fixed_choice("work_TOD_choice", 3, 0, "{}");
        let mut ctx = context(dir.path(), &[&tod]);
        let pipeline = PipelineBuilder::new().named("tod_category_simulate").unwrap().build().unwrap();
        let err = pipeline.run(&mut ctx, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, PipelineError::ModelShape { expected: 5, got: 3, .. }));
    }
}

// ── Networks & accessibility ──────────────────────────────────────────────────

#[cfg(test)]
mod accessibility {
    use std::fs;

    use as_network::NetworkSpec;

    use super::helpers::context;
    use crate::context::tables;
    use crate::{NoopObserver, PipelineBuilder, PipelineError};

    const NODES: &str = "osmid,x,y\n100,0,0\n101,1,0\n102,2,0\n103,3,0\n104,4,0\n";
    const EDGES: &str = "u,v,length\n100,101,100\n101,102,100\n102,103,100\n103,104,100\n";

    fn spec() -> NetworkSpec {
        let mut spec = NetworkSpec::new("nodes.csv", "edges.csv", 500.0);
        spec.two_way = true;
        spec
    }

    #[test]
    fn aggregate_population_onto_nodes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("nodes.csv"), NODES).unwrap();
        fs::write(dir.path().join("edges.csv"), EDGES).unwrap();
        fs::write(
            dir.path().join("network_aggregations_small.json"),
            r#"{ "variables": [
                  { "name": "hh_pop", "source": "households", "column": "persons",
                    "radius": 150, "aggregation": "sum" },
                  { "name": "jobs", "source": "jobs", "radius": 150, "aggregation": "count" }
                ] }"#,
        )
        .unwrap();

        let mut ctx = context(dir.path(), &[]);
        ctx.config.networks.small = spec();
        let pipeline = PipelineBuilder::new()
            .named("initialize_network_small")
            .unwrap()
            .named("network_aggregations_small")
            .unwrap()
            .build()
            .unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();

        let nodes = ctx.node_table(tables::NODES_SMALL).unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes.value("hh_pop", 100), Some(2.0));
        assert_eq!(nodes.value("hh_pop", 101), Some(2.0));
        assert_eq!(nodes.value("hh_pop", 102), Some(0.0));
        assert_eq!(nodes.value("jobs", 104), Some(2.0));
        assert_eq!(nodes.value("jobs", 100), Some(1.0));
        assert!(dir.path().join("drive_net_vars.csv").exists());
    }

    #[test]
    fn unknown_source_table_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("nodes.csv"), NODES).unwrap();
        fs::write(dir.path().join("edges.csv"), EDGES).unwrap();
        fs::write(
            dir.path().join("network_aggregations_small.json"),
            r#"{ "variables": [ { "name": "x", "source": "trees", "radius": 100, "aggregation": "sum" } ] }"#,
        )
        .unwrap();

        let mut ctx = context(dir.path(), &[]);
        ctx.config.networks.small = spec();
        let pipeline = PipelineBuilder::new()
            .named("initialize_network_small")
            .unwrap()
            .named("network_aggregations_small")
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(pipeline.run(&mut ctx, &mut NoopObserver), Err(PipelineError::Config(_))));
    }

    #[test]
    fn precomputed_tables_are_read_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("drive_net_vars.csv"), "node_id,jobs\n100,3\n101,1\n").unwrap();
        fs::write(dir.path().join("walk_net_vars.csv"), "node_id,shops\n100,2\n").unwrap();

        let mut ctx = context(dir.path(), &[]);
        let pipeline =
            PipelineBuilder::new().named("load_precomputed_accessibilities").unwrap().build().unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();
        assert_eq!(ctx.node_table(tables::NODES_SMALL).unwrap().value("jobs", 100), Some(3.0));
        assert_eq!(ctx.node_table(tables::NODES_WALK).unwrap().value("shops", 100), Some(2.0));
        assert!(ctx.has(tables::NODES_WALK));
    }
}

// ── Location & household choices ──────────────────────────────────────────────

#[cfg(test)]
mod choices {
    use std::fs;

    use as_core::{BuildingId, JobId};
    use as_network::NodeTable;

    use super::helpers::{accessibility, context, fixed_choice, write_skims};
    use crate::context::{columns, tables};
    use crate::{NoopObserver, PipelineBuilder, PipelineError};

    #[test]
    fn workers_get_distinct_vacant_jobs() {
        let dir = tempfile::tempdir().unwrap();
        write_skims(dir.path());
        let wlcm = r#"{ "name": "WLCM", "coefficients": { "dist": -0.001, "tt": -0.1, "sector_id": 0.0 } }"#;
        let mut ctx = context(dir.path(), &[wlcm]);
        // Person 102 looks for work; 100 keeps job 1000.
        if let Some(p) = ctx.population.persons.get_mut(102) {
            p.job_id = None;
        }

        let pipeline = PipelineBuilder::new()
            .named("impute_skims")
            .unwrap()
            .named("wlcm_simulate")
            .unwrap()
            .build()
            .unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();

        let persons = &ctx.population.persons;
        assert_eq!(persons.get(100).unwrap().job_id, Some(JobId(1000)));
        let job = persons.get(102).unwrap().job_id.unwrap();
        assert!(job == JobId(1001) || job == JobId(1002), "got {job}");
        assert!(persons.get(101).unwrap().job_id.is_none());
        assert!(ctx.skims().is_ok());
    }

    #[test]
    fn auto_ownership_sees_node_variables() {
        let dir = tempfile::tempdir().unwrap();
        let model = fixed_choice("auto_ownership", 4, 2, r#"{ "jobs_500m": 0.0, "income_12p": 0.0 }"#);
        let mut ctx = context(dir.path(), &[&model]);
        for name in [tables::NODES_SMALL, tables::NODES_WALK] {
            let mut nodes = NodeTable::new(vec![100, 101, 102, 103, 104]);
            nodes.add_column("jobs_500m", vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
            ctx.node_tables.insert(name.to_string(), nodes);
            ctx.provide(name);
        }

        let pipeline = PipelineBuilder::new().named("auto_ownership_simulate").unwrap().build().unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();
        assert_eq!(ctx.population.households.column(columns::CARS), vec![2.0, 2.0]);
        assert!(ctx.has(tables::HOUSEHOLD_CARS));
    }

    #[test]
    fn mode_choice_reads_chts_and_skim_variables() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("skims_period.csv"), "orig,dest,da_time_AM,da_time_MD\n1,2,20,25\n2,1,22,26\n")
            .unwrap();
        fs::write(dir.path().join("zones.csv"), "taz1454,acc\n1,3.5\n").unwrap();
        let model = fixed_choice(
            "primary_mode_choice",
            7,
            6,
            r#"{ "da_time": 0.0, "HHVEH": 0.0, "OWN": 0.0, "RACE1": 0.0, "EDUCA": 0.0, "acc": 0.0 }"#,
        );
        let mut ctx = context(dir.path(), &[&model]);
        ctx.config.skims.zone_accessibility = Some("zones.csv".into());
        let nan = f64::NAN;
        ctx.population.persons.set_column(columns::TOD, &[1.0, nan, 1.0, nan]).unwrap();
        ctx.population.households.set_column(columns::CARS, &[1.0, 0.0]).unwrap();
        ctx.provide(tables::PERSON_TOD);
        ctx.provide(tables::HOUSEHOLD_CARS);

        let pipeline = PipelineBuilder::new().named("primary_mode_choice_simulate").unwrap().build().unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();

        let modes = ctx.population.persons.column(columns::COMMUTE_MODE);
        assert_eq!(modes[0], 6.0);
        assert_eq!(modes[2], 6.0);
        assert!(modes[1].is_nan() && modes[3].is_nan());
    }

    fn skim_access_context(dir: &std::path::Path) -> crate::DataContext {
        write_skims(dir);
        fs::write(dir.join("skims_period.csv"), "orig,dest,da_time_AM,da_time_MD\n1,2,20,25\n2,1,22,26\n").unwrap();
        fs::write(dir.join("zones.csv"), "taz1454,jobs\n1,10\n2,20\n").unwrap();
        // Only the computed column is named; an absent column fails the draw.
        let model = fixed_choice("primary_mode_choice", 7, 3, r#"{ "jobs_car_5": 0.0, "jobs_car_15": 0.0 }"#);
        let mut ctx = context(dir, &[&model]);
        ctx.config.skims.zone_accessibility = Some("zones.csv".into());
        ctx.config.skims.skim_access = serde_json::from_str(
            r#"[ { "name": "jobs_car_5",  "variable": "jobs", "impedance": "gen_tt_CAR", "threshold": 5 },
                 { "name": "jobs_car_15", "variable": "jobs", "impedance": "gen_tt_CAR", "threshold": 15, "log": true } ]"#,
        )
        .unwrap();
        let nan = f64::NAN;
        ctx.population.persons.set_column(columns::TOD, &[1.0, nan, 1.0, nan]).unwrap();
        ctx.population.households.set_column(columns::CARS, &[1.0, 0.0]).unwrap();
        ctx.provide(tables::PERSON_TOD);
        ctx.provide(tables::HOUSEHOLD_CARS);
        ctx
    }

    fn impute_then_mode_choice() -> crate::Pipeline {
        PipelineBuilder::new()
            .named("impute_skims")
            .unwrap()
            .named("primary_mode_choice_simulate")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn mode_choice_sees_skim_access_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = skim_access_context(dir.path());
        impute_then_mode_choice().run(&mut ctx, &mut NoopObserver).unwrap();

        let modes = ctx.population.persons.column(columns::COMMUTE_MODE);
        assert_eq!(modes[0], 3.0);
        assert_eq!(modes[2], 3.0);
    }

    #[test]
    fn skim_access_needs_zone_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = skim_access_context(dir.path());
        ctx.config.skims.zone_accessibility = None;
        let err = impute_then_mode_choice().run(&mut ctx, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)), "{err}");
    }

    #[test]
    fn school_choice_respects_grades() {
        let dir = tempfile::tempdir().unwrap();
        write_skims(dir.path());
        // Strongly prefer private schools where one teaches the grade.
        let model = r#"{ "name": "school_choice", "coefficients": {
            "public": -50.0, "distance": 0.0, "rank": 0.0,
            "public_school_mean_dist_1": 0.0, "private_school_mean_dist_5": 0.0,
            "hh_inc_75_to_200k": 0.0 } }"#;
        let mut ctx = context(dir.path(), &[model]);
        ctx.networks.insert(tables::NET_SMALL.to_string(), accessibility());
        ctx.provide(tables::NET_SMALL);

        let pipeline = PipelineBuilder::new()
            .named("impute_skims")
            .unwrap()
            .named("school_choice_simulate")
            .unwrap()
            .build()
            .unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();

        let persons = &ctx.population.persons;
        // Age 10: the private school only teaches grades 9 to 12.
        assert_eq!(persons.var(101, columns::SCHOOL), Some(1.0));
        assert_eq!(persons.var(103, columns::SCHOOL), Some(2.0));
        assert!(persons.var(100, columns::SCHOOL).is_some_and(f64::is_nan));
    }

    #[test]
    fn school_choice_skips_student_without_home_parcel() {
        let dir = tempfile::tempdir().unwrap();
        write_skims(dir.path());
        let model = r#"{ "name": "school_choice", "coefficients": { "distance": -0.01 } }"#;
        let mut ctx = context(dir.path(), &[model]);
        ctx.networks.insert(tables::NET_SMALL.to_string(), accessibility());
        ctx.provide(tables::NET_SMALL);
        // Household 2 points at a building that does not exist.
        if let Some(h) = ctx.population.households.get_mut(2) {
            h.building_id = Some(BuildingId(99));
        }

        let pipeline = PipelineBuilder::new()
            .named("impute_skims")
            .unwrap()
            .named("school_choice_simulate")
            .unwrap()
            .build()
            .unwrap();
        pipeline.run(&mut ctx, &mut NoopObserver).unwrap();

        let persons = &ctx.population.persons;
        assert_eq!(persons.var(101, columns::SCHOOL), Some(1.0));
        assert!(persons.var(103, columns::SCHOOL).is_some_and(f64::is_nan));
    }
}
