//! Unit tests for as-skims.

#[cfg(test)]
mod helpers {
    use as_core::ZoneId;
    use crate::{RawSkimRecord, ReferenceSkims};

    pub fn raw(o: u32, d: u32, mode: &str, hour: u8, tt_s: f64, cost: f64, dist: f64, n: u32) -> RawSkimRecord {
        RawSkimRecord {
            from_zone_id: ZoneId(o),
            to_zone_id: ZoneId(d),
            mode: mode.to_string(),
            hour,
            generalized_time_s: tt_s,
            gen_cost: cost,
            distance_m: dist,
            num_observations: n,
        }
    }

    /// Two zones, all four directed pairs.  Intra-zone 0.5 mi, inter-zone 2 mi.
    pub fn two_zone_reference() -> ReferenceSkims {
        ReferenceSkims::from_miles([
            (ZoneId(1), ZoneId(1), 0.5),
            (ZoneId(1), ZoneId(2), 2.0),
            (ZoneId(2), ZoneId(1), 2.0),
            (ZoneId(2), ZoneId(2), 0.5),
        ])
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loading {
    use std::io::Cursor;

    use approx::assert_relative_eq;
    use as_core::ZoneId;
    use crate::{MILES_TO_METERS, ReferenceSkims, SkimError, load_raw_skims_reader};

    #[test]
    fn raw_rows_with_extra_columns() {
        let csv = "from_zone_id,to_zone_id,mode,hour,generalizedTimeInS,gen_cost,distanceInM,numObservations,cost\n\
                   1,2,CAR,8,600,2.5,4000,3,9\n";
        let rows = load_raw_skims_reader(Cursor::new(csv)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_zone_id, ZoneId(2));
        assert_eq!(rows[0].gen_tt(), 10.0);
        assert_eq!(rows[0].num_observations, 3);
    }

    #[test]
    fn empty_numeric_cells_read_as_nan() {
        let csv = "from_zone_id,to_zone_id,mode,hour,generalizedTimeInS,gen_cost,distanceInM,numObservations\n\
                   1,2,CAR,8,600,2.5,,3\n\
                   2,1,CAR,8,,,4000,1\n";
        let rows = load_raw_skims_reader(Cursor::new(csv)).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].distance_m.is_nan());
        assert_eq!(rows[0].gen_cost, 2.5);
        assert!(rows[1].gen_tt().is_nan());
        assert!(rows[1].gen_cost.is_nan());
        assert_eq!(rows[1].distance_m, 4000.0);
    }

    #[test]
    fn reference_custom_column_and_direction() {
        let csv = "orig,dest,da_distance_MD,other\n1.0,2,1.5,x\n2,1,3.0,y\n";
        let r = ReferenceSkims::from_reader(Cursor::new(csv), "da_distance_MD").unwrap();
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r.distance_m(ZoneId(1), ZoneId(2)).unwrap(), 1.5 * MILES_TO_METERS);
        assert_relative_eq!(r.distance_m(ZoneId(2), ZoneId(1)).unwrap(), 3.0 * MILES_TO_METERS);
        assert_eq!(r.distance_m(ZoneId(1), ZoneId(1)), None);
    }

    #[test]
    fn reference_missing_column() {
        let csv = "orig,dest,dist\n1,2,1.5\n";
        let err = ReferenceSkims::from_reader(Cursor::new(csv), "da_distance_AM").unwrap_err();
        assert!(matches!(err, SkimError::MissingColumn(ref c) if c == "da_distance_AM"));
    }
}

// ── Imputation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod imputation {
    use approx::assert_relative_eq;
    use as_core::ZoneId;
    use crate::{
        Impedance, ImputeOptions, MILES_TO_METERS, MissingModePolicy, SkimError,
        impute_missing_skims,
    };
    use super::helpers::{raw, two_zone_reference};

    const Z1: ZoneId = ZoneId(1);
    const Z2: ZoneId = ZoneId(2);

    fn fixture() -> Vec<crate::RawSkimRecord> {
        vec![
            raw(1, 2, "CAR", 8, 600.0, 2.0, 1000.0, 1),
            raw(1, 2, "CAR", 9, 1200.0, 4.0, 1000.0, 3),
            raw(2, 1, "CAR", 14, 9000.0, 50.0, 1000.0, 5),
            raw(1, 1, "WALK", 8, 300.0, 0.0, 0.0, 2),
            raw(2, 1, "BIKE", 12, 60.0, 0.0, 200.0, 1),
        ]
    }

    #[test]
    fn one_row_per_reference_pair() {
        let reference = two_zone_reference();
        let out = impute_missing_skims(&fixture(), &reference, &ImputeOptions::default()).unwrap();
        assert_eq!(out.skims.len(), reference.len());
        assert_eq!(out.skims.modes(), &["CAR".to_string(), "WALK".to_string()]);
    }

    #[test]
    fn weighted_am_ratio() {
        let out = impute_missing_skims(&fixture(), &two_zone_reference(), &ImputeOptions::default()).unwrap();
        let car = out.ratios["CAR"];
        assert_relative_eq!(car.time_per_m, 0.0175, max_relative = 1e-12);
        assert_relative_eq!(car.cost_per_m, 0.0035, max_relative = 1e-12);
    }

    #[test]
    fn observed_cells_are_weighted_means() {
        let out = impute_missing_skims(&fixture(), &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_relative_eq!(out.skims.get(Z1, Z2, "CAR", Impedance::Time).unwrap(), 17.5);
        assert_relative_eq!(out.skims.get(Z1, Z2, "CAR", Impedance::Cost).unwrap(), 3.5);
        assert_relative_eq!(out.skims.get(Z1, Z1, "WALK", Impedance::Time).unwrap(), 5.0);
    }

    #[test]
    fn missing_cells_are_distance_times_ratio() {
        let out = impute_missing_skims(&fixture(), &two_zone_reference(), &ImputeOptions::default()).unwrap();
        let d21 = 2.0 * MILES_TO_METERS;
        // The off-peak CAR observation on 2→1 does not count.
        assert_relative_eq!(out.skims.get(Z2, Z1, "CAR", Impedance::Time).unwrap(), d21 * 0.0175, max_relative = 1e-12);
        assert_relative_eq!(out.skims.get(Z2, Z1, "CAR", Impedance::Cost).unwrap(), d21 * 0.0035, max_relative = 1e-12);
        // WALK ratio comes from the intra-zone row at the reference distance.
        assert_relative_eq!(
            out.skims.get(Z1, Z2, "WALK", Impedance::Time).unwrap(),
            20.0,
            max_relative = 1e-9
        );
        assert_eq!(out.skims.missing_cells(), 0);
    }

    #[test]
    fn intra_zone_uses_reference_distance() {
        let out = impute_missing_skims(&fixture(), &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_relative_eq!(out.skims.distance(Z1, Z1).unwrap(), 0.5 * MILES_TO_METERS);
        assert_eq!(out.summary.intra_zone_overridden, 1);
    }

    #[test]
    fn zero_distance_takes_reference() {
        let rows = vec![raw(1, 2, "CAR", 8, 600.0, 1.0, 0.0, 1)];
        let out = impute_missing_skims(&rows, &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_eq!(out.summary.zero_distance_replaced, 1);
        // Symmetric reference distance, so the imputed reverse cell equals
        // the observed one.
        assert_relative_eq!(out.skims.get(Z2, Z1, "CAR", Impedance::Time).unwrap(), 10.0, max_relative = 1e-12);
    }

    #[test]
    fn missing_distance_takes_reference() {
        let rows = vec![raw(1, 2, "CAR", 8, 600.0, 1.0, f64::NAN, 1)];
        let out = impute_missing_skims(&rows, &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_eq!(out.summary.zero_distance_replaced, 1);
        // The ratio is taken over the reference distance.
        let d12 = 2.0 * MILES_TO_METERS;
        assert_relative_eq!(out.ratios["CAR"].time_per_m, 10.0 / d12, max_relative = 1e-12);
        assert_relative_eq!(out.ratios["CAR"].cost_per_m, 1.0 / d12, max_relative = 1e-12);
        assert_relative_eq!(out.skims.get(Z1, Z2, "CAR", Impedance::Time).unwrap(), 10.0);
    }

    #[test]
    fn unmatched_missing_distance_is_kept_out_of_ratios() {
        let rows = vec![
            raw(5, 6, "CAR", 8, 6000.0, 100.0, f64::NAN, 10),
            raw(1, 2, "CAR", 8, 600.0, 2.0, 1000.0, 1),
        ];
        let out = impute_missing_skims(&rows, &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_eq!(out.summary.zero_distance_unmatched, 1);
        assert_relative_eq!(out.ratios["CAR"].time_per_m, 0.01, max_relative = 1e-12);
    }

    #[test]
    fn unmatched_zero_distance_is_kept_out_of_ratios() {
        let rows = vec![
            raw(5, 6, "CAR", 8, 6000.0, 100.0, 0.0, 10),
            raw(1, 2, "CAR", 8, 600.0, 2.0, 1000.0, 1),
        ];
        let out = impute_missing_skims(&rows, &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_eq!(out.summary.zero_distance_unmatched, 1);
        assert_eq!(out.summary.dropped_pairs, 1);
        assert_relative_eq!(out.ratios["CAR"].time_per_m, 0.01, max_relative = 1e-12);
        assert_eq!(out.skims.len(), 4);
    }

    #[test]
    fn off_peak_only_mode_policy() {
        let warn = impute_missing_skims(&fixture(), &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_eq!(warn.summary.skipped_modes, vec!["BIKE".to_string()]);
        assert!(warn.skims.column("BIKE", Impedance::Time).is_none());

        let strict = ImputeOptions { missing_mode_policy: MissingModePolicy::Error, ..Default::default() };
        let err = impute_missing_skims(&fixture(), &two_zone_reference(), &strict).unwrap_err();
        assert!(matches!(err, SkimError::MissingModeRatio { ref mode } if mode == "BIKE"));
    }

    #[test]
    fn am_mode_without_ratio_leaves_cells_empty() {
        // Zero distance with no reference pair: AM observations exist but no
        // usable ratio.
        let rows = vec![raw(1, 2, "FERRY", 8, 600.0, 1.0, 0.0, 1)];
        let reference = crate::ReferenceSkims::from_miles([(Z2, Z1, 1.0), (Z1, Z2, 1.0)]);
        let out = impute_missing_skims(&rows, &reference, &ImputeOptions::default());
        // 1→2 is in the reference here, so the zero distance is repaired.
        assert!(out.unwrap().ratios.contains_key("FERRY"));

        let reference = crate::ReferenceSkims::from_miles([(Z2, Z1, 1.0)]);
        let rows = vec![raw(1, 2, "FERRY", 8, 600.0, 1.0, 0.0, 1)];
        let out = impute_missing_skims(&rows, &reference, &ImputeOptions::default()).unwrap();
        assert!(out.ratios.is_empty());
        assert_eq!(out.skims.get(Z2, Z1, "FERRY", Impedance::Time), None);
        assert_eq!(out.skims.missing_cells(), 2);
    }

    #[test]
    fn expected_rows_checked() {
        let opts = ImputeOptions { expected_rows: Some(5), ..Default::default() };
        let err = impute_missing_skims(&fixture(), &two_zone_reference(), &opts).unwrap_err();
        assert!(matches!(err, SkimError::RowCount { expected: 5, got: 4 }));
        let opts = ImputeOptions { expected_rows: Some(4), ..Default::default() };
        assert!(impute_missing_skims(&fixture(), &two_zone_reference(), &opts).is_ok());
    }

    #[test]
    fn complete_input_is_unchanged() {
        let rows = vec![
            raw(1, 1, "CAR", 7, 120.0, 0.5, 800.0, 1),
            raw(1, 2, "CAR", 7, 600.0, 2.0, 3000.0, 1),
            raw(2, 1, "CAR", 7, 660.0, 2.2, 3100.0, 1),
            raw(2, 2, "CAR", 7, 180.0, 0.6, 900.0, 1),
        ];
        let out = impute_missing_skims(&rows, &two_zone_reference(), &ImputeOptions::default()).unwrap();
        assert_eq!(out.summary.imputed_cells, 0);
        for r in &rows {
            let got = out.skims.get(r.from_zone_id, r.to_zone_id, "CAR", Impedance::Time).unwrap();
            assert_relative_eq!(got, r.gen_tt());
            let got = out.skims.get(r.from_zone_id, r.to_zone_id, "CAR", Impedance::Cost).unwrap();
            assert_relative_eq!(got, r.gen_cost);
        }
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use std::fs;

    use approx::assert_relative_eq;
    use as_core::ZoneId;
    use crate::{
        DEFAULT_DISTANCE_COLUMN, Impedance, ImputeOptions, ImputedSkims, SkimError, SkimSources,
        load_or_impute,
    };

    #[test]
    fn computes_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("beam_skims_raw.csv");
        let ref_path = dir.path().join("mtc_skims.csv");
        let cache_path = dir.path().join("out").join("beam_skims_imputed.csv");

        fs::write(
            &raw_path,
            "from_zone_id,to_zone_id,mode,hour,generalizedTimeInS,gen_cost,distanceInM,numObservations\n\
             1,2,CAR,8,600,2,1000,1\n",
        )
        .unwrap();
        fs::write(&ref_path, "orig,dest,da_distance_AM\n1,2,1.0\n2,1,1.0\n").unwrap();

        let sources = SkimSources {
            raw_path:        &raw_path,
            reference_path:  &ref_path,
            distance_column: DEFAULT_DISTANCE_COLUMN,
        };
        let first = load_or_impute(&cache_path, &sources, &ImputeOptions::default()).unwrap();
        assert!(cache_path.exists());

        // Raw input gone: the second call must come from the cache.
        fs::remove_file(&raw_path).unwrap();
        let second = load_or_impute(&cache_path, &sources, &ImputeOptions::default()).unwrap();
        assert_eq!(second.len(), first.len());
        assert_eq!(second.modes(), first.modes());
        for (o, d) in [(ZoneId(1), ZoneId(2)), (ZoneId(2), ZoneId(1))] {
            assert_relative_eq!(
                second.get(o, d, "CAR", Impedance::Time).unwrap(),
                first.get(o, d, "CAR", Impedance::Time).unwrap()
            );
        }
    }

    fn write_sources(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let raw_path = dir.join("beam_skims_raw.csv");
        let ref_path = dir.join("mtc_skims.csv");
        fs::write(
            &raw_path,
            "from_zone_id,to_zone_id,mode,hour,generalizedTimeInS,gen_cost,distanceInM,numObservations\n\
             1,2,CAR,8,600,2,1000,1\n",
        )
        .unwrap();
        fs::write(&ref_path, "orig,dest,da_distance_AM\n1,2,1.0\n2,1,1.0\n").unwrap();
        (raw_path, ref_path)
    }

    #[test]
    fn stale_cache_is_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let (raw_path, ref_path) = write_sources(dir.path());
        let cache_path = dir.path().join("beam_skims_imputed.csv");
        // A truncated cache: one of the two reference pairs.
        fs::write(&cache_path, "from_zone_id,to_zone_id,dist,gen_tt_CAR,gen_cost_CAR\n1,2,1609.34,10,2\n").unwrap();

        let sources = SkimSources {
            raw_path:        &raw_path,
            reference_path:  &ref_path,
            distance_column: DEFAULT_DISTANCE_COLUMN,
        };
        let opts = ImputeOptions { expected_rows: Some(2), ..Default::default() };
        let skims = load_or_impute(&cache_path, &sources, &opts).unwrap();
        assert_eq!(skims.len(), 2);
        assert_eq!(ImputedSkims::from_csv_path(&cache_path).unwrap().len(), 2);

        // Without a row-count check the cache is trusted as is.
        fs::write(&cache_path, "from_zone_id,to_zone_id,dist,gen_tt_CAR,gen_cost_CAR\n1,2,1609.34,10,2\n").unwrap();
        let skims = load_or_impute(&cache_path, &sources, &ImputeOptions::default()).unwrap();
        assert_eq!(skims.len(), 1);
    }

    #[test]
    fn wrong_row_count_fails_after_recompute() {
        let dir = tempfile::tempdir().unwrap();
        let (raw_path, ref_path) = write_sources(dir.path());
        let cache_path = dir.path().join("beam_skims_imputed.csv");
        fs::write(&cache_path, "from_zone_id,to_zone_id,dist,gen_tt_CAR,gen_cost_CAR\n1,2,1609.34,10,2\n").unwrap();

        let sources = SkimSources {
            raw_path:        &raw_path,
            reference_path:  &ref_path,
            distance_column: DEFAULT_DISTANCE_COLUMN,
        };
        let opts = ImputeOptions { expected_rows: Some(4), ..Default::default() };
        let err = load_or_impute(&cache_path, &sources, &opts).unwrap_err();
        assert!(matches!(err, SkimError::RowCount { expected: 4, got: 2 }));
    }

    #[test]
    fn empty_cells_read_as_missing() {
        let csv = "from_zone_id,to_zone_id,dist,gen_cost_CAR,gen_tt_CAR,gen_tt_WALK\n1,2,100,,4.0,9\n";
        let t = ImputedSkims::read_csv(std::io::Cursor::new(csv)).unwrap();
        assert_eq!(t.modes(), &["CAR".to_string(), "WALK".to_string()]);
        assert_eq!(t.get(ZoneId(1), ZoneId(2), "CAR", Impedance::Cost), None);
        assert_eq!(t.get(ZoneId(1), ZoneId(2), "CAR", Impedance::Time), Some(4.0));
        assert_eq!(t.get(ZoneId(1), ZoneId(2), "WALK", Impedance::Cost), None);
    }
}

// ── Period skims ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod period {
    use std::io::Cursor;

    use as_core::{TodPeriod, ZoneId};
    use crate::PeriodSkims;

    const CSV: &str = "orig,dest,da_time_AM,da_time_MD,da_distance_AM,misc\n\
                       1,2,10,12,3.5,x\n\
                       2,1,11,13,3.6,y\n";

    #[test]
    fn long_form_by_period() {
        let s = PeriodSkims::from_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.get(ZoneId(1), ZoneId(2), TodPeriod::AmPeak, "da_time"), Some(10.0));
        assert_eq!(s.get(ZoneId(1), ZoneId(2), TodPeriod::Midday, "da_time"), Some(12.0));
        assert_eq!(s.get(ZoneId(2), ZoneId(1), TodPeriod::AmPeak, "da_time"), Some(11.0));
        assert_eq!(s.get(ZoneId(1), ZoneId(2), TodPeriod::PmPeak, "da_time"), None);
    }

    #[test]
    fn attribute_names_normalised() {
        let s = PeriodSkims::from_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(s.attributes(), &["da_time".to_string(), "da_Distance".to_string()]);
        assert_eq!(s.get(ZoneId(1), ZoneId(2), TodPeriod::AmPeak, "da_Distance"), Some(3.5));
        assert_eq!(s.get(ZoneId(1), ZoneId(2), TodPeriod::Midday, "da_Distance"), None);
    }

    #[test]
    fn impedance_iter_filters_period() {
        let s = PeriodSkims::from_reader(Cursor::new(CSV)).unwrap();
        let mut v: Vec<_> = s.impedances(TodPeriod::Midday, "da_time").collect();
        v.sort_by_key(|&(o, d, _)| (o, d));
        assert_eq!(v, vec![(ZoneId(1), ZoneId(2), 12.0), (ZoneId(2), ZoneId(1), 13.0)]);
    }
}

// ── Skim accessibility ────────────────────────────────────────────────────────

#[cfg(test)]
mod access {
    use std::io::Cursor;

    use approx::assert_relative_eq;
    use as_core::ZoneId;
    use crate::{
        ImputedSkims, SkimAccessSpec, SkimError, ZoneAgg, ZoneTable, add_skim_access_columns,
        skim_access_variable,
    };

    fn zones() -> ZoneTable {
        ZoneTable::from_reader(Cursor::new("zone_id,jobs\n1,10\n2,20\n3,40\n"), "zone_id").unwrap()
    }

    fn skims() -> Vec<(ZoneId, ZoneId, f64)> {
        vec![
            (ZoneId(1), ZoneId(2), 5.0),
            (ZoneId(1), ZoneId(3), 15.0),
            (ZoneId(2), ZoneId(1), 5.0),
            (ZoneId(2), ZoneId(3), 9.99),
            (ZoneId(3), ZoneId(1), 10.0),
        ]
    }

    #[test]
    fn sum_below_threshold_plus_own() {
        let v = skim_access_variable(&zones(), "jobs", skims(), 10.0, ZoneAgg::Sum, false).unwrap();
        // Zone 3's only destination sits exactly at the threshold.
        assert_eq!(v, vec![30.0, 70.0, 40.0]);
    }

    #[test]
    fn count_and_log() {
        let v = skim_access_variable(&zones(), "jobs", skims(), 10.0, ZoneAgg::Count, false).unwrap();
        assert_eq!(v, vec![11.0, 22.0, 40.0]);
        let v = skim_access_variable(&zones(), "jobs", skims(), 10.0, ZoneAgg::Sum, true).unwrap();
        assert_relative_eq!(v[0], 31.0f64.ln());
    }

    #[test]
    fn unknown_variable() {
        assert!(skim_access_variable(&zones(), "pop", skims(), 10.0, ZoneAgg::Sum, false).is_err());
    }

    fn imputed() -> ImputedSkims {
        let csv = "from_zone_id,to_zone_id,dist,gen_tt_CAR,gen_cost_CAR\n\
                   1,2,1,5,1\n1,3,1,15,1\n2,1,1,5,1\n2,3,1,9.99,1\n3,1,1,10,1\n";
        ImputedSkims::read_csv(Cursor::new(csv)).unwrap()
    }

    fn spec(name: &str, variable: &str, impedance: &str) -> SkimAccessSpec {
        SkimAccessSpec {
            name:      name.into(),
            variable:  variable.into(),
            impedance: impedance.into(),
            threshold: 10.0,
            agg:       ZoneAgg::Sum,
            log:       false,
        }
    }

    #[test]
    fn columns_added_from_imputed_skims() {
        let mut z = zones();
        let specs = [spec("jobs_10", "jobs", "gen_tt_CAR"), spec("jobs_10_nested", "jobs_10", "gen_tt_CAR")];
        add_skim_access_columns(&mut z, &imputed(), &specs).unwrap();
        assert_eq!(z.column("jobs_10").unwrap(), &[30.0, 70.0, 40.0]);
        // The second spec reads the column the first one wrote.
        assert_eq!(z.column("jobs_10_nested").unwrap(), &[100.0, 140.0, 40.0]);
    }

    #[test]
    fn cost_impedance_is_recognised() {
        let mut z = zones();
        add_skim_access_columns(&mut z, &imputed(), &[spec("jobs_cost", "jobs", "gen_cost_CAR")]).unwrap();
        assert_eq!(z.column("jobs_cost").unwrap(), &[70.0, 70.0, 50.0]);
    }

    #[test]
    fn unknown_impedance_column() {
        let mut z = zones();
        for bad in ["gen_tt_BIKE", "dist", "gen_ttCAR"] {
            let err = add_skim_access_columns(&mut z, &imputed(), &[spec("x", "jobs", bad)]).unwrap_err();
            assert!(matches!(err, SkimError::MissingColumn(ref c) if c == bad), "{bad}: {err}");
        }
        assert!(z.column("x").is_err());
    }

    #[test]
    fn attributes_or_zero_for_unknown_zone() {
        let z = zones();
        let a: Vec<_> = z.attributes_or_zero(ZoneId(2)).collect();
        assert_eq!(a, vec![("jobs", 20.0)]);
        let a: Vec<_> = z.attributes_or_zero(ZoneId(9)).collect();
        assert_eq!(a, vec![("jobs", 0.0)]);
    }
}
