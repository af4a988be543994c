//! Imputation of missing skim cells from reference distances.
//!
//! # Algorithm
//!
//! 1. Raw time is converted to minutes (`gen_tt`).
//! 2. Zero or missing raw distances take the reference distance;
//!    intra-zone pairs always take the reference distance.
//! 3. Over the morning peak (hours 7-9), each mode gets an
//!    observation-weighted mean of `gen_tt / dist` and `gen_cost / dist`,
//!    skipping rows where either ratio is not finite.
//! 4. AM observations are averaged per (pair, mode), weighted by
//!    `numObservations`, into one row per pair.
//! 5. Rows are laid onto the reference pair index; pairs absent from the
//!    reference are dropped.
//! 6. Empty cells become `reference distance × mode ratio`.
//!
//! The output `dist` column is always the reference distance.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use as_core::{ZoneId, is_am_peak_hour};

use crate::records::{RawSkimRecord, ReferenceSkims};
use crate::table::{Impedance, ImputedSkims};
use crate::{SkimError, SkimResult};

// ── Options ───────────────────────────────────────────────────────────────────

/// What to do with a mode that has no usable AM-peak ratio.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingModePolicy {
    /// Log a warning and leave the mode's missing cells empty.
    #[default]
    Warn,
    /// Fail with [`SkimError::MissingModeRatio`].
    Error,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImputeOptions {
    /// Fail unless the output has exactly this many rows.
    #[serde(default)]
    pub expected_rows: Option<usize>,
    #[serde(default)]
    pub missing_mode_policy: MissingModePolicy,
}

// ── Results ───────────────────────────────────────────────────────────────────

/// Observation-weighted AM-peak impedance per metre for one mode.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ModeRatio {
    pub time_per_m: f64,
    pub cost_per_m: f64,
}

impl ModeRatio {
    pub fn per_m(&self, imp: Impedance) -> f64 {
        match imp {
            Impedance::Time => self.time_per_m,
            Impedance::Cost => self.cost_per_m,
        }
    }
}

/// Counts reported by one imputation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImputeSummary {
    /// Zero or missing raw distances replaced by the reference distance.
    pub zero_distance_replaced: usize,
    /// Zero or missing raw distances with no reference pair; left out of
    /// the ratios.
    pub zero_distance_unmatched: usize,
    /// Intra-zone raw rows whose distance came from the reference.
    pub intra_zone_overridden: usize,
    /// Distinct AM pairs not present in the reference index.
    pub dropped_pairs: usize,
    /// Cells filled from distance × ratio.
    pub imputed_cells: usize,
    /// Modes skipped under [`MissingModePolicy::Warn`].
    pub skipped_modes: Vec<String>,
}

#[derive(Debug)]
pub struct Imputation {
    pub skims:   ImputedSkims,
    pub ratios:  BTreeMap<String, ModeRatio>,
    pub summary: ImputeSummary,
}

// ── Accumulators ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct WeightedMean {
    sum:    f64,
    weight: f64,
}

impl WeightedMean {
    #[inline]
    fn add(&mut self, v: f64, w: f64) {
        if !v.is_nan() {
            self.sum += v * w;
            self.weight += w;
        }
    }

    fn mean(&self) -> f64 {
        if self.weight > 0.0 { self.sum / self.weight } else { f64::NAN }
    }
}

#[derive(Default)]
struct PairMode {
    tt:   WeightedMean,
    cost: WeightedMean,
}

#[derive(Default)]
struct RatioAcc {
    time:   f64,
    cost:   f64,
    weight: f64,
}

// ── impute_missing_skims ──────────────────────────────────────────────────────

pub fn impute_missing_skims(
    raw: &[RawSkimRecord],
    reference: &ReferenceSkims,
    options: &ImputeOptions,
) -> SkimResult<Imputation> {
    let mut summary = ImputeSummary::default();

    let mut all_modes = BTreeSet::new();
    let mut ratio_acc: BTreeMap<String, RatioAcc> = BTreeMap::new();
    let mut pair_modes: FxHashMap<(ZoneId, ZoneId, String), PairMode> = FxHashMap::default();

    // ── Steps 1-4: fix distances, accumulate AM ratios and pair means ─────
    for rec in raw {
        all_modes.insert(rec.mode.clone());

        let ref_dist = reference.distance_m(rec.from_zone_id, rec.to_zone_id);
        let mut dist = rec.distance_m;
        if rec.is_intra_zone() {
            if let Some(d) = ref_dist {
                dist = d;
                summary.intra_zone_overridden += 1;
            }
        }
        if dist == 0.0 || dist.is_nan() {
            match ref_dist {
                Some(d) => {
                    dist = d;
                    summary.zero_distance_replaced += 1;
                }
                None => summary.zero_distance_unmatched += 1,
            }
        }

        if !is_am_peak_hour(rec.hour) || rec.num_observations == 0 {
            continue;
        }
        let w = rec.num_observations as f64;
        let gen_tt = rec.gen_tt();

        if dist > 0.0 {
            let tpm = gen_tt / dist;
            let cpm = rec.gen_cost / dist;
            if tpm.is_finite() && cpm.is_finite() {
                let acc = ratio_acc.entry(rec.mode.clone()).or_default();
                acc.time += tpm * w;
                acc.cost += cpm * w;
                acc.weight += w;
            }
        }

        let pm = pair_modes
            .entry((rec.from_zone_id, rec.to_zone_id, rec.mode.clone()))
            .or_default();
        pm.tt.add(gen_tt, w);
        pm.cost.add(rec.gen_cost, w);
    }

    if summary.zero_distance_unmatched > 0 {
        log::warn!(
            "{} raw skim rows have a zero or missing distance and no reference pair; left out of ratios",
            summary.zero_distance_unmatched
        );
    }

    let ratios: BTreeMap<String, ModeRatio> = ratio_acc
        .into_iter()
        .filter(|(_, a)| a.weight > 0.0)
        .map(|(m, a)| {
            (m, ModeRatio { time_per_m: a.time / a.weight, cost_per_m: a.cost / a.weight })
        })
        .collect();

    // ── Mode coverage ─────────────────────────────────────────────────────
    let am_modes: BTreeSet<String> = pair_modes.keys().map(|(_, _, m)| m.clone()).collect();
    for mode in &all_modes {
        if ratios.contains_key(mode) {
            continue;
        }
        if options.missing_mode_policy == MissingModePolicy::Error {
            return Err(SkimError::MissingModeRatio { mode: mode.clone() });
        }
        if am_modes.contains(mode) {
            log::warn!("mode {mode} has no valid AM distance ratio; missing cells stay empty");
        } else {
            log::warn!("mode {mode} has no AM-peak observations; skipped");
        }
        summary.skipped_modes.push(mode.clone());
    }

    // ── Steps 5-6: lay onto the reference index and fill ──────────────────
    let modes: Vec<String> = am_modes.into_iter().collect();
    let mode_idx: FxHashMap<&str, usize> =
        modes.iter().enumerate().map(|(i, m)| (m.as_str(), i)).collect();
    let mut skims = ImputedSkims::new(
        reference.pairs().to_vec(),
        reference.distances_m().to_vec(),
        modes.clone(),
    );

    let mut dropped = BTreeSet::new();
    for ((o, d, mode), pm) in &pair_modes {
        let Some(row) = skims.row(*o, *d) else {
            dropped.insert((*o, *d));
            continue;
        };
        let Some(&m) = mode_idx.get(mode.as_str()) else { continue };
        skims.column_mut(m, Impedance::Time)[row] = pm.tt.mean();
        skims.column_mut(m, Impedance::Cost)[row] = pm.cost.mean();
    }
    summary.dropped_pairs = dropped.len();

    let dist = skims.dist_by_row().to_vec();
    for (m, mode) in modes.iter().enumerate() {
        let Some(ratio) = ratios.get(mode) else { continue };
        for imp in [Impedance::Time, Impedance::Cost] {
            let per_m = ratio.per_m(imp);
            for (cell, &d) in skims.column_mut(m, imp).iter_mut().zip(&dist) {
                if cell.is_nan() {
                    *cell = d * per_m;
                    summary.imputed_cells += 1;
                }
            }
        }
    }

    if let Some(expected) = options.expected_rows {
        if skims.len() != expected {
            return Err(SkimError::RowCount { expected, got: skims.len() });
        }
    }

    log::info!(
        "imputed skims: {} rows, {} modes, {} cells filled, {} raw pairs dropped",
        skims.len(),
        modes.len(),
        summary.imputed_cells,
        summary.dropped_pairs
    );

    Ok(Imputation { skims, ratios, summary })
}
