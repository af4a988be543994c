//! Skim-based accessibility variables.
//!
//! For every origin zone, a zonal variable is aggregated over the
//! destinations reachable with impedance strictly below a threshold.  The
//! origin's own value is then added, since skims rarely carry the
//! intra-zone pair, and an optional `log1p` is applied.
//!
//! [`add_skim_access_columns`] applies a list of [`SkimAccessSpec`]s to a
//! [`ZoneTable`], in order, so a later spec may summarise an earlier one.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use as_core::ZoneId;

use crate::table::{Impedance, ImputedSkims};
use crate::zones::ZoneTable;
use crate::{SkimError, SkimResult};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneAgg {
    #[default]
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

impl ZoneAgg {
    fn reduce(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            ZoneAgg::Sum   => values.iter().sum(),
            ZoneAgg::Mean  => values.iter().sum::<f64>() / values.len() as f64,
            ZoneAgg::Min   => values.iter().copied().fold(f64::INFINITY, f64::min),
            ZoneAgg::Max   => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ZoneAgg::Count => values.len() as f64,
        }
    }
}

/// Named definition of one skim accessibility column.
#[derive(Clone, Debug, Deserialize)]
pub struct SkimAccessSpec {
    pub name:     String,
    /// Zonal variable to summarise.
    pub variable: String,
    /// Imputed skim column used as impedance, e.g. `gen_tt_CAR`.
    pub impedance: String,
    pub threshold: f64,
    #[serde(default)]
    pub agg: ZoneAgg,
    #[serde(default)]
    pub log: bool,
}

impl SkimAccessSpec {
    /// Split `impedance` into its impedance kind and mode.
    pub fn impedance_column(&self) -> SkimResult<(Impedance, &str)> {
        [Impedance::Time, Impedance::Cost]
            .into_iter()
            .find_map(|imp| {
                let mode = self.impedance.strip_prefix(imp.prefix())?.strip_prefix('_')?;
                Some((imp, mode))
            })
            .ok_or_else(|| SkimError::MissingColumn(self.impedance.clone()))
    }
}

/// Compute every spec over `skims` and store the result as a zone column
/// named `spec.name`.
pub fn add_skim_access_columns(
    zones: &mut ZoneTable,
    skims: &ImputedSkims,
    specs: &[SkimAccessSpec],
) -> SkimResult<()> {
    for spec in specs {
        let (imp, mode) = spec.impedance_column()?;
        if skims.column(mode, imp).is_none() {
            return Err(SkimError::MissingColumn(spec.impedance.clone()));
        }
        let values = skim_access_variable(
            zones,
            &spec.variable,
            skims.impedances(mode, imp),
            spec.threshold,
            spec.agg,
            spec.log,
        )?;
        zones.add_column(spec.name.clone(), values)?;
        log::debug!(
            "zone column {}: {:?} of {} within {} {}",
            spec.name, spec.agg, spec.variable, spec.threshold, spec.impedance
        );
    }
    Ok(())
}

/// One value per zone of `zones`, aligned with [`ZoneTable::ids`].
///
/// `impedances` yields `(orig, dest, impedance)` skim cells.  Destinations
/// missing from `zones` or carrying NaN are skipped; zones with nothing in
/// range aggregate to 0 before their own value is added.
pub fn skim_access_variable<I>(
    zones: &ZoneTable,
    variable: &str,
    impedances: I,
    threshold: f64,
    agg: ZoneAgg,
    log1p: bool,
) -> SkimResult<Vec<f64>>
where
    I: IntoIterator<Item = (ZoneId, ZoneId, f64)>,
{
    let column = zones.column(variable)?;
    let value_of: FxHashMap<ZoneId, f64> =
        zones.ids().iter().copied().zip(column.iter().copied()).collect();

    let mut reachable: FxHashMap<ZoneId, Vec<f64>> = FxHashMap::default();
    for (o, d, imp) in impedances {
        if imp.is_nan() || imp >= threshold {
            continue;
        }
        if let Some(&v) = value_of.get(&d) {
            if !v.is_nan() {
                reachable.entry(o).or_default().push(v);
            }
        }
    }

    Ok(zones
        .ids()
        .iter()
        .zip(column)
        .map(|(z, &own)| {
            let in_range = reachable.get(z).map(|v| agg.reduce(v)).unwrap_or(0.0);
            let own = if own.is_nan() { 0.0 } else { own };
            let total = in_range + own;
            if log1p { total.ln_1p() } else { total }
        })
        .collect())
}
