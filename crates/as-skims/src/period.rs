//! Period skims in long form.
//!
//! The input is a wide zone-pair table whose attribute columns end in a
//! period suffix (`da_time_AM`, `wTrnW_ivt_MD`, ...).  [`PeriodSkims`]
//! reshapes it to one record per (orig, dest, period) with the suffix
//! stripped, which is how mode choice joins skims onto commuters.
//!
//! Attribute names ending in `_distance` or `_cost` are normalised to
//! `_Distance` and `_Cost` so model specs see one spelling.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;

use as_core::{TodPeriod, ZoneId};

use crate::records::{column_index, parse_f64, parse_zone};
use crate::SkimResult;

#[derive(Clone, Debug, Default)]
pub struct PeriodSkims {
    attributes: Vec<String>,
    attr_index: FxHashMap<String, usize>,
    records:    FxHashMap<(ZoneId, ZoneId, TodPeriod), Vec<f64>>,
}

impl PeriodSkims {
    pub fn from_csv_path(path: &Path) -> SkimResult<Self> {
        let skims = Self::from_reader(BufReader::new(File::open(path)?))?;
        log::info!(
            "loaded period skims from {} ({} records, {} attributes)",
            path.display(),
            skims.len(),
            skims.attributes.len()
        );
        Ok(skims)
    }

    pub fn from_reader<R: Read>(reader: R) -> SkimResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let o_col = column_index(&headers, "orig")?;
        let d_col = column_index(&headers, "dest")?;

        let mut out = Self::default();
        // (header index, period, attribute index)
        let mut cols = Vec::new();
        for (i, h) in headers.iter().enumerate() {
            if i == o_col || i == d_col {
                continue;
            }
            match split_period(h.trim()) {
                Some((attr, period)) => {
                    let attr = normalise_attribute(attr);
                    let next = out.attributes.len();
                    let a = *out.attr_index.entry(attr.clone()).or_insert(next);
                    if a == next {
                        out.attributes.push(attr);
                    }
                    cols.push((i, period, a));
                }
                None => log::debug!("period skims: ignoring column {h:?}"),
            }
        }

        let n_attr = out.attributes.len();
        for rec in rdr.records() {
            let rec = rec?;
            let o = parse_zone(rec.get(o_col).unwrap_or(""))?;
            let d = parse_zone(rec.get(d_col).unwrap_or(""))?;
            for &(i, period, a) in &cols {
                let v = parse_f64(rec.get(i).unwrap_or(""))?;
                out.records
                    .entry((o, d, period))
                    .or_insert_with(|| vec![f64::NAN; n_attr])[a] = v;
            }
        }
        Ok(out)
    }

    /// Number of (orig, dest, period) records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Attribute names with the period suffix stripped.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// All attribute values of one record, aligned with
    /// [`attributes`](Self::attributes).  Attributes the period lacks are NaN.
    pub fn record(&self, orig: ZoneId, dest: ZoneId, period: TodPeriod) -> Option<&[f64]> {
        self.records.get(&(orig, dest, period)).map(Vec::as_slice)
    }

    pub fn get(&self, orig: ZoneId, dest: ZoneId, period: TodPeriod, attr: &str) -> Option<f64> {
        let a = *self.attr_index.get(attr)?;
        let v = self.record(orig, dest, period)?[a];
        (!v.is_nan()).then_some(v)
    }

    /// `(orig, dest, value)` for every record of `period` carrying `attr`.
    pub fn impedances<'a>(
        &'a self,
        period: TodPeriod,
        attr: &str,
    ) -> impl Iterator<Item = (ZoneId, ZoneId, f64)> + 'a {
        let a = self.attr_index.get(attr).copied();
        self.records.iter().filter_map(move |(&(o, d, p), vals)| {
            let v = vals[a?];
            (p == period && !v.is_nan()).then_some((o, d, v))
        })
    }
}

/// `"da_time_AM"` → `("da_time", AmPeak)`.
fn split_period(header: &str) -> Option<(&str, TodPeriod)> {
    let (attr, suffix) = header.rsplit_once('_')?;
    let period = TodPeriod::from_label(suffix).ok()?;
    (!attr.is_empty()).then_some((attr, period))
}

fn normalise_attribute(attr: &str) -> String {
    if let Some(stem) = attr.strip_suffix("_distance") {
        format!("{stem}_Distance")
    } else if let Some(stem) = attr.strip_suffix("_cost") {
        format!("{stem}_Cost")
    } else {
        attr.to_string()
    }
}
