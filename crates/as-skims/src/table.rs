//! The wide, imputed skim table.
//!
//! One row per reference zone pair.  Columns: `from_zone_id`, `to_zone_id`,
//! `dist` (metres), then `gen_cost_<mode>` and `gen_tt_<mode>` (minutes)
//! for every mode.  Cells that could not be filled are NaN in memory and
//! empty in CSV.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use rustc_hash::FxHashMap;

use as_core::ZoneId;

use crate::records::{column_index, parse_f64, parse_zone};
use crate::SkimResult;

/// Which impedance of a mode to read.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Impedance {
    /// Generalized travel time, minutes.
    Time,
    /// Generalized cost.
    Cost,
}

impl Impedance {
    pub fn prefix(self) -> &'static str {
        match self {
            Impedance::Time => "gen_tt",
            Impedance::Cost => "gen_cost",
        }
    }

    pub fn column_name(self, mode: &str) -> String {
        format!("{}_{mode}", self.prefix())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ImputedSkims {
    pairs:    Vec<(ZoneId, ZoneId)>,
    index:    FxHashMap<(ZoneId, ZoneId), usize>,
    dist:     Vec<f64>,
    modes:    Vec<String>,
    /// `[mode][row]`
    gen_tt:   Vec<Vec<f64>>,
    gen_cost: Vec<Vec<f64>>,
}

impl ImputedSkims {
    /// Start a table over `pairs` with every mode cell empty.
    pub(crate) fn new(pairs: Vec<(ZoneId, ZoneId)>, dist: Vec<f64>, modes: Vec<String>) -> Self {
        let n = pairs.len();
        let index = pairs.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let gen_tt = vec![vec![f64::NAN; n]; modes.len()];
        let gen_cost = vec![vec![f64::NAN; n]; modes.len()];
        Self { pairs, index, dist, modes, gen_tt, gen_cost }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(ZoneId, ZoneId)] {
        &self.pairs
    }

    pub fn modes(&self) -> &[String] {
        &self.modes
    }

    pub fn row(&self, orig: ZoneId, dest: ZoneId) -> Option<usize> {
        self.index.get(&(orig, dest)).copied()
    }

    pub fn distance(&self, orig: ZoneId, dest: ZoneId) -> Option<f64> {
        self.row(orig, dest).map(|r| self.dist[r])
    }

    fn mode_index(&self, mode: &str) -> Option<usize> {
        self.modes.iter().position(|m| m == mode)
    }

    pub fn column(&self, mode: &str, imp: Impedance) -> Option<&[f64]> {
        let m = self.mode_index(mode)?;
        Some(match imp {
            Impedance::Time => &self.gen_tt[m],
            Impedance::Cost => &self.gen_cost[m],
        })
    }

    pub(crate) fn column_mut(&mut self, mode_idx: usize, imp: Impedance) -> &mut Vec<f64> {
        match imp {
            Impedance::Time => &mut self.gen_tt[mode_idx],
            Impedance::Cost => &mut self.gen_cost[mode_idx],
        }
    }

    pub(crate) fn dist_by_row(&self) -> &[f64] {
        &self.dist
    }

    /// The cell for `orig → dest` by `mode`, or `None` if the pair, the
    /// mode, or the value is missing.
    pub fn get(&self, orig: ZoneId, dest: ZoneId, mode: &str, imp: Impedance) -> Option<f64> {
        let r = self.row(orig, dest)?;
        let v = self.column(mode, imp)?[r];
        (!v.is_nan()).then_some(v)
    }

    /// `(orig, dest, value)` for every filled cell of one column.
    pub fn impedances<'a>(
        &'a self,
        mode: &str,
        imp: Impedance,
    ) -> impl Iterator<Item = (ZoneId, ZoneId, f64)> + 'a {
        let col = self.column(mode, imp).unwrap_or(&[]);
        self.pairs
            .iter()
            .zip(col)
            .filter(|(_, v)| !v.is_nan())
            .map(|(&(o, d), &v)| (o, d, v))
    }

    /// Number of empty cells across all mode columns.
    pub fn missing_cells(&self) -> usize {
        self.gen_tt
            .iter()
            .chain(&self.gen_cost)
            .map(|c| c.iter().filter(|v| v.is_nan()).count())
            .sum()
    }

    // ── CSV ───────────────────────────────────────────────────────────────

    pub fn write_csv<W: Write>(&self, writer: W) -> SkimResult<()> {
        let mut w = csv::Writer::from_writer(writer);
        let mut header = vec!["from_zone_id".to_string(), "to_zone_id".into(), "dist".into()];
        header.extend(self.modes.iter().map(|m| Impedance::Cost.column_name(m)));
        header.extend(self.modes.iter().map(|m| Impedance::Time.column_name(m)));
        w.write_record(&header)?;

        for (row, &(o, d)) in self.pairs.iter().enumerate() {
            let mut rec = Vec::with_capacity(header.len());
            rec.push(o.0.to_string());
            rec.push(d.0.to_string());
            rec.push(cell(self.dist[row]));
            rec.extend(self.gen_cost.iter().map(|c| cell(c[row])));
            rec.extend(self.gen_tt.iter().map(|c| cell(c[row])));
            w.write_record(&rec)?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn to_csv_path(&self, path: &Path) -> SkimResult<()> {
        self.write_csv(File::create(path)?)
    }

    /// Read a table written by [`write_csv`](Self::write_csv).  A mode with
    /// only one of its two impedance columns gets an empty column for the
    /// other.
    pub fn read_csv<R: Read>(reader: R) -> SkimResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let o_col = column_index(&headers, "from_zone_id")?;
        let d_col = column_index(&headers, "to_zone_id")?;
        let dist_col = column_index(&headers, "dist")?;

        // (header index, mode, impedance) for every mode column.
        let mut mode_cols = Vec::new();
        let mut modes = BTreeSet::new();
        for (i, h) in headers.iter().enumerate() {
            for imp in [Impedance::Time, Impedance::Cost] {
                if let Some(mode) = h.strip_prefix(imp.prefix()).and_then(|r| r.strip_prefix('_')) {
                    modes.insert(mode.to_string());
                    mode_cols.push((i, mode.to_string(), imp));
                }
            }
        }
        let modes: Vec<String> = modes.into_iter().collect();

        let mut pairs = Vec::new();
        let mut dist = Vec::new();
        let mut cells: Vec<(usize, Impedance, Vec<f64>)> = mode_cols
            .iter()
            .map(|(_, m, imp)| {
                let idx = modes.iter().position(|x| x == m).unwrap_or(0);
                (idx, *imp, Vec::new())
            })
            .collect();

        for rec in rdr.records() {
            let rec = rec?;
            pairs.push((
                parse_zone(rec.get(o_col).unwrap_or(""))?,
                parse_zone(rec.get(d_col).unwrap_or(""))?,
            ));
            dist.push(parse_f64(rec.get(dist_col).unwrap_or(""))?);
            for ((col, _, _), (_, _, values)) in mode_cols.iter().zip(cells.iter_mut()) {
                values.push(parse_f64(rec.get(*col).unwrap_or(""))?);
            }
        }

        let mut table = ImputedSkims::new(pairs, dist, modes);
        for (idx, imp, values) in cells {
            *table.column_mut(idx, imp) = values;
        }
        Ok(table)
    }

    pub fn from_csv_path(path: &Path) -> SkimResult<Self> {
        Self::read_csv(BufReader::new(File::open(path)?))
    }
}

fn cell(v: f64) -> String {
    if v.is_nan() { String::new() } else { v.to_string() }
}
