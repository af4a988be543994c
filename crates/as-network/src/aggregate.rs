//! Range aggregation of node variables and the resulting node table.
//!
//! An [`AggregationSet`] is the JSON description of which variables to
//! aggregate over the network (one [`AggregationSpec`] each) plus derived
//! ratios computed afterwards.  Aggregating a set produces a
//! [`NodeTable`]: one row per network node, one column per variable.
//!
//! ```json
//! {
//!   "variables": [
//!     { "name": "pop_500_walk", "source": "households", "column": "persons",
//!       "radius": 500, "aggregation": "sum", "decay": "linear" },
//!     { "name": "jobs_500_walk", "source": "jobs",
//!       "radius": 500, "aggregation": "count" }
//!   ],
//!   "ratios": [
//!     { "name": "pop_jobs_ratio_500_walk",
//!       "numerator": "pop_500_walk", "denominator": "jobs_500_walk" }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{NetworkError, NetworkResult};

/// Header of the id column in node-table CSV files.
pub const NODE_ID_COLUMN: &str = "osmid";

// ── Aggregation kinds ─────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Mean,
    Count,
    Min,
    Max,
    Std,
    Median,
}

/// Distance weighting applied to values inside the radius.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decay {
    #[default]
    Flat,
    Linear,
    Exponential,
}

impl Decay {
    /// Weight of a value found at impedance `cost` for a query of `radius`.
    #[inline]
    pub fn weight(self, cost: f64, radius: f64) -> f64 {
        if radius <= 0.0 {
            return 1.0;
        }
        match self {
            Decay::Flat        => 1.0,
            Decay::Linear      => (1.0 - cost / radius).max(0.0),
            Decay::Exponential => (-cost / radius).exp(),
        }
    }
}

/// Transform applied to an aggregated column.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Log1p,
}

impl Transform {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Transform::Log1p => v.ln_1p(),
        }
    }
}

impl Aggregation {
    /// Reduce `(cost, value)` samples found within `radius`.
    ///
    /// Decay weights apply to `sum`, `count` and `mean`; the order
    /// statistics and `std` use the raw values.  An empty sample gives `0`
    /// for `sum`/`count` and NaN otherwise.
    pub fn reduce(self, samples: &[(f64, f64)], decay: Decay, radius: f64) -> f64 {
        match self {
            Aggregation::Sum => samples
                .iter()
                .map(|&(c, v)| decay.weight(c, radius) * v)
                .sum(),
            Aggregation::Count => samples
                .iter()
                .map(|&(c, _)| decay.weight(c, radius))
                .sum(),
            Aggregation::Mean => {
                let (mut num, mut den) = (0.0, 0.0);
                for &(c, v) in samples {
                    let w = decay.weight(c, radius);
                    num += w * v;
                    den += w;
                }
                if den > 0.0 { num / den } else { f64::NAN }
            }
            Aggregation::Min => samples
                .iter()
                .map(|&(_, v)| v)
                .fold(f64::NAN, f64::min),
            Aggregation::Max => samples
                .iter()
                .map(|&(_, v)| v)
                .fold(f64::NAN, f64::max),
            Aggregation::Std => {
                if samples.is_empty() {
                    return f64::NAN;
                }
                let n = samples.len() as f64;
                let mean = samples.iter().map(|&(_, v)| v).sum::<f64>() / n;
                let var = samples.iter().map(|&(_, v)| (v - mean).powi(2)).sum::<f64>() / n;
                var.sqrt()
            }
            Aggregation::Median => {
                if samples.is_empty() {
                    return f64::NAN;
                }
                let mut vs: Vec<f64> = samples.iter().map(|&(_, v)| v).collect();
                vs.sort_by(f64::total_cmp);
                let mid = vs.len() / 2;
                if vs.len() % 2 == 0 { (vs[mid - 1] + vs[mid]) / 2.0 } else { vs[mid] }
            }
        }
    }
}

// ── Specs ─────────────────────────────────────────────────────────────────────

/// One aggregated node variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregationSpec {
    /// Output column name.
    pub name: String,
    /// Table the values come from (`households`, `persons`, `jobs`, ...).
    pub source: String,
    /// Column of `source` to aggregate.  `None` aggregates a constant 1 per
    /// row, which with `count` or `sum` counts rows.
    #[serde(default)]
    pub column: Option<String>,
    pub radius: f64,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub decay: Decay,
    /// Aggregate `value > 0` as 1/0 instead of the value itself.
    #[serde(default)]
    pub indicator: bool,
    #[serde(default)]
    pub apply: Option<Transform>,
}

/// A column derived as `numerator / denominator` after aggregation.
/// Non-finite results (0/0, x/0) become 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatioSpec {
    pub name:        String,
    pub numerator:   String,
    pub denominator: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AggregationSet {
    #[serde(default)]
    pub variables: Vec<AggregationSpec>,
    #[serde(default)]
    pub ratios: Vec<RatioSpec>,
}

impl AggregationSet {
    pub fn from_json_str(s: &str) -> NetworkResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_path(path: &Path) -> NetworkResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Largest radius across all variables, the horizon the network must be
    /// prepared for.
    pub fn max_radius(&self) -> f64 {
        self.variables.iter().map(|v| v.radius).fold(0.0, f64::max)
    }
}

// ── NodeTable ─────────────────────────────────────────────────────────────────

/// Column-oriented table of per-node variables keyed by external node id.
#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    ids:     Vec<i64>,
    index:   FxHashMap<i64, usize>,
    columns: Vec<String>,
    data:    Vec<Vec<f64>>,
}

impl NodeTable {
    pub fn new(ids: Vec<i64>) -> Self {
        let index = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { ids, index, columns: Vec::new(), data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Add or replace a column.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> NetworkResult<()> {
        let name = name.into();
        if values.len() != self.ids.len() {
            return Err(NetworkError::LengthMismatch {
                what:     format!("node column {name:?}"),
                expected: self.ids.len(),
                got:      values.len(),
            });
        }
        match self.columns.iter().position(|c| *c == name) {
            Some(i) => self.data[i] = values,
            None => {
                self.columns.push(name);
                self.data.push(values);
            }
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
    }

    /// Value of `column` at the node with external id `node`.
    pub fn value(&self, column: &str, node: i64) -> Option<f64> {
        let row = *self.index.get(&node)?;
        self.column(column).map(|c| c[row])
    }

    /// Replace NaN and infinite values in every column with `fill`.
    pub fn fill_non_finite(&mut self, fill: f64) {
        for col in &mut self.data {
            for v in col.iter_mut().filter(|v| !v.is_finite()) {
                *v = fill;
            }
        }
    }

    /// Append a derived ratio column.
    pub fn add_ratio(&mut self, ratio: &RatioSpec) -> NetworkResult<()> {
        let num = self
            .column(&ratio.numerator)
            .ok_or_else(|| NetworkError::MissingColumn(ratio.numerator.clone()))?;
        let den = self
            .column(&ratio.denominator)
            .ok_or_else(|| NetworkError::MissingColumn(ratio.denominator.clone()))?;
        let values = num
            .iter()
            .zip(den)
            .map(|(n, d)| {
                let r = n / d;
                if r.is_finite() { r } else { 0.0 }
            })
            .collect();
        self.add_column(ratio.name.clone(), values)
    }

    // ── CSV ───────────────────────────────────────────────────────────────

    pub fn write_csv<W: Write>(&self, writer: W) -> NetworkResult<()> {
        let mut w = csv::Writer::from_writer(writer);
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(NODE_ID_COLUMN.to_string());
        header.extend(self.columns.iter().cloned());
        w.write_record(&header)?;
        for (row, id) in self.ids.iter().enumerate() {
            let mut rec = Vec::with_capacity(header.len());
            rec.push(id.to_string());
            rec.extend(self.data.iter().map(|c| c[row].to_string()));
            w.write_record(&rec)?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn to_csv_path(&self, path: &Path) -> NetworkResult<()> {
        self.write_csv(File::create(path)?)
    }

    /// Read a table written by [`write_csv`](Self::write_csv).  The first
    /// column is the node id whatever its header; empty cells read as NaN.
    pub fn read_csv<R: Read>(reader: R) -> NetworkResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut ids = Vec::new();
        let mut data: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];
        for rec in rdr.records() {
            let rec = rec?;
            let id_field = rec.get(0).unwrap_or("");
            let id = parse_node_id(id_field)?;
            ids.push(id);
            for (i, col) in data.iter_mut().enumerate() {
                let field = rec.get(i + 1).unwrap_or("").trim();
                let v = if field.is_empty() {
                    f64::NAN
                } else {
                    field
                        .parse::<f64>()
                        .map_err(|e| NetworkError::Parse(format!("{field:?}: {e}")))?
                };
                col.push(v);
            }
        }

        let mut table = NodeTable::new(ids);
        for (name, values) in columns.into_iter().zip(data) {
            table.add_column(name, values)?;
        }
        Ok(table)
    }

    pub fn from_csv_path(path: &Path) -> NetworkResult<Self> {
        Self::read_csv(BufReader::new(File::open(path)?))
    }
}

/// Node ids sometimes arrive as floats (`123.0`) from upstream exports.
pub(crate) fn parse_node_id(field: &str) -> NetworkResult<i64> {
    let field = field.trim();
    if let Ok(v) = field.parse::<i64>() {
        return Ok(v);
    }
    match field.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 => Ok(f as i64),
        _ => Err(NetworkError::Parse(format!("bad node id {field:?}"))),
    }
}
