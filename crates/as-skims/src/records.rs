//! Raw observed skims and the dense reference distance matrix.
//!
//! # Raw skim CSV
//!
//! One row per (origin, destination, mode, hour) observation bucket:
//!
//! ```csv
//! from_zone_id,to_zone_id,mode,hour,generalizedTimeInS,gen_cost,distanceInM,numObservations
//! 1,2,CAR,8,600,2.5,4000,3
//! 1,3,CAR,8,900,3.0,,1
//! ```
//!
//! Empty time, cost and distance cells read as NaN.
//!
//! # Reference skim CSV
//!
//! Dense zone-pair table with `orig`, `dest` and a distance column in miles
//! (`da_distance_AM` unless configured otherwise).  Other columns are
//! ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer};

use as_core::ZoneId;

use crate::{SkimError, SkimResult};

pub const MILES_TO_METERS: f64 = 1609.34;

/// Default reference distance column.
pub const DEFAULT_DISTANCE_COLUMN: &str = "da_distance_AM";

// ── Raw skims ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct RawSkimRecord {
    pub from_zone_id: ZoneId,
    pub to_zone_id:   ZoneId,
    pub mode:         String,
    pub hour:         u8,
    #[serde(rename = "generalizedTimeInS", deserialize_with = "empty_as_nan")]
    pub generalized_time_s: f64,
    #[serde(deserialize_with = "empty_as_nan")]
    pub gen_cost:     f64,
    #[serde(rename = "distanceInM", deserialize_with = "empty_as_nan")]
    pub distance_m:   f64,
    #[serde(rename = "numObservations")]
    pub num_observations: u32,
}

impl RawSkimRecord {
    /// Generalized travel time in minutes.
    #[inline]
    pub fn gen_tt(&self) -> f64 {
        self.generalized_time_s / 60.0
    }

    #[inline]
    pub fn is_intra_zone(&self) -> bool {
        self.from_zone_id == self.to_zone_id
    }
}

pub fn load_raw_skims(path: &Path) -> SkimResult<Vec<RawSkimRecord>> {
    let file = File::open(path)?;
    let records = load_raw_skims_reader(BufReader::new(file))?;
    log::info!("loaded {} raw skim rows from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_raw_skims_reader<R: Read>(reader: R) -> SkimResult<Vec<RawSkimRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for rec in rdr.deserialize() {
        out.push(rec?);
    }
    Ok(out)
}

// ── Reference skims ───────────────────────────────────────────────────────────

/// Dense reference distances in metres, keyed by directed zone pair.
#[derive(Clone, Debug, Default)]
pub struct ReferenceSkims {
    pairs:  Vec<(ZoneId, ZoneId)>,
    dist_m: Vec<f64>,
    index:  FxHashMap<(ZoneId, ZoneId), usize>,
}

impl ReferenceSkims {
    /// Build from `(orig, dest, miles)` rows.  A repeated pair keeps its
    /// first distance.
    pub fn from_miles<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (ZoneId, ZoneId, f64)>,
    {
        let mut out = Self::default();
        for (o, d, miles) in rows {
            if out.index.contains_key(&(o, d)) {
                continue;
            }
            out.index.insert((o, d), out.pairs.len());
            out.pairs.push((o, d));
            out.dist_m.push(miles * MILES_TO_METERS);
        }
        out
    }

    pub fn from_csv_path(path: &Path, distance_column: &str) -> SkimResult<Self> {
        let skims = Self::from_reader(BufReader::new(File::open(path)?), distance_column)?;
        log::info!("loaded {} reference zone pairs from {}", skims.len(), path.display());
        Ok(skims)
    }

    pub fn from_reader<R: Read>(reader: R, distance_column: &str) -> SkimResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let o_col = column_index(&headers, "orig")?;
        let d_col = column_index(&headers, "dest")?;
        let m_col = column_index(&headers, distance_column)?;

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            rows.push((
                parse_zone(rec.get(o_col).unwrap_or(""))?,
                parse_zone(rec.get(d_col).unwrap_or(""))?,
                parse_f64(rec.get(m_col).unwrap_or(""))?,
            ));
        }
        Ok(Self::from_miles(rows))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Zone pairs in file order.
    pub fn pairs(&self) -> &[(ZoneId, ZoneId)] {
        &self.pairs
    }

    /// Reference distance in metres, by row.
    pub fn distances_m(&self) -> &[f64] {
        &self.dist_m
    }

    /// Reference distance in metres for the directed pair `orig → dest`.
    pub fn distance_m(&self, orig: ZoneId, dest: ZoneId) -> Option<f64> {
        self.index.get(&(orig, dest)).map(|&i| self.dist_m[i])
    }
}

// ── Field helpers ─────────────────────────────────────────────────────────────

pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> SkimResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| SkimError::MissingColumn(name.to_string()))
}

/// Zone ids sometimes arrive as floats (`12.0`).
pub(crate) fn parse_zone(s: &str) -> SkimResult<ZoneId> {
    let s = s.trim();
    if let Ok(v) = s.parse::<u32>() {
        return Ok(ZoneId(v));
    }
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Ok(ZoneId(f as u32)),
        _ => Err(SkimError::Parse(format!("bad zone id {s:?}"))),
    }
}

fn empty_as_nan<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(de)?.unwrap_or(f64::NAN))
}

/// Empty cells read as NaN.
pub(crate) fn parse_f64(s: &str) -> SkimResult<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .map_err(|e| SkimError::Parse(format!("{s:?}: {e}")))
}
