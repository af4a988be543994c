//! Zonal attribute table (e.g. TAZ accessibility measures).
//!
//! A CSV keyed by a zone id column with numeric attribute columns.  Empty
//! cells read as NaN.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;

use as_core::ZoneId;

use crate::records::{column_index, parse_f64, parse_zone};
use crate::{SkimError, SkimResult};

#[derive(Clone, Debug, Default)]
pub struct ZoneTable {
    ids:     Vec<ZoneId>,
    index:   FxHashMap<ZoneId, usize>,
    columns: Vec<String>,
    data:    Vec<Vec<f64>>,
}

impl ZoneTable {
    pub fn new(ids: Vec<ZoneId>) -> Self {
        let index = ids.iter().enumerate().map(|(i, &z)| (z, i)).collect();
        Self { ids, index, columns: Vec::new(), data: Vec::new() }
    }

    pub fn from_csv_path(path: &Path, id_column: &str) -> SkimResult<Self> {
        Self::from_reader(BufReader::new(File::open(path)?), id_column)
    }

    pub fn from_reader<R: Read>(reader: R, id_column: &str) -> SkimResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let id_col = column_index(&headers, id_column)?;
        let value_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != id_col)
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        let mut ids = Vec::new();
        let mut data = vec![Vec::new(); value_cols.len()];
        for rec in rdr.records() {
            let rec = rec?;
            ids.push(parse_zone(rec.get(id_col).unwrap_or(""))?);
            for ((i, _), col) in value_cols.iter().zip(data.iter_mut()) {
                col.push(parse_f64(rec.get(*i).unwrap_or(""))?);
            }
        }

        let mut table = ZoneTable::new(ids);
        for ((_, name), values) in value_cols.into_iter().zip(data) {
            table.add_column(name, values)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ZoneId] {
        &self.ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Add or replace a column.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> SkimResult<()> {
        let name = name.into();
        if values.len() != self.ids.len() {
            return Err(SkimError::Parse(format!(
                "zone column {name:?} has {} values for {} zones",
                values.len(),
                self.ids.len()
            )));
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

    pub fn column(&self, name: &str) -> SkimResult<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
            .ok_or_else(|| SkimError::MissingColumn(name.to_string()))
    }

    /// Value of `column` in `zone`, or `None` for an unknown zone.
    pub fn value(&self, column: &str, zone: ZoneId) -> SkimResult<Option<f64>> {
        let col = self.column(column)?;
        Ok(self.index.get(&zone).map(|&i| col[i]))
    }

    /// All attributes of `zone` as `(name, value)` pairs, with NaN read
    /// as 0.  Unknown zones yield every attribute at 0.
    pub fn attributes_or_zero(&self, zone: ZoneId) -> impl Iterator<Item = (&str, f64)> + '_ {
        let row = self.index.get(&zone).copied();
        self.columns.iter().zip(&self.data).map(move |(name, col)| {
            let v = row.map(|r| col[r]).filter(|v| !v.is_nan()).unwrap_or(0.0);
            (name.as_str(), v)
        })
    }
}
