//! Keyed record table with free-form numeric attributes.
//!
//! # Layout
//!
//! Typed fields live in `rows: Vec<T>`.  Every source column that the record
//! type does not consume is kept as an *extra*: a row-major `f64` block,
//! `extras[row * extra_columns.len() + col]`, with unparseable cells read as
//! NaN.  Variables added by pipeline stages (accessibility joins, model
//! outputs) are appended as extra columns too.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::records::Record;
use crate::{PopulationError, PopulationResult};

#[derive(Clone, Debug)]
pub struct Table<T> {
    rows:          Vec<T>,
    index:         FxHashMap<u64, usize>,
    extra_columns: Vec<String>,
    extras:        Vec<f64>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows:          Vec::new(),
            index:         FxHashMap::default(),
            extra_columns: Vec::new(),
            extras:        Vec::new(),
        }
    }
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_csv_path(path: &Path) -> PopulationResult<Self> {
        let table = Self::from_reader(BufReader::new(File::open(path)?))?;
        log::debug!("loaded {} {} rows from {}", table.len(), T::TABLE, path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> PopulationResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let extra_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !T::COLUMNS.contains(&h.trim()))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();
        let extra_columns: Vec<String> = extra_cols.iter().map(|(_, h)| h.clone()).collect();

        let mut table = Table { extra_columns, ..Self::default() };
        let mut row_extras = Vec::with_capacity(extra_cols.len());
        for (line, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let mut row: T = rec.deserialize(Some(&headers)).map_err(|e| {
                PopulationError::Parse(format!("{} row {}: {e}", T::TABLE, line + 1))
            })?;
            row_extras.clear();
            row_extras.extend(
                extra_cols
                    .iter()
                    .map(|(i, _)| rec.get(*i).and_then(|s| s.trim().parse().ok()).unwrap_or(f64::NAN)),
            );
            row.finish(&table.extra_columns, &row_extras);
            table.insert(row, &row_extras)?;
        }
        Ok(table)
    }

    /// Append a row with every extra attribute unset.
    pub fn push(&mut self, row: T) -> PopulationResult<()> {
        let blank = vec![f64::NAN; self.extra_columns.len()];
        self.insert(row, &blank)
    }

    fn insert(&mut self, row: T, extras: &[f64]) -> PopulationResult<()> {
        let key = row.key();
        if self.index.insert(key, self.rows.len()).is_some() {
            return Err(PopulationError::DuplicateId { table: T::TABLE, id: key });
        }
        self.rows.push(row);
        self.extras.extend_from_slice(extras);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.rows.iter()
    }

    /// Mutable access to typed fields.  Keys must not be changed.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.rows.iter_mut()
    }

    /// Row position of `key`.
    #[inline]
    pub fn position(&self, key: u64) -> Option<usize> {
        self.index.get(&key).copied()
    }

    #[inline]
    pub fn get(&self, key: u64) -> Option<&T> {
        self.position(key).map(|i| &self.rows[i])
    }

    pub fn get_mut(&mut self, key: u64) -> Option<&mut T> {
        self.position(key).map(|i| &mut self.rows[i])
    }

    /// Like [`get`](Self::get) but with a typed not-found error.
    pub fn require(&self, key: u64) -> PopulationResult<&T> {
        self.get(key).ok_or(PopulationError::NotFound { table: T::TABLE, id: key })
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.extra_columns.iter().any(|c| c == name)
            || self.rows.first().is_some_and(|r| r.var(name).is_some())
    }

    /// Variable `name` of the row at `pos`: a typed field first, then an
    /// extra column.  `None` if neither exists or the field is unset.
    pub fn var_at(&self, pos: usize, name: &str) -> Option<f64> {
        let row = self.rows.get(pos)?;
        if let Some(v) = row.var(name) {
            return Some(v);
        }
        let col = self.extra_columns.iter().position(|c| c == name)?;
        Some(self.extras[pos * self.extra_columns.len() + col])
    }

    pub fn var(&self, key: u64, name: &str) -> Option<f64> {
        self.var_at(self.position(key)?, name)
    }

    /// Add or replace an extra column.  `values` is aligned with
    /// [`rows`](Self::rows).
    pub fn set_column(&mut self, name: &str, values: &[f64]) -> PopulationResult<()> {
        if values.len() != self.rows.len() {
            return Err(PopulationError::Parse(format!(
                "{} column {name:?} has {} values for {} rows",
                T::TABLE,
                values.len(),
                self.rows.len()
            )));
        }
        let width = self.extra_columns.len();
        let col = match self.extra_columns.iter().position(|c| c == name) {
            Some(c) => c,
            None => {
                // Widen the row-major block by one column.
                let mut widened = Vec::with_capacity(self.rows.len() * (width + 1));
                for r in 0..self.rows.len() {
                    widened.extend_from_slice(&self.extras[r * width..(r + 1) * width]);
                    widened.push(f64::NAN);
                }
                self.extras = widened;
                self.extra_columns.push(name.to_string());
                width
            }
        };
        let width = self.extra_columns.len();
        for (r, &v) in values.iter().enumerate() {
            self.extras[r * width + col] = v;
        }
        Ok(())
    }

    /// Set one extra value by key, creating the column if needed.
    pub fn set_var(&mut self, key: u64, name: &str, value: f64) -> PopulationResult<()> {
        let pos = self.position(key).ok_or(PopulationError::NotFound { table: T::TABLE, id: key })?;
        if !self.extra_columns.iter().any(|c| c == name) {
            let blank = vec![f64::NAN; self.rows.len()];
            self.set_column(name, &blank)?;
        }
        let width = self.extra_columns.len();
        let col = self.extra_columns.iter().position(|c| c == name).unwrap_or(0);
        self.extras[pos * width + col] = value;
        Ok(())
    }

    /// All values of variable `name`, aligned with [`rows`](Self::rows).
    pub fn column(&self, name: &str) -> Vec<f64> {
        (0..self.rows.len()).map(|i| self.var_at(i, name).unwrap_or(f64::NAN)).collect()
    }
}
