//! `as-skims`: zone-to-zone travel skims.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`records`] | `RawSkimRecord`, `ReferenceSkims`, CSV loaders             |
//! | [`impute`]  | `impute_missing_skims`, `ImputeOptions`, `MissingModePolicy` |
//! | [`table`]   | `ImputedSkims` (wide output table), `Impedance`            |
//! | [`cache`]   | `load_or_impute`                                           |
//! | [`period`]  | `PeriodSkims` (suffixed wide table → long form)            |
//! | [`zones`]   | `ZoneTable`                                                |
//! | [`access`]  | `skim_access_variable`, `add_skim_access_columns`, `SkimAccessSpec` |
//! | [`error`]   | `SkimError`, `SkimResult<T>`                               |
//!
//! All lookups are direction-specific: `(a, b)` and `(b, a)` are distinct
//! keys.

pub mod access;
pub mod cache;
pub mod error;
pub mod impute;
pub mod period;
pub mod records;
pub mod table;
pub mod zones;

#[cfg(test)]
mod tests;

pub use access::{SkimAccessSpec, ZoneAgg, add_skim_access_columns, skim_access_variable};
pub use cache::{SkimSources, load_or_impute};
pub use error::{SkimError, SkimResult};
pub use impute::{
    ImputeOptions, ImputeSummary, Imputation, MissingModePolicy, ModeRatio, impute_missing_skims,
};
pub use period::PeriodSkims;
pub use records::{
    DEFAULT_DISTANCE_COLUMN, MILES_TO_METERS, RawSkimRecord, ReferenceSkims, load_raw_skims,
    load_raw_skims_reader,
};
pub use table::{Impedance, ImputedSkims};
pub use zones::ZoneTable;
