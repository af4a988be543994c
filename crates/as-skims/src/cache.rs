//! Imputed-skim cache with recomputation fallback.

use std::path::Path;

use crate::impute::{ImputeOptions, impute_missing_skims};
use crate::records::{ReferenceSkims, load_raw_skims};
use crate::table::ImputedSkims;
use crate::{SkimError, SkimResult};

/// Inputs needed to recompute the imputed table.
pub struct SkimSources<'a> {
    pub raw_path:        &'a Path,
    pub reference_path:  &'a Path,
    pub distance_column: &'a str,
}

/// Read the imputed table at `cache_path`, or recompute it from `sources`
/// and write it there when the file does not exist.
///
/// A cached table whose row count differs from `options.expected_rows` is
/// stale: it is recomputed and overwritten.
pub fn load_or_impute(
    cache_path: &Path,
    sources: &SkimSources<'_>,
    options: &ImputeOptions,
) -> SkimResult<ImputedSkims> {
    if cache_path.exists() {
        log::info!("reading imputed skims from {}", cache_path.display());
        let cached = ImputedSkims::from_csv_path(cache_path)?;
        match check_rows(&cached, options) {
            Ok(()) => return Ok(cached),
            Err(e) => log::warn!("{}: {e}; imputing skims again", cache_path.display()),
        }
    } else {
        log::info!("{} not found; imputing skims", cache_path.display());
    }

    let raw = load_raw_skims(sources.raw_path)?;
    let reference = ReferenceSkims::from_csv_path(sources.reference_path, sources.distance_column)?;
    let imputation = impute_missing_skims(&raw, &reference, options)?;

    if let Some(parent) = cache_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    imputation.skims.to_csv_path(cache_path)?;
    log::info!("wrote imputed skims to {}", cache_path.display());
    Ok(imputation.skims)
}

fn check_rows(skims: &ImputedSkims, options: &ImputeOptions) -> SkimResult<()> {
    match options.expected_rows {
        Some(expected) if skims.len() != expected => Err(SkimError::RowCount { expected, got: skims.len() }),
        _ => Ok(()),
    }
}
