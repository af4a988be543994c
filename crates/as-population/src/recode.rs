//! Value recodes applied before model simulation.
//!
//! The mode choice model was estimated on the California Household Travel
//! Survey (CHTS), whose race and education codes differ from the synthetic
//! population's.  Auto ownership uses one-hot income bins.

/// Upper edges of the income bins.  The first bin also includes 0.
pub const INCOME_BIN_EDGES: [f64; 7] = [20_000.0, 40_000.0, 60_000.0, 80_000.0, 100_000.0, 120_000.0, f64::INFINITY];

pub const INCOME_BIN_LABELS: [&str; 7] = ["2", "4", "6", "8", "10", "12", "12p"];

/// Population `race_id` → CHTS `RACE1`.  Codes 8 and 9 collapse to 97
/// ("other").
pub fn chts_race(race_id: u8) -> Option<u8> {
    match race_id {
        1 => Some(1),
        2 => Some(2),
        3..=5 => Some(3),
        6 => Some(4),
        7 => Some(5),
        8 | 9 => Some(97),
        _ => None,
    }
}

/// Population `edu` (ACS attainment, 0-24) → CHTS `EDUCA` (1-6).
pub fn chts_education(edu: u8) -> Option<u8> {
    match edu {
        0..=15  => Some(1),
        16 | 17 => Some(2),
        18 | 19 => Some(3),
        20      => Some(4),
        21      => Some(5),
        22..=24 => Some(6),
        _ => None,
    }
}

/// Index of the income bin `income` falls in.  Bins are right-closed,
/// `(lo, hi]`, except the first, which is `[0, 20000]`.  Negative or NaN
/// income has no bin.
pub fn income_bin(income: f64) -> Option<usize> {
    if income.is_nan() || income < 0.0 {
        return None;
    }
    INCOME_BIN_EDGES.iter().position(|&hi| income <= hi)
}

pub fn income_bin_label(income: f64) -> Option<&'static str> {
    income_bin(income).map(|i| INCOME_BIN_LABELS[i])
}

/// Dummy column names, `income_2` … `income_12p`.
pub fn income_dummy_columns() -> impl Iterator<Item = String> {
    INCOME_BIN_LABELS.iter().map(|l| format!("income_{l}"))
}

/// One-hot encoding of [`income_bin`], aligned with
/// [`income_dummy_columns`].  All zeros when there is no bin.
pub fn income_dummies(income: f64) -> [f64; 7] {
    let mut out = [0.0; 7];
    if let Some(i) = income_bin(income) {
        out[i] = 1.0;
    }
    out
}

/// Owner-occupied flag: tenure code 1 is "own".
#[inline]
pub fn owns_home(tenure: Option<u8>) -> bool {
    tenure == Some(1)
}
