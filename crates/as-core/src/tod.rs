//! Time-of-day model.
//!
//! # Design
//!
//! Trip times are fractional hours after midnight (`7.5` = 07:30).  The
//! departure distribution used by the time-of-day stages extends past
//! midnight (the evening period runs to hour 27), so sampled values are
//! folded back into the day with [`wrap_day`].
//!
//! Two categorical schemes partition the continuous scale:
//!
//! | Scheme          | Used for                          |
//! |-----------------|-----------------------------------|
//! | [`TodPeriod`]   | home→work departure period, skims |
//! | [`DwellCategory`] | time spent at work              |

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Hour helpers ──────────────────────────────────────────────────────────────

/// Fold an hour value greater than 24 back into the current day.
///
/// Exactly 24.0 is left alone; only values strictly past midnight wrap.
#[inline]
pub fn wrap_day(hours: f64) -> f64 {
    if hours > 24.0 { hours - 24.0 } else { hours }
}

/// `true` for the clock hours that make up the morning peak in raw
/// (hourly) skims: 07:00, 08:00 and 09:00.
#[inline]
pub fn is_am_peak_hour(hour: u8) -> bool {
    matches!(hour, 7..=9)
}

// ── TodPeriod ─────────────────────────────────────────────────────────────────

/// A five-way split of the travel day.
///
/// The numeric code is the alternative index of the time-of-day choice
/// model; the label is the suffix used in period skims (`da_time_AM`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TodPeriod {
    /// 03:00 – 06:00
    EarlyAm,
    /// 06:00 – 09:00
    AmPeak,
    /// 09:00 – 15:30
    Midday,
    /// 15:30 – 18:30
    PmPeak,
    /// 18:30 – 03:00 (next day)
    Evening,
}

impl TodPeriod {
    pub const ALL: [TodPeriod; 5] = [
        TodPeriod::EarlyAm,
        TodPeriod::AmPeak,
        TodPeriod::Midday,
        TodPeriod::PmPeak,
        TodPeriod::Evening,
    ];

    /// Model alternative code, 0 – 4.
    pub fn code(self) -> u8 {
        match self {
            TodPeriod::EarlyAm => 0,
            TodPeriod::AmPeak  => 1,
            TodPeriod::Midday  => 2,
            TodPeriod::PmPeak  => 3,
            TodPeriod::Evening => 4,
        }
    }

    pub fn from_code(code: u8) -> CoreResult<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(CoreError::UnknownCode { what: "time-of-day period", code: code as i64 })
    }

    /// Skim column suffix.
    pub fn label(self) -> &'static str {
        match self {
            TodPeriod::EarlyAm => "EA",
            TodPeriod::AmPeak  => "AM",
            TodPeriod::Midday  => "MD",
            TodPeriod::PmPeak  => "PM",
            TodPeriod::Evening => "EV",
        }
    }

    pub fn from_label(label: &str) -> CoreResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.label() == label)
            .ok_or_else(|| CoreError::UnknownLabel {
                what:  "time-of-day period",
                label: label.to_owned(),
            })
    }

    /// Half-open `[start, end)` hour window a departure in this period must
    /// fall in, before wrapping.  The evening window runs past midnight.
    pub fn window(self) -> (f64, f64) {
        match self {
            TodPeriod::EarlyAm => (3.0, 6.0),
            TodPeriod::AmPeak  => (6.0, 9.0),
            TodPeriod::Midday  => (9.0, 15.5),
            TodPeriod::PmPeak  => (15.5, 18.5),
            TodPeriod::Evening => (18.5, 27.0),
        }
    }

    #[inline]
    pub fn contains(self, hours: f64) -> bool {
        let (lo, hi) = self.window();
        hours >= lo && hours < hi
    }
}

impl fmt::Display for TodPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── DwellCategory ─────────────────────────────────────────────────────────────

/// Binned time spent at the workplace.  Codes run 1 – 5.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DwellCategory {
    /// under 4.5 h
    Short,
    /// 4.5 – 7.75 h
    PartDay,
    /// 7.75 – 9 h
    FullDay,
    /// 9 – 10.5 h
    Long,
    /// 10.5 h or more
    Extended,
}

impl DwellCategory {
    pub const ALL: [DwellCategory; 5] = [
        DwellCategory::Short,
        DwellCategory::PartDay,
        DwellCategory::FullDay,
        DwellCategory::Long,
        DwellCategory::Extended,
    ];

    pub fn code(self) -> u8 {
        match self {
            DwellCategory::Short    => 1,
            DwellCategory::PartDay  => 2,
            DwellCategory::FullDay  => 3,
            DwellCategory::Long     => 4,
            DwellCategory::Extended => 5,
        }
    }

    pub fn from_code(code: u8) -> CoreResult<Self> {
        match code {
            1..=5 => Ok(Self::ALL[code as usize - 1]),
            _ => Err(CoreError::UnknownCode { what: "dwell category", code: code as i64 }),
        }
    }

    /// Half-open `[min, max)` dwell window in hours.  Dwell is never
    /// negative, so `Short` starts at 0.
    pub fn window(self) -> (f64, f64) {
        match self {
            DwellCategory::Short    => (0.0, 4.5),
            DwellCategory::PartDay  => (4.5, 7.75),
            DwellCategory::FullDay  => (7.75, 9.0),
            DwellCategory::Long     => (9.0, 10.5),
            DwellCategory::Extended => (10.5, 24.0),
        }
    }

    #[inline]
    pub fn contains(self, hours: f64) -> bool {
        let (lo, hi) = self.window();
        hours >= lo && hours < hi
    }
}
