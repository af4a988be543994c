//! Johnson SU distribution and the time-of-day draws built on it.
//!
//! A Johnson SU variate is a transformed standard normal:
//!
//! ```text
//! x = loc + scale · sinh((z − a) / b),   z ~ N(0, 1)
//! ```
//!
//! Exact departure and dwell times are drawn from fitted Johnson SU
//! distributions and redrawn until they land in the window of the period
//! or dwell category chosen earlier.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use as_core::{DwellCategory, TodPeriod, wrap_day};

use crate::{ChoiceError, ChoiceResult};

/// Redraw limit for [`JohnsonSu::sample_within`].
pub const MAX_ATTEMPTS: usize = 100_000;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct JohnsonSu {
    pub a:     f64,
    pub b:     f64,
    pub loc:   f64,
    pub scale: f64,
}

/// Home → work departure hour.
pub const DEPARTURE: JohnsonSu = JohnsonSu { a: -0.71, b: 1.00, loc: 7.12, scale: 1.31 };

/// Hours spent at work.
pub const DWELL: JohnsonSu = JohnsonSu { a: 0.49, b: 0.94, loc: 9.29, scale: 1.26 };

impl JohnsonSu {
    pub fn new(a: f64, b: f64, loc: f64, scale: f64) -> ChoiceResult<Self> {
        if !(b > 0.0 && scale > 0.0) || !a.is_finite() || !loc.is_finite() {
            return Err(ChoiceError::InvalidSpec(format!(
                "Johnson SU needs b > 0 and scale > 0 (a={a}, b={b}, loc={loc}, scale={scale})"
            )));
        }
        Ok(Self { a, b, loc, scale })
    }

    /// Map a standard normal value onto this distribution.
    #[inline]
    pub fn transform(&self, z: f64) -> f64 {
        self.loc + self.scale * ((z - self.a) / self.b).sinh()
    }

    /// Rejection sampling into `[lo, hi)`.
    pub fn sample_within<R: Rng + ?Sized>(&self, rng: &mut R, lo: f64, hi: f64) -> ChoiceResult<f64> {
        for _ in 0..MAX_ATTEMPTS {
            let x = self.sample(rng);
            if x >= lo && x < hi {
                return Ok(x);
            }
        }
        Err(ChoiceError::Rejection { lo, hi, attempts: MAX_ATTEMPTS })
    }
}

impl Distribution<f64> for JohnsonSu {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        self.transform(z)
    }
}

// ── Time-of-day draws ─────────────────────────────────────────────────────────

/// Departure hour inside `period`'s window, wrapped past midnight.
pub fn sample_departure<R: Rng + ?Sized>(rng: &mut R, period: TodPeriod) -> ChoiceResult<f64> {
    let (lo, hi) = period.window();
    Ok(wrap_day(DEPARTURE.sample_within(rng, lo, hi)?))
}

/// Hours at work inside `category`'s window.
pub fn sample_dwell<R: Rng + ?Sized>(rng: &mut R, category: DwellCategory) -> ChoiceResult<f64> {
    let (lo, hi) = category.window();
    DWELL.sample_within(rng, lo, hi)
}

/// Work end hour: departure plus dwell, wrapped past midnight.
#[inline]
pub fn work_end(departure: f64, dwell: f64) -> f64 {
    wrap_day(departure + dwell)
}
