//! The `DiscreteChoice` trait, the extension point for choice models.

use as_core::ChooserRng;

use crate::{ChoiceError, ChoiceResult, Observation};

/// A model that picks one alternative for one chooser.
///
/// Models with a fixed set of alternatives (auto ownership, mode choice)
/// report it through [`alternative_count`](Self::alternative_count) and
/// accept an empty `alternatives` slice; location choice models take their
/// alternatives from the caller.
///
/// # Thread safety
///
/// Stages evaluate choosers independently and may do so in parallel, so
/// implementations must be `Send + Sync` and keep no per-chooser state.
pub trait DiscreteChoice: Send + Sync {
    fn name(&self) -> &str;

    /// Number of built-in alternatives, or `None` when the caller supplies
    /// them.
    fn alternative_count(&self) -> Option<usize> {
        None
    }

    /// How many alternatives to sample from a large universe before
    /// evaluating.  `None` means evaluate all of them.
    fn sample_size(&self) -> Option<usize> {
        None
    }

    /// Systematic utility of each alternative.  `f64::NEG_INFINITY` marks
    /// an unavailable alternative.
    fn utilities(&self, chooser: &Observation, alternatives: &[Observation]) -> ChoiceResult<Vec<f64>>;

    fn probabilities(&self, chooser: &Observation, alternatives: &[Observation]) -> ChoiceResult<Vec<f64>> {
        let u = self.utilities(chooser, alternatives)?;
        softmax(&u).ok_or_else(|| ChoiceError::Degenerate(self.name().to_string()))
    }

    /// Draw one alternative index with the chooser's own RNG.
    fn simulate(
        &self,
        chooser:      &Observation,
        alternatives: &[Observation],
        rng:          &mut ChooserRng,
    ) -> ChoiceResult<usize> {
        let p = self.probabilities(chooser, alternatives)?;
        draw(&p, rng.random::<f64>()).ok_or_else(|| ChoiceError::Degenerate(self.name().to_string()))
    }
}

/// Logit probabilities, shifted by the maximum utility for stability.
///
/// `None` if any utility is NaN or none is finite.
pub fn softmax(utilities: &[f64]) -> Option<Vec<f64>> {
    if utilities.iter().any(|u| u.is_nan()) {
        return None;
    }
    let max = utilities.iter().copied().filter(|u| u.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return None;
    }
    let exp: Vec<f64> = utilities.iter().map(|&u| (u - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    Some(exp.into_iter().map(|e| e / total).collect())
}

/// Inverse-CDF draw: the first index whose cumulative probability exceeds
/// `u ∈ [0, 1)`.  Rounding shortfall falls to the last index with positive
/// probability.
pub fn draw(probabilities: &[f64], u: f64) -> Option<usize> {
    let mut cum = 0.0;
    for (i, &p) in probabilities.iter().enumerate() {
        cum += p;
        if u < cum {
            return Some(i);
        }
    }
    probabilities.iter().rposition(|&p| p > 0.0)
}
