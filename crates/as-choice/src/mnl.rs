//! Multinomial logit model defined by a JSON spec.
//!
//! # Spec format
//!
//! ```json
//! {
//!   "name": "auto_ownership",
//!   "alternatives": [
//!     { "name": "0" },
//!     { "name": "1", "constant": 1.2, "coefficients": { "income_4": 0.3 } }
//!   ],
//!   "coefficients": { "HHSIZ": 0.4 },
//!   "sample_size": null,
//!   "missing": "error"
//! }
//! ```
//!
//! `coefficients` at the top level are shared by every alternative.  A spec
//! with no `alternatives` list is a location choice model whose alternatives
//! come from the caller and whose utility uses the shared coefficients only.
//!
//! A variable is looked up on the alternative first and the chooser second.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::model::DiscreteChoice;
use crate::{ChoiceError, ChoiceResult, Observation};

/// Treatment of a variable that is absent or NaN.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    #[default]
    Error,
    /// Read the variable as 0.
    Zero,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AlternativeSpec {
    pub name: String,
    #[serde(default)]
    pub constant: f64,
    #[serde(default)]
    pub coefficients: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MnlSpec {
    pub name: String,
    #[serde(default)]
    pub alternatives: Vec<AlternativeSpec>,
    #[serde(default)]
    pub coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    pub sample_size: Option<usize>,
    #[serde(default)]
    pub missing: MissingPolicy,
}

#[derive(Clone, Debug)]
pub struct MnlModel {
    spec: MnlSpec,
}

impl MnlModel {
    pub fn new(spec: MnlSpec) -> ChoiceResult<Self> {
        let invalid = |msg: String| -> ChoiceResult<Self> {
            Err(ChoiceError::InvalidSpec(format!("{}: {msg}", spec.name)))
        };
        if spec.name.is_empty() {
            return Err(ChoiceError::InvalidSpec("model without a name".into()));
        }
        if spec.sample_size == Some(0) {
            return invalid("sample_size must be positive".into());
        }
        let mut seen = BTreeSet::new();
        for alt in &spec.alternatives {
            if !seen.insert(alt.name.as_str()) {
                return invalid(format!("duplicate alternative {:?}", alt.name));
            }
            if !alt.constant.is_finite() || alt.coefficients.values().any(|b| !b.is_finite()) {
                return invalid(format!("non-finite coefficient on alternative {:?}", alt.name));
            }
        }
        if spec.coefficients.values().any(|b| !b.is_finite()) {
            return invalid("non-finite shared coefficient".into());
        }
        Ok(Self { spec })
    }

    pub fn from_json_str(json: &str) -> ChoiceResult<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: &Path) -> ChoiceResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn spec(&self) -> &MnlSpec {
        &self.spec
    }

    pub fn alternative_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.spec.alternatives.iter().map(|a| a.name.as_str())
    }

    fn lookup(&self, name: &str, chooser: &Observation, alt: Option<&Observation>) -> ChoiceResult<f64> {
        let v = alt.and_then(|a| a.get(name)).or_else(|| chooser.get(name)).filter(|v| !v.is_nan());
        match (v, self.spec.missing) {
            (Some(v), _) => Ok(v),
            (None, MissingPolicy::Zero) => Ok(0.0),
            (None, MissingPolicy::Error) => Err(ChoiceError::MissingVariable {
                model:    self.spec.name.clone(),
                variable: name.to_string(),
            }),
        }
    }

    fn shared_utility(&self, chooser: &Observation, alt: Option<&Observation>) -> ChoiceResult<f64> {
        let mut u = 0.0;
        for (name, beta) in &self.spec.coefficients {
            u += beta * self.lookup(name, chooser, alt)?;
        }
        Ok(u)
    }
}

impl DiscreteChoice for MnlModel {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn alternative_count(&self) -> Option<usize> {
        (!self.spec.alternatives.is_empty()).then_some(self.spec.alternatives.len())
    }

    fn sample_size(&self) -> Option<usize> {
        self.spec.sample_size
    }

    fn utilities(&self, chooser: &Observation, alternatives: &[Observation]) -> ChoiceResult<Vec<f64>> {
        if self.spec.alternatives.is_empty() {
            if alternatives.is_empty() {
                return Err(ChoiceError::NoAlternatives);
            }
            return alternatives.iter().map(|a| self.shared_utility(chooser, Some(a))).collect();
        }

        let n = self.spec.alternatives.len();
        if !alternatives.is_empty() && alternatives.len() != n {
            return Err(ChoiceError::AlternativeCount {
                model:    self.spec.name.clone(),
                expected: n,
                got:      alternatives.len(),
            });
        }
        self.spec
            .alternatives
            .iter()
            .enumerate()
            .map(|(i, alt)| {
                let obs = alternatives.get(i);
                let mut u = alt.constant + self.shared_utility(chooser, obs)?;
                for (name, beta) in &alt.coefficients {
                    u += beta * self.lookup(name, chooser, obs)?;
                }
                Ok(u)
            })
            .collect()
    }
}
