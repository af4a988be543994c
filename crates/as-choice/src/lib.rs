//! `as-choice`: discrete choice simulation.
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`model`]       | `DiscreteChoice` trait, `softmax`, inverse-CDF `draw`      |
//! | [`mnl`]         | `MnlModel` built from a JSON `MnlSpec`                    |
//! | [`observation`] | `Observation`: named variables of a chooser/alternative   |
//! | [`registry`]    | `ModelRegistry`: models by name, loaded from a directory  |
//! | [`johnson_su`]  | Johnson SU distribution, departure and dwell draws        |
//! | [`school`]      | `school_available` grade filter                           |
//! | [`error`]       | `ChoiceError`, `ChoiceResult`                             |
//!
//! Every draw goes through an [`as_core::ChooserRng`] keyed by the chooser,
//! so results do not depend on evaluation order.

pub mod error;
pub mod johnson_su;
pub mod mnl;
pub mod model;
pub mod observation;
pub mod registry;
pub mod school;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ChoiceError, ChoiceResult};
pub use johnson_su::{DEPARTURE, DWELL, JohnsonSu, sample_departure, sample_dwell, work_end};
pub use mnl::{AlternativeSpec, MissingPolicy, MnlModel, MnlSpec};
pub use model::{DiscreteChoice, draw, softmax};
pub use observation::Observation;
pub use registry::ModelRegistry;
pub use school::{GRADES, school_available};
