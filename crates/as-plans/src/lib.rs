//! `as-plans`: daily activity plans.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`plan`]     | `ActivityType`, `PlanElement`, `Plan`, `PlanRow`           |
//! | [`generate`] | `CommuteTimes`, `generate_plan`, `generate_plans`          |
//! | [`loader`]   | `load_plans_csv`, `load_plans_reader`                      |
//! | [`error`]    | `PlanError`, `PlanResult<T>`                               |

pub mod error;
pub mod generate;
pub mod loader;
pub mod plan;


pub use error::{PlanError, PlanResult};
pub use generate::{CommuteTimes, generate_plan, generate_plans};
pub use loader::{load_plans_csv, load_plans_reader};
pub use plan::{ActivityType, PLAN_COLUMNS, Plan, PlanElement, PlanRow};
