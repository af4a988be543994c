//! `as-core`: foundational types for the activitysynth pipeline.
//!
//! This crate is a dependency of every other `as-*` crate.  It has no
//! `as-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                       |
//! |------------|----------------------------------------------------------------|
//! | [`ids`]    | `HouseholdId`, `PersonId`, `JobId`, `ZoneId`, `NodeId`, …      |
//! | [`geo`]    | `GeoPoint`, haversine distance                                 |
//! | [`tod`]    | `TodPeriod`, `DwellCategory`, hour-of-day helpers              |
//! | [`rng`]    | `ChooserRng` (per decision maker), `SimRng` (per stage)        |
//! | [`mode`]   | `CommuteMode` enum                                             |
//! | [`error`]  | `CoreError`, `CoreResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod rng;
pub mod tod;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{
    BuildingId, HouseholdId, JobId, NodeId, ParcelId, PersonId, PoiId, SchoolId, UnitId, ZoneId,
};
pub use mode::CommuteMode;
pub use rng::{ChooserRng, SimRng, stream_seed};
pub use tod::{DwellCategory, TodPeriod, is_am_peak_hour, wrap_day};
