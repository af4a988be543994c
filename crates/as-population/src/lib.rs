//! `as-population`: the synthetic population and its land-use context.
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`records`]    | `Household`, `Person`, `Job`, `Building`, `Unit`, `Parcel`, `School`, `Rental` |
//! | [`table`]      | `Table<T>`: keyed rows plus free-form numeric columns     |
//! | [`population`] | `Population`, `PopulationFiles`, merge resolution         |
//! | [`rentals`]    | rent clamping                                             |
//! | [`recode`]     | CHTS race / education, income bins                        |
//! | [`error`]      | `PopulationError`, `PopulationResult`                     |

pub mod error;
pub mod population;
pub mod recode;
pub mod records;
pub mod rentals;
pub mod table;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PopulationError, PopulationResult};
pub use population::{Population, PopulationFiles};
pub use recode::{
    INCOME_BIN_LABELS, chts_education, chts_race, income_bin, income_bin_label,
    income_dummies, income_dummy_columns, owns_home,
};
pub use records::{
    Building, GRADE_COUNT, Household, Job, Parcel, Person, Record, Rental, School, SchoolType, Unit,
};
pub use rentals::clean_rentals;
pub use table::Table;
