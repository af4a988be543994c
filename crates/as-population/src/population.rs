//! The loaded population and its merge relationships.
//!
//! Tables are joined through explicit foreign keys:
//!
//! ```text
//! person ─household_id─▶ household ─unit_id─▶ unit ─building_id─▶ building ─parcel_id─▶ parcel
//!                                  └────────building_id──────────▶
//! job ─building_id─▶ building
//! ```
//!
//! A household resolves to its building through its unit when it has one,
//! and through its own `building_id` otherwise.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use as_core::{BuildingId, HouseholdId, JobId, PersonId, SchoolId, ZoneId};

use crate::records::{Building, Household, Job, Parcel, Person, Rental, School, Unit};
use crate::rentals::clean_rentals;
use crate::table::Table;
use crate::{PopulationError, PopulationResult};

// ── PopulationFiles ───────────────────────────────────────────────────────────

/// File names of the population tables, relative to the data directory.
/// `units`, `schools` and `rentals` are optional.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PopulationFiles {
    pub households: String,
    pub persons:    String,
    pub jobs:       String,
    pub buildings:  String,
    pub parcels:    String,
    pub units:      Option<String>,
    pub schools:    Option<String>,
    pub rentals:    Option<String>,
}

impl Default for PopulationFiles {
    fn default() -> Self {
        Self {
            households: "households.csv".into(),
            persons:    "persons.csv".into(),
            jobs:       "jobs.csv".into(),
            buildings:  "buildings.csv".into(),
            parcels:    "parcels.csv".into(),
            units:      Some("units.csv".into()),
            schools:    None,
            rentals:    None,
        }
    }
}

// ── Population ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Population {
    pub households: Table<Household>,
    pub persons:    Table<Person>,
    pub jobs:       Table<Job>,
    pub buildings:  Table<Building>,
    pub units:      Table<Unit>,
    pub parcels:    Table<Parcel>,
    pub schools:    Table<School>,
    pub rentals:    Table<Rental>,
}

impl Population {
    /// Load every table named in `files` from `dir`.
    ///
    /// Optional tables whose file does not exist are left empty with a
    /// warning.  Rentals are cleaned on load.
    pub fn load(dir: &Path, files: &PopulationFiles) -> PopulationResult<Self> {
        let mut pop = Population {
            households: Table::from_csv_path(&dir.join(&files.households))?,
            persons:    Table::from_csv_path(&dir.join(&files.persons))?,
            jobs:       Table::from_csv_path(&dir.join(&files.jobs))?,
            buildings:  Table::from_csv_path(&dir.join(&files.buildings))?,
            parcels:    Table::from_csv_path(&dir.join(&files.parcels))?,
            units:      load_optional(dir, files.units.as_deref())?,
            schools:    load_optional(dir, files.schools.as_deref())?,
            rentals:    load_optional(dir, files.rentals.as_deref())?,
        };
        clean_rentals(&mut pop.rentals);
        log::info!(
            "population: {} households, {} persons, {} jobs, {} buildings, {} parcels",
            pop.households.len(),
            pop.persons.len(),
            pop.jobs.len(),
            pop.buildings.len(),
            pop.parcels.len()
        );
        Ok(pop)
    }

    // ── Resolution ────────────────────────────────────────────────────────

    pub fn household_building(&self, id: HouseholdId) -> PopulationResult<BuildingId> {
        let hh = self.households.require(id.0)?;
        if let Some(unit_id) = hh.unit_id.filter(|u| u.is_valid()) {
            let unit = self.units.get(unit_id.0).ok_or(PopulationError::Unresolved {
                from: "household",
                id:   id.0,
                to:   "unit",
            })?;
            return Ok(unit.building_id);
        }
        hh.building_id.ok_or(PopulationError::Unresolved {
            from: "household",
            id:   id.0,
            to:   "building",
        })
    }

    pub fn household_parcel(&self, id: HouseholdId) -> PopulationResult<&Parcel> {
        let building = self.household_building(id)?;
        self.building_parcel(building).map_err(|_| PopulationError::Unresolved {
            from: "household",
            id:   id.0,
            to:   "parcel",
        })
    }

    pub fn job_parcel(&self, id: JobId) -> PopulationResult<&Parcel> {
        let job = self.jobs.require(id.0)?;
        self.building_parcel(job.building_id).map_err(|_| PopulationError::Unresolved {
            from: "job",
            id:   id.0,
            to:   "parcel",
        })
    }

    pub fn building_parcel(&self, id: BuildingId) -> PopulationResult<&Parcel> {
        let building = self.buildings.require(id.0)?;
        self.parcels.get(building.parcel_id.0).ok_or(PopulationError::Unresolved {
            from: "building",
            id:   id.0,
            to:   "parcel",
        })
    }

    pub fn person_household(&self, id: PersonId) -> PopulationResult<&Household> {
        let person = self.persons.require(id.0)?;
        self.households.get(person.household_id.0).ok_or(PopulationError::Unresolved {
            from: "person",
            id:   id.0,
            to:   "household",
        })
    }

    /// Person ids grouped by household, in person-table order.
    pub fn members(&self) -> FxHashMap<HouseholdId, Vec<PersonId>> {
        let mut out: FxHashMap<HouseholdId, Vec<PersonId>> = FxHashMap::default();
        for p in self.persons.iter() {
            out.entry(p.household_id).or_default().push(p.person_id);
        }
        out
    }

    /// Zone of a school: its own `zone_id` when given, else its parcel's.
    pub fn school_zone(&self, id: SchoolId) -> Option<ZoneId> {
        let school = self.schools.get(u64::from(id.0))?;
        school
            .zone_id
            .or_else(|| school.parcel_id.and_then(|p| self.parcels.get(p.0)).map(|p| p.zone_id))
    }

    /// Check every person → household link and every household and job →
    /// parcel chain.
    pub fn validate(&self) -> PopulationResult<()> {
        for p in self.persons.iter() {
            self.person_household(p.person_id)?;
        }
        for hh in self.households.iter() {
            self.household_parcel(hh.household_id)?;
        }
        for job in self.jobs.iter() {
            self.job_parcel(job.job_id)?;
        }
        Ok(())
    }
}

fn load_optional<T: crate::Record>(dir: &Path, file: Option<&str>) -> PopulationResult<Table<T>> {
    let Some(file) = file else { return Ok(Table::new()) };
    let path = dir.join(file);
    if !path.exists() {
        log::warn!("{} table {} not found; left empty", T::TABLE, path.display());
        return Ok(Table::new());
    }
    Table::from_csv_path(&path)
}
