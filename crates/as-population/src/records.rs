//! Flat entity records.
//!
//! Each record carries the typed columns the pipeline joins and recodes on.
//! Any other numeric column in the source file is kept by [`crate::Table`]
//! as an extra attribute, so model specs can reference it by name.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use as_core::{BuildingId, GeoPoint, HouseholdId, JobId, ParcelId, PersonId, SchoolId, UnitId, ZoneId};

/// Number of grade flags on a school (K through 12).
pub const GRADE_COUNT: usize = 13;

/// A row type loadable into a [`crate::Table`].
pub trait Record: DeserializeOwned {
    /// Table name used in errors and logs.
    const TABLE: &'static str;
    /// Columns (including aliases) consumed by the typed fields.
    const COLUMNS: &'static [&'static str];

    fn key(&self) -> u64;

    /// Typed numeric field by column name.
    fn var(&self, _name: &str) -> Option<f64> {
        None
    }

    /// Hook run after a row is read, with the extra columns of that row.
    fn finish(&mut self, _columns: &[String], _extras: &[f64]) {}
}

// ── Household ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct Household {
    pub household_id: HouseholdId,
    #[serde(default)]
    pub unit_id: Option<UnitId>,
    #[serde(default)]
    pub building_id: Option<BuildingId>,
    pub persons: f64,
    pub income: f64,
    #[serde(default)]
    pub tenure: Option<u8>,
    #[serde(default)]
    pub workers: Option<f64>,
    #[serde(default)]
    pub children: Option<f64>,
    #[serde(default)]
    pub cars: Option<f64>,
}

impl Record for Household {
    const TABLE: &'static str = "household";
    const COLUMNS: &'static [&'static str] = &[
        "household_id", "unit_id", "building_id", "persons", "income", "tenure", "workers",
        "children", "cars",
    ];

    fn key(&self) -> u64 {
        self.household_id.0
    }

    fn var(&self, name: &str) -> Option<f64> {
        match name {
            "persons"  => Some(self.persons),
            "income"   => Some(self.income),
            "tenure"   => self.tenure.map(f64::from),
            "workers"  => self.workers,
            "children" => self.children,
            "cars"     => self.cars,
            _ => None,
        }
    }
}

// ── Person ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct Person {
    pub person_id:    PersonId,
    pub household_id: HouseholdId,
    pub age:          u32,
    #[serde(default)]
    pub sex:          Option<u8>,
    #[serde(default)]
    pub race_id:      Option<u8>,
    #[serde(default)]
    pub edu:          Option<u8>,
    #[serde(default)]
    pub worker:       u8,
    #[serde(default)]
    pub student:      u8,
    #[serde(default)]
    pub hours:        Option<f64>,
    /// Pre-assigned job, if the input already carries one.
    #[serde(default)]
    pub job_id:       Option<JobId>,
}

impl Person {
    #[inline]
    pub fn is_worker(&self) -> bool {
        self.worker == 1
    }

    #[inline]
    pub fn is_student(&self) -> bool {
        self.student == 1
    }
}

impl Record for Person {
    const TABLE: &'static str = "person";
    const COLUMNS: &'static [&'static str] = &[
        "person_id", "household_id", "age", "sex", "race_id", "edu", "worker", "student", "hours",
        "job_id",
    ];

    fn key(&self) -> u64 {
        self.person_id.0
    }

    fn var(&self, name: &str) -> Option<f64> {
        match name {
            "age"     => Some(f64::from(self.age)),
            "sex"     => self.sex.map(f64::from),
            "race_id" => self.race_id.map(f64::from),
            "edu"     => self.edu.map(f64::from),
            "worker"  => Some(f64::from(self.worker)),
            "student" => Some(f64::from(self.student)),
            "hours"   => self.hours,
            _ => None,
        }
    }
}

// ── Job ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct Job {
    pub job_id:      JobId,
    pub building_id: BuildingId,
    #[serde(default)]
    pub sector_id:   Option<u32>,
}

impl Record for Job {
    const TABLE: &'static str = "job";
    const COLUMNS: &'static [&'static str] = &["job_id", "building_id", "sector_id"];

    fn key(&self) -> u64 {
        self.job_id.0
    }

    fn var(&self, name: &str) -> Option<f64> {
        match name {
            "sector_id" => self.sector_id.map(f64::from),
            _ => None,
        }
    }
}

// ── Building / Unit / Parcel ──────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct Building {
    pub building_id: BuildingId,
    pub parcel_id:   ParcelId,
    #[serde(default)]
    pub residential_units: Option<f64>,
    #[serde(default)]
    pub residential_sqft: Option<f64>,
    #[serde(default)]
    pub year_built: Option<f64>,
}

impl Building {
    /// Residential floor area per unit; 0 where there are no units.
    pub fn res_sqft_per_unit(&self) -> f64 {
        match (self.residential_sqft, self.residential_units) {
            (Some(sqft), Some(units)) if units > 0.0 => sqft / units,
            _ => 0.0,
        }
    }
}

impl Record for Building {
    const TABLE: &'static str = "building";
    const COLUMNS: &'static [&'static str] = &[
        "building_id", "parcel_id", "residential_units", "residential_sqft", "year_built",
    ];

    fn key(&self) -> u64 {
        self.building_id.0
    }

    fn var(&self, name: &str) -> Option<f64> {
        match name {
            "residential_units" => self.residential_units,
            "residential_sqft"  => self.residential_sqft,
            "year_built"        => self.year_built,
            "res_sqft_per_unit" => Some(self.res_sqft_per_unit()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Unit {
    pub unit_id:     UnitId,
    pub building_id: BuildingId,
}

impl Record for Unit {
    const TABLE: &'static str = "unit";
    const COLUMNS: &'static [&'static str] = &["unit_id", "building_id"];

    fn key(&self) -> u64 {
        self.unit_id.0
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Parcel {
    #[serde(alias = "parcel_id")]
    pub primary_id: ParcelId,
    pub zone_id:    ZoneId,
    pub x:          f64,
    pub y:          f64,
    /// External id of the nearest drive-network node.
    #[serde(default)]
    pub node_id_small: Option<i64>,
    /// External id of the nearest walk-network node.
    #[serde(default)]
    pub node_id_walk:  Option<i64>,
    #[serde(default)]
    pub acres: Option<f64>,
}

impl Parcel {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.x, self.y)
    }
}

impl Record for Parcel {
    const TABLE: &'static str = "parcel";
    const COLUMNS: &'static [&'static str] = &[
        "primary_id", "parcel_id", "zone_id", "x", "y", "node_id_small", "node_id_walk", "acres",
    ];

    fn key(&self) -> u64 {
        self.primary_id.0
    }

    fn var(&self, name: &str) -> Option<f64> {
        match name {
            "x"     => Some(self.x),
            "y"     => Some(self.y),
            "acres" => self.acres,
            _ => None,
        }
    }
}

// ── Rental ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct Rental {
    #[serde(alias = "rental_id")]
    pub pid:       u64,
    pub rent:      f64,
    pub rent_sqft: f64,
    #[serde(default)]
    pub sqft:      Option<f64>,
    #[serde(default)]
    pub bedrooms:  Option<f64>,
    #[serde(default)]
    pub node_id_small: Option<i64>,
    #[serde(default)]
    pub node_id_walk:  Option<i64>,
}

impl Record for Rental {
    const TABLE: &'static str = "rental";
    const COLUMNS: &'static [&'static str] = &[
        "pid", "rental_id", "rent", "rent_sqft", "sqft", "bedrooms", "node_id_small", "node_id_walk",
    ];

    fn key(&self) -> u64 {
        self.pid
    }

    fn var(&self, name: &str) -> Option<f64> {
        match name {
            "rent"      => Some(self.rent),
            "rent_sqft" => Some(self.rent_sqft),
            "sqft"      => self.sqft,
            "bedrooms"  => self.bedrooms,
            _ => None,
        }
    }
}

// ── School ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolType {
    Public,
    Private,
}

impl SchoolType {
    /// POI category name used on the network.
    pub fn category(self) -> &'static str {
        match self {
            SchoolType::Public  => "public_school",
            SchoolType::Private => "private_school",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct School {
    pub school_id: SchoolId,
    #[serde(rename = "type")]
    pub kind:      SchoolType,
    #[serde(alias = "Longitude")]
    pub x:         f64,
    #[serde(alias = "Latitude")]
    pub y:         f64,
    #[serde(default)]
    pub parcel_id: Option<ParcelId>,
    #[serde(default)]
    pub zone_id:   Option<ZoneId>,
    #[serde(default)]
    pub enrollment: Option<f64>,
    /// Grades offered, K through 12, from the `grade_*` columns in file order.
    #[serde(skip)]
    pub grades:    [bool; GRADE_COUNT],
}

impl School {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.x, self.y)
    }
}

impl Record for School {
    const TABLE: &'static str = "school";
    const COLUMNS: &'static [&'static str] = &[
        "school_id", "type", "x", "Longitude", "y", "Latitude", "parcel_id", "zone_id", "enrollment",
    ];

    fn key(&self) -> u64 {
        u64::from(self.school_id.0)
    }

    fn var(&self, name: &str) -> Option<f64> {
        match name {
            "enrollment" => self.enrollment,
            "private"    => Some(if self.kind == SchoolType::Private { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn finish(&mut self, columns: &[String], extras: &[f64]) {
        let grade_values = columns
            .iter()
            .zip(extras)
            .filter(|(c, _)| c.starts_with("grade_"))
            .map(|(_, &v)| v == 1.0);
        for (slot, offered) in self.grades.iter_mut().zip(grade_values) {
            *slot = offered;
        }
    }
}
