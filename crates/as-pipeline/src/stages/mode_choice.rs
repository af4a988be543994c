//! `primary_mode_choice_simulate`: primary commute mode of every worker
//! with a job and a departure period.
//!
//! The model was estimated on CHTS, so choosers are described in CHTS
//! terms: `GEND`, `AGE`, `RACE1`, `JOBS`, `EDUCA`, `HHVEH`, `INCOM`,
//! `HHSIZ` and `OWN`.  The home zone is the origin and the job zone the
//! destination; the origin's zonal accessibility attributes and the period
//! skim attributes of the trip are added to the chooser.
//!
//! Columns listed in `skims.skim_access` are computed from the imputed
//! skims onto the zone table first, so they reach the chooser alongside
//! the file's own attributes.

use as_choice::Observation;
use as_core::{ChooserRng, CommuteMode, TodPeriod};
use as_population::{Household, Person, Population, chts_education, chts_race, owns_home};
use as_skims::{PeriodSkims, ZoneTable, add_skim_access_columns};

use crate::context::{columns, tables};
use crate::stages::vars::require_alternatives;
use crate::{DataContext, PipelineError, PipelineResult, Stage};

pub const MODEL: &str = "primary_mode_choice";

pub struct PrimaryModeChoice;

impl Stage for PrimaryModeChoice {
    fn name(&self) -> &'static str {
        "primary_mode_choice_simulate"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[
            tables::PERSONS,
            tables::HOUSEHOLDS,
            tables::JOBS,
            tables::PERSON_JOB,
            tables::PERSON_TOD,
            tables::HOUSEHOLD_CARS,
        ]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::PERSON_MODE]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let model = ctx.models.get(MODEL)?;
        require_alternatives(model, CommuteMode::ALL.len())?;
        let files = &ctx.config.skims;
        let skims = PeriodSkims::from_csv_path(&ctx.config.data_path(&files.period))?;
        let mut zones = match &files.zone_accessibility {
            Some(file) => Some(ZoneTable::from_csv_path(&ctx.config.data_path(file), &files.zone_id_column)?),
            None => None,
        };
        if !files.skim_access.is_empty() {
            let Some(zones) = zones.as_mut() else {
                return Err(PipelineError::Config("skims.skim_access needs skims.zone_accessibility".into()));
            };
            add_skim_access_columns(zones, ctx.skims()?, &files.skim_access)?;
        }
        let pop = &ctx.population;
        let seed = ctx.stage_seed;

        let mut modes = vec![f64::NAN; pop.persons.len()];
        let mut counts = [0usize; CommuteMode::ALL.len()];
        let mut unskimmed = 0usize;
        for (pos, person) in pop.persons.iter().enumerate() {
            let Some(job) = person.job_id.filter(|j| j.is_valid()) else { continue };
            let Some(tod) = pop.persons.var_at(pos, columns::TOD).filter(|v| v.is_finite()) else {
                continue;
            };
            let period = TodPeriod::from_code(tod as u8)?;
            let household = pop.person_household(person.person_id)?;
            let orig = pop.household_parcel(household.household_id)?.zone_id;
            let dest = pop.job_parcel(job)?.zone_id;

            let mut chooser = chts_vars(pop, person, household);
            if let Some(zones) = &zones {
                chooser.extend(zones.attributes_or_zero(orig));
            }
            match skims.record(orig, dest, period) {
                Some(values) => {
                    let attrs = skims.attributes().iter().map(String::as_str);
                    chooser.extend(attrs.zip(values.iter().copied()).filter(|(_, v)| !v.is_nan()));
                }
                None => unskimmed += 1,
            }

            let mut rng = ChooserRng::new(seed, person.person_id.0);
            let k = model.simulate(&chooser, &[], &mut rng)?;
            let mode = CommuteMode::from_code(k as u8)?;
            modes[pos] = f64::from(mode.code());
            counts[k] += 1;
        }

        if unskimmed > 0 {
            log::warn!("mode choice: {unskimmed} commutes have no {} skim record", files.period);
        }
        for (mode, n) in CommuteMode::ALL.iter().zip(counts) {
            log::info!("mode choice: {:<20} {n}", mode.as_str());
        }
        ctx.population.persons.set_column(columns::COMMUTE_MODE, &modes)?;
        Ok(())
    }
}

/// Person and household fields under their CHTS names.  Fields the
/// population leaves unset are omitted.
fn chts_vars(pop: &Population, person: &Person, household: &Household) -> Observation {
    let mut obs = Observation::with_capacity(16);
    obs.set("AGE", f64::from(person.age));
    obs.set("JOBS", f64::from(person.worker));
    if let Some(sex) = person.sex {
        obs.set("GEND", f64::from(sex));
    }
    if let Some(race) = person.race_id.and_then(chts_race) {
        obs.set("RACE1", f64::from(race));
    }
    if let Some(edu) = person.edu.and_then(chts_education) {
        obs.set("EDUCA", f64::from(edu));
    }
    if let Some(cars) = pop.households.var(household.household_id.0, columns::CARS).filter(|v| !v.is_nan()) {
        obs.set("HHVEH", cars);
    }
    obs.set("INCOM", household.income);
    obs.set("HHSIZ", household.persons);
    obs.set("OWN", if owns_home(household.tenure) { 1.0 } else { 0.0 });
    obs
}
