//! `wlcm_simulate`: workplace location choice.
//!
//! Each worker without a job picks one among a random sample of vacant
//! jobs.  Alternatives carry the job's and its parcel's variables plus the
//! skim terms `tt`, `dist` and `cost` from the home zone to the job zone.
//! A job holds one worker, so workers are processed in a seeded random
//! order and a chosen job leaves the vacancy pool.

use rustc_hash::FxHashSet;

use as_choice::Observation;
use as_core::{ChooserRng, JobId, PersonId, SimRng, ZoneId};

use crate::context::tables;
use crate::stages::vars::{add_row, add_skim_terms, household_vars};
use crate::{DataContext, PipelineResult, Stage};

pub const MODEL: &str = "WLCM";

struct Vacancy {
    job:        JobId,
    pos:        usize,
    parcel_pos: Option<usize>,
    zone:       ZoneId,
}

pub struct WorkplaceLocationChoice;

impl Stage for WorkplaceLocationChoice {
    fn name(&self) -> &'static str {
        "wlcm_simulate"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[tables::PERSONS, tables::HOUSEHOLDS, tables::JOBS, tables::BUILDINGS, tables::PARCELS, tables::SKIMS]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::PERSON_JOB]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let model = ctx.models.get(MODEL)?;
        let skims = ctx.skims()?;
        let mode = ctx.config.skims.location_mode.as_str();
        let pop = &ctx.population;
        let seed = ctx.stage_seed;

        // ── Vacancies ─────────────────────────────────────────────────────
        let taken: FxHashSet<JobId> = pop.persons.iter().filter_map(|p| p.job_id).collect();
        let mut unplaced_jobs = 0usize;
        let mut vacant: Vec<Vacancy> = pop
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| !taken.contains(&j.job_id))
            .filter_map(|(pos, j)| match pop.job_parcel(j.job_id) {
                Ok(parcel) => Some(Vacancy {
                    job: j.job_id,
                    pos,
                    parcel_pos: pop.parcels.position(parcel.primary_id.0),
                    zone: parcel.zone_id,
                }),
                Err(_) => {
                    unplaced_jobs += 1;
                    None
                }
            })
            .collect();
        if unplaced_jobs > 0 {
            log::warn!("wlcm: {unplaced_jobs} jobs have no parcel and are never offered");
        }

        // ── Choosers ──────────────────────────────────────────────────────
        let mut choosers: Vec<(usize, PersonId)> = pop
            .persons
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_worker() && p.job_id.is_none())
            .map(|(pos, p)| (pos, p.person_id))
            .collect();
        SimRng::new(seed).shuffle(&mut choosers);

        let mut assignments = Vec::with_capacity(choosers.len());
        let mut no_choice = 0usize;
        for &(pos, person_id) in &choosers {
            if vacant.is_empty() {
                log::warn!("wlcm: no vacant jobs left; {} workers unassigned", choosers.len() - assignments.len() - no_choice);
                break;
            }
            let person = &pop.persons.rows()[pos];
            let home_zone = pop.household_parcel(person.household_id)?.zone_id;
            let mut chooser = household_vars(pop, person.household_id)?;
            add_row(&mut chooser, &pop.persons, pos);

            let mut rng = ChooserRng::new(seed, person_id.0);
            let amount = model.sample_size().unwrap_or(vacant.len());
            let mut offered = Vec::with_capacity(amount.min(vacant.len()));
            let mut alternatives = Vec::with_capacity(offered.capacity());
            for i in rng.sample_indices(vacant.len(), amount) {
                let v = &vacant[i];
                let mut alt = Observation::new();
                if !add_skim_terms(&mut alt, skims, mode, home_zone, v.zone) {
                    continue;
                }
                add_row(&mut alt, &pop.jobs, v.pos);
                if let Some(p) = v.parcel_pos {
                    add_row(&mut alt, &pop.parcels, p);
                }
                offered.push(i);
                alternatives.push(alt);
            }
            if alternatives.is_empty() {
                no_choice += 1;
                continue;
            }

            let k = model.simulate(&chooser, &alternatives, &mut rng)?;
            let chosen = vacant.swap_remove(offered[k]);
            assignments.push((person_id, chosen.job));
        }

        if no_choice > 0 {
            log::warn!("wlcm: {no_choice} workers had no sampled job reachable in the skims");
        }
        log::info!(
            "wlcm: placed {} of {} workers, {} jobs still vacant",
            assignments.len(),
            choosers.len(),
            vacant.len()
        );

        for (person_id, job) in assignments {
            if let Some(p) = ctx.population.persons.get_mut(person_id.0) {
                p.job_id = Some(job);
            }
        }
        Ok(())
    }
}
