//! Work time-of-day stages.
//!
//! | Stage                       | Writes                     |
//! |-----------------------------|----------------------------|
//! | `tod_category_simulate`     | `TOD` (period code 0..=4)  |
//! | `tod_dwell_simulate`        | `dwell_work` (code 1..=5)  |
//! | `tod_distribution_simulate` | `HW_ET`, `dwell_exact`, `WH_ST` |
//!
//! The first two are discrete choices over built-in alternatives; the third
//! draws exact hours from the fitted Johnson SU distributions.

use as_choice::{sample_departure, sample_dwell, work_end};
use as_core::{ChooserRng, DwellCategory, TodPeriod};

use crate::context::{columns, tables};
use crate::stages::vars::{commuter_vars, require_alternatives};
use crate::{DataContext, PipelineResult, Stage};

pub const TOD_MODEL: &str = "work_TOD_choice";
pub const DWELL_MODEL: &str = "dwell_work";

/// Run `model` for every commuter and write the chosen alternative index,
/// mapped through `code`, to `column`.  Non-commuters get NaN.
fn simulate_commuters(
    ctx:          &mut DataContext,
    model_name:   &str,
    alternatives: usize,
    column:       &str,
    code:         impl Fn(usize) -> PipelineResult<f64>,
) -> PipelineResult<()> {
    let model = ctx.models.get(model_name)?;
    require_alternatives(model, alternatives)?;
    let pop = &ctx.population;
    let seed = ctx.stage_seed;

    let mut values = vec![f64::NAN; pop.persons.len()];
    let mut chosen = 0usize;
    for (pos, person) in pop.persons.iter().enumerate() {
        let Some(chooser) = commuter_vars(pop, pos)? else { continue };
        let mut rng = ChooserRng::new(seed, person.person_id.0);
        let k = model.simulate(&chooser, &[], &mut rng)?;
        values[pos] = code(k)?;
        chosen += 1;
    }
    log::info!("{model_name}: {chosen} commuters simulated");
    ctx.population.persons.set_column(column, &values)?;
    Ok(())
}

// ── tod_category_simulate ─────────────────────────────────────────────────────

pub struct TodCategory;

impl Stage for TodCategory {
    fn name(&self) -> &'static str {
        "tod_category_simulate"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[tables::PERSONS, tables::HOUSEHOLDS, tables::JOBS, tables::PERSON_JOB]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::PERSON_TOD]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        simulate_commuters(ctx, TOD_MODEL, TodPeriod::ALL.len(), columns::TOD, |k| {
            Ok(f64::from(TodPeriod::from_code(k as u8)?.code()))
        })
    }
}

// ── tod_dwell_simulate ────────────────────────────────────────────────────────

pub struct TodDwell;

impl Stage for TodDwell {
    fn name(&self) -> &'static str {
        "tod_dwell_simulate"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[tables::PERSONS, tables::HOUSEHOLDS, tables::JOBS, tables::PERSON_JOB]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::PERSON_DWELL]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        simulate_commuters(ctx, DWELL_MODEL, DwellCategory::ALL.len(), columns::DWELL_WORK, |k| {
            Ok(f64::from(DwellCategory::from_code(k as u8 + 1)?.code()))
        })
    }
}

// ── tod_distribution_simulate ─────────────────────────────────────────────────

/// Exact departure and dwell hours for every person with both a period and
/// a dwell category.
pub struct TodDistribution;

impl Stage for TodDistribution {
    fn name(&self) -> &'static str {
        "tod_distribution_simulate"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[tables::PERSON_TOD, tables::PERSON_DWELL]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::PERSON_TIMES]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let persons = &ctx.population.persons;
        let seed = ctx.stage_seed;
        let n = persons.len();
        let mut departure = vec![f64::NAN; n];
        let mut dwell = vec![f64::NAN; n];
        let mut end = vec![f64::NAN; n];

        for (pos, person) in persons.iter().enumerate() {
            let tod = persons.var_at(pos, columns::TOD).filter(|v| v.is_finite());
            let cat = persons.var_at(pos, columns::DWELL_WORK).filter(|v| v.is_finite());
            let (Some(tod), Some(cat)) = (tod, cat) else { continue };
            let period = TodPeriod::from_code(tod as u8)?;
            let category = DwellCategory::from_code(cat as u8)?;

            let mut rng = ChooserRng::new(seed, person.person_id.0);
            let dep = sample_departure(rng.inner(), period)?;
            let hours = sample_dwell(rng.inner(), category)?;
            departure[pos] = dep;
            dwell[pos] = hours;
            end[pos] = work_end(dep, hours);
        }

        let timed = departure.iter().filter(|v| v.is_finite()).count();
        log::info!("tod distribution: exact times for {timed} of {n} persons");
        let persons = &mut ctx.population.persons;
        persons.set_column(columns::DEPARTURE, &departure)?;
        persons.set_column(columns::DWELL_EXACT, &dwell)?;
        persons.set_column(columns::WORK_END, &end)?;
        Ok(())
    }
}
