//! `generate_activity_plans`: one home-work-home plan per timed commuter.

use as_plans::{CommuteTimes, generate_plans};

use crate::context::{columns, tables};
use crate::stages::vars::household_position;
use crate::{DataContext, PipelineResult, Stage};

pub struct GenerateActivityPlans;

impl Stage for GenerateActivityPlans {
    fn name(&self) -> &'static str {
        "generate_activity_plans"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[tables::PERSONS, tables::HOUSEHOLDS, tables::JOBS, tables::PERSON_JOB, tables::PERSON_TIMES]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::PLANS]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let pop = &ctx.population;
        let mut commutes = Vec::new();
        let mut untimed = 0usize;
        for (pos, p) in pop.persons.iter().enumerate() {
            let Some(job) = p.job_id.filter(|j| j.is_valid()) else { continue };
            let departure = pop.persons.var_at(pos, columns::DEPARTURE).filter(|v| v.is_finite());
            let work_end = pop.persons.var_at(pos, columns::WORK_END).filter(|v| v.is_finite());
            let (Some(departure), Some(work_end)) = (departure, work_end) else {
                untimed += 1;
                continue;
            };
            commutes.push(CommuteTimes {
                person_id: p.person_id,
                home: household_position(pop, p.household_id)?,
                work: pop.job_parcel(job)?.position(),
                departure,
                work_end,
            });
        }
        if untimed > 0 {
            log::warn!("plans: {untimed} persons with a job have no commute times and get no plan");
        }

        ctx.plans = generate_plans(&commutes)?;
        Ok(())
    }
}
