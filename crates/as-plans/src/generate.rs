//! Home → work → home plans from simulated trip times.
//!
//! For each commuter the two timed activities are
//!
//! | Activity | Location        | End time                         |
//! |----------|-----------------|----------------------------------|
//! | Home     | home parcel x/y | departure from home              |
//! | Work     | job parcel x/y  | departure + dwell, wrapped at 24 |
//!
//! They are ordered by end time (Home first on a tie), placed at indices 1
//! and 3, and a copy of the first with no end time closes the day at index
//! 5.  Legs sit at 2 and 4.  A work end that wraps past midnight therefore
//! starts the plan at work.

use as_core::{GeoPoint, PersonId};

use crate::plan::{ActivityType, Plan, PlanElement};
use crate::PlanResult;

/// Everything plan generation needs about one commuter.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CommuteTimes {
    pub person_id: PersonId,
    pub home:      GeoPoint,
    pub work:      GeoPoint,
    /// Departure from home, hours after midnight.
    pub departure: f64,
    /// Departure from work, hours after midnight.
    pub work_end:  f64,
}

pub fn generate_plan(c: &CommuteTimes) -> PlanResult<Plan> {
    let home = (ActivityType::Home, c.home, c.departure);
    let work = (ActivityType::Work, c.work, c.work_end);
    let (first, second) = if c.work_end < c.departure { (work, home) } else { (home, work) };

    let activity = |(activity_type, location, end): (ActivityType, GeoPoint, f64), timed: bool| {
        PlanElement::Activity { activity_type, location, end_time: timed.then_some(end) }
    };
    Plan::new(
        c.person_id,
        vec![
            activity(first, true),
            PlanElement::Leg,
            activity(second, true),
            PlanElement::Leg,
            activity(first, false),
        ],
    )
}

/// Plans for every commuter, ordered by person id.
pub fn generate_plans<'a, I>(commutes: I) -> PlanResult<Vec<Plan>>
where
    I: IntoIterator<Item = &'a CommuteTimes>,
{
    let mut plans = commutes.into_iter().map(generate_plan).collect::<PlanResult<Vec<_>>>()?;
    plans.sort_by_key(|p| p.person_id);
    log::info!("generated {} activity plans", plans.len());
    Ok(plans)
}
