//! `auto_ownership_simulate`: number of cars per household (0, 1, 2, 3+).

use as_core::ChooserRng;

use crate::context::{columns, tables};
use crate::stages::vars::{add_parcel_node_vars, household_vars, require_alternatives};
use crate::{DataContext, PipelineResult, Stage};

pub const MODEL: &str = "auto_ownership";

/// Alternatives 0, 1, 2 and 3-or-more cars.
pub const CAR_ALTERNATIVES: usize = 4;

pub struct AutoOwnership;

impl Stage for AutoOwnership {
    fn name(&self) -> &'static str {
        "auto_ownership_simulate"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[
            tables::HOUSEHOLDS,
            tables::UNITS,
            tables::BUILDINGS,
            tables::PARCELS,
            tables::NODES_SMALL,
            tables::NODES_WALK,
        ]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::HOUSEHOLD_CARS]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let model = ctx.models.get(MODEL)?;
        require_alternatives(model, CAR_ALTERNATIVES)?;
        let pop = &ctx.population;
        let seed = ctx.stage_seed;

        let mut cars = vec![f64::NAN; pop.households.len()];
        let mut counts = [0usize; CAR_ALTERNATIVES];
        for (pos, hh) in pop.households.iter().enumerate() {
            let mut chooser = household_vars(pop, hh.household_id)?;
            add_parcel_node_vars(&mut chooser, ctx, pop.household_parcel(hh.household_id)?);
            let mut rng = ChooserRng::new(seed, hh.household_id.0);
            let k = model.simulate(&chooser, &[], &mut rng)?;
            cars[pos] = k as f64;
            counts[k] += 1;
        }
        log::info!("auto ownership: households by cars (0, 1, 2, 3+) = {counts:?}");

        ctx.population.households.set_column(columns::CARS, &cars)?;
        Ok(())
    }
}
