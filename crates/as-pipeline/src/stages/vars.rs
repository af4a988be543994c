//! Assembling chooser and alternative variables from the population tables.
//!
//! Models reference variables by column name.  A record contributes its
//! typed numeric fields and every extra column of its table; NaN and unset
//! values are left out so the model's missing-variable policy applies.

use as_choice::{DiscreteChoice, Observation};
use as_core::{GeoPoint, HouseholdId, ZoneId};
use as_network::NodeTable;
use as_population::{
    Household, Parcel, Population, PopulationError, PopulationResult, Record, Table, income_dummies,
    income_dummy_columns,
};
use as_skims::{Impedance, ImputedSkims};

use crate::{DataContext, PipelineError, PipelineResult};
use crate::stages::network::NetworkKind;

/// Copy every variable of the row at `pos` into `obs`.
pub(crate) fn add_row<T: Record>(obs: &mut Observation, table: &Table<T>, pos: usize) {
    let names = T::COLUMNS.iter().copied().chain(table.extra_columns().iter().map(String::as_str));
    for name in names {
        if let Some(v) = table.var_at(pos, name).filter(|v| !v.is_nan()) {
            obs.set(name, v);
        }
    }
}

/// Copy every column of `nodes` at external node `node`, reading missing
/// values as 0.
pub(crate) fn add_node_vars(obs: &mut Observation, nodes: &NodeTable, node: Option<i64>) {
    for name in nodes.columns() {
        let v = node.and_then(|n| nodes.value(name, n)).filter(|v| v.is_finite()).unwrap_or(0.0);
        obs.set(name.as_str(), v);
    }
}

/// External node id of `parcel` on the `kind` network: the parcel's own
/// column when set, else the node nearest its centroid.
pub(crate) fn parcel_node(ctx: &DataContext, kind: NetworkKind, parcel: &Parcel) -> Option<i64> {
    kind.parcel_node(parcel).or_else(|| {
        let net = ctx.networks.get(kind.net_table())?.network();
        net.snap_to_node(parcel.position()).map(|n| net.external_id(n))
    })
}

/// Node variables of both networks at `parcel`, for whichever node tables
/// are loaded.
pub(crate) fn add_parcel_node_vars(obs: &mut Observation, ctx: &DataContext, parcel: &Parcel) {
    for kind in [NetworkKind::Small, NetworkKind::Walk] {
        if let Some(nodes) = ctx.node_tables.get(kind.nodes_table()) {
            add_node_vars(obs, nodes, parcel_node(ctx, kind, parcel));
        }
    }
}

/// Household fields, income dummies, and the variables of the household's
/// building and parcel.
pub(crate) fn household_vars(pop: &Population, id: HouseholdId) -> PopulationResult<Observation> {
    let mut obs = Observation::new();
    let pos = pop
        .households
        .position(id.0)
        .ok_or(PopulationError::NotFound { table: Household::TABLE, id: id.0 })?;
    add_row(&mut obs, &pop.households, pos);
    let income = pop.households.rows()[pos].income;
    obs.extend(income_dummy_columns().zip(income_dummies(income)));

    let building = pop.household_building(id)?;
    if let Some(b) = pop.buildings.position(building.0) {
        add_row(&mut obs, &pop.buildings, b);
    }
    let parcel = pop.household_parcel(id)?;
    if let Some(p) = pop.parcels.position(parcel.primary_id.0) {
        add_row(&mut obs, &pop.parcels, p);
    }
    Ok(obs)
}

/// Home coordinates of a household.
pub(crate) fn household_position(pop: &Population, id: HouseholdId) -> PopulationResult<GeoPoint> {
    Ok(pop.household_parcel(id)?.position())
}

/// Skim terms of one origin-destination pair for location choice: `dist`
/// (metres) plus `tt` (minutes) and `cost` of `mode` when filled.
///
/// Returns `false`, leaving `obs` untouched, when the pair is not in the
/// skims.
pub(crate) fn add_skim_terms(
    obs: &mut Observation,
    skims: &ImputedSkims,
    mode: &str,
    orig: ZoneId,
    dest: ZoneId,
) -> bool {
    let Some(dist) = skims.distance(orig, dest) else { return false };
    obs.set("dist", dist);
    if let Some(tt) = skims.get(orig, dest, mode, Impedance::Time) {
        obs.set("tt", tt);
    }
    if let Some(cost) = skims.get(orig, dest, mode, Impedance::Cost) {
        obs.set("cost", cost);
    }
    true
}

/// Variables of a commuter: person, household, and job fields.  `None`
/// when the person at `pos` has no job.
pub(crate) fn commuter_vars(pop: &Population, pos: usize) -> PopulationResult<Option<Observation>> {
    let person = &pop.persons.rows()[pos];
    let Some(job_pos) = person.job_id.filter(|j| j.is_valid()).and_then(|j| pop.jobs.position(j.0)) else {
        return Ok(None);
    };
    let mut obs = household_vars(pop, person.household_id)?;
    add_row(&mut obs, &pop.jobs, job_pos);
    add_row(&mut obs, &pop.persons, pos);
    Ok(Some(obs))
}

/// Fail unless `model` has exactly `expected` built-in alternatives.
pub(crate) fn require_alternatives(model: &dyn DiscreteChoice, expected: usize) -> PipelineResult<()> {
    match model.alternative_count() {
        Some(n) if n == expected => Ok(()),
        got => Err(PipelineError::ModelShape {
            model: model.name().to_string(),
            expected,
            got: got.unwrap_or(0),
        }),
    }
}
