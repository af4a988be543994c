//! `school_choice_simulate`: school of every student aged 5 to 18.
//!
//! Public and private schools are registered as POIs on the drive network.
//! A student's choice set is the nearest schools of each kind from the home
//! node, less those that teach no grade for the student's age.  Each
//! alternative carries the school's fields, its network `distance` and
//! `rank`, a `public` flag, and the skim terms from the home zone to the
//! school zone.  The chooser carries household income bands and the mean
//! distance to the k nearest schools of each kind.

use rustc_hash::FxHashMap;

use as_choice::{Observation, school_available};
use as_core::{ChooserRng, NodeId, PersonId, PoiId, SchoolId, ZoneId};
use as_network::{
    Accessibility, ChoiceSetRow, NearestPoiTable, coverage, flatten_choice_sets, rolling_mean_distances,
};
use as_population::{Population, SchoolType};

use crate::context::{columns, tables};
use crate::stages::network::NetworkKind;
use crate::stages::vars::{add_row, add_skim_terms, parcel_node};
use crate::{DataContext, PipelineResult, Stage};

pub const MODEL: &str = "school_choice";

/// Person column holding a surveyed school, used only to report choice set
/// coverage.
pub const OBSERVED_SCHOOL: &str = "observed_school_id";

const STUDENT_AGES: std::ops::RangeInclusive<u32> = 5..=18;

struct Student {
    person_id: PersonId,
    pos:       usize,
    age:       u32,
    home_zone: ZoneId,
    node:      NodeId,
    income:    f64,
}

/// The nearest-school table of one school type.
struct Catchment {
    kind:  SchoolType,
    table: NearestPoiTable,
}

pub struct SchoolChoice;

impl Stage for SchoolChoice {
    fn name(&self) -> &'static str {
        "school_choice_simulate"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[
            tables::PERSONS,
            tables::HOUSEHOLDS,
            tables::PARCELS,
            tables::SCHOOLS,
            tables::NET_SMALL,
            tables::SKIMS,
        ]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::PERSON_SCHOOL]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let catchments = register_schools(ctx)?;
        let students = students(ctx)?;

        let model = ctx.models.get(MODEL)?;
        let skims = ctx.skims()?;
        let mode = ctx.config.skims.location_mode.as_str();
        let ranks = &ctx.config.school_choice.rolling_ranks;
        let pop = &ctx.population;
        let seed = ctx.stage_seed;

        // Choice set rows per person, both school types.
        let subjects: Vec<(u64, NodeId)> = students.iter().map(|s| (s.person_id.0, s.node)).collect();
        let mut choice_sets: FxHashMap<u64, Vec<(SchoolType, ChoiceSetRow)>> = FxHashMap::default();
        for c in &catchments {
            for row in flatten_choice_sets(&c.table, &subjects) {
                choice_sets.entry(row.subject).or_default().push((c.kind, row));
            }
        }

        let mut school_ids = vec![f64::NAN; pop.persons.len()];
        let mut empty = 0usize;
        for s in &students {
            let rows = choice_sets.get(&s.person_id.0).map(Vec::as_slice).unwrap_or_default();
            let mut offered = Vec::with_capacity(rows.len());
            let mut alternatives = Vec::with_capacity(rows.len());
            for &(kind, row) in rows {
                let Some(school_pos) = pop.schools.position(row.poi.0) else { continue };
                let school = &pop.schools.rows()[school_pos];
                if !school_available(s.age, &school.grades) {
                    continue;
                }
                let Some(school_zone) = pop.school_zone(school.school_id) else { continue };
                let mut alt = Observation::new();
                if !add_skim_terms(&mut alt, skims, mode, s.home_zone, school_zone) {
                    continue;
                }
                add_row(&mut alt, &pop.schools, school_pos);
                alt.set("distance", row.distance);
                alt.set("rank", row.rank as f64);
                alt.set("public", if kind == SchoolType::Public { 1.0 } else { 0.0 });
                offered.push(school.school_id);
                alternatives.push(alt);
            }
            if alternatives.is_empty() {
                empty += 1;
                continue;
            }

            let chooser = student_vars(pop, s, &catchments, ranks);
            let mut rng = ChooserRng::new(seed, s.person_id.0);
            let k = model.simulate(&chooser, &alternatives, &mut rng)?;
            school_ids[s.pos] = f64::from(offered[k].0);
        }

        if empty > 0 {
            log::warn!("school choice: {empty} students have no available school nearby");
        }
        log::info!("school choice: {} of {} students placed", students.len() - empty, students.len());
        report_coverage(pop, &students, &catchments);

        ctx.population.persons.set_column(columns::SCHOOL, &school_ids)?;
        Ok(())
    }
}

/// Register both school types as POIs on the drive network and query the
/// configured number of nearest schools of each.
fn register_schools(ctx: &mut DataContext) -> PipelineResult<Vec<Catchment>> {
    let cfg = ctx.config.school_choice.clone();
    let limits = [
        (SchoolType::Public, cfg.public_distance, cfg.public_count),
        (SchoolType::Private, cfg.private_distance, cfg.private_count),
    ];
    let pois: Vec<Vec<(PoiId, _)>> = limits
        .iter()
        .map(|&(kind, _, _)| {
            ctx.population
                .schools
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| (school_poi(s.school_id), s.position()))
                .collect()
        })
        .collect();

    let net = ctx.network_mut(NetworkKind::Small.net_table())?;
    let mut out = Vec::with_capacity(limits.len());
    for ((kind, distance, count), pois) in limits.into_iter().zip(pois) {
        net.set_pois(kind.category(), distance, count, &pois)?;
        let table = net.nearest_pois(distance, kind.category(), count)?;
        out.push(Catchment { kind, table });
    }
    Ok(out)
}

fn school_poi(id: SchoolId) -> PoiId {
    PoiId(u64::from(id.0))
}

/// Students with a home node on the drive network.  Students whose home
/// parcel or node cannot be resolved are counted and skipped.
fn students(ctx: &DataContext) -> PipelineResult<Vec<Student>> {
    let pop = &ctx.population;
    let network = ctx.network(NetworkKind::Small.net_table())?.network();
    let mut out = Vec::new();
    let mut homeless = 0usize;
    let mut unplaced = 0usize;
    for (pos, p) in pop.persons.iter().enumerate() {
        if !p.is_student() || !STUDENT_AGES.contains(&p.age) {
            continue;
        }
        let parcel = match pop.household_parcel(p.household_id) {
            Ok(parcel) => parcel,
            Err(e) => {
                log::debug!("school choice: person {}: {e}", p.person_id);
                homeless += 1;
                continue;
            }
        };
        let Some(node) = parcel_node(ctx, NetworkKind::Small, parcel).and_then(|ext| network.node_by_external(ext))
        else {
            unplaced += 1;
            continue;
        };
        let income = pop.households.get(p.household_id.0).map_or(f64::NAN, |h| h.income);
        out.push(Student { person_id: p.person_id, pos, age: p.age, home_zone: parcel.zone_id, node, income });
    }
    if homeless > 0 {
        log::warn!("school choice: {homeless} students have no home parcel");
    }
    if unplaced > 0 {
        log::warn!("school choice: {unplaced} students have no home node on the drive network");
    }
    Ok(out)
}

/// Household income bands and mean distance to the k nearest schools.
fn student_vars(pop: &Population, s: &Student, catchments: &[Catchment], ranks: &[usize]) -> Observation {
    let mut obs = Observation::new();
    if let Some(pos) = pop.persons.position(s.person_id.0) {
        add_row(&mut obs, &pop.persons, pos);
    }
    let band = |lo: f64, hi: f64| if s.income >= lo && s.income < hi { 1.0 } else { 0.0 };
    obs.set("hh_inc_under_25k", if s.income < 25_000.0 { 1.0 } else { 0.0 });
    obs.set("hh_inc_25_to_75k", band(25_000.0, 75_000.0));
    obs.set("hh_inc_75_to_200k", band(75_000.0, 200_000.0));

    for c in catchments {
        let means = rolling_mean_distances(c.table.distances(s.node));
        for &k in ranks {
            if let Some(&m) = means.get(k - 1) {
                obs.set(format!("{}_mean_dist_{k}", c.kind.category()), m);
            }
        }
    }
    obs
}

fn report_coverage(pop: &Population, students: &[Student], catchments: &[Catchment]) {
    if !pop.persons.has_var(OBSERVED_SCHOOL) {
        return;
    }
    for c in catchments {
        let observed: Vec<(NodeId, PoiId)> = students
            .iter()
            .filter_map(|s| {
                let v = pop.persons.var_at(s.pos, OBSERVED_SCHOOL).filter(|v| v.is_finite())?;
                let school = pop.schools.get(v as u64)?;
                (school.kind == c.kind).then(|| (s.node, school_poi(school.school_id)))
            })
            .collect();
        log::info!(
            "school choice: {:.1}% of {} observed {} schools fall in the choice set",
            100.0 * coverage(&c.table, &observed),
            observed.len(),
            c.kind.category()
        );
    }
}
