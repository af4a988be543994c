//! CSV plan loader.
//!
//! Reads the same layout the CSV writer produces:
//!
//! ```csv
//! personId,planElement,planElementIndex,activityType,x,y,endTime
//! 7,activity,1,Home,-122.27,37.80,7.5
//! 7,leg,2,,,,
//! 7,activity,3,Work,-122.40,37.79,16.25
//! 7,leg,4,,,,
//! 7,activity,5,Home,-122.27,37.80,
//! ```
//!
//! Rows may come in any order; each person's rows are sorted by
//! `planElementIndex`, which must then run 1, 2, 3, … without gaps.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use as_core::{GeoPoint, PersonId};

use crate::plan::{ActivityType, Plan, PlanElement};
use crate::{PlanError, PlanResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlanRecord {
    #[serde(rename = "personId")]
    person_id:     u64,
    #[serde(rename = "planElement")]
    element:       String,
    #[serde(rename = "planElementIndex")]
    index:         u32,
    #[serde(rename = "activityType", default)]
    activity_type: Option<String>,
    #[serde(default)]
    x:             Option<f64>,
    #[serde(default)]
    y:             Option<f64>,
    #[serde(rename = "endTime", default)]
    end_time:      Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_plans_csv(path: &Path) -> PlanResult<Vec<Plan>> {
    let file = std::fs::File::open(path)?;
    load_plans_reader(file)
}

/// Like [`load_plans_csv`] but accepts any `Read` source.  Plans come back
/// ordered by person id.
pub fn load_plans_reader<R: Read>(reader: R) -> PlanResult<Vec<Plan>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_person: BTreeMap<u64, Vec<PlanRecord>> = BTreeMap::new();

    for result in csv_reader.deserialize::<PlanRecord>() {
        let row = result.map_err(|e| PlanError::Parse(e.to_string()))?;
        by_person.entry(row.person_id).or_default().push(row);
    }

    by_person
        .into_iter()
        .map(|(person, mut rows)| {
            rows.sort_by_key(|r| r.index);
            let person_id = PersonId(person);
            let elements = rows
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    if r.index as usize != i + 1 {
                        return Err(PlanError::Invalid {
                            person: person_id,
                            reason: format!("planElementIndex {} where {} was expected", r.index, i + 1),
                        });
                    }
                    parse_element(r)
                })
                .collect::<PlanResult<Vec<_>>>()?;
            Plan::new(person_id, elements)
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_element(r: &PlanRecord) -> PlanResult<PlanElement> {
    match r.element.trim() {
        "leg" => Ok(PlanElement::Leg),
        "activity" => {
            let activity_type = ActivityType::parse(r.activity_type.as_deref().unwrap_or(""))?;
            let (Some(x), Some(y)) = (r.x, r.y) else {
                return Err(PlanError::Parse(format!(
                    "person {} element {}: activity without coordinates",
                    r.person_id, r.index
                )));
            };
            Ok(PlanElement::Activity { activity_type, location: GeoPoint::new(x, y), end_time: r.end_time })
        }
        other => Err(PlanError::Parse(format!(
            "invalid planElement {other:?}: expected \"activity\" or \"leg\""
        ))),
    }
}
