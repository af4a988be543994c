//! Plan types: `ActivityType`, `PlanElement`, `Plan`, and the flat
//! `PlanRow` written to output.
//!
//! # Shape
//!
//! A plan alternates activities and legs, starting and ending with an
//! activity:
//!
//! ```text
//! index:  1         2    3         4    5
//!         activity  leg  activity  leg  activity
//! ```
//!
//! `planElementIndex` is the 1-based position in that sequence.  Every
//! activity but the last carries an end time (fractional hours), and end
//! times never decrease along the plan.

use std::fmt;

use as_core::{GeoPoint, PersonId};

use crate::{PlanError, PlanResult};

// ── ActivityType ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ActivityType {
    Home,
    Work,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Home => "Home",
            ActivityType::Work => "Work",
        }
    }

    pub fn parse(s: &str) -> PlanResult<Self> {
        match s.trim() {
            "Home" => Ok(ActivityType::Home),
            "Work" => Ok(ActivityType::Work),
            other => Err(PlanError::Parse(format!("unknown activity type {other:?}"))),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PlanElement ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PlanElement {
    Activity {
        activity_type: ActivityType,
        location:      GeoPoint,
        /// `None` for the last activity of the day.
        end_time:      Option<f64>,
    },
    Leg,
}

impl PlanElement {
    pub fn kind(&self) -> &'static str {
        match self {
            PlanElement::Activity { .. } => "activity",
            PlanElement::Leg => "leg",
        }
    }

    pub fn is_activity(&self) -> bool {
        matches!(self, PlanElement::Activity { .. })
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub person_id: PersonId,
    elements:      Vec<PlanElement>,
}

impl Plan {
    /// Build a plan, rejecting one that breaks the shape described in the
    /// module docs.
    pub fn new(person_id: PersonId, elements: Vec<PlanElement>) -> PlanResult<Self> {
        let plan = Self { person_id, elements };
        plan.validate()?;
        Ok(plan)
    }

    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Activities in plan order.
    pub fn activities(&self) -> impl Iterator<Item = &PlanElement> + '_ {
        self.elements.iter().filter(|e| e.is_activity())
    }

    pub fn validate(&self) -> PlanResult<()> {
        let invalid = |reason: String| -> PlanResult<()> {
            Err(PlanError::Invalid { person: self.person_id, reason })
        };

        if self.elements.len() % 2 == 0 {
            return invalid(format!("{} elements; a plan has an odd count", self.elements.len()));
        }
        for (i, e) in self.elements.iter().enumerate() {
            if e.is_activity() != (i % 2 == 0) {
                return invalid(format!("element {} should be {}", i + 1, if i % 2 == 0 { "an activity" } else { "a leg" }));
            }
        }

        let mut last = f64::NEG_INFINITY;
        let n = self.elements.len();
        for (i, e) in self.elements.iter().enumerate() {
            let PlanElement::Activity { end_time, .. } = e else { continue };
            match end_time {
                Some(t) if !t.is_finite() => return invalid(format!("element {} has end time {t}", i + 1)),
                Some(t) if *t < last => {
                    return invalid(format!("element {} ends at {t}, before {last}", i + 1));
                }
                Some(t) => last = *t,
                None if i + 1 != n => return invalid(format!("element {} has no end time", i + 1)),
                None => {}
            }
        }
        Ok(())
    }

    /// Flat output rows, one per element.
    pub fn rows(&self) -> impl Iterator<Item = PlanRow> + '_ {
        self.elements.iter().enumerate().map(move |(i, e)| {
            let index = (i + 1) as u32;
            match *e {
                PlanElement::Activity { activity_type, location, end_time } => PlanRow {
                    person_id:     self.person_id,
                    element:       e.kind(),
                    index,
                    activity_type: Some(activity_type),
                    x:             Some(location.x),
                    y:             Some(location.y),
                    end_time,
                },
                PlanElement::Leg => PlanRow {
                    person_id:     self.person_id,
                    element:       e.kind(),
                    index,
                    activity_type: None,
                    x:             None,
                    y:             None,
                    end_time:      None,
                },
            }
        })
    }
}

// ── PlanRow ───────────────────────────────────────────────────────────────────

/// Output column names, in order.
pub const PLAN_COLUMNS: [&str; 7] =
    ["personId", "planElement", "planElementIndex", "activityType", "x", "y", "endTime"];

/// One output row.  Legs leave the activity columns empty.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PlanRow {
    pub person_id:     PersonId,
    /// `"activity"` or `"leg"`.
    pub element:       &'static str,
    pub index:         u32,
    pub activity_type: Option<ActivityType>,
    pub x:             Option<f64>,
    pub y:             Option<f64>,
    pub end_time:      Option<f64>,
}
