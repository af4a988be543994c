//! Post-processing of nearest-POI tables into choice sets.

use as_core::{NodeId, PoiId};

use crate::poi::NearestPoiTable;

/// One alternative in a subject's choice set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChoiceSetRow {
    pub subject:  u64,
    /// 1-based rank by network distance.
    pub rank:     usize,
    pub poi:      PoiId,
    pub distance: f64,
}

/// Flatten each subject's home-node row into ranked alternatives, dropping
/// padded ranks.
pub fn flatten_choice_sets(table: &NearestPoiTable, subjects: &[(u64, NodeId)]) -> Vec<ChoiceSetRow> {
    let mut out = Vec::new();
    for &(subject, node) in subjects {
        let ids = table.poi_ids(node);
        let dists = table.distances(node);
        for (rank, (id, &distance)) in ids.iter().zip(dists).enumerate() {
            if let Some(poi) = *id {
                out.push(ChoiceSetRow { subject, rank: rank + 1, poi, distance });
            }
        }
    }
    out
}

/// Running mean of the first k ranked distances for k = 1..=len.
///
/// Padded ranks count at the query cap, so sparse neighbourhoods read as
/// far away rather than close.
pub fn rolling_mean_distances(distances: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    distances
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            sum += d;
            sum / (i + 1) as f64
        })
        .collect()
}

/// Fraction of `(node, observed)` pairs whose observed facility appears in
/// the node's nearest-POI row.  Returns 0 for an empty slice.
pub fn coverage(table: &NearestPoiTable, observations: &[(NodeId, PoiId)]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }
    let hits = observations
        .iter()
        .filter(|&&(node, poi)| table.poi_ids(node).contains(&Some(poi)))
        .count();
    hits as f64 / observations.len() as f64
}
