//! Points of interest and nearest-facility queries.

use rustc_hash::FxHashMap;

use as_core::{NodeId, PoiId};

use crate::network::Network;
use crate::search::{ShortestPathSearch, Visit};
use crate::{NetworkError, NetworkResult};

// ── PoiSet ────────────────────────────────────────────────────────────────────

/// One registered POI category: facilities snapped to nodes, plus the
/// largest query it was registered for.
#[derive(Debug, Clone)]
pub struct PoiSet {
    pub category:     String,
    pub max_distance: f64,
    pub max_items:    usize,
    /// Facilities at each node, in registration order.
    by_node: FxHashMap<NodeId, Vec<PoiId>>,
    count:   usize,
}

impl PoiSet {
    pub fn new(category: impl Into<String>, max_distance: f64, max_items: usize) -> Self {
        Self {
            category: category.into(),
            max_distance,
            max_items,
            by_node: FxHashMap::default(),
            count: 0,
        }
    }

    pub fn insert(&mut self, node: NodeId, poi: PoiId) {
        self.by_node.entry(node).or_default().push(poi);
        self.count += 1;
    }

    pub fn at(&self, node: NodeId) -> &[PoiId] {
        self.by_node.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check that a query fits the limits this category was registered with.
    pub fn check_query(&self, distance: f64, num_pois: usize) -> NetworkResult<()> {
        if distance > self.max_distance {
            return Err(NetworkError::BeyondLimit {
                what:      format!("POI category {:?}", self.category),
                requested: distance,
                limit:     self.max_distance,
            });
        }
        if num_pois > self.max_items {
            return Err(NetworkError::TooManyPois {
                category:  self.category.clone(),
                requested: num_pois,
                max_items: self.max_items,
            });
        }
        Ok(())
    }

    /// The `num_pois` nearest facilities from `source` within `distance`,
    /// nearest first.
    pub fn nearest_from(
        &self,
        network: &Network,
        search: &mut ShortestPathSearch,
        source: NodeId,
        distance: f64,
        num_pois: usize,
    ) -> Vec<(f64, PoiId)> {
        let mut found = Vec::with_capacity(num_pois);
        if num_pois == 0 {
            return found;
        }
        search.run(network, source, distance, |node, cost| {
            for &poi in self.at(node) {
                found.push((cost, poi));
                if found.len() == num_pois {
                    return Visit::Stop;
                }
            }
            Visit::Continue
        });
        found
    }
}

// ── NearestPoiTable ───────────────────────────────────────────────────────────

/// Result of a nearest-POI sweep: one row per network node with `num_pois`
/// ranked distances and facility ids.
///
/// Ranks with no facility in range carry `distance` (the query cap) and
/// `None` for the id.
#[derive(Debug, Clone)]
pub struct NearestPoiTable {
    pub num_pois: usize,
    pub distance: f64,
    distances: Vec<f64>,
    poi_ids:   Vec<Option<PoiId>>,
}

impl NearestPoiTable {
    pub(crate) fn from_rows(num_pois: usize, distance: f64, rows: Vec<Vec<(f64, PoiId)>>) -> Self {
        let mut distances = Vec::with_capacity(rows.len() * num_pois);
        let mut poi_ids = Vec::with_capacity(rows.len() * num_pois);
        for row in rows {
            let found = row.len();
            for (d, id) in row {
                distances.push(d);
                poi_ids.push(Some(id));
            }
            for _ in found..num_pois {
                distances.push(distance);
                poi_ids.push(None);
            }
        }
        Self { num_pois, distance, distances, poi_ids }
    }

    pub fn node_count(&self) -> usize {
        if self.num_pois == 0 { 0 } else { self.distances.len() / self.num_pois }
    }

    /// Ranked distances from `node` (length `num_pois`).
    pub fn distances(&self, node: NodeId) -> &[f64] {
        let start = node.index() * self.num_pois;
        &self.distances[start..start + self.num_pois]
    }

    /// Ranked facility ids from `node` (length `num_pois`).
    pub fn poi_ids(&self, node: NodeId) -> &[Option<PoiId>] {
        let start = node.index() * self.num_pois;
        &self.poi_ids[start..start + self.num_pois]
    }
}
