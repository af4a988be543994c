//! Network accessibility queries.
//!
//! [`AccessibilityNetwork`] wraps a [`Network`] with the state accessibility
//! queries need: the precompute horizon, named node variables, and POI
//! categories.  Pipeline stages talk to it through the [`Accessibility`]
//! trait so tests can substitute a fixed-answer implementation.

use rustc_hash::FxHashMap;

use as_core::{GeoPoint, NodeId, PoiId};

use crate::aggregate::{Aggregation, AggregationSet, AggregationSpec, Decay, NodeTable};
use crate::network::Network;
use crate::poi::{NearestPoiTable, PoiSet};
use crate::search::ShortestPathSearch;
use crate::{NetworkError, NetworkResult};

// ── Accessibility trait ───────────────────────────────────────────────────────

pub trait Accessibility: Send + Sync {
    fn node_count(&self) -> usize;

    /// Snap points to their nearest network node.
    fn get_node_ids(&self, points: &[GeoPoint]) -> NetworkResult<Vec<NodeId>>;

    /// Register (or replace) a POI category.
    ///
    /// Later [`nearest_pois`](Self::nearest_pois) queries on `category` may
    /// not exceed `max_distance` or `max_items`.
    fn set_pois(
        &mut self,
        category: &str,
        max_distance: f64,
        max_items: usize,
        pois: &[(PoiId, GeoPoint)],
    ) -> NetworkResult<()>;

    /// For every node, the `num_pois` nearest facilities of `category`
    /// within `distance`.
    fn nearest_pois(&self, distance: f64, category: &str, num_pois: usize)
        -> NetworkResult<NearestPoiTable>;

    /// Attach values to nodes under `name`.  Several values may share a node.
    fn set_variable(&mut self, name: &str, nodes: &[NodeId], values: &[f64]) -> NetworkResult<()>;

    /// Aggregate variable `name` within `radius` of every node.
    fn aggregate(&self, radius: f64, name: &str, aggregation: Aggregation, decay: Decay)
        -> NetworkResult<Vec<f64>>;
}

// ── AccessibilityNetwork ──────────────────────────────────────────────────────

pub struct AccessibilityNetwork {
    network:   Network,
    horizon:   f64,
    variables: FxHashMap<String, FxHashMap<NodeId, Vec<f64>>>,
    pois:      FxHashMap<String, PoiSet>,
}

impl AccessibilityNetwork {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            horizon:   f64::INFINITY,
            variables: FxHashMap::default(),
            pois:      FxHashMap::default(),
        }
    }

    /// Fix the largest aggregation radius this network will answer.
    ///
    /// Searches are bounded per query, so this only records the limit;
    /// `aggregate` calls beyond it fail with [`NetworkError::BeyondLimit`].
    pub fn precompute(&mut self, horizon: f64) {
        log::debug!("network horizon set to {horizon}");
        self.horizon = horizon;
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn poi_set(&self, category: &str) -> Option<&PoiSet> {
        self.pois.get(category)
    }

    /// Aggregate every variable of `set` and derive its ratios.
    ///
    /// `resolve` returns the `(node, value)` samples for one spec; it is how
    /// callers connect `source`/`column` to their own tables.  Missing
    /// aggregates (empty neighbourhoods) become 0.
    pub fn aggregate_set<F>(&mut self, set: &AggregationSet, mut resolve: F) -> NetworkResult<NodeTable>
    where
        F: FnMut(&AggregationSpec) -> NetworkResult<(Vec<NodeId>, Vec<f64>)>,
    {
        let ids = self.network.node_ext_id.clone();
        let mut table = NodeTable::new(ids);
        for spec in &set.variables {
            let (nodes, mut values) = resolve(spec)?;
            if spec.indicator {
                for v in &mut values {
                    *v = if *v > 0.0 { 1.0 } else { 0.0 };
                }
            }
            self.set_variable(&spec.name, &nodes, &values)?;
            let mut col = self.aggregate(spec.radius, &spec.name, spec.aggregation, spec.decay)?;
            for v in &mut col {
                if !v.is_finite() {
                    *v = 0.0;
                }
                if let Some(t) = spec.apply {
                    *v = t.apply(*v);
                }
            }
            log::info!("aggregated {} over {} samples", spec.name, values.len());
            table.add_column(spec.name.clone(), col)?;
        }
        for ratio in &set.ratios {
            table.add_ratio(ratio)?;
        }
        Ok(table)
    }

    fn per_node<T, F>(&self, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&mut ShortestPathSearch, NodeId) -> T + Send + Sync,
    {
        let n = self.network.node_count();
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map_init(
                    || ShortestPathSearch::new(&self.network),
                    |search, i| f(search, NodeId(i as u32)),
                )
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            let mut search = ShortestPathSearch::new(&self.network);
            (0..n).map(|i| f(&mut search, NodeId(i as u32))).collect()
        }
    }
}

impl Accessibility for AccessibilityNetwork {
    fn node_count(&self) -> usize {
        self.network.node_count()
    }

    fn get_node_ids(&self, points: &[GeoPoint]) -> NetworkResult<Vec<NodeId>> {
        self.network.get_node_ids(points)
    }

    fn set_pois(
        &mut self,
        category: &str,
        max_distance: f64,
        max_items: usize,
        pois: &[(PoiId, GeoPoint)],
    ) -> NetworkResult<()> {
        let mut set = PoiSet::new(category, max_distance, max_items);
        for &(id, pos) in pois {
            if let Some(node) = self.network.snap_to_node(pos) {
                set.insert(node, id);
            }
        }
        log::info!("registered {} POIs in category {category:?}", set.len());
        self.pois.insert(category.to_string(), set);
        Ok(())
    }

    fn nearest_pois(&self, distance: f64, category: &str, num_pois: usize)
        -> NetworkResult<NearestPoiTable>
    {
        let set = self
            .pois
            .get(category)
            .ok_or_else(|| NetworkError::UnknownCategory(category.to_string()))?;
        set.check_query(distance, num_pois)?;
        let rows = self.per_node(|search, node| {
            set.nearest_from(&self.network, search, node, distance, num_pois)
        });
        Ok(NearestPoiTable::from_rows(num_pois, distance, rows))
    }

    fn set_variable(&mut self, name: &str, nodes: &[NodeId], values: &[f64]) -> NetworkResult<()> {
        if nodes.len() != values.len() {
            return Err(NetworkError::LengthMismatch {
                what:     format!("variable {name:?}"),
                expected: nodes.len(),
                got:      values.len(),
            });
        }
        let mut by_node: FxHashMap<NodeId, Vec<f64>> = FxHashMap::default();
        for (&n, &v) in nodes.iter().zip(values) {
            if v.is_nan() {
                continue;
            }
            by_node.entry(n).or_default().push(v);
        }
        self.variables.insert(name.to_string(), by_node);
        Ok(())
    }

    fn aggregate(&self, radius: f64, name: &str, aggregation: Aggregation, decay: Decay)
        -> NetworkResult<Vec<f64>>
    {
        if radius > self.horizon {
            return Err(NetworkError::BeyondLimit {
                what:      "network horizon".into(),
                requested: radius,
                limit:     self.horizon,
            });
        }
        let by_node = self
            .variables
            .get(name)
            .ok_or_else(|| NetworkError::UnknownVariable(name.to_string()))?;

        Ok(self.per_node(|search, node| {
            let mut samples = Vec::new();
            search.run(&self.network, node, radius, |n, cost| {
                if let Some(vs) = by_node.get(&n) {
                    samples.extend(vs.iter().map(|&v| (cost, v)));
                }
                crate::search::Visit::Continue
            });
            aggregation.reduce(&samples, decay, radius)
        }))
    }
}
