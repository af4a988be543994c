//! Bounded Dijkstra search over the CSR network.
//!
//! Every accessibility query in this crate is a one-to-many search that stops
//! at an impedance horizon: range aggregation visits every node within the
//! radius, nearest-POI queries stop once enough facilities are found.  Both
//! drive [`ShortestPathSearch::run`] with a visitor closure.
//!
//! The search keeps its distance array between runs and only resets the
//! entries it touched, so one instance per worker thread is enough for a
//! whole sweep over the network.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use as_core::NodeId;

use crate::network::Network;

// ── Heap key ──────────────────────────────────────────────────────────────────

/// Total order over non-negative finite costs for the binary heap.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── Visitor control ───────────────────────────────────────────────────────────

/// Returned by the visitor to continue or end a search early.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Visit {
    Continue,
    Stop,
}

// ── ShortestPathSearch ────────────────────────────────────────────────────────

pub struct ShortestPathSearch {
    dist:    Vec<f64>,
    touched: Vec<usize>,
    heap:    BinaryHeap<Reverse<(Cost, NodeId)>>,
}

impl ShortestPathSearch {
    pub fn new(network: &Network) -> Self {
        Self {
            dist:    vec![f64::INFINITY; network.node_count()],
            touched: Vec::new(),
            heap:    BinaryHeap::new(),
        }
    }

    /// Settle nodes reachable from `source` in ascending impedance order,
    /// calling `visit(node, cost)` once per settled node with
    /// `cost <= max_cost`.
    ///
    /// Ties are broken by `NodeId` so results are deterministic.
    pub fn run<F>(&mut self, network: &Network, source: NodeId, max_cost: f64, mut visit: F)
    where
        F: FnMut(NodeId, f64) -> Visit,
    {
        self.reset();
        if source.index() >= network.node_count() {
            return;
        }
        if self.dist.len() < network.node_count() {
            self.dist.resize(network.node_count(), f64::INFINITY);
        }

        self.set_dist(source.index(), 0.0);
        self.heap.push(Reverse((Cost(0.0), source)));

        while let Some(Reverse((Cost(cost), node))) = self.heap.pop() {
            if cost > self.dist[node.index()] {
                continue;
            }
            if visit(node, cost) == Visit::Stop {
                break;
            }
            for (next, w) in network.out_edges(node) {
                let new_cost = cost + w;
                if new_cost <= max_cost && new_cost < self.dist[next.index()] {
                    self.set_dist(next.index(), new_cost);
                    self.heap.push(Reverse((Cost(new_cost), next)));
                }
            }
        }
    }

    /// All `(node, cost)` pairs within `max_cost` of `source`, nearest first.
    pub fn within(&mut self, network: &Network, source: NodeId, max_cost: f64) -> Vec<(NodeId, f64)> {
        let mut out = Vec::new();
        self.run(network, source, max_cost, |n, c| {
            out.push((n, c));
            Visit::Continue
        });
        out
    }

    #[inline]
    fn set_dist(&mut self, idx: usize, cost: f64) {
        if self.dist[idx].is_infinite() {
            self.touched.push(idx);
        }
        self.dist[idx] = cost;
    }

    fn reset(&mut self) {
        for &i in &self.touched {
            self.dist[i] = f64::INFINITY;
        }
        self.touched.clear();
        self.heap.clear();
    }
}

/// Impedance of the shortest path from `from` to `to`, or `None` when `to`
/// is unreachable.
pub fn shortest_path_length(network: &Network, from: NodeId, to: NodeId) -> Option<f64> {
    let mut search = ShortestPathSearch::new(network);
    let mut found = None;
    search.run(network, from, f64::INFINITY, |n, c| {
        if n == to {
            found = Some(c);
            Visit::Stop
        } else {
            Visit::Continue
        }
    });
    found
}
