//! Impedance network representation and builder.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  For a
//! `NodeId n` the outgoing edges occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! with the matching impedance in `edge_weight`.  Impedance is whatever the
//! edge file supplies (metres for the walk and drive graphs, seconds for the
//! transit-beam graph); the network does not interpret it.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `[x, y]` to the nearest `NodeId`.  Used to
//! snap parcels, schools and other points to network nodes.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use as_core::{GeoPoint, NodeId};

use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [x, y]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared planar distance in coordinate space.  Matches how nodes are
    /// snapped for the small metropolitan extents this pipeline runs on.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed impedance graph in CSR form plus a spatial index for snapping.
///
/// Construct with [`NetworkBuilder`] or [`crate::load_network_csv`].
#[derive(Debug)]
pub struct Network {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// External node id (e.g. OSM id) of each node.  Indexed by `NodeId`.
    pub node_ext_id: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    pub edge_to: Vec<NodeId>,

    /// Non-negative impedance of each edge.
    pub edge_weight: Vec<f64>,

    // ── Indices ───────────────────────────────────────────────────────────
    ext_index:   FxHashMap<i64, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl Network {
    pub fn empty() -> Self {
        NetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `(neighbour, impedance)` pairs for every outgoing edge of `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(move |i| (self.edge_to[i], self.edge_weight[i]))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Id translation ────────────────────────────────────────────────────

    #[inline]
    pub fn external_id(&self, node: NodeId) -> i64 {
        self.node_ext_id[node.index()]
    }

    pub fn node_by_external(&self, ext: i64) -> Option<NodeId> {
        self.ext_index.get(&ext).copied()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest network node to `pos`, or `None` for an empty network.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Snap every point to its nearest node.
    ///
    /// Fails with [`NetworkError::LengthMismatch`] only when the network has
    /// no nodes at all, in which case nothing can be snapped.
    pub fn get_node_ids(&self, points: &[GeoPoint]) -> NetworkResult<Vec<NodeId>> {
        if self.is_empty() && !points.is_empty() {
            return Err(NetworkError::LengthMismatch {
                what:     "network nodes".into(),
                expected: 1,
                got:      0,
            });
        }
        Ok(points
            .iter()
            .filter_map(|&p| self.snap_to_node(p))
            .collect())
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use as_core::GeoPoint;
/// use as_network::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node(10, GeoPoint::new(-122.27, 37.80)).unwrap();
/// let c = b.add_node(11, GeoPoint::new(-122.26, 37.80)).unwrap();
/// b.add_two_way(a, c, 880.0);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2);
/// ```
pub struct NetworkBuilder {
    nodes:     Vec<GeoPoint>,
    ext_ids:   Vec<i64>,
    ext_index: FxHashMap<i64, NodeId>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    weight: f64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            ext_ids:   Vec::with_capacity(nodes),
            ext_index: FxHashMap::default(),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node with its external id and return its dense `NodeId`.
    pub fn add_node(&mut self, ext_id: i64, pos: GeoPoint) -> NetworkResult<NodeId> {
        let id = NodeId(self.nodes.len() as u32);
        if self.ext_index.insert(ext_id, id).is_some() {
            return Err(NetworkError::DuplicateNode(ext_id));
        }
        self.nodes.push(pos);
        self.ext_ids.push(ext_id);
        Ok(id)
    }

    pub fn node_by_external(&self, ext: i64) -> Option<NodeId> {
        self.ext_index.get(&ext).copied()
    }

    /// Add a **directed** edge.  Negative weights are clamped to zero.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.raw_edges.push(RawEdge { from, to, weight: weight.max(0.0) });
    }

    /// Add edges in both directions with the same impedance.
    pub fn add_two_way(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_edge(a, b, weight);
        self.add_edge(b, a, weight);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`Network`].
    pub fn build(self) -> Network {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>    = raw.iter().map(|e| e.weight).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Network {
            node_pos: self.nodes,
            node_ext_id: self.ext_ids,
            node_out_start,
            edge_to,
            edge_weight,
            ext_index: self.ext_index,
            spatial_idx,
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
