//! CSV network loader.
//!
//! # CSV format
//!
//! Two files: a node table and an edge table.  Column names are configurable
//! through [`NetworkSpec`]; the defaults match OSM-derived exports.
//!
//! ```csv
//! osmid,x,y
//! 101,-122.270,37.800
//! 102,-122.260,37.800
//! ```
//!
//! ```csv
//! u,v,length
//! 101,102,880.5
//! ```
//!
//! Extra columns are ignored.  Every edge endpoint must appear in the node
//! table.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use as_core::GeoPoint;

use crate::aggregate::parse_node_id;
use crate::network::{Network, NetworkBuilder};
use crate::{NetworkError, NetworkResult};

/// Where a network lives on disk and how to read it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub nodes_file: String,
    pub edges_file: String,
    #[serde(default = "default_node_id_column")]
    pub node_id_column: String,
    #[serde(default = "default_x_column")]
    pub x_column: String,
    #[serde(default = "default_y_column")]
    pub y_column: String,
    #[serde(default = "default_from_column")]
    pub from_column: String,
    #[serde(default = "default_to_column")]
    pub to_column: String,
    #[serde(default = "default_weight_column")]
    pub weight_column: String,
    /// Add the reverse of every edge.
    #[serde(default)]
    pub two_way: bool,
    /// Largest aggregation radius the network will be asked for.
    pub horizon: f64,
}

fn default_node_id_column() -> String { "osmid".into() }
fn default_x_column()       -> String { "x".into() }
fn default_y_column()       -> String { "y".into() }
fn default_from_column()    -> String { "u".into() }
fn default_to_column()      -> String { "v".into() }
fn default_weight_column()  -> String { "length".into() }

impl NetworkSpec {
    /// A spec with default column names.
    pub fn new(nodes_file: impl Into<String>, edges_file: impl Into<String>, horizon: f64) -> Self {
        Self {
            nodes_file:     nodes_file.into(),
            edges_file:     edges_file.into(),
            node_id_column: default_node_id_column(),
            x_column:       default_x_column(),
            y_column:       default_y_column(),
            from_column:    default_from_column(),
            to_column:      default_to_column(),
            weight_column:  default_weight_column(),
            two_way:        false,
            horizon,
        }
    }
}

/// Load a network from `spec.nodes_file` and `spec.edges_file` under `dir`.
pub fn load_network_csv(dir: &Path, spec: &NetworkSpec) -> NetworkResult<Network> {
    let nodes = BufReader::new(File::open(dir.join(&spec.nodes_file))?);
    let edges = BufReader::new(File::open(dir.join(&spec.edges_file))?);
    let net = load_network_readers(nodes, edges, spec)?;
    log::info!(
        "loaded network {} ({} nodes, {} edges)",
        spec.edges_file,
        net.node_count(),
        net.edge_count()
    );
    Ok(net)
}

/// Like [`load_network_csv`] but reads from any `Read` sources.
pub fn load_network_readers<N: Read, E: Read>(
    nodes: N,
    edges: E,
    spec: &NetworkSpec,
) -> NetworkResult<Network> {
    let mut builder = NetworkBuilder::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut rdr = csv::Reader::from_reader(nodes);
    let headers = rdr.headers()?.clone();
    let id_col = column_index(&headers, &spec.node_id_column)?;
    let x_col  = column_index(&headers, &spec.x_column)?;
    let y_col  = column_index(&headers, &spec.y_column)?;
    for rec in rdr.records() {
        let rec = rec?;
        let id = parse_node_id(field(&rec, id_col))?;
        let x = parse_f64(field(&rec, x_col))?;
        let y = parse_f64(field(&rec, y_col))?;
        builder.add_node(id, GeoPoint::new(x, y))?;
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut rdr = csv::Reader::from_reader(edges);
    let headers = rdr.headers()?.clone();
    let from_col   = column_index(&headers, &spec.from_column)?;
    let to_col     = column_index(&headers, &spec.to_column)?;
    let weight_col = column_index(&headers, &spec.weight_column)?;
    for rec in rdr.records() {
        let rec = rec?;
        let u = parse_node_id(field(&rec, from_col))?;
        let v = parse_node_id(field(&rec, to_col))?;
        let w = parse_f64(field(&rec, weight_col))?;
        let from = builder.node_by_external(u).ok_or(NetworkError::UnknownNode(u))?;
        let to   = builder.node_by_external(v).ok_or(NetworkError::UnknownNode(v))?;
        if spec.two_way {
            builder.add_two_way(from, to, w);
        } else {
            builder.add_edge(from, to, w);
        }
    }

    Ok(builder.build())
}

fn column_index(headers: &csv::StringRecord, name: &str) -> NetworkResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| NetworkError::MissingColumn(name.to_string()))
}

#[inline]
fn field(rec: &csv::StringRecord, idx: usize) -> &str {
    rec.get(idx).unwrap_or("")
}

fn parse_f64(s: &str) -> NetworkResult<f64> {
    s.trim()
        .parse::<f64>()
        .map_err(|e| NetworkError::Parse(format!("{s:?}: {e}")))
}
