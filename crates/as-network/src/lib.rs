//! `as-network`: network graph, nearest-facility queries, and accessibility
//! aggregation.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`network`]     | `Network` (CSR + R-tree), `NetworkBuilder`                  |
//! | [`loader`]      | `NetworkSpec`, `load_network_csv`, `load_network_readers`   |
//! | [`search`]      | `ShortestPathSearch` (bounded Dijkstra), `shortest_path_length` |
//! | [`poi`]         | `PoiSet`, `NearestPoiTable`                                 |
//! | [`aggregate`]   | `Aggregation`, `Decay`, `AggregationSet`, `NodeTable`        |
//! | [`access`]      | `Accessibility` trait, `AccessibilityNetwork`               |
//! | [`choice_set`]  | choice-set flattening, rolling rank distances, coverage     |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Per-node searches run on Rayon's thread pool.            |

pub mod access;
pub mod aggregate;
pub mod choice_set;
pub mod error;
pub mod loader;
pub mod network;
pub mod poi;
pub mod search;

#[cfg(test)]
mod tests;

pub use access::{Accessibility, AccessibilityNetwork};
pub use aggregate::{
    Aggregation, AggregationSet, AggregationSpec, Decay, NodeTable, RatioSpec, Transform,
};
pub use choice_set::{ChoiceSetRow, coverage, flatten_choice_sets, rolling_mean_distances};
pub use error::{NetworkError, NetworkResult};
pub use loader::{NetworkSpec, load_network_csv, load_network_readers};
pub use network::{Network, NetworkBuilder};
pub use poi::{NearestPoiTable, PoiSet};
pub use search::{ShortestPathSearch, Visit, shortest_path_length};
