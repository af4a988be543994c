//! Unit tests for as-network.
//!
//! All tests use hand-built networks so they run without any data files.

#[cfg(test)]
mod helpers {
    use as_core::{GeoPoint, NodeId};
    use crate::{Network, NetworkBuilder};

    /// Five nodes on a line, external ids 100..=104, x = 0..=4.
    ///
    /// Two-way edges of impedance 100 between neighbours, so the distance
    /// between node i and node j is `100 * |i - j|`.
    pub fn line_network() -> (Network, [NodeId; 5]) {
        let mut b = NetworkBuilder::new();
        let mut ids = [NodeId::INVALID; 5];
        for (i, id) in ids.iter_mut().enumerate() {
            *id = b.add_node(100 + i as i64, GeoPoint::new(i as f64, 0.0)).unwrap();
        }
        for w in ids.windows(2) {
            b.add_two_way(w[0], w[1], 100.0);
        }
        (b.build(), ids)
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use as_core::GeoPoint;
    use crate::{NetworkBuilder, NetworkError};
    use super::helpers::line_network;

    #[test]
    fn empty_build() {
        let net = NetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert!(net.is_empty());
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn csr_degrees() {
        let (net, n) = line_network();
        assert_eq!(net.edge_count(), 8);
        assert_eq!(net.out_degree(n[0]), 1);
        assert_eq!(net.out_degree(n[2]), 2);
    }

    #[test]
    fn duplicate_external_id_rejected() {
        let mut b = NetworkBuilder::new();
        b.add_node(7, GeoPoint::new(0.0, 0.0)).unwrap();
        let err = b.add_node(7, GeoPoint::new(1.0, 0.0)).unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateNode(7)));
    }

    #[test]
    fn external_id_translation() {
        let (net, n) = line_network();
        assert_eq!(net.external_id(n[3]), 103);
        assert_eq!(net.node_by_external(102), Some(n[2]));
        assert_eq!(net.node_by_external(999), None);
    }

    #[test]
    fn snap_points() {
        let (net, n) = line_network();
        let pts = [GeoPoint::new(0.1, 0.2), GeoPoint::new(3.6, -0.1)];
        assert_eq!(net.get_node_ids(&pts).unwrap(), vec![n[0], n[4]]);
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{NetworkError, NetworkSpec, load_network_readers};

    const NODES: &str = "osmid,x,y,street_count\n1,0.0,0.0,2\n2,1.0,0.0,2\n3.0,2.0,0.0,1\n";

    #[test]
    fn directed_edges() {
        let edges = "u,v,length\n1,2,50\n2,3,60\n";
        let spec = NetworkSpec::new("n.csv", "e.csv", 1000.0);
        let net = load_network_readers(Cursor::new(NODES), Cursor::new(edges), &spec).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.node_by_external(3).map(|n| n.0), Some(2));
    }

    #[test]
    fn two_way_and_custom_columns() {
        let edges = "from,to,travelTime\n1,2,5\n";
        let mut spec = NetworkSpec::new("n.csv", "e.csv", 7200.0);
        spec.from_column = "from".into();
        spec.to_column = "to".into();
        spec.weight_column = "travelTime".into();
        spec.two_way = true;
        let net = load_network_readers(Cursor::new(NODES), Cursor::new(edges), &spec).unwrap();
        assert_eq!(net.edge_count(), 2);
    }

    #[test]
    fn unknown_endpoint() {
        let edges = "u,v,length\n1,9,50\n";
        let spec = NetworkSpec::new("n.csv", "e.csv", 1000.0);
        let err = load_network_readers(Cursor::new(NODES), Cursor::new(edges), &spec).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownNode(9)));
    }

    #[test]
    fn missing_weight_column() {
        let edges = "u,v,distance\n1,2,50\n";
        let spec = NetworkSpec::new("n.csv", "e.csv", 1000.0);
        let err = load_network_readers(Cursor::new(NODES), Cursor::new(edges), &spec).unwrap_err();
        assert!(matches!(err, NetworkError::MissingColumn(ref c) if c == "length"));
    }

    #[test]
    fn spec_defaults_from_json() {
        let spec: NetworkSpec =
            serde_json::from_str(r#"{"nodes_file":"n.csv","edges_file":"e.csv","horizon":2500}"#).unwrap();
        assert_eq!(spec.node_id_column, "osmid");
        assert_eq!(spec.weight_column, "length");
        assert!(!spec.two_way);
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use as_core::GeoPoint;
    use crate::{NetworkBuilder, ShortestPathSearch, shortest_path_length};
    use super::helpers::line_network;

    #[test]
    fn within_is_bounded_and_sorted() {
        let (net, n) = line_network();
        let mut s = ShortestPathSearch::new(&net);
        let found = s.within(&net, n[1], 150.0);
        assert_eq!(found, vec![(n[1], 0.0), (n[0], 100.0), (n[2], 100.0)]);
    }

    #[test]
    fn search_reuse_resets_state() {
        let (net, n) = line_network();
        let mut s = ShortestPathSearch::new(&net);
        let _ = s.within(&net, n[0], 1000.0);
        let second = s.within(&net, n[4], 100.0);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn path_length() {
        let (net, n) = line_network();
        assert_eq!(shortest_path_length(&net, n[0], n[4]), Some(400.0));
        assert_eq!(shortest_path_length(&net, n[2], n[2]), Some(0.0));
    }

    #[test]
    fn directed_unreachable() {
        let mut b = NetworkBuilder::new();
        let a = b.add_node(1, GeoPoint::new(0.0, 0.0)).unwrap();
        let c = b.add_node(2, GeoPoint::new(1.0, 0.0)).unwrap();
        b.add_edge(a, c, 10.0);
        let net = b.build();
        assert_eq!(shortest_path_length(&net, a, c), Some(10.0));
        assert_eq!(shortest_path_length(&net, c, a), None);
    }
}

// ── POIs ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pois {
    use as_core::{GeoPoint, PoiId};
    use crate::{Accessibility, AccessibilityNetwork, NetworkError};
    use super::helpers::line_network;

    fn with_schools() -> (AccessibilityNetwork, [as_core::NodeId; 5]) {
        let (net, n) = line_network();
        let mut acc = AccessibilityNetwork::new(net);
        acc.set_pois(
            "public",
            1000.0,
            5,
            &[(PoiId(1), GeoPoint::new(0.0, 0.0)), (PoiId(2), GeoPoint::new(3.01, 0.0))],
        )
        .unwrap();
        (acc, n)
    }

    #[test]
    fn nearest_sorted_and_padded() {
        let (acc, n) = with_schools();
        let t = acc.nearest_pois(250.0, "public", 3).unwrap();
        assert_eq!(t.node_count(), 5);
        assert_eq!(t.distances(n[1]), &[100.0, 200.0, 250.0]);
        assert_eq!(t.poi_ids(n[1]), &[Some(PoiId(1)), Some(PoiId(2)), None]);
        assert_eq!(t.poi_ids(n[4]), &[Some(PoiId(2)), None, None]);
        assert_eq!(t.distances(n[4]), &[100.0, 250.0, 250.0]);
    }

    #[test]
    fn limits_enforced() {
        let (acc, _) = with_schools();
        assert!(matches!(
            acc.nearest_pois(2000.0, "public", 2),
            Err(NetworkError::BeyondLimit { .. })
        ));
        assert!(matches!(
            acc.nearest_pois(500.0, "public", 6),
            Err(NetworkError::TooManyPois { max_items: 5, .. })
        ));
        assert!(matches!(
            acc.nearest_pois(500.0, "private", 1),
            Err(NetworkError::UnknownCategory(_))
        ));
    }

    #[test]
    fn shared_node_keeps_both() {
        let (net, n) = line_network();
        let mut acc = AccessibilityNetwork::new(net);
        let pts = [(PoiId(5), GeoPoint::new(2.0, 0.0)), (PoiId(6), GeoPoint::new(2.1, 0.0))];
        acc.set_pois("private", 500.0, 2, &pts).unwrap();
        let t = acc.nearest_pois(500.0, "private", 2).unwrap();
        assert_eq!(t.poi_ids(n[0]), &[Some(PoiId(5)), Some(PoiId(6))]);
        assert_eq!(t.distances(n[0]), &[200.0, 200.0]);
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod aggregation {
    use approx::assert_relative_eq;

    use crate::{
        Accessibility, AccessibilityNetwork, Aggregation, AggregationSet, Decay, NetworkError,
        NodeTable,
    };
    use super::helpers::line_network;

    fn with_values() -> (AccessibilityNetwork, [as_core::NodeId; 5]) {
        let (net, n) = line_network();
        let mut acc = AccessibilityNetwork::new(net);
        acc.precompute(500.0);
        acc.set_variable("pop", &[n[0], n[2]], &[10.0, 30.0]).unwrap();
        (acc, n)
    }

    #[test]
    fn flat_sum() {
        let (acc, _) = with_values();
        let v = acc.aggregate(150.0, "pop", Aggregation::Sum, Decay::Flat).unwrap();
        assert_eq!(v, vec![10.0, 40.0, 30.0, 30.0, 0.0]);
    }

    #[test]
    fn linear_decay_halves_at_mid_radius() {
        let (acc, n) = with_values();
        let v = acc.aggregate(200.0, "pop", Aggregation::Sum, Decay::Linear).unwrap();
        assert_relative_eq!(v[n[1].index()], 20.0);
    }

    #[test]
    fn empty_mean_is_nan() {
        let (acc, n) = with_values();
        let v = acc.aggregate(150.0, "pop", Aggregation::Mean, Decay::Flat).unwrap();
        assert_relative_eq!(v[n[1].index()], 20.0);
        assert!(v[n[4].index()].is_nan());
    }

    #[test]
    fn reduce_statistics() {
        let s = [(0.0, 1.0), (10.0, 3.0), (20.0, 5.0), (30.0, 7.0)];
        assert_eq!(Aggregation::Count.reduce(&s, Decay::Flat, 100.0), 4.0);
        assert_eq!(Aggregation::Min.reduce(&s, Decay::Flat, 100.0), 1.0);
        assert_eq!(Aggregation::Max.reduce(&s, Decay::Flat, 100.0), 7.0);
        assert_eq!(Aggregation::Median.reduce(&s, Decay::Flat, 100.0), 4.0);
        assert_relative_eq!(Aggregation::Std.reduce(&s, Decay::Flat, 100.0), 5.0f64.sqrt());
        assert_relative_eq!(Decay::Exponential.weight(100.0, 100.0), (-1.0f64).exp());
    }

    #[test]
    fn horizon_and_unknown_variable() {
        let (acc, _) = with_values();
        assert!(matches!(
            acc.aggregate(600.0, "pop", Aggregation::Sum, Decay::Flat),
            Err(NetworkError::BeyondLimit { .. })
        ));
        assert!(matches!(
            acc.aggregate(100.0, "jobs", Aggregation::Sum, Decay::Flat),
            Err(NetworkError::UnknownVariable(_))
        ));
    }

    #[test]
    fn set_from_json_with_ratio() {
        let (net, n) = line_network();
        let mut acc = AccessibilityNetwork::new(net);
        acc.precompute(500.0);
        let set = AggregationSet::from_json_str(
            r#"{
              "variables": [
                {"name": "pop", "source": "households", "column": "persons",
                 "radius": 150, "aggregation": "sum"},
                {"name": "jobs", "source": "jobs", "radius": 150, "aggregation": "count"},
                {"name": "avg_income", "source": "households", "column": "income",
                 "radius": 150, "aggregation": "mean", "apply": "log1p"}
              ],
              "ratios": [{"name": "pop_jobs_ratio", "numerator": "pop", "denominator": "jobs"}]
            }"#,
        )
        .unwrap();
        assert_eq!(set.max_radius(), 150.0);

        let table = acc
            .aggregate_set(&set, |spec| {
                Ok(match spec.source.as_str() {
                    "households" if spec.column.as_deref() == Some("persons") => {
                        (vec![n[0], n[1]], vec![2.0, 4.0])
                    }
                    "households" => (vec![n[0]], vec![99.0]),
                    _ => (vec![n[1]], vec![1.0]),
                })
            })
            .unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.column("pop").unwrap(), &[6.0, 6.0, 4.0, 0.0, 0.0]);
        // jobs = 0 at node 3 gives 0/0, filled with 0.
        assert_eq!(table.value("pop_jobs_ratio", 100), Some(6.0));
        assert_eq!(table.value("pop_jobs_ratio", 103), Some(0.0));
        // No income samples in range of node 4: NaN mean filled before log1p.
        assert_eq!(table.value("avg_income", 104), Some(0.0));
        assert_relative_eq!(table.value("avg_income", 100).unwrap(), 100.0f64.ln());
    }

    #[test]
    fn node_table_csv_file() {
        let mut t = NodeTable::new(vec![5, 6]);
        t.add_column("a", vec![1.5, f64::NAN]).unwrap();
        t.add_column("b", vec![0.0, 2.0]).unwrap();
        assert!(t.add_column("c", vec![1.0]).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes_walk.csv");
        t.to_csv_path(&path).unwrap();
        let back = NodeTable::from_csv_path(&path).unwrap();
        assert_eq!(back.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(back.value("a", 5), Some(1.5));
        assert!(back.value("a", 6).unwrap().is_nan());
        assert_eq!(back.value("b", 6), Some(2.0));
    }
}

// ── Choice sets ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod choice_sets {
    use as_core::{GeoPoint, PoiId};
    use crate::{Accessibility, AccessibilityNetwork, coverage, flatten_choice_sets, rolling_mean_distances};
    use super::helpers::line_network;

    #[test]
    fn flatten_drops_padding() {
        let (net, n) = line_network();
        let mut acc = AccessibilityNetwork::new(net);
        acc.set_pois("public", 1000.0, 3, &[(PoiId(9), GeoPoint::new(4.0, 0.0))]).unwrap();
        let t = acc.nearest_pois(300.0, "public", 3).unwrap();

        let rows = flatten_choice_sets(&t, &[(1, n[3]), (2, n[0])]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, 1);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].poi, PoiId(9));

        assert_eq!(coverage(&t, &[(n[3], PoiId(9)), (n[0], PoiId(9))]), 0.5);
        assert_eq!(coverage(&t, &[]), 0.0);
    }

    #[test]
    fn rolling_means() {
        assert_eq!(rolling_mean_distances(&[100.0, 200.0, 600.0]), vec![100.0, 150.0, 300.0]);
        assert!(rolling_mean_distances(&[]).is_empty());
    }
}
