//! Network stages: loading the drive and walk networks, aggregating node
//! accessibility variables over them, or reading previously aggregated
//! tables.

use rustc_hash::FxHashMap;

use as_core::NodeId;
use as_network::{
    AccessibilityNetwork, AggregationSet, AggregationSpec, NetworkSpec, NodeTable, load_network_csv,
};
use as_population::{Parcel, Record, Table};

use crate::config::RunConfig;
use crate::context::tables;
use crate::{DataContext, PipelineError, PipelineResult, Stage};

// ── NetworkKind ───────────────────────────────────────────────────────────────

/// The two networks a run works with.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NetworkKind {
    /// Drive network.
    Small,
    Walk,
}

impl NetworkKind {
    pub fn net_table(self) -> &'static str {
        match self {
            NetworkKind::Small => tables::NET_SMALL,
            NetworkKind::Walk  => tables::NET_WALK,
        }
    }

    pub fn nodes_table(self) -> &'static str {
        match self {
            NetworkKind::Small => tables::NODES_SMALL,
            NetworkKind::Walk  => tables::NODES_WALK,
        }
    }

    pub fn spec(self, config: &RunConfig) -> &NetworkSpec {
        match self {
            NetworkKind::Small => &config.networks.small,
            NetworkKind::Walk  => &config.networks.walk,
        }
    }

    fn aggregation_file(self, config: &RunConfig) -> &str {
        match self {
            NetworkKind::Small => &config.accessibility_files.small_spec,
            NetworkKind::Walk  => &config.accessibility_files.walk_spec,
        }
    }

    fn vars_file(self, config: &RunConfig) -> &str {
        match self {
            NetworkKind::Small => &config.accessibility_files.small_vars,
            NetworkKind::Walk  => &config.accessibility_files.walk_vars,
        }
    }

    /// The parcel's own node column for this network.
    pub fn parcel_node(self, parcel: &Parcel) -> Option<i64> {
        match self {
            NetworkKind::Small => parcel.node_id_small,
            NetworkKind::Walk  => parcel.node_id_walk,
        }
    }
}

// ── initialize_network_{small,walk} ───────────────────────────────────────────

/// Load a network from CSV and fix its precompute horizon.
pub struct InitializeNetwork {
    kind: NetworkKind,
}

impl InitializeNetwork {
    pub fn small() -> Self {
        Self { kind: NetworkKind::Small }
    }

    pub fn walk() -> Self {
        Self { kind: NetworkKind::Walk }
    }
}

impl Stage for InitializeNetwork {
    fn name(&self) -> &'static str {
        match self.kind {
            NetworkKind::Small => "initialize_network_small",
            NetworkKind::Walk  => "initialize_network_walk",
        }
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[]
    }

    fn outputs(&self) -> &'static [&'static str] {
        match self.kind {
            NetworkKind::Small => &[tables::NET_SMALL],
            NetworkKind::Walk  => &[tables::NET_WALK],
        }
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let spec = self.kind.spec(&ctx.config);
        let network = load_network_csv(&ctx.config.data_dir, spec)?;
        let mut net = AccessibilityNetwork::new(network);
        net.precompute(spec.horizon);
        ctx.networks.insert(self.kind.net_table().to_string(), net);
        Ok(())
    }
}

// ── network_aggregations_{small,walk} ─────────────────────────────────────────

/// Aggregate the variables of a JSON [`AggregationSet`] over a network and
/// write the resulting node table to the data directory.
pub struct NetworkAggregations {
    kind: NetworkKind,
}

impl NetworkAggregations {
    pub fn small() -> Self {
        Self { kind: NetworkKind::Small }
    }

    pub fn walk() -> Self {
        Self { kind: NetworkKind::Walk }
    }
}

impl Stage for NetworkAggregations {
    fn name(&self) -> &'static str {
        match self.kind {
            NetworkKind::Small => "network_aggregations_small",
            NetworkKind::Walk  => "network_aggregations_walk",
        }
    }

    fn inputs(&self) -> &'static [&'static str] {
        match self.kind {
            NetworkKind::Small => &[tables::NET_SMALL, tables::PARCELS],
            NetworkKind::Walk  => &[tables::NET_WALK, tables::PARCELS],
        }
    }

    fn outputs(&self) -> &'static [&'static str] {
        match self.kind {
            NetworkKind::Small => &[tables::NODES_SMALL],
            NetworkKind::Walk  => &[tables::NODES_WALK],
        }
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let spec_path = ctx.config.data_path(self.kind.aggregation_file(&ctx.config));
        let set = AggregationSet::from_json_path(&spec_path)?;
        let samples = {
            let net = ctx.network(self.kind.net_table())?;
            let sampler = NodeSampler::new(ctx, net, self.kind);
            set.variables.iter().map(|spec| sampler.samples(spec)).collect::<PipelineResult<Vec<_>>>()?
        };

        let mut samples = samples.into_iter();
        let net = ctx.network_mut(self.kind.net_table())?;
        let mut table = net.aggregate_set(&set, |_| Ok(samples.next().unwrap_or_default()))?;
        table.fill_non_finite(0.0);
        log::info!(
            "{}: {} columns over {} nodes",
            self.kind.nodes_table(),
            table.columns().len(),
            table.len()
        );

        let path = ctx.config.data_path(self.kind.vars_file(&ctx.config));
        table.to_csv_path(&path)?;
        log::info!("wrote {}", path.display());
        ctx.node_tables.insert(self.kind.nodes_table().to_string(), table);
        Ok(())
    }
}

/// Places the rows of each source table on network nodes.
struct NodeSampler<'a> {
    ctx:          &'a DataContext,
    net:          &'a AccessibilityNetwork,
    kind:         NetworkKind,
    parcel_nodes: FxHashMap<u64, NodeId>,
}

impl<'a> NodeSampler<'a> {
    fn new(ctx: &'a DataContext, net: &'a AccessibilityNetwork, kind: NetworkKind) -> Self {
        let network = net.network();
        let parcel_nodes = ctx
            .population
            .parcels
            .iter()
            .filter_map(|p| {
                let node = kind
                    .parcel_node(p)
                    .and_then(|ext| network.node_by_external(ext))
                    .or_else(|| network.snap_to_node(p.position()))?;
                Some((p.primary_id.0, node))
            })
            .collect();
        Self { ctx, net, kind, parcel_nodes }
    }

    fn samples(&self, spec: &AggregationSpec) -> PipelineResult<(Vec<NodeId>, Vec<f64>)> {
        let pop = &self.ctx.population;
        let column = spec.column.as_deref();
        let parcel = |id: u64| self.parcel_nodes.get(&id).copied();
        let mut out = Samples::default();

        match spec.source.as_str() {
            "households" => out.collect(&pop.households, column, &spec.name, |hh| {
                pop.household_parcel(hh.household_id).ok().and_then(|p| parcel(p.primary_id.0))
            })?,
            "persons" => out.collect(&pop.persons, column, &spec.name, |person| {
                pop.household_parcel(person.household_id).ok().and_then(|p| parcel(p.primary_id.0))
            })?,
            "jobs" => out.collect(&pop.jobs, column, &spec.name, |job| {
                pop.job_parcel(job.job_id).ok().and_then(|p| parcel(p.primary_id.0))
            })?,
            "buildings" => out.collect(&pop.buildings, column, &spec.name, |b| parcel(b.parcel_id.0))?,
            "parcels" => out.collect(&pop.parcels, column, &spec.name, |p| parcel(p.primary_id.0))?,
            "rentals" => {
                let network = self.net.network();
                out.collect(&pop.rentals, column, &spec.name, |r| {
                    let ext = match self.kind {
                        NetworkKind::Small => r.node_id_small,
                        NetworkKind::Walk  => r.node_id_walk,
                    };
                    ext.and_then(|e| network.node_by_external(e))
                })?
            }
            "schools" => {
                let network = self.net.network();
                out.collect(&pop.schools, column, &spec.name, |s| network.snap_to_node(s.position()))?
            }
            other => {
                return Err(PipelineError::Config(format!(
                    "aggregation {}: unknown source table {other:?}",
                    spec.name
                )));
            }
        }

        if out.skipped > 0 {
            log::warn!("aggregation {}: {} {} rows not placed on the network", spec.name, out.skipped, spec.source);
        }
        Ok((out.nodes, out.values))
    }
}

#[derive(Default)]
struct Samples {
    nodes:   Vec<NodeId>,
    values:  Vec<f64>,
    skipped: usize,
}

impl Samples {
    /// One sample per row of `table` with a node and a value.  `column`
    /// `None` samples a constant 1.
    fn collect<T, F>(&mut self, table: &Table<T>, column: Option<&str>, name: &str, node_of: F) -> PipelineResult<()>
    where
        T: Record,
        F: Fn(&T) -> Option<NodeId>,
    {
        if let Some(c) = column {
            if !table.is_empty() && !table.has_var(c) {
                return Err(PipelineError::Config(format!(
                    "aggregation {name}: {} table has no column {c:?}",
                    T::TABLE
                )));
            }
        }
        for (pos, row) in table.iter().enumerate() {
            let value = match column {
                Some(c) => table.var_at(pos, c).filter(|v| !v.is_nan()),
                None => Some(1.0),
            };
            match (node_of(row), value) {
                (Some(node), Some(v)) => {
                    self.nodes.push(node);
                    self.values.push(v);
                }
                _ => self.skipped += 1,
            }
        }
        Ok(())
    }
}

// ── load_precomputed_accessibilities ──────────────────────────────────────────

/// Read the node tables a `compute` run wrote.
pub struct LoadPrecomputedAccessibilities;

impl Stage for LoadPrecomputedAccessibilities {
    fn name(&self) -> &'static str {
        "load_precomputed_accessibilities"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::NODES_SMALL, tables::NODES_WALK]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        for kind in [NetworkKind::Small, NetworkKind::Walk] {
            let path = ctx.config.data_path(kind.vars_file(&ctx.config));
            let table = NodeTable::from_csv_path(&path)?;
            log::info!("read {} ({} nodes) from {}", kind.nodes_table(), table.len(), path.display());
            ctx.node_tables.insert(kind.nodes_table().to_string(), table);
        }
        Ok(())
    }
}
