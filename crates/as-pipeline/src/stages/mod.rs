//! The simulation stages and their lookup by name.

pub mod auto_ownership;
pub mod mode_choice;
pub mod network;
pub mod plans;
pub mod school;
pub mod skims;
pub mod tod;
pub(crate) mod vars;
pub mod wlcm;

use crate::config::AccessibilitiesMode;
use crate::{PipelineError, PipelineResult, Stage};

pub use auto_ownership::AutoOwnership;
pub use mode_choice::PrimaryModeChoice;
pub use network::{InitializeNetwork, LoadPrecomputedAccessibilities, NetworkAggregations, NetworkKind};
pub use plans::GenerateActivityPlans;
pub use school::SchoolChoice;
pub use skims::ImputeSkims;
pub use tod::{TodCategory, TodDistribution, TodDwell};
pub use wlcm::WorkplaceLocationChoice;

const COMPUTE_ORDER: &[&str] = &[
    "initialize_network_small",
    "initialize_network_walk",
    "network_aggregations_small",
    "network_aggregations_walk",
    "impute_skims",
    "wlcm_simulate",
    "tod_category_simulate",
    "tod_dwell_simulate",
    "tod_distribution_simulate",
    "auto_ownership_simulate",
    "primary_mode_choice_simulate",
    "school_choice_simulate",
    "generate_activity_plans",
];

const PRECOMPUTED_ORDER: &[&str] = &[
    "initialize_network_small",
    "initialize_network_walk",
    "load_precomputed_accessibilities",
    "impute_skims",
    "wlcm_simulate",
    "tod_category_simulate",
    "tod_dwell_simulate",
    "tod_distribution_simulate",
    "auto_ownership_simulate",
    "primary_mode_choice_simulate",
    "school_choice_simulate",
    "generate_activity_plans",
];

/// The full run, in dependency order.
pub fn default_order(mode: AccessibilitiesMode) -> &'static [&'static str] {
    match mode {
        AccessibilitiesMode::Compute     => COMPUTE_ORDER,
        AccessibilitiesMode::Precomputed => PRECOMPUTED_ORDER,
    }
}

/// Instantiate a stage by its registered name.
pub fn by_name(name: &str) -> PipelineResult<Box<dyn Stage>> {
    let stage: Box<dyn Stage> = match name {
        "initialize_network_small"         => Box::new(InitializeNetwork::small()),
        "initialize_network_walk"          => Box::new(InitializeNetwork::walk()),
        "network_aggregations_small"       => Box::new(NetworkAggregations::small()),
        "network_aggregations_walk"        => Box::new(NetworkAggregations::walk()),
        "load_precomputed_accessibilities" => Box::new(LoadPrecomputedAccessibilities),
        "impute_skims"                     => Box::new(ImputeSkims),
        "wlcm_simulate"                    => Box::new(WorkplaceLocationChoice),
        "tod_category_simulate"            => Box::new(TodCategory),
        "tod_dwell_simulate"               => Box::new(TodDwell),
        "tod_distribution_simulate"        => Box::new(TodDistribution),
        "auto_ownership_simulate"          => Box::new(AutoOwnership),
        "primary_mode_choice_simulate"     => Box::new(PrimaryModeChoice),
        "school_choice_simulate"           => Box::new(SchoolChoice),
        "generate_activity_plans"          => Box::new(GenerateActivityPlans),
        other => return Err(PipelineError::UnknownStage(other.to_string())),
    };
    Ok(stage)
}

pub fn is_known(name: &str) -> bool {
    by_name(name).is_ok()
}
