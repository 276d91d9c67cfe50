use super::graph::TopologyConfig;
use crate::common::DomainResult;

/// Port the navigation domain uses to obtain its topology.
/// Adapters provide file-backed or in-memory sources.
pub trait TopologySource: Send + Sync {
    fn load_topology(&self) -> DomainResult<TopologyConfig>;
}

/// Topology held in memory, typically the one embedded in the main config.
pub struct StaticTopology(pub TopologyConfig);

impl TopologySource for StaticTopology {
    fn load_topology(&self) -> DomainResult<TopologyConfig> {
        Ok(self.0.clone())
    }
}
