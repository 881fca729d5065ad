use serde::{Deserialize, Serialize};

/// Basic statistics about a `DependencyGraph` useful for summaries or logging.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphStatistics {
    pub module_count: usize,
    pub edge_count: usize,
    pub package_count: usize,
    /// Modules not backed by a project file.
    pub synthetic_module_count: usize,
    pub self_import_count: usize,
    /// Edges executed at load time (`absolute`, `relative`, `star`).
    pub load_time_edge_count: usize,
    pub max_fan_in: usize,
    pub max_fan_out: usize,
}
