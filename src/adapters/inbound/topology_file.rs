use crate::common::{DomainError, DomainResult};
use crate::domains::navigation::{TopologyConfig, TopologySource};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a topology description from disk. `.json` files are parsed as
/// JSON, anything else as TOML.
pub struct FileTopologySource {
    path: PathBuf,
}

impl FileTopologySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TopologySource for FileTopologySource {
    fn load_topology(&self) -> DomainResult<TopologyConfig> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DomainError::InfrastructureError(format!("{}: {}", self.path.display(), e))
        })?;

        let is_json = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            toml::from_str(&content).map_err(|e| DomainError::InvalidTopology {
                reason: format!("{}: {}", self.path.display(), e),
            })
        }
    }
}
