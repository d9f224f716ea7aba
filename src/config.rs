//! Component configuration (`extension_info.json`).
//!
//! The file maps each component name to the repository its releases live in,
//! plus two opaque values copied verbatim into the generated metadata:
//!
//! ```json
//! {
//!   "as3": {
//!     "repository": "F5Networks/f5-appsvcs-extension",
//!     "endpoints": {"info": {"uri": "/mgmt/shared/appsvcs/info", "methods": ["GET"]}},
//!     "componentDependencies": {}
//!   }
//! }
//! ```

use crate::error::{MetadataError, Result};
use crate::settings::EXTENSION_INFO;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One configured component
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    /// `owner/name` of the GitHub repository
    pub repository: String,
    pub endpoints: Value,
    pub component_dependencies: Value,
}

/// Component name to component info
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ComponentConfig {
    pub components: BTreeMap<String, ComponentInfo>,
}

impl ComponentConfig {
    /// Load the config file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MetadataError::ConfigLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        Self::parse(&content).map_err(|e| MetadataError::ConfigLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Parse config from a JSON string
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ComponentInfo)> {
        self.components.iter()
    }
}

/// `extension_info.json` next to the running executable
pub fn default_config_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(EXTENSION_INFO))
}
