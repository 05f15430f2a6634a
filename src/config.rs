//! YAML configuration for the load command.
//!
//! ```yaml
//! engine: sqlite3
//! sqlite3_bin: /usr/local/bin/sqlite3
//! keep_sql: true
//! ```

use crate::sink::Engine;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "dump2sqlite";
const CONFIG_FILE: &str = "config.yaml";

/// Load settings read from a YAML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadYamlConfig {
    /// Execution engine
    pub engine: Engine,
    /// Program used by the sqlite3 engine
    pub sqlite3_bin: String,
    /// Keep the translated script next to the database
    pub keep_sql: bool,
}

impl Default for LoadYamlConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            sqlite3_bin: if cfg!(windows) {
                "sqlite3.exe".to_string()
            } else {
                "sqlite3".to_string()
            },
            keep_sql: false,
        }
    }
}

impl LoadYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml_ng::Error> {
        // An empty document deserializes to unit, not to a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml)
    }

    /// `<config dir>/dump2sqlite/config.yaml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Use `explicit` when given, else the default file when it exists, else
    /// built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "using default config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
