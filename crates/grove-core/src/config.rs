use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use grove_util::errors::{GroveError, GroveResult};

/// Main class started in a forked runtime when none is configured.
pub const DEFAULT_ENTRY_POINT: &str = "org.codehaus.grove.ForkedTaskRunner";

/// Global user configuration loaded from `~/.grove/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub fork: ForkConfig,

    #[serde(default)]
    pub compatibility: CompatibilityConfig,
}

/// Out-of-process execution settings from `[fork]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Home directory of an alternate runtime; configuring one implies forking.
    #[serde(default, rename = "java-home")]
    pub java_home: Option<String>,
    #[serde(default = "default_entry_point", rename = "entry-point")]
    pub entry_point: String,
    /// The hosting plugin's own artifacts.
    #[serde(default, rename = "plugin-classpath")]
    pub plugin_classpath: Vec<String>,
    /// Artifacts containing the forked entry point.
    #[serde(default, rename = "engine-classpath")]
    pub engine_classpath: Vec<String>,
}

impl Default for ForkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            java_home: None,
            entry_point: default_entry_point(),
            plugin_classpath: Vec::new(),
            engine_classpath: Vec::new(),
        }
    }
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

/// Bytecode compatibility settings from `[compatibility]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatibilityConfig {
    #[serde(default, rename = "skip-bytecode-check")]
    pub skip_bytecode_check: bool,
}

impl GlobalConfig {
    /// Load the global configuration from `~/.grove/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> GroveResult<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when it is absent.
    pub fn load_from(path: &Path) -> GroveResult<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| GroveError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| GroveError::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the Grove data directory (`~/.grove/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".grove")
}
