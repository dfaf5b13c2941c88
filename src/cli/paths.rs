//! Configuration directory and persistent settings

use crate::search::{RevisitPolicy, SearchLimits};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the configuration directory for automata-sim
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine configuration directory")?;
    Ok(base.join("automata-sim"))
}

/// Get the default config file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Validate that a config file path has .json extension
pub fn validate_config_path(path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(()),
        Some(ext) => Err(anyhow::anyhow!(
            "Config file must have .json extension, got .{}. Please use a .json file.",
            ext
        )),
        None => Err(anyhow::anyhow!(
            "Config file must have .json extension. Please add .json to the filename."
        )),
    }
}

/// Defaults for simulator runs, stored as JSON
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Print fired rules
    pub trace: Option<bool>,
    /// Step budget; absent means unbounded
    pub max_steps: Option<usize>,
    /// Revisit policy
    pub revisit: Option<RevisitPolicy>,
}

impl SimulatorConfig {
    /// Load from `custom_path`, or from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self> {
        let path = match custom_path {
            Some(path) => {
                validate_config_path(path)?;
                path.to_path_buf()
            }
            None => default_config_path()?,
        };
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save to `custom_path`, or to the default location.
    pub fn save_to(&self, custom_path: Option<&Path>) -> Result<()> {
        let path = match custom_path {
            Some(path) => {
                validate_config_path(path)?;
                path.to_path_buf()
            }
            None => default_config_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Merge with command-line options (CLI options take precedence)
    pub fn merge_with_cli(
        &self,
        trace: Option<bool>,
        max_steps: Option<usize>,
        revisit: Option<RevisitPolicy>,
    ) -> Self {
        Self {
            trace: trace.or(self.trace),
            max_steps: max_steps.or(self.max_steps),
            revisit: revisit.or(self.revisit),
        }
    }

    /// Whether rule traces should be printed.
    pub fn trace_enabled(&self) -> bool {
        self.trace.unwrap_or(false)
    }

    /// Search limits described by this configuration.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_steps: self.max_steps,
            revisit: self.revisit.unwrap_or_default(),
        }
    }
}
