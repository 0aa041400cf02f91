//! CLI configuration

use std::path::Path;

use anyhow::{Context, Result};
use launchpad_lifecycle::LifecycleConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration, read from a TOML file.
///
/// ```toml
/// [allocation]
/// growth_factor = 1.35
/// max_milestones = 6
///
/// [steps.validate]
/// title = "Community Review"
/// description = "Backers vote on the project"
///
/// [simulation]
/// goal = 25000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    #[serde(flatten)]
    pub lifecycle: LifecycleConfig,

    pub simulation: SimulationConfig,
}

/// Inputs of the scripted `simulate` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Funding goal of the simulated project
    pub goal: u64,
    /// Number of milestones to plan
    pub milestones: usize,
    /// Votes to cast before advancing
    pub votes: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            goal: 25_000,
            milestones: 4,
            votes: 3,
        }
    }
}

impl LaunchpadConfig {
    /// Load configuration from `path`; a missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: LaunchpadConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .lifecycle
            .validate()
            .with_context(|| format!("validating config {}", path.display()))?;
        Ok(config)
    }
}
