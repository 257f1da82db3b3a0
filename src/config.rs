//! Planner and executor configuration (resource limits).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Bounds on forward-induction search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Deepest tree level iterative deepening may reach.
    pub max_depth: usize,
    /// Maximum number of build/cost rounds.
    pub max_iterations: usize,
    /// Maximum number of search nodes, root included.
    pub max_nodes: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            max_iterations: 32,
            max_nodes: 100_000,
        }
    }
}

impl PlannerConfig {
    /// Validate limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_depth == 0 {
            return Err(ValidationError::InvalidPlannerConfig {
                reason: "max_depth must be > 0".to_string(),
            });
        }
        if self.max_iterations == 0 {
            return Err(ValidationError::InvalidPlannerConfig {
                reason: "max_iterations must be > 0".to_string(),
            });
        }
        if self.max_nodes == 0 {
            return Err(ValidationError::InvalidPlannerConfig {
                reason: "max_nodes must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ValidationError::ConfigParse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ValidationError::ConfigParse {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json_str(&json)
    }
}

/// Settings for randomized policy execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Seed of the edge-selection RNG.
    pub seed: u64,
    /// Hard cap on executed steps.
    pub max_steps: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_steps: 1024,
        }
    }
}
