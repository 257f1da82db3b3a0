//! Agents: the keys of accessibility relations.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An acting or observing agent.
///
/// Agents are identified by name; two agents with the same name are the
/// same agent wherever they appear.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Agent {
    name: Arc<str>,
}

impl Agent {
    /// Creates an agent with the given name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// Creates an agent, rejecting an empty name.
    pub fn try_new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        if name.as_ref().trim().is_empty() {
            return Err(ValidationError::EmptyAgentName);
        }
        Ok(Self::new(name))
    }

    /// The agent's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
