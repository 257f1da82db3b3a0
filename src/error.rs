//! Error types for epiplan.
//!
//! All errors are strongly typed using thiserror. Construction problems,
//! lookup failures during evaluation and search-level failures live in
//! separate enums so callers can match on the layer that failed.
//!
//! An action that is not applicable in a state is not an error: product
//! update reports it as `None`.

use thiserror::Error;

use crate::agent::Agent;

/// Validation errors raised while constructing models, tasks and configs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Malformed state: {reason}")]
    MalformedState {
        reason: String,
    },

    #[error("Malformed action '{action}': {reason}")]
    MalformedAction {
        action: String,
        reason: String,
    },

    #[error("Agent name cannot be empty")]
    EmptyAgentName,

    #[error("Predicate name cannot be empty")]
    EmptyPredicateName,

    #[error("Invalid planner config: {reason}")]
    InvalidPlannerConfig {
        reason: String,
    },

    #[error("Failed to parse config: {message}")]
    ConfigParse {
        message: String,
    },

    #[error("Policy was built for task {expected}, got task {actual}")]
    TaskMismatch {
        expected: String,
        actual: String,
    },
}

/// Lookup errors raised while querying models.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Agent not found: {agent}")]
    AgentNotFound {
        agent: Agent,
    },

    #[error("Action not found: {action}")]
    ActionNotFound {
        action: usize,
    },

    #[error("Node {node} has no child for action {action}")]
    MissingChild {
        node: usize,
        action: usize,
    },
}

/// Search-level failures.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("Unsolvable task at depth {depth}: {reason}")]
    UnsolvableTask {
        depth: usize,
        reason: String,
    },

    #[error("Search limit exceeded: {limit_type} (max: {max_value}, actual: {actual_value})")]
    SearchLimitExceeded {
        limit_type: String,
        max_value: usize,
        actual_value: usize,
    },
}

/// Top-level error type for epiplan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Planning error: {0}")]
    Planning(#[from] PlanningError),
}

impl PlanError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a model lookup error.
    #[must_use]
    pub const fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// Returns true if the planner gave up on the task.
    #[must_use]
    pub const fn is_unsolvable(&self) -> bool {
        matches!(self, Self::Planning(PlanningError::UnsolvableTask { .. }))
    }

    /// Returns true if a search resource bound was hit.
    #[must_use]
    pub const fn is_limit_exceeded(&self) -> bool {
        matches!(
            self,
            Self::Planning(PlanningError::SearchLimitExceeded { .. })
        )
    }
}

/// Result type alias for epiplan operations.
pub type PlanResult<T> = Result<T, PlanError>;
