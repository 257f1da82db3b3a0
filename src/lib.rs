//! # epiplan - Epistemic Planning with Dynamic Epistemic Logic
//!
//! epiplan computes action policies for multi-agent coordination problems
//! under partial observability. A task describes the factual situation, what
//! each agent cannot tell apart, the actions agents may take and a goal. The
//! planner searches forward by product update, assigns worst-case costs by
//! backward induction, and prunes the choices a rational agent would never
//! make given what it knows.
//!
//! ## Core Concepts
//!
//! - **State**: possible worlds, the designated ones, and per-agent indistinguishability
//! - **Action**: an event model; events carry preconditions and effects
//! - **Product update**: how a state changes when an action happens
//! - **Perspective shift**: the state as seen by the agent about to act
//! - **Cost**: settled or provisional distance to the goal, or infinity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use epiplan::{ExecutorConfig, ForwardInductionPlanner, PlannerConfig, PolicyExecutor};
//!
//! let planner = ForwardInductionPlanner::new(PlannerConfig::default())?;
//! let graph = planner.plan(&task)?;
//!
//! let executor = PolicyExecutor::new(&graph, &task, ExecutorConfig::default())?;
//! let report = executor.run()?;
//! assert!(report.goal_reached);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Logic
pub mod agent;
pub mod formula;
pub mod predicate;

// Models
pub mod model;
pub mod task;
pub mod update;

// Planning
pub mod config;
pub mod cost;
pub mod error;
pub mod executor;
pub mod planner;
pub mod search;

pub use agent::Agent;
pub use config::{ExecutorConfig, PlannerConfig};
pub use cost::Cost;
pub use error::{ModelError, PlanError, PlanResult, PlanningError, ValidationError};
pub use executor::{ExecutionReport, PolicyExecutor};
pub use formula::Formula;
pub use model::{
    AccessibilityRelation, Action, ActionBuilder, ActionId, EdgeId, EventId, ResolvedEvent, State, World,
    WorldArena, WorldEdge, WorldId,
};
pub use planner::{ForwardInductionPlanner, PlanStats, PlannerPhase};
pub use predicate::{Effects, Predicate, PredicateId, PredicateTable, Valuation};
pub use search::{Node, NodeId, SearchGraph};
pub use task::{PlanningTask, TaskFingerprint};
pub use update::ProductUpdater;
