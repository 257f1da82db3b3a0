//! Randomized execution of a pruned policy.
//!
//! Agents act independently: at every step one surviving edge of the
//! current node is picked uniformly at random, and the walk follows the
//! child reached by that edge's action. The walk stops when no edge
//! survives, then checks the goal over the designated worlds that were not
//! pruned away.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ExecutorConfig;
use crate::error::{PlanResult, ValidationError};
use crate::model::WorldId;
use crate::search::SearchGraph;
use crate::task::PlanningTask;

/// Outcome of one policy run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Names of the executed actions in order.
    pub actions: Vec<String>,
    /// Whether the goal held at every remaining designated world.
    pub goal_reached: bool,
    /// Number of executed actions.
    pub steps: usize,
    /// Unpruned designated worlds of the node the run stopped at.
    pub final_worlds: Vec<WorldId>,
}

impl ExecutionReport {
    /// Serializes the report for the experiment layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Walks a [`SearchGraph`] produced for a specific task.
#[derive(Debug)]
pub struct PolicyExecutor<'a> {
    graph: &'a SearchGraph,
    task: &'a PlanningTask,
    config: ExecutorConfig,
}

impl<'a> PolicyExecutor<'a> {
    /// Binds a graph to the task it was planned for.
    ///
    /// # Errors
    ///
    /// `TaskMismatch` if the graph was built for a different task.
    pub fn new(graph: &'a SearchGraph, task: &'a PlanningTask, config: ExecutorConfig) -> Result<Self, ValidationError> {
        let expected = graph.fingerprint();
        let actual = task.fingerprint();
        if expected != actual {
            return Err(ValidationError::TaskMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(Self { graph, task, config })
    }

    /// Runs once with the configured seed.
    pub fn run(&self) -> PlanResult<ExecutionReport> {
        self.run_with_seed(self.config.seed)
    }

    /// Runs `n` times with consecutive seeds starting at the configured one.
    pub fn run_many(&self, n: usize) -> PlanResult<Vec<ExecutionReport>> {
        let mut reports = Vec::with_capacity(n);
        let mut seed = self.config.seed;
        for _ in 0..n {
            reports.push(self.run_with_seed(seed)?);
            seed = seed.wrapping_add(1);
        }
        let successes = reports.iter().filter(|r| r.goal_reached).count();
        info!(runs = n, successes, "policy runs finished");
        Ok(reports)
    }

    /// Runs once with an explicit seed.
    pub fn run_with_seed(&self, seed: u64) -> PlanResult<ExecutionReport> {
        let mut rng = StdRng::seed_from_u64(seed);
        let arena = self.graph.arena();
        let mut current = self.graph.root().id();
        let mut actions = Vec::new();

        while actions.len() < self.config.max_steps {
            let edges = self.graph.unpruned_edges(current);
            let Some(&edge) = edges.choose(&mut rng) else {
                break;
            };
            let action_id = arena[edge].action;
            let name = self
                .task
                .action(action_id)
                .map_or_else(|| action_id.to_string(), |a| a.name().to_string());
            let next = self.graph.expect_child(current, action_id)?;
            debug!(from = %current, to = %next, action = %name, choices = edges.len(), "policy step");
            actions.push(name);
            current = next;
        }

        let final_worlds = self.graph.live_designated(current);
        let state = self.graph[current].state();
        let goal = self.task.goal();
        let mut goal_reached = !final_worlds.is_empty();
        for &w in &final_worlds {
            if !goal.evaluate(arena, state, w)? {
                goal_reached = false;
                break;
            }
        }

        debug!(seed, steps = actions.len(), goal_reached, "policy run finished");
        Ok(ExecutionReport {
            steps: actions.len(),
            actions,
            goal_reached,
            final_worlds,
        })
    }
}
