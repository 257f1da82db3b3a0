//! Forward-induction planning.
//!
//! The planner grows a search tree breadth-first until the first depth at
//! which a goal world appears, assigns worst-case costs to every world from
//! the leaves upwards, deepens the tree while the root still carries
//! provisional costs, and finally prunes the edges a rational owner would
//! never choose.
//!
//! ```text
//! Expanding -> CostingPending -> (Expanding -> CostingPending)* -> Pruned
//! ```

mod costs;
mod expand;
mod prune;

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::cost::Cost;
use crate::error::{PlanResult, PlanningError, ValidationError};
use crate::search::{NodeId, SearchGraph};
use crate::task::PlanningTask;
use crate::update::ProductUpdater;

/// Where a planning run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerPhase {
    /// Growing the tree.
    Expanding,
    /// Tree built, costs being computed.
    CostingPending,
    /// Costs settled and edges pruned. Terminal.
    Pruned,
}

/// Counters describing a finished planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    /// Number of build/cost rounds.
    pub iterations: usize,
    /// First depth at which a goal world appeared.
    pub goal_depth: Option<usize>,
    /// Final depth bound of the tree.
    pub cutoff_depth: usize,
    /// Nodes in the tree.
    pub nodes: usize,
    /// Worlds in the arena.
    pub worlds: usize,
    /// Edges pruned as irrational.
    pub pruned_edges: usize,
    /// Dynamic event resolutions performed.
    pub resolved_events: usize,
}

/// Builds a pruned policy tree for a planning task.
///
/// # Examples
///
/// ```ignore
/// let planner = ForwardInductionPlanner::new(PlannerConfig::default())?;
/// let graph = planner.plan(&task)?;
/// println!("root cost: {}", graph.root().cost);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardInductionPlanner {
    config: PlannerConfig,
}

impl ForwardInductionPlanner {
    /// Creates a planner with validated limits.
    pub fn new(config: PlannerConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active limits.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans `task`.
    ///
    /// # Errors
    ///
    /// - `PlanningError::UnsolvableTask` if the depth or iteration bound is
    ///   exhausted while root costs are provisional, or if no designated
    ///   root world can reach the goal at all.
    /// - `PlanningError::SearchLimitExceeded` if the tree outgrows `max_nodes`.
    /// - `ModelError` if the task refers to unknown agents.
    pub fn plan(&self, task: &PlanningTask) -> PlanResult<SearchGraph> {
        PlanRun::new(task, self.config).execute()
    }
}

/// Mutable state of one planning run.
pub(crate) struct PlanRun<'t> {
    task: &'t PlanningTask,
    config: PlannerConfig,
    graph: SearchGraph,
    updater: ProductUpdater<'t>,
    frontier: VecDeque<NodeId>,
    leaves: BTreeSet<NodeId>,
    goal_depth: Option<usize>,
    limit: usize,
    phase: PlannerPhase,
    iterations: usize,
    pruned_edges: usize,
}

impl<'t> PlanRun<'t> {
    fn new(task: &'t PlanningTask, config: PlannerConfig) -> Self {
        let graph = SearchGraph::new(task);
        let mut frontier = VecDeque::new();
        frontier.push_back(graph.root().id());
        Self {
            task,
            config,
            graph,
            updater: ProductUpdater::new(task),
            frontier,
            leaves: BTreeSet::new(),
            goal_depth: None,
            limit: config.max_depth,
            phase: PlannerPhase::Expanding,
            iterations: 0,
            pruned_edges: 0,
        }
    }

    fn unsolvable(&self, reason: &str) -> PlanningError {
        warn!(depth = self.limit, iterations = self.iterations, reason, "planning failed");
        PlanningError::UnsolvableTask {
            depth: self.limit,
            reason: reason.to_string(),
        }
    }

    fn root_settled(&self) -> bool {
        let arena = self.graph.arena();
        self.graph
            .root()
            .state()
            .worlds()
            .iter()
            .all(|w| arena[*w].cost.is_settled())
    }

    fn root_designated_dead(&self) -> bool {
        let arena = self.graph.arena();
        self.graph
            .root()
            .state()
            .designated()
            .iter()
            .all(|w| arena[*w].cost == Cost::Infinity)
    }

    fn execute(mut self) -> PlanResult<SearchGraph> {
        info!(
            actions = self.task.actions().len(),
            worlds = self.task.initial_state().worlds().len(),
            max_depth = self.config.max_depth,
            "planning started"
        );

        loop {
            self.iterations += 1;
            if self.iterations > self.config.max_iterations {
                return Err(self.unsolvable("iteration bound exhausted").into());
            }

            self.phase = PlannerPhase::Expanding;
            self.build_tree()?;
            self.phase = PlannerPhase::CostingPending;
            self.compute_costs()?;

            if self.root_settled() {
                break;
            }
            if self.frontier.is_empty() {
                return Err(self.unsolvable("root costs provisional with an empty frontier").into());
            }
            if self.limit >= self.config.max_depth {
                return Err(self.unsolvable("depth bound reached with provisional root costs").into());
            }
            self.limit += 1;
            self.leaves.clear();
            info!(
                iteration = self.iterations,
                cutoff = self.limit,
                nodes = self.graph.len(),
                "root costs provisional, deepening"
            );
        }

        let root_cost = self.graph.root().cost;
        if self.root_designated_dead() {
            return Err(self.unsolvable("goal unreachable from every designated root world").into());
        }

        self.prune()?;
        self.phase = PlannerPhase::Pruned;

        self.graph.stats = PlanStats {
            iterations: self.iterations,
            goal_depth: self.goal_depth,
            cutoff_depth: self.limit,
            nodes: self.graph.len(),
            worlds: self.graph.arena().world_count(),
            pruned_edges: self.pruned_edges,
            resolved_events: self.updater.resolved_count(),
        };
        info!(
            root_cost = %root_cost,
            iterations = self.iterations,
            nodes = self.graph.len(),
            pruned_edges = self.pruned_edges,
            phase = ?self.phase,
            "planning finished"
        );
        Ok(self.graph)
    }
}
