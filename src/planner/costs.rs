//! Backward induction of world costs (ComputeCosts).

use tracing::debug;

use crate::cost::Cost;
use crate::error::PlanResult;
use crate::model::{EdgeId, WorldId};
use crate::search::NodeId;

use super::PlanRun;

impl PlanRun<'_> {
    /// Recomputes every world, edge and node cost from the leaves upwards.
    ///
    /// Per world:
    /// - goal holds: settled 0;
    /// - no event of any action applies: settled infinity;
    /// - world of a leaf node: provisional 1;
    /// - otherwise the best outgoing edge cost.
    ///
    /// Edge costs are the child world's cost plus one and are written for
    /// every world, goal worlds included, because pruning compares them.
    pub(super) fn compute_costs(&mut self) -> PlanResult<()> {
        let task = self.task;
        let goal = task.goal();
        self.graph.arena_mut().reset_costs();

        // Ids grow with depth, so walking backwards sees children first.
        for index in (0..self.graph.len()).rev() {
            let id = NodeId::from_index(index);
            let is_leaf = self.leaves.contains(&id);
            let worlds: Vec<WorldId> = self.graph[id].state().worlds().to_vec();

            for world in worlds {
                let edge_costs: Vec<(EdgeId, Cost)> = {
                    let arena = self.graph.arena();
                    arena[world]
                        .outgoing()
                        .iter()
                        .map(|&e| (e, arena[arena[e].child].cost.successor()))
                        .collect()
                };

                let cost = {
                    let arena = self.graph.arena();
                    let state = self.graph[id].state();
                    if goal.evaluate(arena, state, world)? {
                        Cost::settled(0)
                    } else if !self.updater.has_applicable_event(arena, state, world)? {
                        Cost::Infinity
                    } else if is_leaf {
                        Cost::range(1)
                    } else {
                        Cost::best(edge_costs.iter().map(|(_, c)| *c))
                    }
                };

                let arena = self.graph.arena_mut();
                for (edge, edge_cost) in edge_costs {
                    arena[edge].cost = edge_cost;
                }
                arena[world].cost = cost;
            }

            let node_cost = self.graph.designated_cost(id);
            self.graph.node_mut(id).cost = node_cost;
        }

        debug!(
            root_cost = %self.graph.root().cost,
            leaves = self.leaves.len(),
            "costs computed"
        );
        Ok(())
    }
}
