//! Tree construction (BuildTree).

use tracing::{debug, info};

use crate::error::{PlanResult, PlanningError};
use crate::search::NodeId;

use super::PlanRun;

impl PlanRun<'_> {
    /// Expands frontier nodes shallower than the current depth bound.
    ///
    /// The first child state containing any goal world fixes the bound to
    /// that child's depth. Afterwards every frontier node sitting exactly
    /// at the bound becomes a leaf for cost computation.
    pub(super) fn build_tree(&mut self) -> PlanResult<()> {
        while let Some(&head) = self.frontier.front() {
            if self.graph[head].depth() >= self.limit {
                break;
            }
            self.frontier.pop_front();
            self.expand(head)?;
        }

        let limit = self.limit;
        let graph = &self.graph;
        self.leaves = self
            .frontier
            .iter()
            .copied()
            .filter(|n| graph[*n].depth() == limit)
            .collect();
        debug!(leaves = self.leaves.len(), cutoff = limit, "tree built");
        Ok(())
    }

    fn expand(&mut self, node: NodeId) -> PlanResult<()> {
        let task = self.task;
        let depth = self.graph[node].depth();
        let goal = task.goal();

        for action_id in task.action_ids() {
            let Some(action) = task.action(action_id) else {
                continue;
            };
            let shifted = self.graph[node].state().perspective(action.owner())?;
            if !self.updater.is_applicable(self.graph.arena(), &shifted, action_id)? {
                continue;
            }
            if self.graph.len() >= self.config.max_nodes {
                return Err(PlanningError::SearchLimitExceeded {
                    limit_type: "nodes".to_string(),
                    max_value: self.config.max_nodes,
                    actual_value: self.graph.len() + 1,
                }
                .into());
            }
            let Some(next) = self.updater.apply(self.graph.arena_mut(), &shifted, action_id)? else {
                continue;
            };

            if self.goal_depth.is_none() && !next.worlds_satisfying(self.graph.arena(), goal)?.is_empty() {
                let goal_depth = depth + 1;
                self.goal_depth = Some(goal_depth);
                self.limit = self.limit.min(goal_depth);
                info!(depth = goal_depth, action = action.name(), "first goal world found");
            }

            let child = self.graph.add_child(node, action_id, next)?;
            self.frontier.push_back(child);
            debug!(
                parent = %node,
                child = %child,
                depth = depth + 1,
                action = action.name(),
                "expanded"
            );
        }
        Ok(())
    }
}
