//! Top-down pruning of irrational edges (Prune).

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::agent::Agent;
use crate::cost::Cost;
use crate::error::{ModelError, PlanResult};
use crate::model::{EdgeId, WorldId};
use crate::search::NodeId;

use super::PlanRun;

impl PlanRun<'_> {
    /// Marks every edge whose owner can guarantee a strictly cheaper outcome
    /// given what it cannot distinguish.
    ///
    /// Nodes are visited parents first, so a world whose creating edge was
    /// pruned is known to be pruned before its own node is visited.
    pub(super) fn prune(&mut self) -> PlanResult<()> {
        self.graph.arena_mut().reset_pruning();
        self.pruned_edges = 0;

        for index in 0..self.graph.len() {
            let id = NodeId::from_index(index);
            self.pruned_edges += self.prune_node(id)?;
        }

        info!(pruned_edges = self.pruned_edges, "pruning done");
        Ok(())
    }

    fn prune_node(&mut self, id: NodeId) -> Result<usize, ModelError> {
        let (node, arena) = self.graph.node_and_arena_mut(id);
        let worlds: Vec<WorldId> = node.state().worlds().to_vec();

        let mut dead = BTreeSet::new();
        for &w in &worlds {
            if arena.incoming_pruned(w) {
                arena[w].pruned = true;
                dead.insert(w);
            }
        }

        let relation = node.state_mut().relation_mut();
        relation.clear_cuts();
        relation.cut_edges_touching(&dead);
        let agents: Vec<Agent> = relation.agents().cloned().collect();

        let mut pruned = 0;
        for &w in &worlds {
            let outgoing: Vec<EdgeId> = arena[w].outgoing().to_vec();
            if dead.contains(&w) {
                for e in outgoing {
                    if !arena[e].pruned {
                        arena[e].pruned = true;
                        pruned += 1;
                    }
                }
                continue;
            }

            for agent in &agents {
                let worst = Cost::worst(
                    node.state()
                        .relation()
                        .accessible_uncut(agent, w)?
                        .into_iter()
                        .filter(|v| !dead.contains(v))
                        .map(|v| arena[v].cost),
                );
                arena[w].agent_costs.insert(agent.clone(), worst);
            }

            for e in outgoing {
                let owner = arena[e].agent.clone();
                let guaranteed = *arena[w]
                    .agent_costs
                    .get(&owner)
                    .ok_or_else(|| ModelError::AgentNotFound { agent: owner.clone() })?;
                if guaranteed.is_strictly_below(arena[e].cost) {
                    arena[e].pruned = true;
                    pruned += 1;
                }
            }
        }

        if pruned > 0 {
            debug!(node = %id, pruned, dead = dead.len(), "edges pruned");
        }
        Ok(pruned)
    }
}
