//! The forward-induction search tree.
//!
//! Nodes are appended in breadth-first order, so node ids are sorted by
//! non-decreasing depth. The planner relies on this: walking ids backwards
//! visits children before parents, walking forwards visits parents first.

use std::ops::Index;

use crate::cost::Cost;
use crate::error::{ModelError, PlanningError};
use crate::model::{ActionId, EdgeId, State, WorldArena, WorldId};
use crate::planner::PlanStats;
use crate::task::{PlanningTask, TaskFingerprint};

use super::node::{Node, NodeId};

/// A tree of epistemic states plus the arena holding their worlds.
#[derive(Debug, Clone)]
pub struct SearchGraph {
    nodes: Vec<Node>,
    arena: WorldArena,
    fingerprint: TaskFingerprint,
    pub(crate) stats: PlanStats,
}

impl SearchGraph {
    /// A graph holding only the task's initial state.
    #[must_use]
    pub fn new(task: &PlanningTask) -> Self {
        let root = Node::new(NodeId::from_index(0), task.initial_state().clone(), None, 0, None);
        Self {
            nodes: vec![root],
            arena: task.arena().clone(),
            fingerprint: task.fingerprint(),
            stats: PlanStats::default(),
        }
    }

    /// Appends a child of `parent` reached by `action`.
    pub(crate) fn add_child(&mut self, parent: NodeId, action: ActionId, state: State) -> Result<NodeId, PlanningError> {
        let id = NodeId::from_index(self.nodes.len());
        if id.index() != self.nodes.len() {
            return Err(PlanningError::SearchLimitExceeded {
                limit_type: "node ids".to_string(),
                max_value: u32::MAX as usize,
                actual_value: self.nodes.len(),
            });
        }
        let depth = self.nodes[parent.index()].depth() + 1;
        self.nodes.push(Node::new(id, state, Some(parent), depth, Some(action)));
        self.nodes[parent.index()].push_child(id);
        Ok(id)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// The node with id `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// All nodes in breadth-first order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Worlds and provenance edges of every node.
    #[must_use]
    pub fn arena(&self) -> &WorldArena {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut WorldArena {
        &mut self.arena
    }

    /// Split borrow of one node and the arena.
    pub(crate) fn node_and_arena_mut(&mut self, id: NodeId) -> (&mut Node, &mut WorldArena) {
        (&mut self.nodes[id.index()], &mut self.arena)
    }

    /// Fingerprint of the task this graph was built for.
    #[must_use]
    pub const fn fingerprint(&self) -> TaskFingerprint {
        self.fingerprint
    }

    /// Statistics of the planning run that built this graph.
    #[must_use]
    pub const fn stats(&self) -> &PlanStats {
        &self.stats
    }

    /// Deepest node depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.nodes.last().map_or(0, Node::depth)
    }

    /// The child of `node` reached by `action`.
    #[must_use]
    pub fn child_by_action(&self, node: NodeId, action: ActionId) -> Option<NodeId> {
        self.node(node)?
            .children()
            .iter()
            .copied()
            .find(|c| self.nodes[c.index()].action() == Some(action))
    }

    /// Like [`Self::child_by_action`] but failing on a missing child.
    pub fn expect_child(&self, node: NodeId, action: ActionId) -> Result<NodeId, ModelError> {
        self.child_by_action(node, action)
            .ok_or(ModelError::MissingChild {
                node: node.index(),
                action: action.index(),
            })
    }

    /// Designated worlds of `node` whose creating edge survived pruning.
    #[must_use]
    pub fn live_designated(&self, node: NodeId) -> Vec<WorldId> {
        self.node(node).map_or_else(Vec::new, |n| {
            n.state()
                .designated()
                .iter()
                .copied()
                .filter(|w| !self.arena[*w].pruned)
                .collect()
        })
    }

    /// Unpruned outgoing edges of the live designated worlds of `node`.
    #[must_use]
    pub fn unpruned_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.live_designated(node)
            .into_iter()
            .flat_map(|w| self.arena[w].outgoing().iter().copied())
            .filter(|e| !self.arena[*e].pruned)
            .collect()
    }

    /// Worst cost over the designated worlds of `node`.
    #[must_use]
    pub fn designated_cost(&self, node: NodeId) -> Cost {
        self.node(node).map_or(Cost::Undefined, |n| {
            n.state()
                .designated()
                .iter()
                .map(|w| self.arena[*w].cost)
                .max()
                .unwrap_or(Cost::Undefined)
        })
    }
}

impl Index<NodeId> for SearchGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
