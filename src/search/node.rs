//! Search nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::model::{ActionId, State};

/// Index of a node in its [`super::SearchGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of the node in the graph.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A state in the search tree together with how it was reached.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    state: State,
    parent: Option<NodeId>,
    depth: usize,
    action: Option<ActionId>,
    children: Vec<NodeId>,
    /// Worst cost over the designated worlds, written during cost computation.
    pub cost: Cost,
}

impl Node {
    pub(crate) fn new(id: NodeId, state: State, parent: Option<NodeId>, depth: usize, action: Option<ActionId>) -> Self {
        Self {
            id,
            state,
            parent,
            depth,
            action,
            children: Vec::new(),
            cost: Cost::Undefined,
        }
    }

    /// This node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The epistemic state at this node.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Parent node; `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The action that produced this node from its parent.
    #[must_use]
    pub const fn action(&self) -> Option<ActionId> {
        self.action
    }

    /// Children in creation order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Returns true for the root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
