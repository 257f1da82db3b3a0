//! Worlds, provenance edges and the arena that owns them.
//!
//! Product update links every child world to the world and event it came
//! from, and every parent world to all of its children. Those links form a
//! cyclic graph, so worlds and edges live in a [`WorldArena`] and refer to
//! each other by index.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::cost::Cost;
use crate::predicate::Valuation;

use super::action::ActionId;
use super::event::EventId;

/// Arena handle of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(u32);

impl WorldId {
    /// Position of the world in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Arena handle of a provenance edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Position of the edge in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A possible world.
#[derive(Debug, Clone)]
pub struct World {
    /// Arena handle.
    pub id: WorldId,
    valuation: Valuation,
    incoming: Option<EdgeId>,
    outgoing: Vec<EdgeId>,
    /// Best cost to the goal, written during cost computation.
    pub cost: Cost,
    /// Worst cost per agent over what the agent cannot distinguish, written during pruning.
    pub agent_costs: BTreeMap<Agent, Cost>,
    /// Set during pruning when the edge that created this world was pruned.
    pub pruned: bool,
}

impl World {
    /// Truth assignment of this world.
    #[must_use]
    pub fn valuation(&self) -> &Valuation {
        &self.valuation
    }

    /// The edge this world was created by, absent for initial worlds.
    #[must_use]
    pub const fn incoming(&self) -> Option<EdgeId> {
        self.incoming
    }

    /// Edges to the worlds created from this one.
    #[must_use]
    pub fn outgoing(&self) -> &[EdgeId] {
        &self.outgoing
    }
}

/// Provenance link from a parent world to a child created by product update.
#[derive(Debug, Clone)]
pub struct WorldEdge {
    /// Arena handle.
    pub id: EdgeId,
    /// The world created by the update.
    pub child: WorldId,
    /// The world the child was created from.
    pub parent: WorldId,
    /// The event that fired.
    pub event: EventId,
    /// The action the event belongs to.
    pub action: ActionId,
    /// The agent that performed the action.
    pub agent: Agent,
    /// Child cost plus one, written during cost computation.
    pub cost: Cost,
    /// Set when a rational owner would never take this edge.
    pub pruned: bool,
}

/// Owner of all worlds and edges of a planning run.
#[derive(Debug, Clone, Default)]
pub struct WorldArena {
    worlds: Vec<World>,
    edges: Vec<WorldEdge>,
}

impl WorldArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_world_id(&self) -> WorldId {
        WorldId(u32::try_from(self.worlds.len()).unwrap_or(u32::MAX))
    }

    /// Adds a world without provenance.
    pub fn add_world(&mut self, valuation: Valuation) -> WorldId {
        let id = self.next_world_id();
        self.worlds.push(World {
            id,
            valuation,
            incoming: None,
            outgoing: Vec::new(),
            cost: Cost::Undefined,
            agent_costs: BTreeMap::new(),
            pruned: false,
        });
        id
    }

    /// Adds a world created from `parent` by `event` of `action`, linking both ways.
    pub fn add_child(
        &mut self,
        parent: WorldId,
        event: EventId,
        action: ActionId,
        agent: Agent,
        valuation: Valuation,
    ) -> WorldId {
        let child = self.add_world(valuation);
        let edge = EdgeId(u32::try_from(self.edges.len()).unwrap_or(u32::MAX));
        self.edges.push(WorldEdge {
            id: edge,
            child,
            parent,
            event,
            action,
            agent,
            cost: Cost::Undefined,
            pruned: false,
        });
        self.worlds[child.index()].incoming = Some(edge);
        self.worlds[parent.index()].outgoing.push(edge);
        child
    }

    /// Returns true if `id` was minted by this arena.
    #[must_use]
    pub fn contains(&self, id: WorldId) -> bool {
        id.index() < self.worlds.len()
    }

    /// Number of worlds.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates all worlds.
    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.iter()
    }

    /// Iterates all edges.
    pub fn edges(&self) -> impl Iterator<Item = &WorldEdge> {
        self.edges.iter()
    }

    /// Parent world of `id`, if it was produced by an update.
    #[must_use]
    pub fn parent_of(&self, id: WorldId) -> Option<WorldId> {
        self[id].incoming.map(|e| self[e].parent)
    }

    /// Returns true if the edge that created `id` is pruned.
    #[must_use]
    pub fn incoming_pruned(&self, id: WorldId) -> bool {
        self[id].incoming.is_some_and(|e| self[e].pruned)
    }

    /// Resets every cost field.
    pub fn reset_costs(&mut self) {
        for world in &mut self.worlds {
            world.cost = Cost::Undefined;
        }
        for edge in &mut self.edges {
            edge.cost = Cost::Undefined;
        }
    }

    /// Resets every pruning mark and per-agent cost.
    pub fn reset_pruning(&mut self) {
        for world in &mut self.worlds {
            world.pruned = false;
            world.agent_costs.clear();
        }
        for edge in &mut self.edges {
            edge.pruned = false;
        }
    }
}

impl Index<WorldId> for WorldArena {
    type Output = World;

    fn index(&self, id: WorldId) -> &World {
        &self.worlds[id.index()]
    }
}

impl IndexMut<WorldId> for WorldArena {
    fn index_mut(&mut self, id: WorldId) -> &mut World {
        &mut self.worlds[id.index()]
    }
}

impl Index<EdgeId> for WorldArena {
    type Output = WorldEdge;

    fn index(&self, id: EdgeId) -> &WorldEdge {
        &self.edges[id.index()]
    }
}

impl IndexMut<EdgeId> for WorldArena {
    fn index_mut(&mut self, id: EdgeId) -> &mut WorldEdge {
        &mut self.edges[id.index()]
    }
}
