//! Per-agent accessibility relations.
//!
//! Relations are stored as sets of unordered pairs. Only "base" edges are
//! materialized; symmetry and transitivity are realized by the traversal in
//! [`AccessibilityRelation::accessible`], so two nodes joined by a chain of
//! stored edges are related even though no edge between them is stored.
//!
//! Every agent key carries a reflexive pair for every node the relation has
//! ever seen.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Debug;

use crate::agent::Agent;
use crate::error::ModelError;

/// How a reachability query treats cut edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Walk every stored edge.
    Full,
    /// Skip edges that have been cut.
    RespectCuts,
}

fn normalize<N: Ord>(a: N, b: N) -> (N, N) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Indistinguishability relation for a set of agents over nodes of type `N`.
#[derive(Debug, Clone)]
pub struct AccessibilityRelation<N> {
    nodes: BTreeSet<N>,
    edges: BTreeMap<Agent, BTreeSet<(N, N)>>,
    cut: BTreeMap<Agent, BTreeSet<(N, N)>>,
}

impl<N> Default for AccessibilityRelation<N> {
    fn default() -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
            cut: BTreeMap::new(),
        }
    }
}

impl<N> AccessibilityRelation<N>
where
    N: Copy + Ord + Debug,
{
    /// Creates a relation over `nodes` for `agents` containing only reflexive pairs.
    pub fn new(
        agents: impl IntoIterator<Item = Agent>,
        nodes: impl IntoIterator<Item = N>,
    ) -> Self {
        let mut relation = Self {
            nodes: nodes.into_iter().collect(),
            ..Self::default()
        };
        for agent in agents {
            relation.add_agent(agent);
        }
        relation
    }

    /// Registers an agent with reflexive pairs for every known node.
    pub fn add_agent(&mut self, agent: Agent) {
        let pairs = self.edges.entry(agent).or_default();
        for &n in &self.nodes {
            pairs.insert((n, n));
        }
    }

    /// Registers a node and gives it a reflexive pair for every agent.
    pub fn add_node(&mut self, node: N) {
        self.nodes.insert(node);
        for pairs in self.edges.values_mut() {
            pairs.insert((node, node));
        }
    }

    /// Returns true if `agent` is a key of this relation.
    #[must_use]
    pub fn has_agent(&self, agent: &Agent) -> bool {
        self.edges.contains_key(agent)
    }

    /// Agents in key order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.edges.keys()
    }

    /// Nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().copied()
    }

    fn pairs(&self, agent: &Agent) -> Result<&BTreeSet<(N, N)>, ModelError> {
        self.edges.get(agent).ok_or_else(|| ModelError::AgentNotFound {
            agent: agent.clone(),
        })
    }

    /// Stored pairs for `agent`, reflexive ones included.
    pub fn stored_edges(&self, agent: &Agent) -> Result<impl Iterator<Item = (N, N)> + '_, ModelError> {
        Ok(self.pairs(agent)?.iter().copied())
    }

    /// Returns true if `(a, b)` is stored in either orientation.
    pub fn contains_edge(&self, agent: &Agent, a: N, b: N) -> Result<bool, ModelError> {
        Ok(self.pairs(agent)?.contains(&normalize(a, b)))
    }

    /// Stores the edge `(a, b)` for `agent` unless one orientation is
    /// already present, then adds the reflexive pairs of both endpoints.
    pub fn add_edge(&mut self, agent: &Agent, a: N, b: N) -> Result<(), ModelError> {
        if !self.edges.contains_key(agent) {
            return Err(ModelError::AgentNotFound {
                agent: agent.clone(),
            });
        }
        self.add_node(a);
        self.add_node(b);
        if let Some(pairs) = self.edges.get_mut(agent) {
            pairs.insert(normalize(a, b));
        }
        Ok(())
    }

    /// Removes the edge `(a, b)` in whichever orientation it is stored.
    ///
    /// Returns whether an edge was removed.
    pub fn remove_edge(&mut self, agent: &Agent, a: N, b: N) -> Result<bool, ModelError> {
        let pairs = self
            .edges
            .get_mut(agent)
            .ok_or_else(|| ModelError::AgentNotFound {
                agent: agent.clone(),
            })?;
        Ok(pairs.remove(&normalize(a, b)))
    }

    /// Marks an edge as cut. Cut edges stay stored but can be skipped by traversal.
    pub fn cut_edge(&mut self, agent: &Agent, a: N, b: N) -> Result<(), ModelError> {
        if !self.edges.contains_key(agent) {
            return Err(ModelError::AgentNotFound {
                agent: agent.clone(),
            });
        }
        self.cut.entry(agent.clone()).or_default().insert(normalize(a, b));
        Ok(())
    }

    /// Cuts every non-reflexive edge of every agent that touches a node in `nodes`.
    pub fn cut_edges_touching(&mut self, nodes: &BTreeSet<N>) {
        for (agent, pairs) in &self.edges {
            let touching: Vec<(N, N)> = pairs
                .iter()
                .copied()
                .filter(|(a, b)| a != b && (nodes.contains(a) || nodes.contains(b)))
                .collect();
            if !touching.is_empty() {
                self.cut.entry(agent.clone()).or_default().extend(touching);
            }
        }
    }

    /// Removes every cut mark.
    pub fn clear_cuts(&mut self) {
        self.cut.clear();
    }

    /// Number of cut edges for `agent`.
    #[must_use]
    pub fn cut_count(&self, agent: &Agent) -> usize {
        self.cut.get(agent).map_or(0, BTreeSet::len)
    }

    /// All nodes `agent` cannot distinguish from `from`, `from` included.
    pub fn accessible(&self, agent: &Agent, from: N) -> Result<BTreeSet<N>, ModelError> {
        self.reach(agent, from, Traversal::Full)
    }

    /// Like [`Self::accessible`] but ignoring cut edges.
    pub fn accessible_uncut(&self, agent: &Agent, from: N) -> Result<BTreeSet<N>, ModelError> {
        self.reach(agent, from, Traversal::RespectCuts)
    }

    /// Returns true if `a` and `b` are indistinguishable for `agent`.
    pub fn is_related(&self, agent: &Agent, a: N, b: N) -> Result<bool, ModelError> {
        if a == b {
            self.pairs(agent)?;
            return Ok(true);
        }
        Ok(self.accessible(agent, a)?.contains(&b))
    }

    /// Breadth-first walk over the undirected stored edges.
    pub fn reach(&self, agent: &Agent, from: N, traversal: Traversal) -> Result<BTreeSet<N>, ModelError> {
        let pairs = self.pairs(agent)?;
        let cut = match traversal {
            Traversal::Full => None,
            Traversal::RespectCuts => self.cut.get(agent),
        };

        let mut adjacency: BTreeMap<N, Vec<N>> = BTreeMap::new();
        for &(a, b) in pairs {
            if a == b || cut.is_some_and(|c| c.contains(&(a, b))) {
                continue;
            }
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);
        while let Some(node) = queue.pop_front() {
            if let Some(next) = adjacency.get(&node) {
                for &n in next {
                    if seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        Ok(seen)
    }

    /// A relation with the same agent keys and only reflexive pairs for `nodes`.
    pub fn copy_empty<M>(&self, nodes: impl IntoIterator<Item = M>) -> AccessibilityRelation<M>
    where
        M: Copy + Ord + Debug,
    {
        AccessibilityRelation::new(self.edges.keys().cloned(), nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(nodes: &[u32]) -> (Agent, AccessibilityRelation<u32>) {
        let a = Agent::new("a");
        let r = AccessibilityRelation::new([a.clone()], nodes.iter().copied());
        (a, r)
    }

    #[test]
    fn test_new_relation_is_reflexive() {
        let (a, r) = rel(&[1, 2, 3]);
        for n in [1, 2, 3] {
            assert!(r.contains_edge(&a, n, n).unwrap());
            assert_eq!(r.accessible(&a, n).unwrap(), BTreeSet::from([n]));
        }
    }

    #[test]
    fn test_transitive_closure_by_traversal() {
        let (a, mut r) = rel(&[1, 2, 3]);
        r.add_edge(&a, 1, 2).unwrap();
        r.add_edge(&a, 3, 2).unwrap();
        assert!(!r.contains_edge(&a, 1, 3).unwrap());
        assert!(r.accessible(&a, 1).unwrap().contains(&3));
        assert!(r.is_related(&a, 3, 1).unwrap());
    }

    #[test]
    fn test_edge_insertion_is_orientation_idempotent() {
        let (a, mut r) = rel(&[1, 2]);
        r.add_edge(&a, 1, 2).unwrap();
        r.add_edge(&a, 2, 1).unwrap();
        let non_reflexive: Vec<_> = r
            .stored_edges(&a)
            .unwrap()
            .filter(|(x, y)| x != y)
            .collect();
        assert_eq!(non_reflexive.len(), 1);
    }

    #[test]
    fn test_add_edge_forces_reflexivity_of_new_nodes() {
        let (a, mut r) = rel(&[]);
        r.add_edge(&a, 7, 8).unwrap();
        assert!(r.contains_edge(&a, 7, 7).unwrap());
        assert!(r.contains_edge(&a, 8, 8).unwrap());
    }

    #[test]
    fn test_remove_edge_either_orientation() {
        let (a, mut r) = rel(&[1, 2]);
        r.add_edge(&a, 1, 2).unwrap();
        assert!(r.remove_edge(&a, 2, 1).unwrap());
        assert!(!r.is_related(&a, 1, 2).unwrap());
        assert!(!r.remove_edge(&a, 1, 2).unwrap());
    }

    #[test]
    fn test_unknown_agent_is_an_error() {
        let (_, mut r) = rel(&[1]);
        let ghost = Agent::new("ghost");
        assert!(matches!(
            r.accessible(&ghost, 1),
            Err(ModelError::AgentNotFound { .. })
        ));
        assert!(r.add_edge(&ghost, 1, 1).is_err());
        assert!(r.remove_edge(&ghost, 1, 1).is_err());
    }

    #[test]
    fn test_cut_edges_only_affect_uncut_traversal() {
        let (a, mut r) = rel(&[1, 2, 3]);
        r.add_edge(&a, 1, 2).unwrap();
        r.add_edge(&a, 2, 3).unwrap();
        r.cut_edges_touching(&BTreeSet::from([2]));

        assert_eq!(r.accessible(&a, 1).unwrap().len(), 3);
        assert_eq!(r.accessible_uncut(&a, 1).unwrap(), BTreeSet::from([1]));
        assert_eq!(r.cut_count(&a), 2);

        r.clear_cuts();
        assert_eq!(r.accessible_uncut(&a, 1).unwrap().len(), 3);
    }

    #[test]
    fn test_copy_empty_keeps_agents_only() {
        let (a, mut r) = rel(&[1, 2]);
        r.add_edge(&a, 1, 2).unwrap();
        let fresh: AccessibilityRelation<u32> = r.copy_empty([10, 11]);
        assert!(fresh.has_agent(&a));
        assert!(!fresh.is_related(&a, 10, 11).unwrap());
        assert!(fresh.contains_edge(&a, 10, 10).unwrap());
    }
}
