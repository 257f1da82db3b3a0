//! The shared shape of states and actions.

use std::collections::BTreeSet;
use std::fmt::Debug;

use super::accessibility::AccessibilityRelation;

/// Possible nodes, designated nodes and an accessibility relation over them.
///
/// `designated ⊆ possible` holds for every value of this type; constructors
/// reject anything else.
#[derive(Debug, Clone)]
pub struct EpistemicModel<N> {
    possible: Vec<N>,
    designated: BTreeSet<N>,
    relation: AccessibilityRelation<N>,
}

impl<N> EpistemicModel<N>
where
    N: Copy + Ord + Debug,
{
    /// Builds a model, describing the first violated invariant on failure.
    pub(crate) fn try_new(
        possible: Vec<N>,
        designated: BTreeSet<N>,
        mut relation: AccessibilityRelation<N>,
    ) -> Result<Self, String> {
        let set: BTreeSet<N> = possible.iter().copied().collect();
        if set.len() != possible.len() {
            return Err("possible nodes contain duplicates".to_string());
        }
        if let Some(stray) = designated.iter().find(|d| !set.contains(d)) {
            return Err(format!("designated {stray:?} is not a possible node"));
        }
        if let Some(stray) = relation.nodes().find(|n| !set.contains(n)) {
            return Err(format!("relation mentions {stray:?} which is not a possible node"));
        }
        for &n in &possible {
            relation.add_node(n);
        }
        Ok(Self {
            possible,
            designated,
            relation,
        })
    }

    /// Possible nodes in insertion order.
    #[must_use]
    pub fn possible(&self) -> &[N] {
        &self.possible
    }

    /// Designated nodes.
    #[must_use]
    pub fn designated(&self) -> &BTreeSet<N> {
        &self.designated
    }

    /// Returns true if `node` is designated.
    #[must_use]
    pub fn is_designated(&self, node: N) -> bool {
        self.designated.contains(&node)
    }

    /// The accessibility relation.
    #[must_use]
    pub fn relation(&self) -> &AccessibilityRelation<N> {
        &self.relation
    }

    pub(crate) fn relation_mut(&mut self) -> &mut AccessibilityRelation<N> {
        &mut self.relation
    }

    /// Same nodes and relation with a different designated set.
    ///
    /// Callers pass nodes drawn from this model's relation, which are always
    /// possible nodes.
    pub(crate) fn redesignate(&self, designated: BTreeSet<N>) -> Self {
        debug_assert!(designated.iter().all(|d| self.possible.contains(d)));
        Self {
            possible: self.possible.clone(),
            designated,
            relation: self.relation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;

    #[test]
    fn test_designated_must_be_possible() {
        let rel = AccessibilityRelation::new([Agent::new("a")], [1u32, 2]);
        let err = EpistemicModel::try_new(vec![1, 2], BTreeSet::from([3]), rel).unwrap_err();
        assert!(err.contains("designated"));
    }

    #[test]
    fn test_relation_nodes_must_be_possible() {
        let rel = AccessibilityRelation::new([Agent::new("a")], [1u32, 2, 9]);
        assert!(EpistemicModel::try_new(vec![1, 2], BTreeSet::from([1]), rel).is_err());
    }

    #[test]
    fn test_missing_reflexive_pairs_are_added() {
        let a = Agent::new("a");
        let rel = AccessibilityRelation::new([a.clone()], [1u32]);
        let model = EpistemicModel::try_new(vec![1, 2], BTreeSet::from([2]), rel).unwrap();
        assert!(model.relation().contains_edge(&a, 2, 2).unwrap());
        assert!(model.is_designated(2));
    }
}
