//! Epistemic states: possible worlds, designated worlds and accessibility.

use std::collections::BTreeSet;

use crate::agent::Agent;
use crate::error::{ModelError, ValidationError};
use crate::formula::Formula;

use super::accessibility::AccessibilityRelation;
use super::epistemic::EpistemicModel;
use super::world::{WorldArena, WorldId};

/// A pointed epistemic model over worlds stored in a [`WorldArena`].
#[derive(Debug, Clone)]
pub struct State {
    model: EpistemicModel<WorldId>,
}

impl State {
    /// Builds a state.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MalformedState` if a designated world is not
    /// possible, a world is listed twice, or the relation mentions a world
    /// that is not possible.
    pub fn new(
        worlds: Vec<WorldId>,
        designated: BTreeSet<WorldId>,
        relation: AccessibilityRelation<WorldId>,
    ) -> Result<Self, ValidationError> {
        EpistemicModel::try_new(worlds, designated, relation)
            .map(|model| Self { model })
            .map_err(|reason| ValidationError::MalformedState { reason })
    }

    /// Possible worlds.
    #[must_use]
    pub fn worlds(&self) -> &[WorldId] {
        self.model.possible()
    }

    /// Designated worlds.
    #[must_use]
    pub fn designated(&self) -> &BTreeSet<WorldId> {
        self.model.designated()
    }

    /// Returns true if `world` is designated.
    #[must_use]
    pub fn is_designated(&self, world: WorldId) -> bool {
        self.model.is_designated(world)
    }

    /// World accessibility.
    #[must_use]
    pub fn relation(&self) -> &AccessibilityRelation<WorldId> {
        self.model.relation()
    }

    pub(crate) fn relation_mut(&mut self) -> &mut AccessibilityRelation<WorldId> {
        self.model.relation_mut()
    }

    /// Agents with an accessibility relation in this state.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.model.relation().agents()
    }

    /// Truth of `formula` at `world`.
    pub fn evaluate(&self, arena: &WorldArena, formula: &Formula, world: WorldId) -> Result<bool, ModelError> {
        formula.evaluate(arena, self, world)
    }

    /// Truth of `formula` at every designated world.
    pub fn satisfies(&self, arena: &WorldArena, formula: &Formula) -> Result<bool, ModelError> {
        for &world in self.designated() {
            if !formula.evaluate(arena, self, world)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Possible worlds where `formula` holds.
    pub fn worlds_satisfying(&self, arena: &WorldArena, formula: &Formula) -> Result<Vec<WorldId>, ModelError> {
        let mut out = Vec::new();
        for &world in self.worlds() {
            if formula.evaluate(arena, self, world)? {
                out.push(world);
            }
        }
        Ok(out)
    }

    /// The state as `agent` sees it: every world the agent cannot tell apart
    /// from a designated world becomes designated.
    pub fn perspective(&self, agent: &Agent) -> Result<Self, ModelError> {
        let mut designated = BTreeSet::new();
        for &world in self.designated() {
            designated.extend(self.relation().accessible(agent, world)?);
        }
        let model = self.model.redesignate(designated);
        Ok(Self { model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Valuation;

    #[test]
    fn test_malformed_state_is_rejected() {
        let mut arena = WorldArena::new();
        let w = arena.add_world(Valuation::new());
        let u = arena.add_world(Valuation::new());
        let rel = AccessibilityRelation::new([Agent::new("a")], [w]);
        let err = State::new(vec![w], BTreeSet::from([u]), rel).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedState { .. }));
    }

    #[test]
    fn test_perspective_widens_designated() {
        let a = Agent::new("a");
        let b = Agent::new("b");
        let mut arena = WorldArena::new();
        let w = arena.add_world(Valuation::new());
        let u = arena.add_world(Valuation::new());
        let v = arena.add_world(Valuation::new());
        let mut rel = AccessibilityRelation::new([a.clone(), b.clone()], [w, u, v]);
        rel.add_edge(&a, w, u).unwrap();
        rel.add_edge(&a, u, v).unwrap();
        let state = State::new(vec![w, u, v], BTreeSet::from([w]), rel).unwrap();

        let for_a = state.perspective(&a).unwrap();
        assert_eq!(for_a.designated(), &BTreeSet::from([w, u, v]));
        let for_b = state.perspective(&b).unwrap();
        assert_eq!(for_b.designated(), &BTreeSet::from([w]));
        assert!(state.perspective(&Agent::new("c")).is_err());
    }
}
