//! Product update: how a state changes when an action happens.
//!
//! For a state `S = (W, Wd, R)` and an action `A = (E, Ed, Q)` the updated
//! state has one world per pair `(w, e)` whose precondition holds at `w`.
//! The child keeps `w`'s valuation except for `e`'s effects, is designated
//! iff `w ∈ Wd` and `e ∈ Ed`, and two children are indistinguishable for an
//! agent iff both their parent worlds and their events are.
//!
//! An update that yields no designated world means the action does not
//! apply; that is reported as `None`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tracing::trace;

use crate::agent::Agent;
use crate::error::{ModelError, PlanResult};
use crate::model::{Action, ActionId, EventId, ResolvedEvent, State, WorldArena, WorldId};
use crate::predicate::Valuation;
use crate::task::PlanningTask;

struct Candidate {
    parent: WorldId,
    event: EventId,
    valuation: Valuation,
    designated: bool,
}

/// Applies actions of one task, memoizing dynamic event resolution.
///
/// A dynamic event is resolved at most once per (world, action, event).
#[derive(Debug)]
pub struct ProductUpdater<'t> {
    task: &'t PlanningTask,
    resolved: HashMap<(WorldId, ActionId, EventId), Arc<ResolvedEvent>>,
}

impl<'t> ProductUpdater<'t> {
    /// Creates an updater for `task`.
    #[must_use]
    pub fn new(task: &'t PlanningTask) -> Self {
        Self {
            task,
            resolved: HashMap::new(),
        }
    }

    /// The task whose actions are applied.
    #[must_use]
    pub const fn task(&self) -> &'t PlanningTask {
        self.task
    }

    /// Number of memoized dynamic resolutions.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    fn action(&self, id: ActionId) -> Result<&'t Action, ModelError> {
        self.task
            .action(id)
            .ok_or(ModelError::ActionNotFound { action: id.index() })
    }

    /// Precondition and effects of `event` of `action` at `world`.
    pub fn resolve(
        &mut self,
        arena: &WorldArena,
        world: WorldId,
        action: ActionId,
        event: EventId,
    ) -> Result<Arc<ResolvedEvent>, ModelError> {
        let task = self.task;
        let ev = self
            .action(action)?
            .event(event)
            .ok_or(ModelError::ActionNotFound { action: action.index() })?;
        if !ev.is_dynamic() {
            return Ok(ev.resolve(&arena[world], task));
        }
        let resolved = self
            .resolved
            .entry((world, action, event))
            .or_insert_with(|| ev.resolve(&arena[world], task));
        Ok(Arc::clone(resolved))
    }

    /// Returns the resolved event if its precondition holds at `world`.
    fn fires(
        &mut self,
        arena: &WorldArena,
        state: &State,
        world: WorldId,
        action: ActionId,
        event: EventId,
    ) -> PlanResult<Option<Arc<ResolvedEvent>>> {
        let resolved = self.resolve(arena, world, action, event)?;
        if resolved.precondition.evaluate(arena, state, world)? {
            Ok(Some(resolved))
        } else {
            Ok(None)
        }
    }

    /// True iff every designated world has a designated event whose
    /// precondition holds there.
    ///
    /// Run this on the acting agent's perspective of the state.
    pub fn is_applicable(&mut self, arena: &WorldArena, state: &State, action: ActionId) -> PlanResult<bool> {
        let act = self.action(action)?;
        for &world in state.designated() {
            let mut found = false;
            for &event in act.designated() {
                if self.fires(arena, state, world, action, event)?.is_some() {
                    found = true;
                    break;
                }
            }
            if !found {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True iff some event of some action has its precondition hold at `world`.
    pub fn has_applicable_event(&mut self, arena: &WorldArena, state: &State, world: WorldId) -> PlanResult<bool> {
        for action_id in self.task.action_ids() {
            let act = self.action(action_id)?;
            for event in act.events() {
                if self.fires(arena, state, world, action_id, event.id())?.is_some() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Computes `state ⊗ action`, allocating the child worlds in `arena`.
    ///
    /// Returns `None` without touching the arena if no child world would be
    /// designated.
    pub fn apply(&mut self, arena: &mut WorldArena, state: &State, action: ActionId) -> PlanResult<Option<State>> {
        let act = self.action(action)?;

        let mut candidates = Vec::new();
        for &world in state.worlds() {
            for event in act.events() {
                let Some(resolved) = self.fires(arena, state, world, action, event.id())? else {
                    continue;
                };
                candidates.push(Candidate {
                    parent: world,
                    event: event.id(),
                    valuation: arena[world].valuation().apply(&resolved.effects),
                    designated: state.is_designated(world) && act.is_designated(event.id()),
                });
            }
        }

        if !candidates.iter().any(|c| c.designated) {
            trace!(action = act.name(), candidates = candidates.len(), "action not applicable");
            return Ok(None);
        }

        // Agents known to both relations; others only keep reflexive pairs.
        let shared: Vec<Agent> = state
            .agents()
            .filter(|a| act.relation().has_agent(a))
            .cloned()
            .collect();
        let mut world_classes: Vec<BTreeMap<WorldId, BTreeSet<WorldId>>> = Vec::with_capacity(shared.len());
        let mut event_classes: Vec<BTreeMap<EventId, BTreeSet<EventId>>> = Vec::with_capacity(shared.len());
        for agent in &shared {
            let mut worlds = BTreeMap::new();
            let mut events = BTreeMap::new();
            for c in &candidates {
                if !worlds.contains_key(&c.parent) {
                    worlds.insert(c.parent, state.relation().accessible(agent, c.parent)?);
                }
                if !events.contains_key(&c.event) {
                    events.insert(c.event, act.relation().accessible(agent, c.event)?);
                }
            }
            world_classes.push(worlds);
            event_classes.push(events);
        }

        let owner = act.owner().clone();
        let mut children = Vec::with_capacity(candidates.len());
        let mut designated = BTreeSet::new();
        for c in &candidates {
            let child = arena.add_child(c.parent, c.event, action, owner.clone(), c.valuation.clone());
            if c.designated {
                designated.insert(child);
            }
            children.push(child);
        }

        let mut relation = state.relation().copy_empty(children.iter().copied());
        for (k, agent) in shared.iter().enumerate() {
            for i in 0..candidates.len() {
                for j in (i + 1)..candidates.len() {
                    let (ci, cj) = (&candidates[i], &candidates[j]);
                    let worlds_related = world_classes[k]
                        .get(&ci.parent)
                        .is_some_and(|class| class.contains(&cj.parent));
                    let events_related = event_classes[k]
                        .get(&ci.event)
                        .is_some_and(|class| class.contains(&cj.event));
                    if worlds_related && events_related {
                        relation.add_edge(agent, children[i], children[j])?;
                    }
                }
            }
        }

        trace!(
            action = act.name(),
            worlds = children.len(),
            designated = designated.len(),
            "product update"
        );
        Ok(Some(State::new(children, designated, relation)?))
    }
}
