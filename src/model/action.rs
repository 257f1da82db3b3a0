//! Actions: event models owned by an acting agent.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::ValidationError;
use crate::formula::Formula;
use crate::predicate::Effects;
use crate::task::PlanningTask;

use super::accessibility::AccessibilityRelation;
use super::epistemic::EpistemicModel;
use super::event::{Event, EventId, EventSpec, ResolvedEvent};
use super::world::World;

/// Index of an action in a task's action library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(u32);

impl ActionId {
    /// Wraps a raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Position of the action in the library.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// An action: events, designated events and what each agent can tell apart.
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    owner: Agent,
    events: Vec<Event>,
    model: EpistemicModel<EventId>,
}

impl Action {
    /// Starts building an action performed by `owner`.
    pub fn builder(name: impl Into<String>, owner: Agent) -> ActionBuilder {
        ActionBuilder::new(name, owner)
    }

    /// Action name as it appears in executed traces.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The agent performing the action.
    #[must_use]
    pub fn owner(&self) -> &Agent {
        &self.owner
    }

    /// All events, indexed by [`EventId`].
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The event with id `id`.
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.index())
    }

    /// Designated events.
    #[must_use]
    pub fn designated(&self) -> &BTreeSet<EventId> {
        self.model.designated()
    }

    /// Returns true if `id` is designated.
    #[must_use]
    pub fn is_designated(&self, id: EventId) -> bool {
        self.model.is_designated(id)
    }

    /// Event accessibility.
    #[must_use]
    pub fn relation(&self) -> &AccessibilityRelation<EventId> {
        self.model.relation()
    }
}

/// Incremental constructor for [`Action`].
#[derive(Debug)]
pub struct ActionBuilder {
    name: String,
    owner: Agent,
    events: Vec<Event>,
    designated: BTreeSet<EventId>,
    observers: BTreeSet<Agent>,
    edges: Vec<(Agent, EventId, EventId)>,
}

impl ActionBuilder {
    fn new(name: impl Into<String>, owner: Agent) -> Self {
        let mut observers = BTreeSet::new();
        observers.insert(owner.clone());
        Self {
            name: name.into(),
            owner,
            events: Vec::new(),
            designated: BTreeSet::new(),
            observers,
            edges: Vec::new(),
        }
    }

    fn push(&mut self, name: impl Into<String>, spec: EventSpec) -> EventId {
        let id = EventId::new(u32::try_from(self.events.len()).unwrap_or(u32::MAX));
        self.events.push(Event::new(id, name.into(), spec));
        id
    }

    /// Adds an event with a fixed precondition and effects.
    pub fn event(&mut self, name: impl Into<String>, precondition: Formula, effects: Effects) -> EventId {
        self.push(
            name,
            EventSpec::Static(Arc::new(ResolvedEvent::new(precondition, effects))),
        )
    }

    /// Adds an event whose precondition and effects depend on the world.
    pub fn dynamic_event<F>(&mut self, name: impl Into<String>, resolver: F) -> EventId
    where
        F: Fn(&World, &PlanningTask) -> ResolvedEvent + Send + Sync + 'static,
    {
        self.push(name, EventSpec::Dynamic(Arc::new(resolver)))
    }

    /// Marks an event as designated.
    pub fn designate(&mut self, id: EventId) -> &mut Self {
        self.designated.insert(id);
        self
    }

    /// Marks every event added so far as designated.
    pub fn designate_all(&mut self) -> &mut Self {
        self.designated.extend(self.events.iter().map(Event::id));
        self
    }

    /// Adds an agent key to the event relation.
    pub fn observer(&mut self, agent: Agent) -> &mut Self {
        self.observers.insert(agent);
        self
    }

    /// Declares that `agent` cannot tell events `a` and `b` apart.
    pub fn indistinguishable(&mut self, agent: &Agent, a: EventId, b: EventId) -> &mut Self {
        self.observers.insert(agent.clone());
        self.edges.push((agent.clone(), a, b));
        self
    }

    /// Validates and builds the action.
    pub fn build(self) -> Result<Action, ValidationError> {
        let malformed = |reason: String| ValidationError::MalformedAction {
            action: self.name.clone(),
            reason,
        };
        if self.events.is_empty() {
            return Err(malformed("action has no events".to_string()));
        }
        if self.designated.is_empty() {
            return Err(malformed("action has no designated events".to_string()));
        }

        let ids: Vec<EventId> = self.events.iter().map(Event::id).collect();
        let mut relation = AccessibilityRelation::new(self.observers.iter().cloned(), ids.iter().copied());
        for (agent, a, b) in &self.edges {
            if a.index() >= ids.len() || b.index() >= ids.len() {
                return Err(malformed(format!("edge ({a}, {b}) mentions an unknown event")));
            }
            relation
                .add_edge(agent, *a, *b)
                .map_err(|e| malformed(e.to_string()))?;
        }

        let model = EpistemicModel::try_new(ids, self.designated.clone(), relation).map_err(malformed)?;
        Ok(Action {
            name: self.name.clone(),
            owner: self.owner.clone(),
            events: self.events,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_unknown_designated_event() {
        let mut builder = Action::builder("noop", Agent::new("a"));
        builder.event("e", Formula::Top, Effects::new());
        builder.designate(EventId::new(5));
        let err = builder.build().unwrap_err();
        assert!(matches!(err, ValidationError::MalformedAction { .. }));
    }

    #[test]
    fn test_build_rejects_empty_designated() {
        let mut builder = Action::builder("noop", Agent::new("a"));
        builder.event("e", Formula::Top, Effects::new());
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_owner_is_an_observer() {
        let owner = Agent::new("a");
        let other = Agent::new("b");
        let mut builder = Action::builder("flip", owner.clone());
        let e = builder.event("e", Formula::Top, Effects::new());
        let f = builder.event("f", Formula::Bottom, Effects::new());
        builder.designate(e).indistinguishable(&other, e, f);
        let action = builder.build().unwrap();

        assert!(action.relation().has_agent(&owner));
        assert!(action.relation().is_related(&other, e, f).unwrap());
        assert!(!action.relation().is_related(&owner, e, f).unwrap());
        assert_eq!(action.events().len(), 2);
        assert!(action.is_designated(e));
        assert!(!action.is_designated(f));
    }
}
