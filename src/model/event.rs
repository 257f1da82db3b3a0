//! Events: the nodes of an action model.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::formula::Formula;
use crate::predicate::Effects;
use crate::task::PlanningTask;

use super::world::World;

/// Index of an event within its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    /// Wraps a raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Position of the event in its action.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Precondition and postcondition of an event as seen from one world.
#[derive(Debug, Clone)]
pub struct ResolvedEvent {
    /// Must hold in the world for the event to fire.
    pub precondition: Arc<Formula>,
    /// Predicates the event sets; others keep their value.
    pub effects: Effects,
}

impl ResolvedEvent {
    /// Bundles a precondition and effects.
    #[must_use]
    pub fn new(precondition: Formula, effects: Effects) -> Self {
        Self {
            precondition: Arc::new(precondition),
            effects,
        }
    }
}

/// Computes an event's precondition and effects for a given world.
///
/// Must be a pure function of its inputs.
pub type DynamicResolver = Arc<dyn Fn(&World, &PlanningTask) -> ResolvedEvent + Send + Sync>;

/// How an event obtains its precondition and effects.
#[derive(Clone)]
pub enum EventSpec {
    /// Fixed for every world.
    Static(Arc<ResolvedEvent>),
    /// Computed per world; memoized by [`crate::update::ProductUpdater`].
    Dynamic(DynamicResolver),
}

impl fmt::Debug for EventSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(resolved) => f.debug_tuple("Static").field(resolved).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A node of an action model.
#[derive(Debug, Clone)]
pub struct Event {
    id: EventId,
    name: String,
    spec: EventSpec,
}

impl Event {
    pub(crate) fn new(id: EventId, name: String, spec: EventSpec) -> Self {
        Self { id, name, spec }
    }

    /// Index within the owning action.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the event resolves per world.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self.spec, EventSpec::Dynamic(_))
    }

    /// Precondition and effects of this event at `world`.
    ///
    /// Static events ignore their inputs. Callers that evaluate the same
    /// (world, event) pair more than once should go through
    /// [`crate::update::EventResolver`] instead.
    #[must_use]
    pub fn resolve(&self, world: &World, task: &PlanningTask) -> Arc<ResolvedEvent> {
        match &self.spec {
            EventSpec::Static(resolved) => Arc::clone(resolved),
            EventSpec::Dynamic(resolver) => Arc::new(resolver(world, task)),
        }
    }
}
