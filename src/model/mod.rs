//! Epistemic models: states over worlds and actions over events.

pub mod accessibility;
pub mod action;
pub mod epistemic;
pub mod event;
pub mod state;
pub mod world;

pub use accessibility::{AccessibilityRelation, Traversal};
pub use action::{Action, ActionBuilder, ActionId};
pub use epistemic::EpistemicModel;
pub use event::{DynamicResolver, Event, EventId, EventSpec, ResolvedEvent};
pub use state::State;
pub use world::{EdgeId, World, WorldArena, WorldEdge, WorldId};
