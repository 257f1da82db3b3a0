//! Planning tasks: the input handed over by the domain parser.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::agent::Agent;
use crate::error::ValidationError;
use crate::formula::Formula;
use crate::model::{Action, ActionId, State, WorldArena};
use crate::predicate::PredicateTable;

/// Stable digest of a task's canonical description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFingerprint(blake3::Hash);

impl fmt::Display for TaskFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Initial state, action library and goal of a planning problem.
#[derive(Debug, Clone)]
pub struct PlanningTask {
    predicates: PredicateTable,
    arena: WorldArena,
    initial_state: State,
    actions: Vec<Action>,
    goal: Arc<Formula>,
    agents: BTreeMap<String, Agent>,
}

impl PlanningTask {
    /// Assembles a task.
    ///
    /// # Errors
    ///
    /// Returns `MalformedState` if the initial state refers to worlds that are
    /// not in `arena`, and `MalformedAction` if an action's owner has no
    /// accessibility relation in the initial state (its perspective could
    /// not be taken).
    pub fn new(
        predicates: PredicateTable,
        arena: WorldArena,
        initial_state: State,
        actions: Vec<Action>,
        goal: Formula,
    ) -> Result<Self, ValidationError> {
        if let Some(stray) = initial_state.worlds().iter().find(|w| !arena.contains(**w)) {
            return Err(ValidationError::MalformedState {
                reason: format!("world {stray} is not in the arena"),
            });
        }
        for action in &actions {
            if !initial_state.relation().has_agent(action.owner()) {
                return Err(ValidationError::MalformedAction {
                    action: action.name().to_string(),
                    reason: format!(
                        "owner {} has no accessibility relation in the initial state",
                        action.owner()
                    ),
                });
            }
        }

        let mut agents = BTreeMap::new();
        let mentioned = initial_state
            .agents()
            .cloned()
            .chain(actions.iter().flat_map(|a| a.relation().agents().cloned()))
            .chain(goal.agents());
        for agent in mentioned {
            agents.insert(agent.name().to_string(), agent);
        }

        Ok(Self {
            predicates,
            arena,
            initial_state,
            actions,
            goal: Arc::new(goal),
            agents,
        })
    }

    /// Predicates interned while building the task.
    #[must_use]
    pub fn predicates(&self) -> &PredicateTable {
        &self.predicates
    }

    /// Arena holding the initial worlds.
    #[must_use]
    pub fn arena(&self) -> &WorldArena {
        &self.arena
    }

    /// The state planning starts from.
    #[must_use]
    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    /// The action library.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The action with id `id`.
    #[must_use]
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.index())
    }

    /// Action ids in library order.
    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> {
        (0..self.actions.len()).filter_map(|i| u32::try_from(i).ok().map(ActionId::new))
    }

    /// The goal formula.
    #[must_use]
    pub fn goal(&self) -> &Arc<Formula> {
        &self.goal
    }

    /// Agents by name.
    #[must_use]
    pub fn agents(&self) -> &BTreeMap<String, Agent> {
        &self.agents
    }

    /// Looks up an agent by name.
    #[must_use]
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// Digest of the initial valuations, designated worlds, relations,
    /// action signatures and goal.
    #[must_use]
    pub fn fingerprint(&self) -> TaskFingerprint {
        let mut hasher = blake3::Hasher::new();
        let mut put = |s: &str| {
            hasher.update(s.as_bytes());
            hasher.update(&[0]);
        };

        for &world in self.initial_state.worlds() {
            put(&world.to_string());
            for id in self.arena[world].valuation().true_ids() {
                match self.predicates.by_id(id) {
                    Some(p) => put(&p.to_string()),
                    None => put(&id.to_string()),
                }
            }
        }
        for world in self.initial_state.designated() {
            put(&format!("designated {world}"));
        }
        let relation = self.initial_state.relation();
        for agent in relation.agents() {
            put(agent.name());
            if let Ok(edges) = relation.stored_edges(agent) {
                for (a, b) in edges {
                    put(&format!("{a}~{b}"));
                }
            }
        }
        for action in &self.actions {
            put(action.name());
            put(action.owner().name());
            for event in action.events() {
                put(event.name());
                put(if action.is_designated(event.id()) { "*" } else { "-" });
            }
            for agent in action.relation().agents() {
                put(agent.name());
                if let Ok(edges) = action.relation().stored_edges(agent) {
                    for (a, b) in edges {
                        put(&format!("{a}~{b}"));
                    }
                }
            }
        }
        put(&self.goal.to_string());

        TaskFingerprint(hasher.finalize())
    }
}
