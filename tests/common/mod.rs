#![allow(dead_code)]

use std::collections::BTreeSet;

use epiplan::{
    AccessibilityRelation, Action, Agent, Effects, Formula, PlanningTask, Predicate, PredicateTable, State,
    Valuation, WorldArena, WorldId,
};

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A lever with `positions` positions and two agents.
///
/// `left` only tells apart the positions strictly left of the middle,
/// `right` only those strictly right of it. `pull_left` (owned by `left`)
/// moves the lever one step left and `pull_right` (owned by `right`) one step
/// right; both are no-ops at the matching end. After a pull each agent sees
/// the resulting position if it lies in its half.
pub struct Lever {
    pub task: PlanningTask,
    pub left: Agent,
    pub right: Agent,
    pub at: Vec<Predicate>,
    pub worlds: Vec<WorldId>,
}

pub fn lever(positions: usize, start: usize, goal: usize) -> Lever {
    assert!(goal < positions);
    lever_with_goal(positions, start, |_, _, at| Formula::atom(&at[goal]))
}

/// Same lever with a goal built from `(left, right, at)`.
pub fn lever_with_goal(
    positions: usize,
    start: usize,
    goal: impl FnOnce(&Agent, &Agent, &[Predicate]) -> Formula,
) -> Lever {
    assert!(positions >= 3 && start < positions);
    let middle = positions / 2;
    let left = Agent::new("left");
    let right = Agent::new("right");

    let mut table = PredicateTable::new();
    let at: Vec<Predicate> = (0..positions)
        .map(|p| table.intern("at", &[format!("p{p}")]).unwrap())
        .collect();

    let mut arena = WorldArena::new();
    let worlds: Vec<WorldId> = at
        .iter()
        .map(|p| arena.add_world(Valuation::from_true([p])))
        .collect();

    let left_blind = |p: usize| p >= middle;
    let right_blind = |p: usize| p <= middle;

    let mut relation = AccessibilityRelation::new([left.clone(), right.clone()], worlds.iter().copied());
    for a in 0..positions {
        for b in (a + 1)..positions {
            if left_blind(a) && left_blind(b) {
                relation.add_edge(&left, worlds[a], worlds[b]).unwrap();
            }
            if right_blind(a) && right_blind(b) {
                relation.add_edge(&right, worlds[a], worlds[b]).unwrap();
            }
        }
    }
    let initial = State::new(worlds.clone(), BTreeSet::from([worlds[start]]), relation).unwrap();

    let pull = |name: &str, owner: &Agent, step: fn(usize, usize) -> usize| -> Action {
        let mut builder = Action::builder(name, owner.clone());
        let mut events = Vec::new();
        for p in 0..positions {
            let to = step(p, positions);
            let mut effects = Effects::new();
            effects.insert(at[p].clone(), false);
            effects.insert(at[to].clone(), true);
            events.push((builder.event(format!("{name}@{p}"), Formula::atom(&at[p]), effects), to));
        }
        builder.designate_all().observer(left.clone()).observer(right.clone());
        for (i, &(ei, ti)) in events.iter().enumerate() {
            for &(ej, tj) in &events[i + 1..] {
                if left_blind(ti) && left_blind(tj) {
                    builder.indistinguishable(&left, ei, ej);
                }
                if right_blind(ti) && right_blind(tj) {
                    builder.indistinguishable(&right, ei, ej);
                }
            }
        }
        builder.build().unwrap()
    };

    let pull_left = pull("pull_left", &left, |p, _| p.saturating_sub(1));
    let pull_right = pull("pull_right", &right, |p, n| (p + 1).min(n - 1));

    let goal_formula = goal(&left, &right, &at);
    let task = PlanningTask::new(table, arena, initial, vec![pull_left, pull_right], goal_formula).unwrap();

    Lever {
        task,
        left,
        right,
        at,
        worlds,
    }
}
