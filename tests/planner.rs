mod common;

use std::collections::BTreeSet;

use epiplan::{
    AccessibilityRelation, Action, Agent, Cost, Effects, ForwardInductionPlanner, Formula, PlannerConfig,
    PlanningTask, PredicateTable, SearchGraph, State, Valuation, WorldArena, WorldId,
};

fn planner(max_depth: usize) -> ForwardInductionPlanner {
    ForwardInductionPlanner::new(PlannerConfig {
        max_depth,
        ..PlannerConfig::default()
    })
    .unwrap()
}

/// Worlds `goal: g`, `stuck: -`, `busy: r`; one action whose only event needs `r`.
fn base_case_task(designated: usize) -> PlanningTask {
    let a = Agent::new("a");
    let mut table = PredicateTable::new();
    let g = table.intern::<&str>("g", &[]).unwrap();
    let r = table.intern::<&str>("r", &[]).unwrap();

    let mut arena = WorldArena::new();
    let worlds = vec![
        arena.add_world(Valuation::from_true([&g])),
        arena.add_world(Valuation::new()),
        arena.add_world(Valuation::from_true([&r])),
    ];
    let relation = AccessibilityRelation::new([a.clone()], worlds.iter().copied());
    let state = State::new(worlds.clone(), BTreeSet::from([worlds[designated]]), relation).unwrap();

    let mut builder = Action::builder("spin", a);
    let e = builder.event("spin", Formula::atom(&r), Effects::new());
    builder.designate(e);
    let action = builder.build().unwrap();

    PlanningTask::new(table, arena, state, vec![action], Formula::atom(&g)).unwrap()
}

fn lever_graph() -> (common::Lever, SearchGraph) {
    common::init_tracing();
    let lever = common::lever(5, 2, 0);
    let graph = planner(6).plan(&lever.task).unwrap();
    (lever, graph)
}

#[test]
fn goal_world_costs_zero_and_dead_end_costs_infinity() {
    let task = base_case_task(0);
    let graph = planner(4).plan(&task).unwrap();
    let root = graph.root().state().worlds().to_vec();

    assert_eq!(graph.len(), 1);
    assert_eq!(graph.arena()[root[0]].cost, Cost::settled(0));
    assert_eq!(graph.arena()[root[1]].cost, Cost::Infinity);
    assert_eq!(graph.root().cost, Cost::settled(0));
}

#[test]
fn leaf_worlds_with_applicable_events_are_provisional() {
    let (lever, graph) = lever_graph();
    let deepest = graph.max_depth();
    let goal = lever.task.goal();

    let mut checked = 0;
    for node in graph.nodes().iter().filter(|n| n.depth() == deepest) {
        for &w in node.state().worlds() {
            if !goal.evaluate(graph.arena(), node.state(), w).unwrap() {
                assert_eq!(graph.arena()[w].cost, Cost::range(1), "world {w} of {}", node.id());
                checked += 1;
            }
        }
    }
    assert!(checked > 0);
}

#[test]
fn lever_root_costs_settle_to_distance() {
    let (lever, graph) = lever_graph();
    for (p, &w) in lever.worlds.iter().enumerate() {
        assert_eq!(graph.arena()[w].cost, Cost::settled(p as u32));
    }
    assert_eq!(graph.root().cost, Cost::settled(2));

    let stats = graph.stats();
    assert_eq!(stats.goal_depth, Some(1));
    assert_eq!(stats.cutoff_depth, 4);
    assert_eq!(stats.iterations, 4);
    assert_eq!(stats.nodes, graph.len());
    assert!(stats.pruned_edges > 0);
}

#[test]
fn pruning_keeps_equal_cost_edges_and_drops_dearer_ones() {
    let (lever, graph) = lever_graph();
    let arena = graph.arena();

    let mut strict = 0;
    let mut equal = 0;
    for edge in arena.edges() {
        let parent = &arena[edge.parent];
        if parent.pruned {
            assert!(edge.pruned);
            continue;
        }
        let own = parent.agent_costs[&edge.agent];
        if own.is_strictly_below(edge.cost) {
            assert!(edge.pruned, "edge {:?} should be pruned", edge.id);
            strict += 1;
        } else {
            assert!(!edge.pruned, "edge {:?} should survive", edge.id);
            if own.value_cmp(edge.cost) == Some(std::cmp::Ordering::Equal) {
                equal += 1;
            }
        }
    }
    assert!(strict > 0 && equal > 0);

    let at = |w: WorldId| {
        arena[w]
            .outgoing()
            .iter()
            .map(|e| (graph.arena()[*e].agent.clone(), graph.arena()[*e].pruned))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        at(lever.worlds[2]),
        vec![(lever.left.clone(), false), (lever.right.clone(), true)]
    );
    // cost(w4, left) = 4 equals the pull_left edge cost.
    assert_eq!(arena[lever.worlds[4]].agent_costs[&lever.left], Cost::settled(4));
    assert_eq!(at(lever.worlds[4])[0], (lever.left.clone(), false));
}

#[test]
fn worlds_behind_pruned_edges_are_pruned() {
    let (_, graph) = lever_graph();
    let arena = graph.arena();
    for world in arena.worlds() {
        assert_eq!(world.pruned, arena.incoming_pruned(world.id));
    }
}

#[test]
fn depth_bound_with_provisional_root_is_unsolvable() {
    let lever = common::lever(5, 2, 0);
    let err = planner(2).plan(&lever.task).unwrap_err();
    assert!(err.is_unsolvable(), "{err}");
}

#[test]
fn unreachable_goal_is_unsolvable() {
    let task = base_case_task(1);
    let err = planner(4).plan(&task).unwrap_err();
    assert!(err.is_unsolvable(), "{err}");
}

#[test]
fn dead_end_designated_world_does_not_block_planning() {
    let a = Agent::new("a");
    let mut table = PredicateTable::new();
    let g = table.intern::<&str>("g", &[]).unwrap();
    let r = table.intern::<&str>("r", &[]).unwrap();
    let dead = table.intern::<&str>("dead", &[]).unwrap();

    let mut arena = WorldArena::new();
    let good = arena.add_world(Valuation::from_true([&r]));
    let stuck = arena.add_world(Valuation::new());
    let relation = AccessibilityRelation::new([a.clone()], [good, stuck]);
    let state = State::new(vec![good, stuck], BTreeSet::from([good, stuck]), relation).unwrap();

    // `fix` reaches the goal from `good`; `break` leads `stuck` nowhere.
    let mut builder = Action::builder("repair", a);
    let mut fixed = Effects::new();
    fixed.insert(g.clone(), true);
    let fix = builder.event("fix", Formula::atom(&r), fixed);
    let mut broken = Effects::new();
    broken.insert(dead.clone(), true);
    let brk = builder.event(
        "break",
        Formula::all([Formula::not(Formula::atom(&r)), Formula::not(Formula::atom(&dead))]),
        broken,
    );
    builder.designate(fix).designate(brk);
    let action = builder.build().unwrap();

    let task = PlanningTask::new(table, arena, state, vec![action], Formula::atom(&g)).unwrap();
    let graph = planner(4).plan(&task).unwrap();

    assert_eq!(graph.arena()[good].cost, Cost::settled(1));
    assert_eq!(graph.arena()[stuck].cost, Cost::Infinity);
    assert_eq!(graph.root().cost, Cost::Infinity);
}

#[test]
fn node_limit_is_enforced() {
    let lever = common::lever(5, 2, 0);
    let planner = ForwardInductionPlanner::new(PlannerConfig {
        max_nodes: 2,
        ..PlannerConfig::default()
    })
    .unwrap();
    let err = planner.plan(&lever.task).unwrap_err();
    assert!(err.is_limit_exceeded(), "{err}");
}

#[test]
fn invalid_config_is_rejected() {
    let err = ForwardInductionPlanner::new(PlannerConfig {
        max_depth: 0,
        ..PlannerConfig::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("max_depth"));
}
