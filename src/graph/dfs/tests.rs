use super::*;
use crate::graph::fixtures::{path, scenario_one, scenario_three, scrambled};
use crate::graph::AdjacencyGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Event {
    PreProcess(usize, usize, bool),
    PreExplore(usize, usize, usize, Color),
    PostExplore(usize, usize, Color),
    PostProcess(usize, usize),
}

/// Restore walks relabel the current path, so on-path colors are folded
/// into `Gray` before comparing runs.
fn fold(color: Color) -> Color {
    if color.is_on_path() {
        Color::Gray
    } else {
        color
    }
}

struct Recorder<'g> {
    graph: &'g AdjacencyGraph,
    parents: Vec<usize>,
    events: Vec<Event>,
    skip_process: Vec<usize>,
    skip_explore: Vec<usize>,
}

impl<'g> Recorder<'g> {
    fn new(graph: &'g AdjacencyGraph) -> Self {
        Self {
            graph,
            parents: vec![0; graph.node_count() + 1],
            events: Vec::new(),
            skip_process: Vec::new(),
            skip_explore: Vec::new(),
        }
    }
}

impl DfsVisitor for Recorder<'_> {
    fn pre_process(&mut self, node: usize, degree: usize, is_root: bool) -> bool {
        self.events.push(Event::PreProcess(node, degree, is_root));
        !self.skip_process.contains(&node)
    }

    fn pre_explore(&mut self, node: usize, edge: usize, next: usize, color: Color) -> bool {
        self.events.push(Event::PreExplore(node, edge, next, fold(color)));
        if self.skip_explore.contains(&next) {
            return false;
        }
        if color == Color::White {
            self.parents[next] = self.graph.mate(node, edge).1;
        }
        true
    }

    fn post_explore(&mut self, node: usize, next: usize, color: Color) {
        self.events.push(Event::PostExplore(node, next, fold(color)));
    }

    fn post_process(&mut self, node: usize, degree: usize) {
        self.events.push(Event::PostProcess(node, degree));
    }
}

impl ParentEdges for Recorder<'_> {
    fn parent_edge(&self, node: usize) -> usize {
        self.parents[node]
    }
}

fn record_spin(graph: &AdjacencyGraph, root: usize, options: &DfsOptions) -> (Vec<Event>, DfsStats) {
    let mut recorder = Recorder::new(graph);
    let stats = dfs_with_options(graph, root, &mut recorder, options);
    (recorder.events, stats)
}

fn record_parents(graph: &AdjacencyGraph, root: usize) -> (Vec<Event>, DfsStats) {
    let mut recorder = Recorder::new(graph);
    let stats = dfs_with_parents(graph, root, &mut recorder);
    (recorder.events, stats)
}

#[test]
fn test_hook_order_on_path() {
    let graph = path(3);
    let (events, stats) = record_spin(&graph, 1, &DfsOptions::new());
    assert_eq!(
        events,
        vec![
            Event::PreProcess(1, 1, true),
            Event::PreExplore(1, 1, 2, Color::White),
            Event::PreProcess(2, 2, false),
            Event::PreExplore(2, 2, 3, Color::White),
            Event::PreProcess(3, 1, false),
            Event::PostProcess(3, 1),
            Event::PostExplore(2, 3, Color::Black),
            Event::PostProcess(2, 2),
            Event::PostExplore(1, 2, Color::Black),
            Event::PostProcess(1, 1),
        ]
    );
    assert_eq!(stats.roots, 1);
    assert_eq!(stats.visited, 3);
    assert_eq!(stats.restores, 0);
}

#[test]
fn test_back_edge_sees_gray_ancestor() {
    let graph = AdjacencyGraph::from_edges(3, &[(1, 2), (2, 3), (3, 1)]);
    let (events, _) = record_spin(&graph, 1, &DfsOptions::new());
    assert!(events.contains(&Event::PreExplore(3, 2, 1, Color::Gray)));
    assert!(events.contains(&Event::PreExplore(1, 2, 3, Color::Black)));
}

#[test]
fn test_parallel_edge_to_parent_is_explored() {
    let graph = AdjacencyGraph::from_edges(2, &[(1, 2), (1, 2)]);
    let (spin, _) = record_spin(&graph, 1, &DfsOptions::new());
    assert!(spin.contains(&Event::PreExplore(2, 2, 1, Color::Gray)));
    let (parents, _) = record_parents(&graph, 1);
    assert_eq!(spin, parents);
}

#[test]
fn test_tiny_budget_matches_default_on_long_path() {
    let graph = path(64);
    let (expected, roomy) = record_spin(&graph, 1, &DfsOptions::new().with_eviction_batch(1_000));
    let (actual, tight) = record_spin(&graph, 1, &DfsOptions::new().with_eviction_batch(1));
    assert_eq!(actual, expected);
    assert_eq!(roomy.restores, 0);
    assert_eq!(roomy.evictions, 0);
    assert!(tight.restores > 0);
    assert!(tight.evictions > 0);
    assert!(tight.peak_stack <= tight.stack_capacity);
    assert_eq!(tight.stack_capacity, 4);
}

#[test]
fn test_budgets_agree_on_scenarios() {
    for graph in [scenario_one(), scenario_three(), scrambled(120, 300, 7), scrambled(200, 220, 11)] {
        let (expected, _) = record_spin(&graph, 0, &DfsOptions::new().with_eviction_batch(10_000));
        for batch in [1, 2, 3, 5] {
            let (actual, stats) = record_spin(&graph, 0, &DfsOptions::new().with_eviction_batch(batch));
            assert_eq!(actual, expected, "eviction batch {batch}");
            assert!(stats.peak_stack <= stats.stack_capacity);
        }
        let (default, _) = record_spin(&graph, 0, &DfsOptions::new());
        assert_eq!(default, expected);
    }
}

#[test]
fn test_parent_engine_matches_spin_engine() {
    for graph in [path(40), scenario_one(), scenario_three(), scrambled(150, 400, 3)] {
        let (spin, spin_stats) = record_spin(&graph, 0, &DfsOptions::new().with_eviction_batch(1));
        let (parents, parent_stats) = record_parents(&graph, 0);
        assert_eq!(parents, spin);
        assert_eq!(parent_stats.visited, spin_stats.visited);
        assert_eq!(parent_stats.roots, spin_stats.roots);
        assert_eq!(parent_stats.stack_capacity, 1);
    }
}

#[test]
fn test_whole_graph_visits_every_component() {
    let graph = AdjacencyGraph::from_edges(6, &[(1, 2), (4, 5)]);
    let (events, stats) = record_spin(&graph, 0, &DfsOptions::new());
    let roots: Vec<usize> = events
        .iter()
        .filter_map(|event| match *event {
            Event::PreProcess(node, _, true) => Some(node),
            _ => None,
        })
        .collect();
    assert_eq!(roots, vec![1, 3, 4, 6]);
    assert_eq!(stats.roots, 2);
    assert_eq!(stats.isolated, 2);
    assert_eq!(stats.visited, 4);
    assert!(events.contains(&Event::PostProcess(3, 0)));
}

#[test]
fn test_pre_process_prunes_subtree() {
    let graph = path(3);
    let mut recorder = Recorder::new(&graph);
    recorder.skip_process.push(2);
    let stats = dfs(&graph, 1, &mut recorder);
    assert_eq!(
        recorder.events,
        vec![
            Event::PreProcess(1, 1, true),
            Event::PreExplore(1, 1, 2, Color::White),
            Event::PreProcess(2, 2, false),
            Event::PostExplore(1, 2, Color::Black),
            Event::PostProcess(1, 1),
        ]
    );
    assert_eq!(stats.visited, 2);

    let mut recorder = Recorder::new(&graph);
    recorder.skip_process.push(2);
    dfs_with_parents(&graph, 1, &mut recorder);
    assert_eq!(recorder.events.len(), 5);
    assert_eq!(recorder.events[3], Event::PostExplore(1, 2, Color::Black));
}

#[test]
fn test_pre_explore_prunes_neighbour() {
    let graph = path(3);
    let mut recorder = Recorder::new(&graph);
    recorder.skip_explore.push(3);
    let stats = dfs(&graph, 0, &mut recorder);
    assert!(recorder.events.contains(&Event::PostExplore(2, 3, Color::Black)));
    assert!(!recorder.events.iter().any(|event| matches!(event, Event::PreProcess(3, ..))));
    assert_eq!(stats.visited, 2);
    assert_eq!(stats.roots, 1);
}

#[test]
fn test_pruning_agrees_across_budgets() {
    let graph = scenario_three();
    let run = |options: Option<DfsOptions>| {
        let mut recorder = Recorder::new(&graph);
        recorder.skip_process.extend([6, 14]);
        recorder.skip_explore.push(9);
        match options {
            Some(options) => dfs_with_options(&graph, 0, &mut recorder, &options),
            None => dfs_with_parents(&graph, 0, &mut recorder),
        };
        recorder.events
    };
    let expected = run(Some(DfsOptions::new().with_eviction_batch(100)));
    assert_eq!(run(Some(DfsOptions::new().with_eviction_batch(1))), expected);
    assert_eq!(run(None), expected);
}

#[test]
fn test_closure_hooks() {
    let graph = scenario_one();
    let mut pre = Vec::new();
    let mut hooks = DfsHooks::new().on_pre_process(|node, _, _| {
        pre.push(node);
        true
    });
    dfs(&graph, 7, &mut hooks);
    drop(hooks);
    assert_eq!(pre, vec![7, 8]);
}

#[test]
#[should_panic(expected = "is not a node")]
fn test_root_out_of_range_panics() {
    dfs(&path(3), 4, &mut ());
}

#[test]
fn test_eviction_batch_defaults() {
    let options = DfsOptions::new();
    assert_eq!(options.eviction_batch_for(0), 1);
    assert_eq!(options.eviction_batch_for(2), 1);
    assert_eq!(options.eviction_batch_for(3), 2);
    assert_eq!(options.eviction_batch_for(1_000), 144);
    assert_eq!(options.stack_capacity_for(1_000), 290);
    assert_eq!(DfsOptions::new().with_eviction_batch(0).eviction_batch_for(10), 1);
}

#[test]
fn test_stats_serialize() {
    let (_, stats) = record_spin(&path(5), 1, &DfsOptions::new());
    let json = serde_json::to_string(&stats).unwrap();
    let back: DfsStats = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stats);
}
