use schedule_network::{Activity, ActivityGraph, GraphError};

fn diamond() -> Vec<Activity> {
    vec![
        Activity::new(1, "A", 2.0).with_successors(vec![2, 3]),
        Activity::new(2, "B", 5.0).with_successors(vec![4]),
        Activity::new(3, "C", 3.0).with_successors(vec![4]),
        Activity::new(4, "D", 1.0).with_predecessors(vec![2, 3]),
    ]
}

#[test]
fn linking_classifies_start_and_end_nodes() {
    let graph = ActivityGraph::build(diamond()).unwrap();
    assert!(graph.is_linked());
    assert_eq!(graph.start_nodes(), &[1]);
    assert_eq!(graph.end_nodes(), &[4]);
    assert!(graph.is_start_node(1));
    assert!(graph.is_end_node(4));
    assert!(!graph.is_end_node(2));
}

#[test]
fn one_sided_links_are_mirrored() {
    let graph = ActivityGraph::build(vec![
        Activity::new(1, "A", 1.0).with_successors(vec![2]),
        Activity::new(2, "B", 1.0).with_successors(vec![3]),
        Activity::new(3, "C", 1.0).with_predecessors(vec![2]),
    ])
    .unwrap();
    assert_eq!(graph.get(2).unwrap().predecessors, vec![1]);
    assert_eq!(graph.get(3).unwrap().predecessors, vec![2]);
    assert!(graph.get(3).unwrap().successors.is_empty());
}

#[test]
fn edges_follow_insertion_order() {
    let graph = ActivityGraph::build(diamond()).unwrap();
    let edges: Vec<(i32, i32)> = graph.edges().collect();
    assert_eq!(edges, vec![(1, 2), (1, 3), (2, 4), (3, 4)]);
}

#[test]
fn links_named_on_both_sides_are_not_doubled() {
    let graph = ActivityGraph::build(vec![
        Activity::new(1, "A", 1.0).with_successors(vec![2, 2]),
        Activity::new(2, "B", 1.0).with_predecessors(vec![1]),
    ])
    .unwrap();
    assert_eq!(graph.get(1).unwrap().successors, vec![2]);
    assert_eq!(graph.get(2).unwrap().predecessors, vec![1]);
}

#[test]
fn topological_order_respects_every_edge() {
    let graph = ActivityGraph::build(diamond()).unwrap();
    assert_eq!(graph.topological_order(false), vec![1, 2, 3, 4]);
    assert_eq!(graph.topological_order(true), vec![4, 3, 2, 1]);
}

#[test]
fn isolated_activity_is_rejected() {
    let err = ActivityGraph::build(vec![Activity::new(1, "Solo", 3.0)]).unwrap_err();
    assert_eq!(err, GraphError::Disconnected { id: 1 });
    assert!(err.to_string().contains("isn't related"));
}

#[test]
fn empty_graph_is_rejected() {
    assert_eq!(
        ActivityGraph::build(Vec::new()).unwrap_err(),
        GraphError::Empty
    );
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = ActivityGraph::build(vec![
        Activity::new(1, "A", 1.0).with_successors(vec![2]),
        Activity::new(2, "B", 1.0),
        Activity::new(1, "A again", 1.0).with_successors(vec![2]),
    ])
    .unwrap_err();
    assert_eq!(err, GraphError::DuplicateActivity { id: 1 });
}

#[test]
fn unknown_and_self_references_are_rejected() {
    let unknown = ActivityGraph::build(vec![
        Activity::new(1, "A", 1.0).with_successors(vec![7]),
        Activity::new(2, "B", 1.0).with_predecessors(vec![1]),
    ])
    .unwrap_err();
    assert_eq!(unknown, GraphError::NotFound { id: 7 });

    let looped = ActivityGraph::build(vec![
        Activity::new(1, "A", 1.0).with_successors(vec![1, 2]),
        Activity::new(2, "B", 1.0).with_predecessors(vec![1]),
    ])
    .unwrap_err();
    assert_eq!(looped, GraphError::SelfReference { id: 1 });
}

#[test]
fn cycles_are_rejected() {
    let err = ActivityGraph::build(vec![
        Activity::new(1, "A", 1.0).with_successors(vec![2]),
        Activity::new(2, "B", 1.0).with_successors(vec![3]),
        Activity::new(3, "C", 1.0).with_successors(vec![4]),
        Activity::new(4, "D", 1.0).with_successors(vec![2]),
    ])
    .unwrap_err();
    assert!(matches!(err, GraphError::Cycle { .. }));
}

#[test]
fn negative_duration_is_rejected() {
    let err = ActivityGraph::build(vec![
        Activity::new(1, "A", -1.0).with_successors(vec![2]),
        Activity::new(2, "B", 1.0),
    ])
    .unwrap_err();
    assert!(matches!(err, GraphError::InvalidDuration { id: 1, .. }));
}

#[test]
fn failed_link_leaves_graph_unlinked() {
    let mut graph = ActivityGraph::unlinked(vec![Activity::new(1, "Solo", 1.0)]);
    assert!(graph.link().is_err());
    assert!(!graph.is_linked());
    assert!(graph.start_nodes().is_empty());
    assert!(graph.topological_order(false).is_empty());
}
