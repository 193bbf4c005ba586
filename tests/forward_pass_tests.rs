use schedule_network::calculations::{BackwardPass, FloatPass, ForwardPass};
use schedule_network::{Activity, ActivityGraph, GraphError};

fn graph() -> ActivityGraph {
    // 1 -> {2,3} -> 4 with durations 2,3,1,2
    ActivityGraph::build(vec![
        Activity::new(1, "T1", 2.0).with_successors(vec![2, 3]),
        Activity::new(2, "T2", 3.0).with_predecessors(vec![1]),
        Activity::new(3, "T3", 1.0).with_predecessors(vec![1]),
        Activity::new(4, "T4", 2.0).with_predecessors(vec![2, 3]),
    ])
    .unwrap()
}

#[test]
fn forward_pass_sets_early_times() {
    let mut graph = graph();
    ForwardPass::new(&mut graph).execute().unwrap();

    let early: Vec<(f64, f64)> = graph
        .activities()
        .iter()
        .map(|a| (a.earliest_start.unwrap(), a.earliest_finish.unwrap()))
        .collect();
    assert_eq!(early, vec![(0.0, 2.0), (2.0, 5.0), (2.0, 3.0), (5.0, 7.0)]);
    assert_eq!(graph.project_duration(), Ok(7.0));
    assert!(graph.activities().iter().all(|a| a.latest_start.is_none()));
}

#[test]
fn backward_pass_sets_late_times_and_floats() {
    let mut graph = graph();
    ForwardPass::new(&mut graph).execute().unwrap();
    let project_duration = BackwardPass::new(&mut graph).execute().unwrap();
    FloatPass::new(&mut graph).execute().unwrap();
    assert_eq!(project_duration, 7.0);

    let late: Vec<(f64, f64)> = graph
        .activities()
        .iter()
        .map(|a| (a.latest_start.unwrap(), a.latest_finish.unwrap()))
        .collect();
    assert_eq!(late, vec![(0.0, 2.0), (2.0, 5.0), (4.0, 5.0), (5.0, 7.0)]);

    let short = graph.get(3).unwrap();
    assert_eq!(short.total_float(), Some(2.0));
    assert_eq!(short.free_float, Some(2.0));
    assert!(!short.is_critical());
    assert!(graph.get(2).unwrap().is_critical());
}

#[test]
fn backward_pass_needs_early_times() {
    let mut graph = graph();
    let err = BackwardPass::new(&mut graph).execute().unwrap_err();
    assert!(matches!(err, GraphError::MissingValue { .. }));
}
