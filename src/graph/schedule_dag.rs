use crate::error::{GraphError, GraphResult};
use crate::graph::Activity;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// `petgraph` view of the activity network, used for cycle detection.
pub struct ScheduleDag {
    pub graph: DiGraph<i32, ()>,
    pub id_to_index: HashMap<i32, NodeIndex>,
}

impl ScheduleDag {
    pub fn build(activities: &[Activity]) -> GraphResult<Self> {
        let mut graph: DiGraph<i32, ()> = DiGraph::with_capacity(activities.len(), 0);
        let mut id_to_index: HashMap<i32, NodeIndex> = HashMap::new();

        // Add nodes first
        for activity in activities {
            let node_ix = graph.add_node(activity.id);
            id_to_index.insert(activity.id, node_ix);
        }

        // Add edges: activity -> successor
        for activity in activities {
            let u = id_to_index[&activity.id];
            for successor in &activity.successors {
                let v = id_to_index
                    .get(successor)
                    .copied()
                    .ok_or(GraphError::NotFound { id: *successor })?;
                graph.add_edge(u, v, ());
            }
        }

        Ok(Self { graph, id_to_index })
    }

    pub fn ensure_acyclic(&self) -> GraphResult<()> {
        toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| GraphError::Cycle {
                id: self.graph[cycle.node_id()],
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cycle() {
        let activities = vec![
            Activity::new(1, "A", 1.0).with_successors(vec![2]),
            Activity::new(2, "B", 1.0).with_successors(vec![3]),
            Activity::new(3, "C", 1.0).with_successors(vec![2]),
        ];
        let dag = ScheduleDag::build(&activities).unwrap();
        assert!(matches!(dag.ensure_acyclic(), Err(GraphError::Cycle { .. })));
    }

    #[test]
    fn unknown_successor_is_reported() {
        let activities = vec![Activity::new(1, "A", 1.0).with_successors(vec![9])];
        assert_eq!(
            ScheduleDag::build(&activities).err(),
            Some(GraphError::NotFound { id: 9 })
        );
    }
}
