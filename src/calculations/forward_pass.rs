use crate::error::{GraphError, GraphResult};
use crate::graph::ActivityGraph;
use tracing::trace;

/// Earliest start / earliest finish pass of the critical path method.
pub struct ForwardPass<'a> {
    graph: &'a mut ActivityGraph,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a mut ActivityGraph) -> Self {
        Self { graph }
    }

    pub fn execute(&mut self) -> GraphResult<()> {
        for id in self.graph.start_nodes().to_vec() {
            let start = self.graph.get_mut(id)?;
            start.earliest_start = Some(0.0);
            start.earliest_finish = Some(start.duration);
        }

        for id in self.graph.topological_order(false) {
            if self.graph.is_start_node(id) {
                continue;
            }
            let earliest_start = self.max_predecessor_finish(id)?;
            let activity = self.graph.get_mut(id)?;
            activity.earliest_start = Some(earliest_start);
            activity.earliest_finish = Some(earliest_start + activity.duration);
            trace!(
                activity = id,
                es = earliest_start,
                ef = earliest_start + activity.duration,
                "forward pass"
            );
        }
        Ok(())
    }

    fn max_predecessor_finish(&self, id: i32) -> GraphResult<f64> {
        let activity = self.graph.get(id)?;
        let mut max_finish = f64::NEG_INFINITY;
        for &predecessor_id in &activity.predecessors {
            let finish = self
                .graph
                .get(predecessor_id)?
                .earliest_finish
                .ok_or(GraphError::MissingValue {
                    id: predecessor_id,
                    field: "earliest finish",
                })?;
            max_finish = max_finish.max(finish);
        }

        // a non-start activity always follows at least one activity that takes time
        if max_finish.is_nan() || max_finish <= 0.0 {
            return Err(GraphError::InvalidAggregate {
                id,
                value: max_finish,
            });
        }
        Ok(max_finish)
    }
}
