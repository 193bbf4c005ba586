use crate::error::{GraphError, GraphResult};
use crate::graph::ActivityGraph;
use tracing::trace;

/// Latest start / latest finish pass of the critical path method.
///
/// Requires the forward pass to have run; returns the project duration.
pub struct BackwardPass<'a> {
    graph: &'a mut ActivityGraph,
}

impl<'a> BackwardPass<'a> {
    pub fn new(graph: &'a mut ActivityGraph) -> Self {
        Self { graph }
    }

    pub fn execute(&mut self) -> GraphResult<f64> {
        let project_duration = self.graph.project_duration()?;

        for id in self.graph.end_nodes().to_vec() {
            let end = self.graph.get_mut(id)?;
            end.latest_finish = Some(project_duration);
            end.latest_start = Some(project_duration - end.duration);
        }

        // Reverse topological order
        for id in self.graph.topological_order(true) {
            if self.graph.is_end_node(id) {
                continue;
            }
            let latest_finish = self.min_successor_start(id)?;
            let activity = self.graph.get_mut(id)?;
            activity.latest_finish = Some(latest_finish);
            activity.latest_start = Some(latest_finish - activity.duration);
            trace!(
                activity = id,
                ls = latest_finish - activity.duration,
                lf = latest_finish,
                "backward pass"
            );
        }
        Ok(project_duration)
    }

    fn min_successor_start(&self, id: i32) -> GraphResult<f64> {
        let activity = self.graph.get(id)?;
        let mut min_start = f64::INFINITY;
        for &successor_id in &activity.successors {
            let start = self
                .graph
                .get(successor_id)?
                .latest_start
                .ok_or(GraphError::MissingValue {
                    id: successor_id,
                    field: "latest start",
                })?;
            min_start = min_start.min(start);
        }

        if !min_start.is_finite() {
            return Err(GraphError::InvalidAggregate {
                id,
                value: min_start,
            });
        }
        Ok(min_start)
    }
}
