use crate::error::{GraphError, GraphResult};
use crate::graph::{Activity, ActivityGraph};

fn required(activity: &Activity, value: Option<f64>, field: &'static str) -> GraphResult<f64> {
    value.ok_or(GraphError::MissingValue {
        id: activity.id,
        field,
    })
}

/// Total and free float of the critical path method.
///
/// `total = LS - ES`; `free = min(ES of successors) - EF`, which is `0` for
/// an activity without successors.
pub struct FloatPass<'a> {
    graph: &'a mut ActivityGraph,
}

impl<'a> FloatPass<'a> {
    pub fn new(graph: &'a mut ActivityGraph) -> Self {
        Self { graph }
    }

    pub fn execute(&mut self) -> GraphResult<()> {
        let mut floats = Vec::with_capacity(self.graph.len());
        for activity in self.graph.activities() {
            let latest_start = required(activity, activity.latest_start, "latest start")?;
            let earliest_start = required(activity, activity.earliest_start, "earliest start")?;
            let earliest_finish = required(activity, activity.earliest_finish, "earliest finish")?;

            let mut min_successor_start = f64::INFINITY;
            for &successor_id in &activity.successors {
                let successor = self.graph.get(successor_id)?;
                let start = required(successor, successor.earliest_start, "earliest start")?;
                min_successor_start = min_successor_start.min(start);
            }
            if activity.successors.is_empty() {
                min_successor_start = earliest_finish;
            }

            floats.push((
                latest_start - earliest_start,
                min_successor_start - earliest_finish,
            ));
        }

        for (activity, (total, free)) in self.graph.activities_mut().iter_mut().zip(floats) {
            activity.set_total_float(Some(total));
            activity.free_float = Some(free);
        }
        Ok(())
    }
}

/// Total float under time-gap constraints: `LF - ES - duration`.
pub struct TotalFloatPass<'a> {
    graph: &'a mut ActivityGraph,
}

impl<'a> TotalFloatPass<'a> {
    pub fn new(graph: &'a mut ActivityGraph) -> Self {
        Self { graph }
    }

    pub fn execute(&mut self) -> GraphResult<()> {
        for activity in self.graph.activities_mut() {
            let latest_finish = required(activity, activity.latest_finish, "latest finish")?;
            let earliest_start = required(activity, activity.earliest_start, "earliest start")?;
            let total = latest_finish - earliest_start - activity.duration;
            activity.set_total_float(Some(total));
        }
        Ok(())
    }
}
