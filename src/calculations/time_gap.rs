//! Forward and backward passes of the metra potential method.
//!
//! Each dependency carries a minimum gap that pushes the dependent activity
//! out and a maximum gap that it must not exceed. A broken maximum stops the
//! pass at the activity where it was detected.

use std::collections::BTreeMap;

use crate::error::{GraphError, GraphResult};
use crate::graph::{ActivityGraph, Relationship, RelationshipKey};
use tracing::{debug, trace};

/// How a time-gap pass ended when no structural error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPassOutcome {
    Completed,
    /// The maximum gap of at least one dependency of `activity` is exceeded.
    Violated { activity: i32 },
}

fn relationship_mut(
    relationships: &mut BTreeMap<RelationshipKey, Relationship>,
    from: i32,
    to: i32,
) -> GraphResult<&mut Relationship> {
    relationships
        .get_mut(&(from, to))
        .ok_or(GraphError::MissingRelationship { from, to })
}

pub struct TimeGapForwardPass<'a> {
    graph: &'a mut ActivityGraph,
    relationships: &'a mut BTreeMap<RelationshipKey, Relationship>,
}

impl<'a> TimeGapForwardPass<'a> {
    pub fn new(
        graph: &'a mut ActivityGraph,
        relationships: &'a mut BTreeMap<RelationshipKey, Relationship>,
    ) -> Self {
        Self {
            graph,
            relationships,
        }
    }

    pub fn execute(&mut self) -> GraphResult<GapPassOutcome> {
        for id in self.graph.start_nodes().to_vec() {
            let start = self.graph.get_mut(id)?;
            start.earliest_start = Some(0.0);
            start.earliest_finish = Some(start.duration);
        }

        for id in self.graph.topological_order(false) {
            if self.graph.is_start_node(id) {
                continue;
            }
            let predecessor_finishes = self.predecessor_finishes(id)?;

            let mut earliest_start = f64::NEG_INFINITY;
            for &(predecessor_id, finish) in &predecessor_finishes {
                let gap = relationship_mut(self.relationships, predecessor_id, id)?.minimum_gap();
                earliest_start = earliest_start.max(finish + gap);
            }
            if earliest_start.is_nan() || earliest_start < 0.0 {
                return Err(GraphError::InvalidAggregate {
                    id,
                    value: earliest_start,
                });
            }

            let activity = self.graph.get_mut(id)?;
            activity.earliest_finish = Some(earliest_start + activity.duration);
            activity.earliest_start = Some(earliest_start);
            trace!(activity = id, es = earliest_start, "time-gap forward pass");

            // condition check on every incoming dependency
            let mut fulfilled = true;
            for (predecessor_id, finish) in predecessor_finishes {
                let relationship = relationship_mut(self.relationships, predecessor_id, id)?;
                let holds = earliest_start - finish <= relationship.maximum_gap();
                relationship.is_forward_condition_fulfilled = Some(holds);
                fulfilled &= holds;
            }
            if !fulfilled {
                debug!(activity = id, "maximum time gap exceeded in forward pass");
                return Ok(GapPassOutcome::Violated { activity: id });
            }
        }
        Ok(GapPassOutcome::Completed)
    }

    fn predecessor_finishes(&self, id: i32) -> GraphResult<Vec<(i32, f64)>> {
        let activity = self.graph.get(id)?;
        activity
            .predecessors
            .iter()
            .map(|&predecessor_id| {
                let finish = self.graph.get(predecessor_id)?.earliest_finish.ok_or(
                    GraphError::MissingValue {
                        id: predecessor_id,
                        field: "earliest finish",
                    },
                )?;
                Ok((predecessor_id, finish))
            })
            .collect()
    }
}

pub struct TimeGapBackwardPass<'a> {
    graph: &'a mut ActivityGraph,
    relationships: &'a mut BTreeMap<RelationshipKey, Relationship>,
}

impl<'a> TimeGapBackwardPass<'a> {
    pub fn new(
        graph: &'a mut ActivityGraph,
        relationships: &'a mut BTreeMap<RelationshipKey, Relationship>,
    ) -> Self {
        Self {
            graph,
            relationships,
        }
    }

    pub fn execute(&mut self) -> GraphResult<GapPassOutcome> {
        let project_duration = self.graph.project_duration()?;
        for id in self.graph.end_nodes().to_vec() {
            let end = self.graph.get_mut(id)?;
            end.latest_finish = Some(project_duration);
            end.latest_start = Some(project_duration - end.duration);
        }

        for id in self.graph.topological_order(true) {
            if self.graph.is_end_node(id) {
                continue;
            }
            let successor_starts = self.successor_starts(id)?;

            let mut latest_finish = f64::INFINITY;
            for &(successor_id, start) in &successor_starts {
                let gap = relationship_mut(self.relationships, id, successor_id)?.minimum_gap();
                latest_finish = latest_finish.min(start - gap);
            }
            if !latest_finish.is_finite() {
                return Err(GraphError::InvalidAggregate {
                    id,
                    value: latest_finish,
                });
            }

            let activity = self.graph.get_mut(id)?;
            activity.latest_start = Some(latest_finish - activity.duration);
            activity.latest_finish = Some(latest_finish);
            trace!(activity = id, lf = latest_finish, "time-gap backward pass");

            let mut fulfilled = true;
            for (successor_id, start) in successor_starts {
                let relationship = relationship_mut(self.relationships, id, successor_id)?;
                let holds = start - latest_finish <= relationship.maximum_gap();
                relationship.is_backward_condition_fulfilled = Some(holds);
                fulfilled &= holds;
            }
            if !fulfilled {
                debug!(activity = id, "maximum time gap exceeded in backward pass");
                return Ok(GapPassOutcome::Violated { activity: id });
            }
        }
        Ok(GapPassOutcome::Completed)
    }

    fn successor_starts(&self, id: i32) -> GraphResult<Vec<(i32, f64)>> {
        let activity = self.graph.get(id)?;
        activity
            .successors
            .iter()
            .map(|&successor_id| {
                let start = self.graph.get(successor_id)?.latest_start.ok_or(
                    GraphError::MissingValue {
                        id: successor_id,
                        field: "latest start",
                    },
                )?;
                Ok((successor_id, start))
            })
            .collect()
    }
}
