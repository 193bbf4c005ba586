use std::collections::BTreeMap;

use crate::calculations::{GapPassOutcome, TimeGapBackwardPass, TimeGapForwardPass, TotalFloatPass};
use crate::error::GraphError;
use crate::graph::{Activity, ActivityGraph, Relationship, RelationshipKey};
use crate::schedule::{CpmSchedule, ScheduleSummary};
use crate::task::Task;
use crate::task_validation::validate_task_collection;
use tracing::{debug, warn};

/// Metra potential method: critical path scheduling where every dependency
/// may carry a minimum and a maximum time gap.
///
/// The activity graph lives in an uncalculated [`CpmSchedule`], which also
/// provides the topological ordering. A broken maximum gap fails the pass in
/// which it was found; the relationship keeps the verdict so callers can tell
/// which dependency is at fault.
#[derive(Debug, Clone)]
pub struct MpmSchedule {
    network: CpmSchedule,
    relationships: BTreeMap<RelationshipKey, Relationship>,
    init_failed: bool,
    forward_failed: bool,
    backward_failed: bool,
    failure: Option<GraphError>,
    project_duration: Option<f64>,
}

impl MpmSchedule {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let activities: Vec<Activity> = tasks.iter().map(Activity::from_task).collect();
        if let Err(err) = validate_task_collection(tasks) {
            return Self::init_failure(CpmSchedule::init_only(activities), err.into());
        }
        Self::new(activities, relationships_from_tasks(tasks))
    }

    /// Builds the network from activities plus gap-labeled relationships.
    ///
    /// A relationship also acts as an edge; edges without a relationship get
    /// one with no gaps.
    pub fn new(mut activities: Vec<Activity>, relationships: Vec<Relationship>) -> Self {
        let mut missing = None;
        for relationship in &relationships {
            let (from, to) = relationship.key();
            if !activities.iter().any(|a| a.id == from) {
                missing.get_or_insert(from);
                continue;
            }
            if !activities.iter().any(|a| a.id == to) {
                missing.get_or_insert(to);
                continue;
            }
            for activity in activities.iter_mut() {
                if activity.id == from && !activity.successors.contains(&to) {
                    activity.successors.push(to);
                }
                if activity.id == to && !activity.predecessors.contains(&from) {
                    activity.predecessors.push(from);
                }
            }
        }

        let network = CpmSchedule::init_only(activities);
        if let Some(id) = missing {
            return Self::init_failure(network, GraphError::NotFound { id });
        }
        if let Some(err) = network.failure().cloned() {
            return Self::init_failure(network, err);
        }

        let mut by_key: BTreeMap<RelationshipKey, Relationship> =
            relationships.into_iter().map(|r| (r.key(), r)).collect();
        for (from, to) in network.graph().edges() {
            by_key
                .entry((from, to))
                .or_insert_with(|| Relationship::new(from, to));
        }

        let mut schedule = Self {
            network,
            relationships: by_key,
            init_failed: false,
            forward_failed: false,
            backward_failed: false,
            failure: None,
            project_duration: None,
        };
        schedule.calculate();
        schedule
    }

    fn init_failure(network: CpmSchedule, err: GraphError) -> Self {
        warn!(error = %err, "time-gap network could not be initialised");
        Self {
            network,
            relationships: BTreeMap::new(),
            init_failed: true,
            forward_failed: false,
            backward_failed: false,
            failure: Some(err),
            project_duration: None,
        }
    }

    fn calculate(&mut self) {
        debug!(
            activities = self.network.graph().len(),
            relationships = self.relationships.len(),
            "running time-gap calculation"
        );

        let graph = self.network.graph_mut();
        let forward = TimeGapForwardPass::new(graph, &mut self.relationships).execute();
        match forward {
            Ok(GapPassOutcome::Completed) => {}
            Ok(GapPassOutcome::Violated { activity }) => {
                self.forward_failed = true;
                mark_failed(graph, Some(activity), |a| !a.has_early_times());
                warn!(activity, "forward pass stopped on a maximum time gap");
                return;
            }
            Err(err) => {
                self.forward_failed = true;
                mark_failed(graph, None, |a| !a.has_early_times());
                warn!(error = %err, "forward pass failed");
                self.failure = Some(err);
                return;
            }
        }

        let backward = TimeGapBackwardPass::new(graph, &mut self.relationships).execute();
        match backward {
            Ok(GapPassOutcome::Completed) => {}
            Ok(GapPassOutcome::Violated { activity }) => {
                self.backward_failed = true;
                mark_failed(graph, Some(activity), |a| !a.has_late_times());
                warn!(activity, "backward pass stopped on a maximum time gap");
                return;
            }
            Err(err) => {
                self.backward_failed = true;
                mark_failed(graph, None, |a| !a.has_late_times());
                warn!(error = %err, "backward pass failed");
                self.failure = Some(err);
                return;
            }
        }

        if let Err(err) = TotalFloatPass::new(graph).execute() {
            self.backward_failed = true;
            warn!(error = %err, "float calculation failed");
            self.failure = Some(err);
            return;
        }

        self.project_duration = graph.project_duration().ok();
        debug!(
            project_duration = self.project_duration,
            "time-gap calculation finished"
        );
    }

    pub fn activities(&self) -> &[Activity] {
        self.network.activities()
    }

    pub fn activity(&self, id: i32) -> Option<&Activity> {
        self.network.activity(id)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn relationship(&self, task_id: i32, related_task_id: i32) -> Option<&Relationship> {
        self.relationships.get(&(task_id, related_task_id))
    }

    /// Relationships whose forward or backward condition does not hold.
    pub fn violated_relationships(&self) -> Vec<&Relationship> {
        self.relationships
            .values()
            .filter(|r| r.is_violated())
            .collect()
    }

    pub fn topological_sort(&self, reverse: bool) -> Vec<&Activity> {
        self.network.topological_sort(reverse)
    }

    pub fn is_init_failed(&self) -> bool {
        self.init_failed
    }

    pub fn is_forward_calculation_failed(&self) -> bool {
        self.forward_failed
    }

    pub fn is_backward_calculation_failed(&self) -> bool {
        self.backward_failed
    }

    pub fn is_calculation_failed(&self) -> bool {
        self.init_failed || self.forward_failed || self.backward_failed
    }

    /// First structural error, if any. Gap violations are reported through
    /// the flags and relationships only.
    pub fn failure(&self) -> Option<&GraphError> {
        self.failure.as_ref()
    }

    pub fn is_critical_activity(&self, id: i32) -> bool {
        if self.is_calculation_failed() {
            return false;
        }
        self.activity(id).is_some_and(Activity::is_critical)
    }

    pub fn project_duration(&self) -> Option<f64> {
        self.project_duration
    }

    pub fn critical_path(&self) -> Vec<&Activity> {
        if self.is_calculation_failed() {
            return Vec::new();
        }
        self.topological_sort(false)
            .into_iter()
            .filter(|a| a.is_critical())
            .collect()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::collect(
            self.activities().len(),
            self.topological_sort(false),
            self.project_duration,
            self.is_calculation_failed(),
        )
    }
}

fn mark_failed(
    graph: &mut ActivityGraph,
    culprit: Option<i32>,
    unresolved: impl Fn(&Activity) -> bool,
) {
    for activity in graph.activities_mut() {
        if unresolved(activity) || Some(activity.id) == culprit {
            activity.calculation_failed = true;
        }
    }
}

/// Gaps come from the predecessor's successor entry; the successor's
/// predecessor entry only fills in edges the predecessor does not list.
fn relationships_from_tasks(tasks: &[Task]) -> Vec<Relationship> {
    let mut by_key: BTreeMap<RelationshipKey, Relationship> = BTreeMap::new();
    for task in tasks {
        for related in &task.successors {
            by_key.insert(
                (task.id, related.related_task_id),
                Relationship::with_gaps(
                    task.id,
                    related.related_task_id,
                    related.minimum_time_gap,
                    related.maximum_time_gap,
                ),
            );
        }
    }
    for task in tasks {
        for related in &task.predecessors {
            by_key
                .entry((related.related_task_id, task.id))
                .or_insert_with(|| {
                    Relationship::with_gaps(
                        related.related_task_id,
                        task.id,
                        related.minimum_time_gap,
                        related.maximum_time_gap,
                    )
                });
        }
    }
    by_key.into_values().collect()
}
