use crate::calculations::{BackwardPass, FloatPass, ForwardPass};
use crate::error::{GraphError, GraphResult};
use crate::graph::{Activity, ActivityGraph};
use crate::schedule::ScheduleSummary;
use crate::task::Task;
use crate::task_validation::validate_task_collection;
use tracing::{debug, warn};

/// Critical path method over a set of activities.
#[derive(Debug, Clone)]
pub struct CpmSchedule {
    graph: ActivityGraph,
    failure: Option<GraphError>,
    project_duration: Option<f64>,
}

impl CpmSchedule {
    /// Builds the graph and runs the forward, backward and float passes.
    pub fn new(activities: Vec<Activity>) -> Self {
        let mut graph = ActivityGraph::unlinked(activities);
        match graph.link() {
            Ok(()) => Self::from_graph(graph),
            Err(err) => Self::failed(graph, err),
        }
    }

    /// Builds and validates the graph without calculating anything.
    pub fn init_only(activities: Vec<Activity>) -> Self {
        let mut graph = ActivityGraph::unlinked(activities);
        match graph.link() {
            Ok(()) => Self {
                graph,
                failure: None,
                project_duration: None,
            },
            Err(err) => Self::failed(graph, err),
        }
    }

    pub fn from_tasks(tasks: &[Task]) -> Self {
        let activities = tasks.iter().map(Activity::from_task).collect();
        match validate_task_collection(tasks) {
            Ok(()) => Self::new(activities),
            Err(err) => Self::failed(ActivityGraph::unlinked(activities), err.into()),
        }
    }

    /// Runs the passes on an already linked graph.
    pub(crate) fn from_graph(mut graph: ActivityGraph) -> Self {
        debug!(activities = graph.len(), "running critical path calculation");
        match calculate(&mut graph) {
            Ok(project_duration) => {
                debug!(project_duration, "critical path calculation finished");
                Self {
                    graph,
                    failure: None,
                    project_duration: Some(project_duration),
                }
            }
            Err(err) => {
                graph.clear_results();
                Self::failed(graph, err)
            }
        }
    }

    fn failed(mut graph: ActivityGraph, err: GraphError) -> Self {
        warn!(error = %err, "critical path calculation failed");
        for activity in graph.activities_mut() {
            activity.calculation_failed = true;
        }
        Self {
            graph,
            failure: Some(err),
            project_duration: None,
        }
    }

    /// All activities in insertion order.
    pub fn activities(&self) -> &[Activity] {
        self.graph.activities()
    }

    pub fn activity(&self, id: i32) -> Option<&Activity> {
        self.graph.find(id)
    }

    pub fn graph(&self) -> &ActivityGraph {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut ActivityGraph {
        &mut self.graph
    }

    pub fn topological_sort(&self, reverse: bool) -> Vec<&Activity> {
        self.graph
            .topological_order(reverse)
            .into_iter()
            .filter_map(|id| self.graph.find(id))
            .collect()
    }

    pub fn is_calculation_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure(&self) -> Option<&GraphError> {
        self.failure.as_ref()
    }

    pub fn is_critical_activity(&self, id: i32) -> bool {
        if self.is_calculation_failed() {
            return false;
        }
        self.graph.find(id).is_some_and(Activity::is_critical)
    }

    pub fn project_duration(&self) -> Option<f64> {
        self.project_duration
    }

    /// Critical activities in topological order.
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
            self.graph.len(),
            self.topological_sort(false),
            self.project_duration,
            self.is_calculation_failed(),
        )
    }
}

fn calculate(graph: &mut ActivityGraph) -> GraphResult<f64> {
    ForwardPass::new(graph).execute()?;
    let project_duration = BackwardPass::new(graph).execute()?;
    FloatPass::new(graph).execute()?;
    Ok(project_duration)
}
