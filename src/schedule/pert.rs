use serde::Serialize;

use crate::distribution::{standard_normal_cdf, standard_normal_quantile};
use crate::error::{GraphError, GraphResult};
use crate::estimate::ThreePointEstimate;
use crate::graph::{Activity, ActivityGraph};
use crate::schedule::{CpmSchedule, ScheduleSummary};
use crate::task::Task;
use crate::task_validation::validate_task_collection;
use tracing::{debug, warn};

/// An activity plus its three-point estimate and the values derived from it.
///
/// Without an estimate the derived values stay `None` and the duration of
/// the inner activity is a zero placeholder that never reaches a calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PertActivity {
    pub activity: Activity,
    pub estimate: Option<ThreePointEstimate>,
    pub average_duration: Option<f64>,
    pub standard_deviation: Option<f64>,
    pub dispersion: Option<f64>,
}

impl PertActivity {
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            estimate: None,
            average_duration: None,
            standard_deviation: None,
            dispersion: None,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        let mut activity = Activity::from_task(task);
        activity.duration = 0.0;
        Self::new(activity)
    }

    pub fn id(&self) -> i32 {
        self.activity.id
    }

    pub fn has_estimate(&self) -> bool {
        self.estimate.is_some()
    }

    /// Stores the estimate and makes its average the activity duration.
    pub fn apply_estimate(&mut self, estimate: ThreePointEstimate) -> GraphResult<()> {
        if !estimate.is_ordered() {
            return Err(GraphError::InvalidEstimate {
                id: self.activity.id,
            });
        }
        let average = estimate.average_duration();
        self.estimate = Some(estimate);
        self.average_duration = Some(average);
        self.standard_deviation = Some(estimate.standard_deviation());
        self.dispersion = Some(estimate.dispersion());
        self.activity.duration = average;
        Ok(())
    }
}

/// Program evaluation and review technique: CPM over expected durations plus
/// normal-approximated completion probabilities along the critical path.
#[derive(Debug, Clone)]
pub struct PertSchedule {
    activities: Vec<PertActivity>,
    cpm: Option<CpmSchedule>,
    init_failed: bool,
    failure: Option<GraphError>,
}

impl PertSchedule {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut activities = Vec::with_capacity(tasks.len());
        let mut first_error = validate_task_collection(tasks)
            .err()
            .map(GraphError::from);
        for task in tasks {
            let mut pert = PertActivity::from_task(task);
            if first_error.is_none() {
                if let Some(estimate) = task.estimate() {
                    first_error = pert.apply_estimate(estimate).err();
                }
            }
            activities.push(pert);
        }
        match first_error {
            Some(err) => Self::init_failure(activities, err),
            None => Self::new(activities),
        }
    }

    /// Takes activities whose estimates are already applied.
    pub fn new(activities: Vec<PertActivity>) -> Self {
        let graph = match ActivityGraph::build(
            activities.iter().map(|p| p.activity.clone()).collect(),
        ) {
            Ok(graph) => graph,
            Err(err) => return Self::init_failure(activities, err),
        };

        let mut schedule = Self {
            activities,
            cpm: None,
            init_failed: false,
            failure: None,
        };
        if !schedule.has_all_activities_filled_estimations() {
            debug!("estimations incomplete, critical path withheld");
            return schedule;
        }

        let cpm = CpmSchedule::from_graph(graph);
        if let Some(err) = cpm.failure() {
            schedule.failure = Some(err.clone());
        }
        for pert in &mut schedule.activities {
            if let Some(calculated) = cpm.activity(pert.activity.id) {
                pert.activity = calculated.clone();
            }
        }
        schedule.cpm = Some(cpm);
        debug!(
            project_duration = schedule.project_duration(),
            project_standard_deviation = schedule.project_standard_deviation(),
            "PERT calculation finished"
        );
        schedule
    }

    fn init_failure(mut activities: Vec<PertActivity>, err: GraphError) -> Self {
        warn!(error = %err, "PERT network could not be initialised");
        for pert in &mut activities {
            pert.activity.calculation_failed = true;
        }
        Self {
            activities,
            cpm: None,
            init_failed: true,
            failure: Some(err),
        }
    }

    pub fn activities(&self) -> &[PertActivity] {
        &self.activities
    }

    pub fn activity(&self, id: i32) -> Option<&PertActivity> {
        self.activities.iter().find(|p| p.activity.id == id)
    }

    pub fn has_all_activities_filled_estimations(&self) -> bool {
        self.activities.iter().all(PertActivity::has_estimate)
    }

    pub fn is_init_failed(&self) -> bool {
        self.init_failed
    }

    pub fn is_cpm_calculated(&self) -> bool {
        self.cpm
            .as_ref()
            .is_some_and(|cpm| !cpm.is_calculation_failed())
    }

    pub fn is_calculation_failed(&self) -> bool {
        self.init_failed || self.cpm.as_ref().is_some_and(CpmSchedule::is_calculation_failed)
    }

    pub fn failure(&self) -> Option<&GraphError> {
        self.failure.as_ref()
    }

    /// The embedded critical path calculation, once every estimate is known.
    pub fn cpm(&self) -> Option<&CpmSchedule> {
        self.cpm.as_ref()
    }

    /// Activities in topological order; empty until the graph was calculated.
    pub fn topological_sort(&self, reverse: bool) -> Vec<&PertActivity> {
        let Some(cpm) = &self.cpm else {
            return Vec::new();
        };
        cpm.graph()
            .topological_order(reverse)
            .into_iter()
            .filter_map(|id| self.activity(id))
            .collect()
    }

    pub fn critical_activities(&self) -> Vec<&PertActivity> {
        if !self.is_cpm_calculated() {
            return Vec::new();
        }
        self.topological_sort(false)
            .into_iter()
            .filter(|p| p.activity.is_critical())
            .collect()
    }

    /// Sum of the expected durations of the critical activities.
    pub fn project_duration(&self) -> Option<f64> {
        self.is_cpm_calculated().then(|| {
            self.critical_activities()
                .iter()
                .map(|p| p.activity.duration)
                .sum()
        })
    }

    pub fn project_dispersion(&self) -> Option<f64> {
        self.is_cpm_calculated().then(|| {
            self.critical_activities()
                .iter()
                .map(|p| p.dispersion.unwrap_or(0.0))
                .sum()
        })
    }

    pub fn project_standard_deviation(&self) -> Option<f64> {
        self.project_dispersion().map(f64::sqrt)
    }

    /// Probability of finishing within `target_duration` days.
    pub fn completion_probability(&self, target_duration: f64) -> Option<f64> {
        let duration = self.project_duration()?;
        let deviation = self.project_standard_deviation()?;
        if target_duration.is_nan() {
            return None;
        }
        if deviation == 0.0 {
            return Some(if target_duration >= duration { 1.0 } else { 0.0 });
        }
        standard_normal_cdf((target_duration - duration) / deviation)
    }

    /// Duration that is met with the given probability.
    pub fn completion_time(&self, probability: f64) -> Option<f64> {
        let duration = self.project_duration()?;
        let deviation = self.project_standard_deviation()?;
        let z = standard_normal_quantile(probability)?;
        Some(z * deviation + duration)
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::collect(
            self.activities.len(),
            self.critical_activities().into_iter().map(|p| &p.activity),
            self.project_duration(),
            self.is_calculation_failed(),
        )
    }
}
