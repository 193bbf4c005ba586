use serde::Serialize;

use crate::task::Task;

/// Total float at or below this value counts as zero.
pub const CRITICAL_FLOAT_TOLERANCE: f64 = 1e-10;

/// A node of the project network together with its calculated times.
///
/// All times are day offsets from the project start (day 0). Computed fields
/// stay `None` until the pass that owns them has run successfully.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub duration: f64,
    pub predecessors: Vec<i32>,
    pub successors: Vec<i32>,
    pub earliest_start: Option<f64>,
    pub earliest_finish: Option<f64>,
    pub latest_start: Option<f64>,
    pub latest_finish: Option<f64>,
    total_float: Option<f64>,
    pub free_float: Option<f64>,
    is_critical: bool,
    pub calculation_failed: bool,
}

impl Activity {
    pub fn new(id: i32, name: impl Into<String>, duration: f64) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            predecessors: Vec::new(),
            successors: Vec::new(),
            earliest_start: None,
            earliest_finish: None,
            latest_start: None,
            latest_finish: None,
            total_float: None,
            free_float: None,
            is_critical: false,
            calculation_failed: false,
        }
    }

    pub fn with_predecessors(mut self, predecessors: impl Into<Vec<i32>>) -> Self {
        self.predecessors = predecessors.into();
        self
    }

    pub fn with_successors(mut self, successors: impl Into<Vec<i32>>) -> Self {
        self.successors = successors.into();
        self
    }

    /// Activity for a task record; the duration is the inclusive day count.
    pub fn from_task(task: &Task) -> Self {
        Self::new(task.id, task.name.clone(), task.duration_days() as f64)
            .with_predecessors(task.predecessor_ids())
            .with_successors(task.successor_ids())
    }

    pub fn total_float(&self) -> Option<f64> {
        self.total_float
    }

    /// Sets the total float and re-derives criticality from it.
    pub fn set_total_float(&mut self, value: Option<f64>) {
        self.total_float = value;
        self.is_critical = matches!(value, Some(float) if float <= CRITICAL_FLOAT_TOLERANCE);
    }

    pub fn is_critical(&self) -> bool {
        self.is_critical
    }

    pub fn has_early_times(&self) -> bool {
        self.earliest_start.is_some() && self.earliest_finish.is_some()
    }

    pub fn has_late_times(&self) -> bool {
        self.latest_start.is_some() && self.latest_finish.is_some()
    }

    /// Drops every computed value, leaving identity, duration and edges.
    pub fn clear_results(&mut self) {
        self.earliest_start = None;
        self.earliest_finish = None;
        self.latest_start = None;
        self.latest_finish = None;
        self.free_float = None;
        self.set_total_float(None);
    }
}
