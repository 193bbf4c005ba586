use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::estimate::ThreePointEstimate;

/// A dependency entry on a task record, pointing at the related task.
///
/// Time gaps are in days; an absent minimum means no lag, an absent maximum
/// means the gap is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedTask {
    pub related_task_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_time_gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_time_gap: Option<f64>,
}

impl RelatedTask {
    pub fn new(related_task_id: i32) -> Self {
        Self {
            related_task_id,
            minimum_time_gap: None,
            maximum_time_gap: None,
        }
    }

    pub fn with_gaps(related_task_id: i32, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self {
            related_task_id,
            minimum_time_gap: minimum,
            maximum_time_gap: maximum,
        }
    }
}

/// Task record as delivered by the task-management layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub successors: Vec<RelatedTask>,
    #[serde(default)]
    pub predecessors: Vec<RelatedTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimistic_estimation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_estimation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pessimistic_estimation: Option<f64>,
}

impl Task {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start_date,
            end_date,
            successors: Vec::new(),
            predecessors: Vec::new(),
            optimistic_estimation: None,
            modal_estimation: None,
            pessimistic_estimation: None,
        }
    }

    /// Inclusive number of calendar days between start and end date.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn successor_ids(&self) -> Vec<i32> {
        self.successors.iter().map(|r| r.related_task_id).collect()
    }

    pub fn predecessor_ids(&self) -> Vec<i32> {
        self.predecessors.iter().map(|r| r.related_task_id).collect()
    }

    /// The three-point estimate, only when all three values are filled.
    pub fn estimate(&self) -> Option<ThreePointEstimate> {
        match (
            self.optimistic_estimation,
            self.modal_estimation,
            self.pessimistic_estimation,
        ) {
            (Some(optimistic), Some(modal), Some(pessimistic)) => {
                Some(ThreePointEstimate::new(optimistic, modal, pessimistic))
            }
            _ => None,
        }
    }

    pub fn set_estimate(&mut self, optimistic: f64, modal: f64, pessimistic: f64) {
        self.optimistic_estimation = Some(optimistic);
        self.modal_estimation = Some(modal);
        self.pessimistic_estimation = Some(pessimistic);
    }
}
