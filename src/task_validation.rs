use crate::task::{RelatedTask, Task};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn validate_related(task: &Task, related: &RelatedTask) -> Result<(), TaskValidationError> {
    if related.related_task_id == task.id {
        return Err(TaskValidationError::new(format!(
            "task {} lists itself as a related task",
            task.id
        )));
    }
    for (label, gap) in [
        ("minimum_time_gap", related.minimum_time_gap),
        ("maximum_time_gap", related.maximum_time_gap),
    ] {
        if let Some(value) = gap {
            if !value.is_finite() {
                return Err(TaskValidationError::new(format!(
                    "task {} relation to {} has non-finite {} {}",
                    task.id, related.related_task_id, label, value
                )));
            }
        }
    }
    Ok(())
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.end_date < task.start_date {
        return Err(TaskValidationError::new(format!(
            "task {} ends ({}) before it starts ({})",
            task.id, task.end_date, task.start_date
        )));
    }

    for related in task.successors.iter().chain(task.predecessors.iter()) {
        validate_related(task, related)?;
    }

    for (label, value) in [
        ("optimistic_estimation", task.optimistic_estimation),
        ("modal_estimation", task.modal_estimation),
        ("pessimistic_estimation", task.pessimistic_estimation),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(TaskValidationError::new(format!(
                    "task {} has non-finite {} {}",
                    task.id, label, v
                )));
            }
        }
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: i32) -> Task {
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        Task::new(id, format!("T{id}"), day, day)
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = validate_task_collection(&[task(1), task(1)]).unwrap_err();
        assert_eq!(err.to_string(), "duplicate task id 1");
    }

    #[test]
    fn rejects_inverted_dates() {
        let mut t = task(3);
        t.end_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(validate_task(&t).is_err());
    }

    #[test]
    fn rejects_self_reference_and_nan_gap() {
        let mut t = task(4);
        t.successors.push(RelatedTask::new(4));
        assert!(validate_task(&t).is_err());

        let mut t = task(5);
        t.predecessors
            .push(RelatedTask::with_gaps(1, Some(f64::NAN), None));
        assert!(validate_task(&t).is_err());
    }
}
