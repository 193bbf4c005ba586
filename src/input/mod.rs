//! File adapters for task snapshots and calculated results.

use crate::task::Task;
use crate::task_validation;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type InputResult<T> = Result<T, InputError>;

pub fn validate_tasks(tasks: &[Task]) -> InputResult<()> {
    if tasks.is_empty() {
        return Err(InputError::InvalidData("file contained no tasks".into()));
    }
    task_validation::validate_task_collection(tasks)
        .map_err(|err| InputError::InvalidData(err.to_string()))
}

pub mod file;

pub use file::{
    ProjectSnapshot, export_activities_to_csv, export_report_to_json, load_snapshot_from_json,
    load_tasks_from_csv, save_snapshot_to_json, save_tasks_to_csv,
};
