use crate::task_validation::TaskValidationError;
use thiserror::Error;

/// Structural and constraint failures raised while building or calculating
/// an activity graph.
///
/// Engines never hand these to the caller as `Err`; they keep the first one
/// they hit and expose it next to their failure flags.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("project graph has no activities")]
    Empty,
    #[error("activity {id} is defined more than once")]
    DuplicateActivity { id: i32 },
    #[error("project graph isn't related: activity {id} has no predecessors and no successors")]
    Disconnected { id: i32 },
    #[error("activity {id} references itself")]
    SelfReference { id: i32 },
    #[error("activity with id={id} not found")]
    NotFound { id: i32 },
    #[error("dependency cycle detected at activity {id}")]
    Cycle { id: i32 },
    #[error("activity {id} has invalid duration {duration}")]
    InvalidDuration { id: i32, duration: f64 },
    #[error("activity {id} doesn't have {field} set")]
    MissingValue { id: i32, field: &'static str },
    #[error("activity {id} resolved to an invalid boundary value {value}")]
    InvalidAggregate { id: i32, value: f64 },
    #[error("relationship {from}-{to} not found")]
    MissingRelationship { from: i32, to: i32 },
    #[error("task with id={id} has invalid values of time estimations")]
    InvalidEstimate { id: i32 },
    #[error(transparent)]
    InvalidTask(#[from] TaskValidationError),
}

pub type GraphResult<T> = Result<T, GraphError>;
