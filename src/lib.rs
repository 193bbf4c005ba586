pub mod analysis;
pub mod calculations;
pub mod config;
pub mod distribution;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod input;
pub mod metadata;
pub mod report;
pub mod schedule;
pub mod task;
pub mod task_validation;

pub use analysis::{AnalysisReport, ProjectAnalysis};
pub use config::{AnalysisConfig, ConfigError, Method};
pub use error::{GraphError, GraphResult};
pub use estimate::ThreePointEstimate;
pub use graph::{Activity, ActivityGraph, Relationship};
pub use metadata::ProjectMetadata;
pub use schedule::{CpmSchedule, MpmSchedule, PertActivity, PertSchedule, ScheduleSummary};
pub use task::{RelatedTask, Task};
