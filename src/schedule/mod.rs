//! The three scheduling engines.
//!
//! Each engine runs its whole calculation inside its constructor and never
//! returns an error: failures end up in boolean flags (plus the first
//! structural [`GraphError`](crate::error::GraphError) that occurred), and
//! computed fields of a failed calculation read as absent.

use serde::Serialize;

use crate::graph::Activity;

pub mod cpm;
pub mod mpm;
pub mod pert;

pub use cpm::CpmSchedule;
pub use mpm::MpmSchedule;
pub use pert::{PertActivity, PertSchedule};

/// Headline numbers of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub activity_count: usize,
    pub critical_count: usize,
    pub project_duration: Option<f64>,
    /// Ids of the critical activities in topological order.
    pub critical_path: Vec<i32>,
    pub failed: bool,
}

impl ScheduleSummary {
    pub(crate) fn collect<'a>(
        activity_count: usize,
        ordered: impl IntoIterator<Item = &'a Activity>,
        project_duration: Option<f64>,
        failed: bool,
    ) -> Self {
        let critical_path: Vec<i32> = if failed {
            Vec::new()
        } else {
            ordered
                .into_iter()
                .filter(|a| a.is_critical())
                .map(|a| a.id)
                .collect()
        };
        Self {
            activity_count,
            critical_count: critical_path.len(),
            project_duration: if failed { None } else { project_duration },
            critical_path,
            failed,
        }
    }

    pub fn to_cli_summary(&self) -> String {
        if self.failed {
            return format!("activities={}, calculation failed", self.activity_count);
        }
        let path = self
            .critical_path
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        format!(
            "activities={}, critical={}, duration={}, critical path: {}",
            self.activity_count,
            self.critical_count,
            self.project_duration
                .map(|d| format!("{d:.3}"))
                .unwrap_or_else(|| "-".to_string()),
            path
        )
    }
}
