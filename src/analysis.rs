//! Runs the configured engines over one task snapshot and gathers their
//! results into a serializable report.

use serde::Serialize;
use tracing::info;

use crate::config::{AnalysisConfig, Method};
use crate::graph::Relationship;
use crate::metadata::ProjectMetadata;
use crate::schedule::{CpmSchedule, MpmSchedule, PertSchedule, ScheduleSummary};
use crate::task::Task;

#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    config: AnalysisConfig,
    cpm: Option<CpmSchedule>,
    mpm: Option<MpmSchedule>,
    pert: Option<PertSchedule>,
}

impl ProjectAnalysis {
    /// Builds every selected engine. The engines share nothing, so they are
    /// built side by side on the rayon pool.
    pub fn run(tasks: &[Task], config: &AnalysisConfig) -> Self {
        let build = |method: Method| config.runs(method);
        let (cpm, (mpm, pert)) = rayon::join(
            || build(Method::Cpm).then(|| CpmSchedule::from_tasks(tasks)),
            || {
                rayon::join(
                    || build(Method::Mpm).then(|| MpmSchedule::from_tasks(tasks)),
                    || build(Method::Pert).then(|| PertSchedule::from_tasks(tasks)),
                )
            },
        );
        info!(
            tasks = tasks.len(),
            methods = ?config.methods,
            "analysis finished"
        );
        Self {
            config: config.clone(),
            cpm,
            mpm,
            pert,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cpm(&self) -> Option<&CpmSchedule> {
        self.cpm.as_ref()
    }

    pub fn mpm(&self) -> Option<&MpmSchedule> {
        self.mpm.as_ref()
    }

    pub fn pert(&self) -> Option<&PertSchedule> {
        self.pert.as_ref()
    }

    pub fn report(&self, metadata: &ProjectMetadata) -> AnalysisReport {
        AnalysisReport {
            metadata: metadata.clone(),
            cpm: self.cpm.as_ref().map(|cpm| MethodReport {
                summary: cpm.summary(),
                failure: cpm.failure().map(ToString::to_string),
            }),
            mpm: self.mpm.as_ref().map(|mpm| MpmReport {
                method: MethodReport {
                    summary: mpm.summary(),
                    failure: mpm.failure().map(ToString::to_string),
                },
                init_failed: mpm.is_init_failed(),
                forward_failed: mpm.is_forward_calculation_failed(),
                backward_failed: mpm.is_backward_calculation_failed(),
                relationships: mpm.relationships().cloned().collect(),
            }),
            pert: self.pert.as_ref().map(|pert| self.pert_report(pert)),
        }
    }

    fn pert_report(&self, pert: &PertSchedule) -> PertReport {
        let target_duration = self.config.target_duration.or(pert.project_duration());
        PertReport {
            method: MethodReport {
                summary: pert.summary(),
                failure: pert.failure().map(ToString::to_string),
            },
            init_failed: pert.is_init_failed(),
            estimations_complete: pert.has_all_activities_filled_estimations(),
            project_dispersion: pert.project_dispersion(),
            project_standard_deviation: pert.project_standard_deviation(),
            target_duration,
            completion_probability: target_duration
                .and_then(|target| pert.completion_probability(target)),
            target_probability: self.config.target_probability,
            completion_time: pert.completion_time(self.config.target_probability),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metadata: ProjectMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpm: Option<MethodReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpm: Option<MpmReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pert: Option<PertReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodReport {
    #[serde(flatten)]
    pub summary: ScheduleSummary,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpmReport {
    #[serde(flatten)]
    pub method: MethodReport,
    pub init_failed: bool,
    pub forward_failed: bool,
    pub backward_failed: bool,
    /// Every relationship with its gaps and condition verdicts.
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PertReport {
    #[serde(flatten)]
    pub method: MethodReport,
    pub init_failed: bool,
    pub estimations_complete: bool,
    pub project_dispersion: Option<f64>,
    pub project_standard_deviation: Option<f64>,
    pub target_duration: Option<f64>,
    pub completion_probability: Option<f64>,
    pub target_probability: f64,
    pub completion_time: Option<f64>,
}
