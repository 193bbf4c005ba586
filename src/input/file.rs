use super::{InputError, InputResult};
use crate::analysis::AnalysisReport;
use crate::graph::Activity;
use crate::metadata::ProjectMetadata;
use crate::task::{RelatedTask, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub metadata: ProjectMetadata,
    pub tasks: Vec<Task>,
}

impl ProjectSnapshot {
    pub fn new(metadata: ProjectMetadata, tasks: Vec<Task>) -> Self {
        Self { metadata, tasks }
    }
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(
    snapshot: &ProjectSnapshot,
    path: P,
) -> InputResult<()> {
    super::validate_tasks(&snapshot.tasks)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> InputResult<ProjectSnapshot> {
    let file = File::open(path.as_ref())?;
    let snapshot: ProjectSnapshot = serde_json::from_reader(file)?;
    super::validate_tasks(&snapshot.tasks)?;
    debug!(
        path = %path.as_ref().display(),
        tasks = snapshot.tasks.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    name: String,
    start_date: String,
    end_date: String,
    #[serde(default)]
    successors: String,
    #[serde(default)]
    predecessors: String,
    #[serde(default)]
    optimistic_estimation: String,
    #[serde(default)]
    modal_estimation: String,
    #[serde(default)]
    pessimistic_estimation: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            start_date: format_date(task.start_date),
            end_date: format_date(task.end_date),
            successors: join_related(&task.successors),
            predecessors: join_related(&task.predecessors),
            optimistic_estimation: format_option_f64(task.optimistic_estimation),
            modal_estimation: format_option_f64(task.modal_estimation),
            pessimistic_estimation: format_option_f64(task.pessimistic_estimation),
        }
    }
}

impl TaskCsvRecord {
    fn into_task(self) -> InputResult<Task> {
        let mut task = Task::new(
            self.id,
            self.name,
            parse_date(&self.start_date)?,
            parse_date(&self.end_date)?,
        );
        task.successors = split_related(&self.successors)?;
        task.predecessors = split_related(&self.predecessors)?;
        task.optimistic_estimation = parse_f64(&self.optimistic_estimation)?;
        task.modal_estimation = parse_f64(&self.modal_estimation)?;
        task.pessimistic_estimation = parse_f64(&self.pessimistic_estimation)?;
        Ok(task)
    }
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> InputResult<()> {
    super::validate_tasks(tasks)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> InputResult<Vec<Task>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

pub fn export_report_to_json<P: AsRef<Path>>(report: &AnalysisReport, path: P) -> InputResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

#[derive(Serialize)]
struct ActivityCsvRecord<'a> {
    id: i32,
    name: &'a str,
    duration: f64,
    earliest_start: Option<f64>,
    earliest_finish: Option<f64>,
    latest_start: Option<f64>,
    latest_finish: Option<f64>,
    total_float: Option<f64>,
    free_float: Option<f64>,
    is_critical: bool,
    calculation_failed: bool,
}

impl<'a> From<&'a Activity> for ActivityCsvRecord<'a> {
    fn from(activity: &'a Activity) -> Self {
        Self {
            id: activity.id,
            name: &activity.name,
            duration: activity.duration,
            earliest_start: activity.earliest_start,
            earliest_finish: activity.earliest_finish,
            latest_start: activity.latest_start,
            latest_finish: activity.latest_finish,
            total_float: activity.total_float(),
            free_float: activity.free_float,
            is_critical: activity.is_critical(),
            calculation_failed: activity.calculation_failed,
        }
    }
}

/// Writes calculated activity values; absent values are empty fields.
pub fn export_activities_to_csv<'a, P, I>(activities: I, path: P) -> InputResult<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Activity>,
{
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for activity in activities {
        writer.serialize(ActivityCsvRecord::from(activity))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> InputResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| InputError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_f64(input: &str) -> InputResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| InputError::InvalidData(format!("invalid float '{input}': {e}")))
}

/// `id[:min[:max]]` entries separated by `;`.
fn join_related(values: &[RelatedTask]) -> String {
    values
        .iter()
        .map(|related| {
            match (related.minimum_time_gap, related.maximum_time_gap) {
                (None, None) => related.related_task_id.to_string(),
                (min, None) => format!(
                    "{}:{}",
                    related.related_task_id,
                    format_option_f64(min)
                ),
                (min, max) => format!(
                    "{}:{}:{}",
                    related.related_task_id,
                    format_option_f64(min),
                    format_option_f64(max)
                ),
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn split_related(input: &str) -> InputResult<Vec<RelatedTask>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input.split(';').map(parse_related).collect()
}

fn parse_related(entry: &str) -> InputResult<RelatedTask> {
    let mut parts = entry.trim().split(':');
    let id_part = parts.next().unwrap_or_default();
    let related_task_id = id_part.trim().parse::<i32>().map_err(|e| {
        InputError::InvalidData(format!("invalid related task id '{id_part}': {e}"))
    })?;
    let minimum = parse_f64(parts.next().unwrap_or_default())?;
    let maximum = parse_f64(parts.next().unwrap_or_default())?;
    if parts.next().is_some() {
        return Err(InputError::InvalidData(format!(
            "related task entry '{entry}' has more than three fields"
        )));
    }
    Ok(RelatedTask::with_gaps(related_task_id, minimum, maximum))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_entries_keep_absent_gaps() {
        let parsed = split_related("2; 3:1.5 ;4::6").unwrap();
        assert_eq!(
            parsed,
            vec![
                RelatedTask::new(2),
                RelatedTask::with_gaps(3, Some(1.5), None),
                RelatedTask::with_gaps(4, None, Some(6.0)),
            ]
        );
        assert_eq!(join_related(&parsed), "2;3:1.5;4::6");
    }

    #[test]
    fn malformed_related_entries_are_rejected() {
        assert!(matches!(
            split_related("x"),
            Err(InputError::InvalidData(_))
        ));
        assert!(split_related("2:1:2:3").is_err());
        assert!(split_related("2:abc").is_err());
    }
}
