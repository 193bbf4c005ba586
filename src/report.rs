//! Tabular views of calculated schedules.
//!
//! Rows follow the topological order when the graph could be linked and the
//! insertion order otherwise. Values a calculation did not produce are nulls.

use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;

use crate::graph::Activity;
use crate::metadata::ProjectMetadata;
use crate::schedule::{CpmSchedule, MpmSchedule, PertActivity, PertSchedule};
use crate::task::Task;

/// CPM results. With a project start date the frame also carries the
/// calendar start and finish date of every activity.
pub fn cpm_frame(schedule: &CpmSchedule, metadata: &ProjectMetadata) -> PolarsResult<DataFrame> {
    schedule_frame(
        schedule.topological_sort(false),
        schedule.activities(),
        metadata,
    )
}

pub fn mpm_frame(schedule: &MpmSchedule, metadata: &ProjectMetadata) -> PolarsResult<DataFrame> {
    schedule_frame(
        schedule.topological_sort(false),
        schedule.activities(),
        metadata,
    )
}

fn schedule_frame(
    ordered: Vec<&Activity>,
    all: &[Activity],
    metadata: &ProjectMetadata,
) -> PolarsResult<DataFrame> {
    let rows: Vec<&Activity> = if ordered.is_empty() {
        all.iter().collect()
    } else {
        ordered
    };
    let mut df = activity_frame(&rows)?;
    if metadata.project_start_date.is_none() {
        return Ok(df);
    }

    let starts: Vec<Option<i32>> = rows
        .iter()
        .map(|a| {
            a.earliest_start
                .and_then(|start| metadata.date_at(start))
                .map(date_to_i32)
        })
        .collect();
    let finishes: Vec<Option<i32>> = rows
        .iter()
        .map(|a| last_working_day(a, metadata).map(date_to_i32))
        .collect();
    df.with_column(
        Series::new(PlSmallStr::from_static("start_date"), starts)
            .cast(&DataType::Date)?
            .into_column(),
    )?;
    df.with_column(
        Series::new(PlSmallStr::from_static("finish_date"), finishes)
            .cast(&DataType::Date)?
            .into_column(),
    )?;
    Ok(df)
}

/// Day offsets count whole days, so work finishing at `EF` ends on day `EF - 1`.
fn last_working_day(activity: &Activity, metadata: &ProjectMetadata) -> Option<NaiveDate> {
    let start = activity.earliest_start?;
    let finish = activity.earliest_finish?;
    metadata.date_at((finish - 1.0).max(start))
}

/// Calculated times, floats and flags, one row per activity.
pub fn activity_frame(activities: &[&Activity]) -> PolarsResult<DataFrame> {
    let optional = |name: &'static str, pick: fn(&Activity) -> Option<f64>| {
        let values: Vec<Option<f64>> = activities.iter().map(|a| pick(a)).collect();
        Series::new(PlSmallStr::from_static(name), values).into_column()
    };

    let columns = vec![
        id_column(activities.iter().map(|a| a.id)),
        Series::new(
            PlSmallStr::from_static("name"),
            activities.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("duration"),
            activities.iter().map(|a| a.duration).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("predecessors"),
            activities
                .iter()
                .map(|a| join_ids(&a.predecessors))
                .collect::<Vec<_>>(),
        )
        .into_column(),
        optional("earliest_start", |a| a.earliest_start),
        optional("earliest_finish", |a| a.earliest_finish),
        optional("latest_start", |a| a.latest_start),
        optional("latest_finish", |a| a.latest_finish),
        optional("total_float", Activity::total_float),
        optional("free_float", |a| a.free_float),
        Series::new(
            PlSmallStr::from_static("is_critical"),
            activities.iter().map(|a| a.is_critical()).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("calculation_failed"),
            activities
                .iter()
                .map(|a| a.calculation_failed)
                .collect::<Vec<_>>(),
        )
        .into_column(),
    ];
    DataFrame::new(columns)
}

/// Estimates, derived statistics and the embedded critical path results.
pub fn pert_frame(schedule: &PertSchedule) -> PolarsResult<DataFrame> {
    let ordered = schedule.topological_sort(false);
    let rows: Vec<&PertActivity> = if ordered.is_empty() {
        schedule.activities().iter().collect()
    } else {
        ordered
    };
    let optional = |name: &'static str, pick: fn(&PertActivity) -> Option<f64>| {
        let values: Vec<Option<f64>> = rows.iter().map(|p| pick(p)).collect();
        Series::new(PlSmallStr::from_static(name), values).into_column()
    };

    let columns = vec![
        id_column(rows.iter().map(|p| p.activity.id)),
        Series::new(
            PlSmallStr::from_static("name"),
            rows.iter()
                .map(|p| p.activity.name.as_str())
                .collect::<Vec<_>>(),
        )
        .into_column(),
        optional("optimistic", |p| p.estimate.map(|e| e.optimistic)),
        optional("modal", |p| p.estimate.map(|e| e.modal)),
        optional("pessimistic", |p| p.estimate.map(|e| e.pessimistic)),
        optional("average_duration", |p| p.average_duration),
        optional("standard_deviation", |p| p.standard_deviation),
        optional("dispersion", |p| p.dispersion),
        optional("earliest_start", |p| p.activity.earliest_start),
        optional("earliest_finish", |p| p.activity.earliest_finish),
        optional("latest_start", |p| p.activity.latest_start),
        optional("latest_finish", |p| p.activity.latest_finish),
        optional("total_float", |p| p.activity.total_float()),
        Series::new(
            PlSmallStr::from_static("is_critical"),
            rows.iter()
                .map(|p| p.activity.is_critical())
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("calculation_failed"),
            rows.iter()
                .map(|p| p.activity.calculation_failed)
                .collect::<Vec<_>>(),
        )
        .into_column(),
    ];
    DataFrame::new(columns)
}

/// Gap bounds and condition verdicts of every MPM relationship.
pub fn relationship_frame(schedule: &MpmSchedule) -> PolarsResult<DataFrame> {
    let relationships: Vec<_> = schedule.relationships().collect();
    let columns = vec![
        Series::new(
            PlSmallStr::from_static("task_id"),
            relationships.iter().map(|r| r.task_id).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("related_task_id"),
            relationships
                .iter()
                .map(|r| r.related_task_id)
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("minimum_time_gap"),
            relationships
                .iter()
                .map(|r| r.minimum_time_gap)
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("maximum_time_gap"),
            relationships
                .iter()
                .map(|r| r.maximum_time_gap)
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("forward_fulfilled"),
            relationships
                .iter()
                .map(|r| r.is_forward_condition_fulfilled)
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("backward_fulfilled"),
            relationships
                .iter()
                .map(|r| r.is_backward_condition_fulfilled)
                .collect::<Vec<_>>(),
        )
        .into_column(),
    ];
    DataFrame::new(columns)
}

/// The raw task records, before any calculation.
pub fn task_frame(tasks: &[Task]) -> PolarsResult<DataFrame> {
    let related = |pick: fn(&Task) -> Vec<i32>| -> Vec<String> {
        tasks.iter().map(|t| join_ids(&pick(t))).collect()
    };
    let start_dates: Vec<i32> = tasks.iter().map(|t| date_to_i32(t.start_date)).collect();
    let end_dates: Vec<i32> = tasks.iter().map(|t| date_to_i32(t.end_date)).collect();
    let durations: Vec<i64> = tasks.iter().map(Task::duration_days).collect();

    let columns = vec![
        id_column(tasks.iter().map(|t| t.id)),
        Series::new(
            PlSmallStr::from_static("name"),
            tasks.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(PlSmallStr::from_static("start_date"), start_dates)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("end_date"), end_dates)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
        Series::new(
            PlSmallStr::from_static("predecessors"),
            related(Task::predecessor_ids),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("successors"),
            related(Task::successor_ids),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("optimistic"),
            tasks
                .iter()
                .map(|t| t.optimistic_estimation)
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("modal"),
            tasks.iter().map(|t| t.modal_estimation).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            PlSmallStr::from_static("pessimistic"),
            tasks
                .iter()
                .map(|t| t.pessimistic_estimation)
                .collect::<Vec<_>>(),
        )
        .into_column(),
    ];
    DataFrame::new(columns)
}

/// Days from 0001-01-01 to 1970-01-01; polars stores dates as days since the epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn id_column(ids: impl Iterator<Item = i32>) -> Column {
    Series::new(PlSmallStr::from_static("id"), ids.collect::<Vec<_>>()).into_column()
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
