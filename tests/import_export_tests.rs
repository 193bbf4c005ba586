use chrono::NaiveDate;
use schedule_network::input::{
    self, InputError, ProjectSnapshot, export_activities_to_csv, load_snapshot_from_json,
    load_tasks_from_csv, save_snapshot_to_json, save_tasks_to_csv,
};
use schedule_network::{CpmSchedule, ProjectMetadata, RelatedTask, Task};
use std::fs;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_tasks() -> Vec<Task> {
    let mut design = Task::new(1, "Design", d(2025, 4, 1), d(2025, 4, 3));
    design
        .successors
        .push(RelatedTask::with_gaps(2, Some(1.0), Some(4.5)));
    design.set_estimate(2.0, 3.0, 5.0);

    let mut build = Task::new(2, "Build, phase 1", d(2025, 4, 5), d(2025, 4, 8));
    build.predecessors.push(RelatedTask::new(1));
    build.successors.push(RelatedTask::with_gaps(3, None, Some(2.0)));

    let mut ship = Task::new(3, "Ship", d(2025, 4, 9), d(2025, 4, 9));
    ship.predecessors.push(RelatedTask::new(2));
    vec![design, build, ship]
}

#[test]
fn json_snapshot_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let mut metadata = ProjectMetadata::new("Warehouse");
    metadata.project_start_date = Some(d(2025, 4, 1));
    let snapshot = ProjectSnapshot::new(metadata, sample_tasks());

    save_snapshot_to_json(&snapshot, tmp.path()).expect("save json");
    let loaded = load_snapshot_from_json(tmp.path()).expect("load json");
    assert_eq!(loaded, snapshot);
}

#[test]
fn json_snapshot_without_metadata_uses_defaults() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(
        tmp.path(),
        r#"{"tasks": [
            {"id": 1, "name": "A", "start_date": "2025-01-01", "end_date": "2025-01-02",
             "successors": [{"related_task_id": 2, "minimum_time_gap": 1.0}]},
            {"id": 2, "name": "B", "start_date": "2025-01-05", "end_date": "2025-01-05"}
        ]}"#,
    )
    .unwrap();

    let loaded = load_snapshot_from_json(tmp.path()).expect("load json");
    assert_eq!(loaded.metadata, ProjectMetadata::default());
    assert_eq!(loaded.tasks[0].successors[0].minimum_time_gap, Some(1.0));
    assert_eq!(loaded.tasks[0].successors[0].maximum_time_gap, None);
    assert!(loaded.tasks[1].predecessors.is_empty());
}

#[test]
fn csv_round_trip_keeps_gaps_and_estimates() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let tasks = sample_tasks();
    save_tasks_to_csv(&tasks, tmp.path()).expect("save csv");

    let raw = fs::read_to_string(tmp.path()).unwrap();
    assert!(raw.contains("2:1:4.5"));
    assert!(raw.contains("3::2"));

    let loaded = load_tasks_from_csv(tmp.path()).expect("load csv");
    assert_eq!(loaded, tasks);
}

#[test]
fn csv_with_bad_date_is_rejected() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(
        tmp.path(),
        "id,name,start_date,end_date,successors,predecessors\n1,A,2025-13-01,2025-01-02,,\n",
    )
    .unwrap();
    let err = load_tasks_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, InputError::InvalidData(msg) if msg.contains("invalid date")));
}

#[test]
fn duplicate_ids_are_rejected_on_load() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(
        tmp.path(),
        "id,name,start_date,end_date,successors,predecessors\n\
         1,A,2025-01-01,2025-01-02,2,\n\
         1,B,2025-01-03,2025-01-04,,1\n",
    )
    .unwrap();
    let err = load_tasks_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, InputError::InvalidData(msg) if msg.contains("duplicate task id 1")));
}

#[test]
fn empty_task_list_is_rejected() {
    assert!(matches!(
        input::validate_tasks(&[]),
        Err(InputError::InvalidData(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_snapshot_from_json("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, InputError::Io(_)));
}

#[test]
fn activity_export_writes_calculated_values() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let schedule = CpmSchedule::from_tasks(&sample_tasks());
    assert!(!schedule.is_calculation_failed());

    export_activities_to_csv(schedule.topological_sort(false), tmp.path()).expect("export");
    let raw = fs::read_to_string(tmp.path()).unwrap();
    let mut lines = raw.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,name,duration,earliest_start"));
    assert!(header.contains("total_float"));
    assert_eq!(lines.count(), 3);
    assert!(raw.contains("\"Build, phase 1\""));
}
