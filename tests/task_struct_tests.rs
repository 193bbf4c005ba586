use chrono::NaiveDate;
use schedule_network::{RelatedTask, Task, ThreePointEstimate};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn task_json_uses_plain_dates_and_skips_absent_values() {
    let mut task = Task::new(7, "Survey", d(2025, 6, 2), d(2025, 6, 4));
    task.successors.push(RelatedTask::with_gaps(8, Some(1.0), None));

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["start_date"], "2025-06-02");
    assert_eq!(value["end_date"], "2025-06-04");
    assert_eq!(value["successors"][0]["related_task_id"], 8);
    assert_eq!(value["successors"][0]["minimum_time_gap"], 1.0);
    assert!(value["successors"][0].get("maximum_time_gap").is_none());
    assert!(value.get("optimistic_estimation").is_none());

    let back: Task = serde_json::from_value(value).unwrap();
    assert_eq!(back, task);
}

#[test]
fn partially_filled_estimates_yield_nothing() {
    let mut task = Task::new(1, "A", d(2025, 6, 2), d(2025, 6, 2));
    task.optimistic_estimation = Some(1.0);
    task.modal_estimation = Some(2.0);
    assert_eq!(task.estimate(), None);

    task.pessimistic_estimation = Some(4.0);
    assert_eq!(task.estimate(), Some(ThreePointEstimate::new(1.0, 2.0, 4.0)));
}

#[test]
fn related_ids_follow_list_order() {
    let mut task = Task::new(3, "C", d(2025, 6, 2), d(2025, 6, 9));
    task.predecessors = vec![RelatedTask::new(2), RelatedTask::new(1)];
    task.successors = vec![RelatedTask::new(5)];
    assert_eq!(task.predecessor_ids(), vec![2, 1]);
    assert_eq!(task.successor_ids(), vec![5]);
    assert_eq!(task.duration_days(), 8);
}
