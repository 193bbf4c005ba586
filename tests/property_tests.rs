use proptest::prelude::*;
use proptest::sample::Index;
use schedule_network::{Activity, CpmSchedule};

#[derive(Debug, Clone)]
struct Network {
    durations: Vec<f64>,
    /// `(from, to)` with `from < to`, as positions into `durations`.
    edges: Vec<(usize, usize)>,
}

impl Network {
    fn activities(&self) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .durations
            .iter()
            .enumerate()
            .map(|(idx, &duration)| Activity::new(idx as i32 + 1, format!("N{idx}"), duration))
            .collect();
        for &(from, to) in &self.edges {
            activities[from].successors.push(to as i32 + 1);
            activities[to].predecessors.push(from as i32 + 1);
        }
        activities
    }

    /// Longest path finishing at each node, and starting at each node.
    fn longest_paths(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.durations.len();
        let mut head = self.durations.clone();
        for to in 0..n {
            for &(from, target) in &self.edges {
                if target == to {
                    head[to] = head[to].max(head[from] + self.durations[to]);
                }
            }
        }
        let mut tail = self.durations.clone();
        for from in (0..n).rev() {
            for &(source, to) in &self.edges {
                if source == from {
                    tail[from] = tail[from].max(tail[to] + self.durations[from]);
                }
            }
        }
        (head, tail)
    }
}

/// Random DAGs where every node after the first hangs off an earlier node,
/// so no activity is isolated.
fn network() -> impl Strategy<Value = Network> {
    (2usize..12).prop_flat_map(|n| {
        (
            prop::collection::vec(1u32..10, n),
            prop::collection::vec(any::<Index>(), n - 1),
            prop::collection::vec((any::<Index>(), any::<Index>()), 0..n * 2),
        )
            .prop_map(move |(durations, parents, extra)| {
                let mut edges: Vec<(usize, usize)> = parents
                    .iter()
                    .enumerate()
                    .map(|(offset, parent)| (parent.index(offset + 1), offset + 1))
                    .collect();
                for (a, b) in extra {
                    let (x, y) = (a.index(n), b.index(n));
                    if x != y {
                        let edge = (x.min(y), x.max(y));
                        if !edges.contains(&edge) {
                            edges.push(edge);
                        }
                    }
                }
                Network {
                    durations: durations.into_iter().map(f64::from).collect(),
                    edges,
                }
            })
    })
}

proptest! {
    #[test]
    fn order_respects_every_edge(net in network()) {
        let schedule = CpmSchedule::new(net.activities());
        prop_assert!(!schedule.is_calculation_failed());

        let forward: Vec<i32> = schedule.topological_sort(false).iter().map(|a| a.id).collect();
        let backward: Vec<i32> = schedule.topological_sort(true).iter().map(|a| a.id).collect();
        prop_assert_eq!(forward.len(), net.durations.len());

        let position = |order: &[i32], id: i32| order.iter().position(|&x| x == id);
        for &(from, to) in &net.edges {
            let (p, s) = (from as i32 + 1, to as i32 + 1);
            prop_assert!(position(&forward, p) < position(&forward, s));
            prop_assert!(position(&backward, p) > position(&backward, s));
        }
    }

    #[test]
    fn duration_is_the_longest_path(net in network()) {
        let schedule = CpmSchedule::new(net.activities());
        let (head, _) = net.longest_paths();
        let longest = head.iter().copied().fold(0.0, f64::max);
        prop_assert_eq!(schedule.project_duration(), Some(longest));
    }

    #[test]
    fn floats_are_non_negative_and_zero_exactly_on_longest_paths(net in network()) {
        let schedule = CpmSchedule::new(net.activities());
        let (head, tail) = net.longest_paths();
        let longest = head.iter().copied().fold(0.0, f64::max);

        for (idx, duration) in net.durations.iter().enumerate() {
            let activity = schedule.activity(idx as i32 + 1).unwrap();
            let total = activity.total_float().unwrap();
            prop_assert!(total >= 0.0);
            prop_assert!(activity.free_float.unwrap() >= 0.0);

            let on_longest = head[idx] + tail[idx] - duration == longest;
            prop_assert_eq!(activity.is_critical(), on_longest, "activity {}", activity.id);
        }
    }
}
