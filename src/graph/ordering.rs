use std::collections::HashSet;

use super::ActivityGraph;

enum Visit {
    Enter(i32),
    Place(i32),
}

impl ActivityGraph {
    /// Deterministic topological order of activity ids.
    ///
    /// Start nodes come first, ascending by id. Then, for each start node,
    /// its successors are visited depth-first: an activity is placed only
    /// after all of its predecessors, and its own successors are visited
    /// right after it. `reverse` flips the finished sequence.
    ///
    /// An unlinked graph has no start nodes and yields an empty order.
    pub fn topological_order(&self, reverse: bool) -> Vec<i32> {
        let mut starts = self.start_nodes().to_vec();
        starts.sort_unstable();

        let mut placed: HashSet<i32> = starts.iter().copied().collect();
        let mut order = starts.clone();

        for &start in &starts {
            let Some(activity) = self.find(start) else {
                continue;
            };
            for &successor in &activity.successors {
                self.visit(successor, &mut order, &mut placed);
            }
        }

        if reverse {
            order.reverse();
        }
        order
    }

    fn visit(&self, root: i32, order: &mut Vec<i32>, placed: &mut HashSet<i32>) {
        let mut stack = vec![Visit::Enter(root)];
        while let Some(step) = stack.pop() {
            match step {
                Visit::Enter(id) => {
                    if placed.contains(&id) {
                        continue;
                    }
                    let Some(activity) = self.find(id) else {
                        continue;
                    };
                    // popped in order: predecessors, the activity, successors
                    for &successor in activity.successors.iter().rev() {
                        stack.push(Visit::Enter(successor));
                    }
                    stack.push(Visit::Place(id));
                    for &predecessor in activity.predecessors.iter().rev() {
                        stack.push(Visit::Enter(predecessor));
                    }
                }
                Visit::Place(id) => {
                    if placed.insert(id) {
                        order.push(id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Activity;

    #[test]
    fn start_nodes_lead_in_id_order() {
        let graph = ActivityGraph::build(vec![
            Activity::new(5, "E", 1.0).with_successors(vec![3]),
            Activity::new(2, "B", 1.0).with_successors(vec![3]),
            Activity::new(3, "C", 1.0),
        ])
        .unwrap();

        assert_eq!(graph.topological_order(false), vec![2, 5, 3]);
        assert_eq!(graph.topological_order(true), vec![3, 5, 2]);
    }

    #[test]
    fn predecessors_are_placed_before_join() {
        // 1 -> 2 -> 4 and 5 -> 3 -> 4; 3 is reached through 4's predecessors
        let graph = ActivityGraph::build(vec![
            Activity::new(1, "A", 1.0).with_successors(vec![2]),
            Activity::new(2, "B", 1.0).with_successors(vec![4]),
            Activity::new(3, "C", 1.0).with_successors(vec![4]),
            Activity::new(4, "D", 1.0),
            Activity::new(5, "S", 1.0).with_successors(vec![3]),
        ])
        .unwrap();

        assert_eq!(graph.topological_order(false), vec![1, 5, 2, 3, 4]);
    }

    #[test]
    fn unlinked_graph_has_empty_order() {
        let graph = ActivityGraph::unlinked(vec![Activity::new(1, "A", 1.0)]);
        assert!(graph.topological_order(false).is_empty());
    }
}
