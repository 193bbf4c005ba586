use std::collections::{HashMap, HashSet};

use crate::error::{GraphError, GraphResult};

pub mod activity;
pub mod ordering;
pub mod relationship;
pub mod schedule_dag;

pub use activity::{Activity, CRITICAL_FLOAT_TOLERANCE};
pub use relationship::{Relationship, RelationshipKey};
pub use schedule_dag::ScheduleDag;

/// Activities of one project network, addressed by id.
///
/// The graph keeps its activities in insertion order. It is created
/// [`unlinked`](Self::unlinked) and becomes usable for the calculation passes
/// once [`link`](Self::link) succeeded: ids are unique and resolvable, no
/// activity is isolated, every edge is known on both of its ends, the network
/// is acyclic and the start/end nodes are classified.
#[derive(Debug, Clone, Default)]
pub struct ActivityGraph {
    activities: Vec<Activity>,
    index: HashMap<i32, usize>,
    start_nodes: Vec<i32>,
    end_nodes: Vec<i32>,
    duplicate: Option<i32>,
    linked: bool,
}

impl ActivityGraph {
    pub fn unlinked(activities: Vec<Activity>) -> Self {
        let mut index = HashMap::with_capacity(activities.len());
        let mut duplicate = None;
        for (idx, activity) in activities.iter().enumerate() {
            if index.insert(activity.id, idx).is_some() && duplicate.is_none() {
                duplicate = Some(activity.id);
            }
        }
        Self {
            activities,
            index,
            start_nodes: Vec::new(),
            end_nodes: Vec::new(),
            duplicate,
            linked: false,
        }
    }

    pub fn build(activities: Vec<Activity>) -> GraphResult<Self> {
        let mut graph = Self::unlinked(activities);
        graph.link()?;
        Ok(graph)
    }

    /// Validates the network and classifies start and end nodes.
    ///
    /// On error the graph stays unlinked and its activities are left as they
    /// were handed in, apart from de-duplicated edge lists.
    pub fn link(&mut self) -> GraphResult<()> {
        self.linked = false;
        self.start_nodes.clear();
        self.end_nodes.clear();

        if self.activities.is_empty() {
            return Err(GraphError::Empty);
        }
        if let Some(id) = self.duplicate {
            return Err(GraphError::DuplicateActivity { id });
        }

        for activity in &mut self.activities {
            if !activity.duration.is_finite() || activity.duration < 0.0 {
                return Err(GraphError::InvalidDuration {
                    id: activity.id,
                    duration: activity.duration,
                });
            }
            if activity.predecessors.is_empty() && activity.successors.is_empty() {
                return Err(GraphError::Disconnected { id: activity.id });
            }
            dedup_ids(&mut activity.predecessors);
            dedup_ids(&mut activity.successors);
        }

        let edges = self.collect_edges()?;
        for (from, to) in edges {
            let from_idx = self.index[&from];
            let to_idx = self.index[&to];
            if !self.activities[from_idx].successors.contains(&to) {
                self.activities[from_idx].successors.push(to);
            }
            if !self.activities[to_idx].predecessors.contains(&from) {
                self.activities[to_idx].predecessors.push(from);
            }
        }

        ScheduleDag::build(&self.activities)?.ensure_acyclic()?;

        for activity in &self.activities {
            if activity.predecessors.is_empty() {
                self.start_nodes.push(activity.id);
            }
            if activity.successors.is_empty() {
                self.end_nodes.push(activity.id);
            }
        }
        self.linked = true;
        Ok(())
    }

    /// Every `(predecessor, successor)` pair named on either end.
    fn collect_edges(&self) -> GraphResult<Vec<(i32, i32)>> {
        let mut edges = Vec::new();
        for activity in &self.activities {
            for &successor in &activity.successors {
                self.check_reference(activity.id, successor)?;
                edges.push((activity.id, successor));
            }
            for &predecessor in &activity.predecessors {
                self.check_reference(activity.id, predecessor)?;
                edges.push((predecessor, activity.id));
            }
        }
        Ok(edges)
    }

    fn check_reference(&self, owner: i32, related: i32) -> GraphResult<()> {
        if owner == related {
            return Err(GraphError::SelfReference { id: owner });
        }
        if !self.index.contains_key(&related) {
            return Err(GraphError::NotFound { id: related });
        }
        Ok(())
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub(crate) fn activities_mut(&mut self) -> &mut [Activity] {
        &mut self.activities
    }

    pub fn find(&self, id: i32) -> Option<&Activity> {
        self.index.get(&id).map(|&idx| &self.activities[idx])
    }

    pub fn get(&self, id: i32) -> GraphResult<&Activity> {
        self.find(id).ok_or(GraphError::NotFound { id })
    }

    pub fn get_mut(&mut self, id: i32) -> GraphResult<&mut Activity> {
        match self.index.get(&id) {
            Some(&idx) => Ok(&mut self.activities[idx]),
            None => Err(GraphError::NotFound { id }),
        }
    }

    pub fn start_nodes(&self) -> &[i32] {
        &self.start_nodes
    }

    pub fn end_nodes(&self) -> &[i32] {
        &self.end_nodes
    }

    pub fn is_start_node(&self, id: i32) -> bool {
        self.start_nodes.contains(&id)
    }

    pub fn is_end_node(&self, id: i32) -> bool {
        self.end_nodes.contains(&id)
    }

    /// `(predecessor, successor)` pairs in insertion order of the predecessor.
    pub fn edges(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.activities
            .iter()
            .flat_map(|a| a.successors.iter().map(move |&s| (a.id, s)))
    }

    /// Largest earliest finish over the end nodes.
    pub fn project_duration(&self) -> GraphResult<f64> {
        let mut max_finish: Option<f64> = None;
        for &id in &self.end_nodes {
            let finish = self.get(id)?.earliest_finish.ok_or(GraphError::MissingValue {
                id,
                field: "earliest finish",
            })?;
            max_finish = Some(max_finish.map_or(finish, |m: f64| m.max(finish)));
        }
        max_finish.ok_or(GraphError::Empty)
    }

    pub fn clear_results(&mut self) {
        for activity in &mut self.activities {
            activity.clear_results();
        }
    }
}

fn dedup_ids(ids: &mut Vec<i32>) {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.retain(|id| seen.insert(*id));
}
