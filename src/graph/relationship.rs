use serde::Serialize;

/// Ordered `(task_id, related_task_id)` pair identifying a relationship.
pub type RelationshipKey = (i32, i32);

/// A labeled dependency edge `task_id -> related_task_id` with optional
/// minimum and maximum time gaps between the finish of the first and the
/// start of the second activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub task_id: i32,
    pub related_task_id: i32,
    pub minimum_time_gap: Option<f64>,
    pub maximum_time_gap: Option<f64>,
    pub is_forward_condition_fulfilled: Option<bool>,
    pub is_backward_condition_fulfilled: Option<bool>,
}

impl Relationship {
    pub fn new(task_id: i32, related_task_id: i32) -> Self {
        Self::with_gaps(task_id, related_task_id, None, None)
    }

    pub fn with_gaps(
        task_id: i32,
        related_task_id: i32,
        minimum_time_gap: Option<f64>,
        maximum_time_gap: Option<f64>,
    ) -> Self {
        Self {
            task_id,
            related_task_id,
            minimum_time_gap,
            maximum_time_gap,
            is_forward_condition_fulfilled: None,
            is_backward_condition_fulfilled: None,
        }
    }

    pub fn key(&self) -> RelationshipKey {
        (self.task_id, self.related_task_id)
    }

    /// Minimum gap, `0` when absent.
    pub fn minimum_gap(&self) -> f64 {
        self.minimum_time_gap.unwrap_or(0.0)
    }

    /// Maximum gap, unbounded when absent.
    pub fn maximum_gap(&self) -> f64 {
        self.maximum_time_gap.unwrap_or(f64::INFINITY)
    }

    /// True when either pass recorded a broken condition on this edge.
    pub fn is_violated(&self) -> bool {
        self.is_forward_condition_fulfilled == Some(false)
            || self.is_backward_condition_fulfilled == Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_gaps_use_defaults() {
        let rel = Relationship::new(1, 2);
        assert_eq!(rel.minimum_gap(), 0.0);
        assert!(rel.maximum_gap().is_infinite());
        assert_eq!(rel.key(), (1, 2));
        assert!(!rel.is_violated());
    }

    #[test]
    fn explicit_zero_maximum_is_kept() {
        let rel = Relationship::with_gaps(1, 2, Some(2.0), Some(0.0));
        assert_eq!(rel.minimum_gap(), 2.0);
        assert_eq!(rel.maximum_gap(), 0.0);
    }
}
