use serde::{Deserialize, Serialize};

/// Optimistic / most likely / pessimistic duration guesses for one activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePointEstimate {
    pub optimistic: f64,
    pub modal: f64,
    pub pessimistic: f64,
}

impl ThreePointEstimate {
    pub fn new(optimistic: f64, modal: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            modal,
            pessimistic,
        }
    }

    /// `0 <= optimistic <= modal <= pessimistic`, all finite.
    pub fn is_ordered(&self) -> bool {
        self.optimistic.is_finite()
            && self.pessimistic.is_finite()
            && 0.0 <= self.optimistic
            && self.optimistic <= self.modal
            && self.modal <= self.pessimistic
    }

    /// Beta-approximated mean: `(o + 4m + p) / 6`.
    pub fn average_duration(&self) -> f64 {
        (self.optimistic + 4.0 * self.modal + self.pessimistic) / 6.0
    }

    pub fn standard_deviation(&self) -> f64 {
        (self.pessimistic - self.optimistic) / 6.0
    }

    /// Variance, the squared standard deviation.
    pub fn dispersion(&self) -> f64 {
        self.standard_deviation().powi(2)
    }
}
