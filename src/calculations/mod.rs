//! Forward, backward and float passes over a linked [`ActivityGraph`].
//!
//! The passes walk the graph in its topological order, so every predecessor
//! (resp. successor) is resolved before the activity that depends on it.
//!
//! [`ActivityGraph`]: crate::graph::ActivityGraph

pub mod backward_pass;
pub mod float;
pub mod forward_pass;
pub mod time_gap;

pub use backward_pass::BackwardPass;
pub use float::{FloatPass, TotalFloatPass};
pub use forward_pass::ForwardPass;
pub use time_gap::{GapPassOutcome, TimeGapBackwardPass, TimeGapForwardPass};
