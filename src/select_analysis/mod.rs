//! SELECT-pattern analysis of a single execution trace.
//!
//! One forward pass over the trace computes aggregate SELECT counts,
//! counts exact repeats, and captures the first N+1 occurrence together
//! with its merged call-stack proof. All tracking state lives inside the
//! pass and is discarded when it returns.

pub mod engine;
pub mod history;
pub mod types;

pub use engine::analyze;
pub use history::ParamHistory;
pub use types::{NPlusOneEvidence, SelectAnalysis};
