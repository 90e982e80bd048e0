//! Result types of the SELECT analysis pass.

use crate::model::StackFrame;
use serde::{Deserialize, Serialize};

/// Proof of the first N+1 transition found in a trace: the repeating query,
/// the tables it touches, and the merged provenance stack (the repeating
/// execution's frames first, then any unique frames from the parent-origin
/// stack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NPlusOneEvidence {
    pub query: String,
    pub impacted_tables: Vec<String>,
    pub call_stack: Vec<StackFrame>,
}

/// The single diagnostic record produced per trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectAnalysis {
    /// Total SELECT statements in the trace.
    pub select_count: u64,

    /// Statements that exactly repeat an earlier one (same text, same
    /// parameters). Stays 0 until the first repeat, which sets it to 2
    /// ("2 executions observed so far"); each further repeat adds 1.
    pub duplicate_exact_count: u64,

    /// True once any query text recurred with a parameter list not seen
    /// before for that text.
    pub has_varying_parameter_repeat: bool,

    /// Present iff `has_varying_parameter_repeat`; fixed to the first
    /// occurrence in trace order.
    pub first_n_plus_one: Option<NPlusOneEvidence>,
}
