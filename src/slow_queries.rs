//! Elapsed-time threshold scan over a trace.
//!
//! Complements the SELECT analysis with a simple report of executions that
//! took at least the configured threshold, each with its statements and
//! the top application frame when provenance was captured.

use crate::model::Trace;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One execution at or above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowQueryEntry {
    pub sql: String,
    pub elapsed: Duration,
    /// Display string of the topmost filtered frame, if any.
    pub caller: Option<String>,
}

/// All slow executions of one trace, in trace order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowQueryReport {
    pub threshold: Duration,
    pub entries: Vec<SlowQueryEntry>,
}

impl SlowQueryReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan the trace for executions with `elapsed >= threshold`. Every query
/// of a slow execution is reported, each carrying the execution's elapsed
/// time and caller.
pub fn find_slow_executions(trace: &Trace, threshold: Duration) -> SlowQueryReport {
    let mut entries = Vec::new();
    for event in &trace.events {
        if event.elapsed < threshold {
            continue;
        }
        let caller = event.call_stack.first().map(|frame| frame.display.clone());
        for query in &event.queries {
            entries.push(SlowQueryEntry {
                sql: query.text.clone(),
                elapsed: event.elapsed,
                caller: caller.clone(),
            });
        }
    }
    SlowQueryReport { threshold, entries }
}
