//! Per-pass tracking of parameter lists seen for each query text.

use crate::model::{QueryRecord, SqlParam};
use std::collections::HashMap;

/// Remembers, for each distinct query text, every parameter list already
/// observed during the current pass.
///
/// Both queries compare against the state as it was before the record is
/// added; callers must check first and [`record`](Self::record) after,
/// otherwise every statement would match itself.
#[derive(Debug, Default)]
pub struct ParamHistory {
    calls_by_query: HashMap<String, Vec<Vec<SqlParam>>>,
}

impl ParamHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the text has been seen before with only other parameter
    /// lists. A first occurrence of a text is the baseline, not novel.
    pub fn has_novel_params(&self, record: &QueryRecord) -> bool {
        match self.calls_by_query.get(&record.text) {
            None => false,
            Some(seen) => !seen.iter().any(|params| *params == record.params),
        }
    }

    /// True iff this exact (text, parameters) combination was seen before.
    pub fn has_exact_repeat(&self, record: &QueryRecord) -> bool {
        self.calls_by_query
            .get(&record.text)
            .is_some_and(|seen| seen.iter().any(|params| *params == record.params))
    }

    /// Append the record's parameter list to the history for its text.
    pub fn record(&mut self, record: &QueryRecord) {
        self.calls_by_query
            .entry(record.text.clone())
            .or_default()
            .push(record.params.clone());
    }
}
