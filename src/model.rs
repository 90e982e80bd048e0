//! Data structures for captured SQL executions.
//!
//! This module defines the trace data model handed over by the capture layer:
//! individual query records with their bound parameters, execution events
//! (a statement plus any addenda executed together), and the per-request
//! trace the analysis engine walks. Everything here is immutable once
//! captured; the engine only reads it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A bound parameter value as observed by the capture layer.
///
/// Equality is structural; two parameter lists match only if they have the
/// same values in the same positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// One executed statement: the raw query string (exact original casing and
/// whitespace) and its positional bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Raw statement text, used as the identity key for pattern grouping.
    pub text: String,
    /// Bound parameter values, positional.
    #[serde(default)]
    pub params: Vec<SqlParam>,
}

impl QueryRecord {
    pub fn new(text: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }
}

/// One entry of a call stack, most-recent-call-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Fully-qualified name of the declaring type, e.g.
    /// `com.example.testapp.controller.UserController`.
    pub declaring_type: String,
    /// Human-readable frame description (type, method, source location).
    pub display: String,
}

impl StackFrame {
    pub fn new(declaring_type: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            display: display.into(),
        }
    }
}

/// One unit of execution: the queries sent together (a statement and its
/// addenda), the time they took, and the call stack at the point of
/// execution. The stack is expected to be already reduced by the
/// [`StackFilter`](crate::stack_filter::StackFilter) and capped upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub queries: Vec<QueryRecord>,
    #[serde(default)]
    pub elapsed: Duration,
    /// Most-recent-call-first. An empty stack means no provenance was
    /// captured for this event.
    #[serde(default)]
    pub call_stack: Vec<StackFrame>,
}

impl ExecutionEvent {
    pub fn new(queries: Vec<QueryRecord>, elapsed: Duration, call_stack: Vec<StackFrame>) -> Self {
        Self {
            queries,
            elapsed,
            call_stack,
        }
    }
}

/// The ordered executions of one logical unit of work (e.g. one HTTP
/// request). Owned by the capture layer; the engine reads it once, start
/// to finish.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    pub events: Vec<ExecutionEvent>,
}

impl Trace {
    pub fn new(events: Vec<ExecutionEvent>) -> Self {
        Self { events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
