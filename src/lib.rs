//! SqlInsight — per-request SQL trace analysis.
//!
//! Takes an ordered trace of query executions captured during one logical
//! unit of work (e.g. one HTTP request) and detects performance
//! anti-patterns: exact duplicate statements, the N+1 select pattern, and
//! the call-site evidence needed to locate the offending code path.
//!
//! The entry point is [`select_analysis::analyze`]; everything it needs is
//! constructed per call and discarded on return, so concurrent analyses of
//! independent traces share nothing.

pub mod classifier;
pub mod config;
pub mod model;
pub mod report;
pub mod select_analysis;
pub mod slow_queries;
pub mod sql_tables;
pub mod stack_filter;

pub use classifier::QueryKind;
pub use config::AnalysisConfig;
pub use model::{ExecutionEvent, QueryRecord, SqlParam, StackFrame, Trace};
pub use select_analysis::{analyze, NPlusOneEvidence, SelectAnalysis};
pub use stack_filter::StackFilter;
