//! Serializable diagnostic events.
//!
//! Builds the flat, log-friendly records a hosting system emits to its
//! structured-logging pipeline. This module only constructs the records;
//! emission and transport stay with the caller.

use crate::select_analysis::SelectAnalysis;
use crate::slow_queries::SlowQueryReport;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifies the unit of work a diagnostic belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// Emitted once per trace in which an N+1 transition was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NPlusOneEvent {
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    pub count: u64,
    pub sample_query: String,
    pub impacted_tables: Vec<String>,
    pub call_stack: Vec<String>,
}

/// Emitted once per trace containing executions over the slow threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowQueryEvent {
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    pub threshold_ms: u64,
    pub queries: Vec<SlowQueryEventEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowQueryEventEntry {
    pub sql: String,
    pub time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
}

impl NPlusOneEvent {
    /// Build the event from an analysis that captured evidence. Returns
    /// `None` when the trace showed no varying-parameter repeat.
    pub fn from_analysis(analysis: &SelectAnalysis, context: &RequestContext) -> Option<Self> {
        let evidence = analysis.first_n_plus_one.as_ref()?;
        Some(Self {
            timestamp: Utc::now().timestamp_millis(),
            event_type: "N_PLUS_ONE_DETECTED".to_string(),
            url: context.url.clone(),
            method: context.method.clone(),
            operation_name: context.operation_name.clone(),
            count: analysis.select_count,
            sample_query: evidence.query.clone(),
            impacted_tables: evidence.impacted_tables.clone(),
            call_stack: evidence
                .call_stack
                .iter()
                .map(|frame| frame.display.clone())
                .collect(),
        })
    }
}

impl SlowQueryEvent {
    /// Build the event from a non-empty slow-query report. Returns `None`
    /// for an empty report.
    pub fn from_report(report: &SlowQueryReport, context: &RequestContext) -> Option<Self> {
        if report.is_empty() {
            return None;
        }
        Some(Self {
            timestamp: Utc::now().timestamp_millis(),
            event_type: "SLOW_QUERY_DETECTED".to_string(),
            url: context.url.clone(),
            method: context.method.clone(),
            operation_name: context.operation_name.clone(),
            threshold_ms: report.threshold.as_millis() as u64,
            queries: report
                .entries
                .iter()
                .map(|entry| SlowQueryEventEntry {
                    sql: entry.sql.clone(),
                    time_ms: entry.elapsed.as_millis() as u64,
                    caller: entry.caller.clone(),
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StackFrame;
    use crate::select_analysis::NPlusOneEvidence;
    use crate::slow_queries::SlowQueryEntry;
    use std::time::Duration;

    fn context() -> RequestContext {
        RequestContext {
            url: "/users".to_string(),
            method: "GET".to_string(),
            operation_name: Some("listUsers".to_string()),
        }
    }

    #[test]
    fn no_evidence_means_no_event() {
        let analysis = SelectAnalysis::default();
        assert!(NPlusOneEvent::from_analysis(&analysis, &context()).is_none());
    }

    #[test]
    fn n_plus_one_event_carries_evidence_fields() {
        let analysis = SelectAnalysis {
            select_count: 11,
            duplicate_exact_count: 0,
            has_varying_parameter_repeat: true,
            first_n_plus_one: Some(NPlusOneEvidence {
                query: "SELECT id FROM address WHERE user_id=?".to_string(),
                impacted_tables: vec!["address".to_string()],
                call_stack: vec![StackFrame::new(
                    "com.example.testapp.UserController",
                    "com.example.testapp.UserController.list(UserController.java:30)",
                )],
            }),
        };
        let event = NPlusOneEvent::from_analysis(&analysis, &context()).unwrap();
        assert_eq!(event.event_type, "N_PLUS_ONE_DETECTED");
        assert_eq!(event.count, 11);
        assert_eq!(event.impacted_tables, vec!["address"]);
        assert_eq!(
            event.call_stack,
            vec!["com.example.testapp.UserController.list(UserController.java:30)"]
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "N_PLUS_ONE_DETECTED");
        assert_eq!(json["operation_name"], "listUsers");
    }

    #[test]
    fn slow_query_event_converts_durations_to_millis() {
        let report = SlowQueryReport {
            threshold: Duration::from_millis(500),
            entries: vec![SlowQueryEntry {
                sql: "SELECT * FROM orders".to_string(),
                elapsed: Duration::from_millis(1234),
                caller: None,
            }],
        };
        let event = SlowQueryEvent::from_report(&report, &context()).unwrap();
        assert_eq!(event.threshold_ms, 500);
        assert_eq!(event.queries[0].time_ms, 1234);
    }

    #[test]
    fn empty_report_means_no_event() {
        let report = SlowQueryReport {
            threshold: Duration::from_millis(500),
            entries: vec![],
        };
        assert!(SlowQueryEvent::from_report(&report, &context()).is_none());
    }
}
