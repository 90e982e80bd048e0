//! Single-pass SELECT analysis over an execution trace.

use crate::classifier::QueryKind;
use crate::model::{StackFrame, Trace};
use crate::sql_tables::extract_table_names;
use tracing::debug;

use super::history::ParamHistory;
use super::types::{NPlusOneEvidence, SelectAnalysis};

/// Analyze one trace, start to finish, and produce its diagnostic record.
///
/// All tracking state (parameter history, provenance slots) is created here
/// and dropped on return, so concurrent analyses of independent traces
/// never share anything.
pub fn analyze(trace: &Trace) -> SelectAnalysis {
    let mut history = ParamHistory::new();

    let mut select_count: u64 = 0;
    let mut duplicate_exact_count: u64 = 0;
    let mut evidence: Option<NPlusOneEvidence> = None;

    // Two-level provenance: the stack of the SELECT being executed now,
    // and the stack held just before it. When a pattern starts repeating,
    // the origin slot points at where that pattern was first issued; when
    // the pattern just changed, it points at the fetch executing before
    // the change. Either way it approximates the parent fetch that sets
    // up a lazy-load fan-out.
    let mut current_pattern_stack: Option<&[StackFrame]> = None;
    let mut parent_origin_stack: Option<&[StackFrame]> = None;

    for event in &trace.events {
        for query in &event.queries {
            if !QueryKind::is_select(&query.text) {
                continue;
            }

            parent_origin_stack = current_pattern_stack;
            current_pattern_stack = Some(&event.call_stack);

            if evidence.is_none() && history.has_novel_params(query) {
                let merged =
                    merge_call_stacks(&event.call_stack, parent_origin_stack.unwrap_or(&[]));
                let impacted_tables = extract_table_names(&query.text);
                debug!(
                    query = %query.text,
                    tables = ?impacted_tables,
                    "captured first varying-parameter repeat"
                );
                evidence = Some(NPlusOneEvidence {
                    query: query.text.clone(),
                    impacted_tables,
                    call_stack: merged,
                });
            }

            if history.has_exact_repeat(query) {
                if duplicate_exact_count == 0 {
                    duplicate_exact_count = 1;
                }
                duplicate_exact_count += 1;
            }

            // Record only after both checks; recording first would make
            // every statement match itself.
            history.record(query);
            select_count += 1;
        }
    }

    SelectAnalysis {
        select_count,
        duplicate_exact_count,
        has_varying_parameter_repeat: evidence.is_some(),
        first_n_plus_one: evidence,
    }
}

/// Concatenate the repeating execution's stack with every frame of the
/// parent-origin stack not already present. The repeating frames come
/// first: they show where the fan-out fires, the parent frames show what
/// set it up. Either side may be empty.
fn merge_call_stacks(repeated_stack: &[StackFrame], origin_stack: &[StackFrame]) -> Vec<StackFrame> {
    let mut merged: Vec<StackFrame> = repeated_stack.to_vec();
    for frame in origin_stack {
        if !merged.contains(frame) {
            merged.push(frame.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(name: &str) -> StackFrame {
        StackFrame::new(name, format!("{name}.run(Source:1)"))
    }

    #[test]
    fn merge_keeps_repeated_frames_first_and_appends_unique_origin_frames() {
        let repeated = vec![frame("C"), frame("B")];
        let origin = vec![frame("A"), frame("B")];
        let merged = merge_call_stacks(&repeated, &origin);
        let names: Vec<&str> = merged.iter().map(|f| f.declaring_type.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn merge_degrades_to_whichever_side_is_present() {
        let frames = vec![frame("A")];
        assert_eq!(merge_call_stacks(&frames, &[]), frames);
        assert_eq!(merge_call_stacks(&[], &frames), frames);
        assert!(merge_call_stacks(&[], &[]).is_empty());
    }
}
