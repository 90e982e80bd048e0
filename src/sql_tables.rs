//! Heuristic extraction of referenced table names from SQL text.
//!
//! This is intentionally a best-effort scan, not a parser: it looks for
//! `FROM` or `JOIN` followed by a bare identifier and strips surrounding
//! quote characters. Subqueries with reserved-word aliases or joins on
//! function results can mis-extract; that is an accepted limitation.

use regex::Regex;
use std::sync::OnceLock;

static TABLE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn table_pattern() -> &'static Regex {
    TABLE_PATTERN.get_or_init(|| {
        // FROM or JOIN, word-boundary matched, then whitespace and an
        // identifier token that may carry surrounding quotes.
        Regex::new(r#"(?i)\b(?:FROM|JOIN)\s+([\w"`]+)"#).expect("table pattern is valid")
    })
}

/// Extract the table names referenced by `sql`, in order of first mention,
/// without duplicates. Empty input yields an empty list.
pub fn extract_table_names(sql: &str) -> Vec<String> {
    if sql.is_empty() {
        return Vec::new();
    }

    let mut tables: Vec<String> = Vec::new();
    for captures in table_pattern().captures_iter(sql) {
        let token = &captures[1];
        let name: String = token.chars().filter(|c| *c != '"' && *c != '`').collect();
        if !name.is_empty() && !tables.contains(&name) {
            tables.push(name);
        }
    }
    tables
}
