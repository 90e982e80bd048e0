//! Lexical classification of SQL statements.
//!
//! The analysis only cares whether a statement is a SELECT; everything else
//! falls through. Classification looks at the first keyword of the
//! statement, case-insensitive, and never fails: unrecognized text is
//! simply [`QueryKind::Other`].

use serde::{Deserialize, Serialize};

/// Statement category, derived from the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl QueryKind {
    /// Classify a raw statement by its first keyword. Leading whitespace is
    /// skipped; anything that does not start with a recognized keyword is
    /// `Other`.
    pub fn of(sql: &str) -> Self {
        let trimmed = sql.trim_start();
        let keyword_len = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let keyword = &trimmed[..keyword_len];

        if keyword.eq_ignore_ascii_case("select") {
            QueryKind::Select
        } else if keyword.eq_ignore_ascii_case("insert") {
            QueryKind::Insert
        } else if keyword.eq_ignore_ascii_case("update") {
            QueryKind::Update
        } else if keyword.eq_ignore_ascii_case("delete") {
            QueryKind::Delete
        } else {
            QueryKind::Other
        }
    }

    pub fn is_select(sql: &str) -> bool {
        Self::of(sql) == QueryKind::Select
    }
}
