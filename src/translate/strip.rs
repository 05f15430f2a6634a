//! Removal of MySQL-only statements (`LOCK TABLES`, `UNLOCK TABLES`, `PRAGMA`).
//!
//! The document is walked statement by statement: a statement starts at the
//! beginning of the input or after a `;`, once whitespace and comments are
//! skipped. A statement whose leading keywords match is removed up to and
//! including its terminating `;`. Whitespace and comments in front of it are
//! kept, and nothing inside literals is ever inspected.

use super::lexer;
use once_cell::sync::Lazy;
use regex::Regex;

static STRIPPED_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:LOCK\s+TABLES\s|UNLOCK\s+TABLES\s*;|PRAGMA\s)").unwrap()
});

/// Result of the stripping pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub output: String,
    /// Number of statements removed
    pub removed: usize,
}

/// Remove every `LOCK TABLES`, `UNLOCK TABLES` and `PRAGMA` statement.
pub fn strip_statements(sql: &str) -> Stripped {
    let bytes = sql.as_bytes();
    let mut output = String::with_capacity(sql.len());
    let mut removed = 0;
    let mut copied = 0;
    let mut start = 0;

    while start < bytes.len() {
        let keyword = lexer::skip_blank_and_comments(bytes, start);
        let Some(end) = lexer::find_statement_end(bytes, keyword) else {
            break;
        };

        if STRIPPED_STATEMENT.is_match(&sql[keyword..=end]) {
            output.push_str(&sql[copied..keyword]);
            copied = end + 1;
            removed += 1;
        }
        start = end + 1;
    }

    output.push_str(&sql[copied..]);
    Stripped { output, removed }
}
