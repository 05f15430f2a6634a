//! Final cleanup of punctuation and blank lines left behind by earlier passes.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SEMICOLON_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r";(?:\s*;)+").unwrap());

static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\r?\n){3,}").unwrap());

/// Collapse `;` runs to one `;`, then newline runs of three or more to two.
pub fn normalize(sql: &str) -> String {
    let collapsed = SEMICOLON_RUN.replace_all(sql, ";");
    NEWLINE_RUN
        .replace_all(&collapsed, |caps: &Captures| {
            if caps[0].ends_with("\r\n") {
                "\r\n\r\n"
            } else {
                "\n\n"
            }
        })
        .into_owned()
}
