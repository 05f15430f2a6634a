//! Locating and re-emitting `CREATE TABLE` statements.
//!
//! The document is walked once. Quoted text and comments are skipped, so a
//! `CREATE TABLE` inside a string literal is never treated as a statement.
//! The body is the span between the `(` after the table name and its matching
//! `)`; the statement ends at the next `;`. Anything between that `)` and the
//! `;` is a table-options tail.

use super::column::{self, BodyRewrite};
use super::lexer;
use super::warnings::{TranslateWarning, WarningCollector};
use once_cell::sync::Lazy;
use regex::Regex;

static CREATE_TABLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^CREATE\s+TABLE\s+(IF\s+NOT\s+EXISTS\s+)?(?:`([^`]+)`|"([^"]+)"|(\w+))\s*\("#)
        .unwrap()
});

/// A tail made only of MySQL table options, e.g. `ENGINE=InnoDB AUTO_INCREMENT=5
/// DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci COMMENT='users'`.
static MYSQL_TABLE_OPTIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^
        (?:
            \s*,?\s*
            (?:DEFAULT\s+)?
            (?:ENGINE|TYPE|AUTO_INCREMENT|CHARSET|CHARACTER\s+SET|COLLATE|COMMENT|ROW_FORMAT
              |KEY_BLOCK_SIZE|STATS_PERSISTENT|STATS_AUTO_RECALC|STATS_SAMPLE_PAGES|PACK_KEYS
              |CHECKSUM|DELAY_KEY_WRITE|MAX_ROWS|MIN_ROWS|AVG_ROW_LENGTH|TABLESPACE)
            \s*=?\s*
            (?:'(?:[^'\\]|\\.|'')*'|[\w.]+)
        )+
        \s*$",
    )
    .unwrap()
});

/// One `CREATE TABLE` statement found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock<'a> {
    /// Table name without quotes
    pub name: &'a str,
    pub if_not_exists: bool,
    /// Raw text between the outer parentheses
    pub body: &'a str,
    /// Trimmed text between the closing `)` and the `;`
    pub options: &'a str,
    /// Byte offset of `CREATE`
    pub start: usize,
    /// Byte offset just past the terminating `;`
    pub end: usize,
}

/// Result of rewriting every table in a document
#[derive(Debug, Default)]
pub struct TablesRewrite {
    pub output: String,
    pub tables_rewritten: usize,
    /// `(table, column)` pairs rewritten to AUTOINCREMENT
    pub auto_increment_columns: Vec<(String, String)>,
    pub primary_keys_dropped: usize,
    pub table_options_dropped: usize,
    pub warnings: Vec<TranslateWarning>,
    pub warnings_truncated: bool,
}

/// Find every `CREATE TABLE` block in document order.
pub fn scan_blocks(sql: &str) -> Vec<TableBlock<'_>> {
    let bytes = sql.as_bytes();
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = lexer::skip_quoted_or_comment(bytes, i) {
            i = end;
            continue;
        }
        if starts_create(bytes, i) {
            if let Some(block) = parse_block(sql, i) {
                i = block.end;
                blocks.push(block);
                continue;
            }
        }
        i += 1;
    }
    blocks
}

fn starts_create(bytes: &[u8], i: usize) -> bool {
    bytes[i].eq_ignore_ascii_case(&b'c') && (i == 0 || !lexer::is_word_byte(bytes[i - 1]))
}

fn parse_block(sql: &str, start: usize) -> Option<TableBlock<'_>> {
    let caps = CREATE_TABLE_HEADER.captures(&sql[start..])?;
    let name = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
    let open = start + caps.get(0)?.end() - 1;

    let bytes = sql.as_bytes();
    let close = lexer::find_matching_paren(bytes, open)?;
    let semicolon = lexer::find_statement_end(bytes, close + 1)?;

    Some(TableBlock {
        name: &sql[start + name.start()..start + name.end()],
        if_not_exists: caps.get(1).is_some(),
        body: &sql[open + 1..close],
        options: sql[close + 1..semicolon].trim(),
        start,
        end: semicolon + 1,
    })
}

/// Rewrite every `CREATE TABLE` block; text outside blocks is copied through
/// unchanged and in order.
pub fn rewrite_tables(sql: &str) -> TablesRewrite {
    let mut result = TablesRewrite {
        output: String::with_capacity(sql.len()),
        ..Default::default()
    };
    let mut warnings = WarningCollector::new();
    let mut copied = 0;

    for block in scan_blocks(sql) {
        result.output.push_str(&sql[copied..block.start]);
        copied = block.end;

        let body = column::rewrite_body(block.name, block.body);
        tracing::debug!(
            table = block.name,
            auto_increment = ?body.auto_increment_columns,
            primary_keys_dropped = body.primary_keys_dropped,
            "rewrote CREATE TABLE"
        );

        let keep_options = if block.options.is_empty() {
            false
        } else if MYSQL_TABLE_OPTIONS.is_match(block.options) {
            result.table_options_dropped += 1;
            false
        } else {
            true
        };

        result.output.push_str(&render_block(&block, &body, keep_options));

        result.tables_rewritten += 1;
        result.primary_keys_dropped += body.primary_keys_dropped;
        result.auto_increment_columns.extend(
            body.auto_increment_columns
                .into_iter()
                .map(|col| (block.name.to_string(), col)),
        );
        warnings.extend(body.warnings);
    }

    result.output.push_str(&sql[copied..]);
    result.warnings_truncated = warnings.is_truncated();
    result.warnings = warnings.into_warnings();
    result
}

fn render_block(block: &TableBlock<'_>, body: &BodyRewrite, keep_options: bool) -> String {
    let mut sql = String::from("CREATE TABLE ");
    if block.if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push('`');
    sql.push_str(block.name);
    sql.push_str("` (\n  ");
    sql.push_str(&body.lines.join("\n  "));
    sql.push_str("\n)");
    if keep_options {
        sql.push(' ');
        sql.push_str(block.options);
    }
    sql.push(';');
    sql
}
