//! Per-line classification and rewrite of a `CREATE TABLE` body.
//!
//! The body is broken into column lines, auto-increment integer columns are
//! rewritten to `INTEGER PRIMARY KEY AUTOINCREMENT`, table-level `PRIMARY KEY`
//! constraints naming those columns are dropped, and commas are normalized so
//! that every line but the last ends with exactly one.

use super::lexer;
use super::warnings::TranslateWarning;
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// `` `id` int(11) NOT NULL AUTO_INCREMENT `` and friends.
static AUTO_INCREMENT_COLUMN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^[`"]?(\w+)[`"]?\s+int(?:eger)?\b.*AUTO_INCREMENT"#).unwrap()
});

static AUTO_INCREMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)AUTO_INCREMENT").unwrap());

static PRIMARY_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:CONSTRAINT\s+(?:`[^`]*`|"[^"]*"|\w+)\s+)?PRIMARY\s+KEY\b"#).unwrap()
});

static CONSTRAINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:PRIMARY\s+KEY|FOREIGN\s+KEY|UNIQUE|KEY|INDEX|CONSTRAINT|CHECK|FULLTEXT|SPATIAL)\b",
    )
    .unwrap()
});

/// MySQL index definitions that SQLite only accepts as separate CREATE INDEX statements.
static INLINE_INDEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(UNIQUE|FULLTEXT|SPATIAL)\s+)?(KEY|INDEX)\b|^(FULLTEXT|SPATIAL)\b")
        .unwrap()
});

static KEY_PART_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^[`"]?([^`"\s(]+)"#).unwrap());

/// One logical line of a table body. Blank and comment lines never become a
/// `ColumnLine`; they are dropped during splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLine {
    /// Auto-increment integer column, re-emitted as
    /// `` `<column>` INTEGER PRIMARY KEY AUTOINCREMENT ``
    AutoIncrement { column: String },
    /// Any other column definition, kept verbatim
    Definition(String),
    /// Table-level constraint or index definition, kept verbatim
    Constraint(String),
}

impl ColumnLine {
    pub fn classify(line: &str) -> Self {
        if let Some(caps) = AUTO_INCREMENT_COLUMN.captures(line) {
            return ColumnLine::AutoIncrement {
                column: caps[1].to_string(),
            };
        }
        if CONSTRAINT.is_match(line) {
            ColumnLine::Constraint(line.to_string())
        } else {
            ColumnLine::Definition(line.to_string())
        }
    }

    pub fn render(&self) -> String {
        match self {
            ColumnLine::AutoIncrement { column } => {
                format!("`{}` INTEGER PRIMARY KEY AUTOINCREMENT", column)
            }
            ColumnLine::Definition(text) | ColumnLine::Constraint(text) => text.clone(),
        }
    }
}

/// Rewritten body of one table
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BodyRewrite {
    /// Final lines, commas already normalized
    pub lines: Vec<String>,
    /// Auto-increment columns rewritten in this body, in source order
    pub auto_increment_columns: Vec<String>,
    /// PRIMARY KEY constraint lines removed
    pub primary_keys_dropped: usize,
    pub warnings: Vec<TranslateWarning>,
}

/// Split a table body into trimmed logical lines, dropping blanks and `--`
/// comments. Definitions sharing one source line are separated at top-level
/// commas.
pub fn split_lines(body: &str) -> Vec<&str> {
    body.lines()
        .map(lexer::cut_line_comment)
        .flat_map(lexer::split_top_level_commas)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Rewrite the body of table `table`.
pub fn rewrite_body(table: &str, body: &str) -> BodyRewrite {
    let mut rewrite = BodyRewrite::default();
    let mut rewritten: AHashSet<String> = AHashSet::new();

    let mut lines: Vec<ColumnLine> = Vec::new();
    for raw in split_lines(body) {
        let line = ColumnLine::classify(raw);
        match &line {
            ColumnLine::AutoIncrement { column } => {
                rewritten.insert(column.to_lowercase());
                rewrite.auto_increment_columns.push(column.clone());
            }
            ColumnLine::Definition(text) if AUTO_INCREMENT.is_match(text) => {
                rewrite
                    .warnings
                    .push(TranslateWarning::AutoIncrementNotRewritten {
                        table: table.to_string(),
                        line: text.clone(),
                    });
            }
            ColumnLine::Constraint(text) => {
                if let Some(feature) = inline_index_feature(text) {
                    rewrite.warnings.push(TranslateWarning::UnsupportedFeature {
                        table: table.to_string(),
                        feature,
                    });
                }
            }
            ColumnLine::Definition(_) => {}
        }
        lines.push(line);
    }

    let before = lines.len();
    lines = drop_redundant_primary_keys(lines, &rewritten);
    rewrite.primary_keys_dropped = before - lines.len();

    if !rewritten.is_empty() {
        for line in &lines {
            if let ColumnLine::Constraint(text) = line {
                if PRIMARY_KEY.is_match(text) {
                    rewrite.warnings.push(TranslateWarning::DuplicatePrimaryKey {
                        table: table.to_string(),
                        constraint: text.trim_end_matches(',').to_string(),
                    });
                }
            }
        }
    }

    rewrite.lines = normalize_commas(lines.iter().map(ColumnLine::render).collect());
    rewrite
}

/// Drop every `PRIMARY KEY (...)` constraint whose column list names one of
/// the `rewritten` columns (lowercased). Other lines keep their order.
pub fn drop_redundant_primary_keys(
    lines: Vec<ColumnLine>,
    rewritten: &AHashSet<String>,
) -> Vec<ColumnLine> {
    if rewritten.is_empty() {
        return lines;
    }
    lines
        .into_iter()
        .filter(|line| match line {
            ColumnLine::Constraint(text) if PRIMARY_KEY.is_match(text) => !primary_key_columns(text)
                .iter()
                .any(|col| rewritten.contains(&col.to_lowercase())),
            _ => true,
        })
        .collect()
}

/// Column names listed by a `PRIMARY KEY (...)` constraint, unquoted and with
/// any prefix length (`name(10)`) or sort order removed.
pub fn primary_key_columns(constraint: &str) -> Vec<String> {
    let bytes = constraint.as_bytes();
    let Some(open) = constraint.find('(') else {
        return Vec::new();
    };
    let close = lexer::find_matching_paren(bytes, open).unwrap_or(constraint.len());
    lexer::split_top_level_commas(&constraint[open + 1..close])
        .into_iter()
        .filter_map(|part| KEY_PART_NAME.captures(part.trim()))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Every line except the last ends with exactly one comma; the last has none.
pub fn normalize_commas(mut lines: Vec<String>) -> Vec<String> {
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter_mut().enumerate() {
        if i < last {
            if !line.ends_with(',') {
                line.push(',');
            }
        } else {
            let trimmed = line.trim_end_matches(',').trim_end().len();
            line.truncate(trimmed);
        }
    }
    lines
}

fn inline_index_feature(line: &str) -> Option<String> {
    let caps = INLINE_INDEX.captures(line)?;
    let feature = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(kind), Some(key), _) => format!("{} {}", kind.as_str(), key.as_str()),
        (None, Some(key), _) => key.as_str().to_string(),
        (_, _, Some(kind)) => kind.as_str().to_string(),
        _ => return None,
    };
    Some(feature.to_uppercase())
}
