//! Diagnostics raised while translating a dump.
//!
//! Warnings never change the translated text. They point at input the
//! rewrite rules leave alone even though SQLite is likely to reject it.

use serde::Serialize;

/// Warning types that can occur during translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranslateWarning {
    /// A line mentions AUTO_INCREMENT but is not an `int`/`integer` column
    AutoIncrementNotRewritten { table: String, line: String },
    /// A PRIMARY KEY constraint was kept next to an inline INTEGER PRIMARY KEY
    DuplicatePrimaryKey { table: String, constraint: String },
    /// Definition inside CREATE TABLE that SQLite does not accept
    UnsupportedFeature { table: String, feature: String },
}

impl std::fmt::Display for TranslateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateWarning::AutoIncrementNotRewritten { table, line } => {
                write!(
                    f,
                    "AUTO_INCREMENT left unchanged in table {} (not an int column): {}",
                    table, line
                )
            }
            TranslateWarning::DuplicatePrimaryKey { table, constraint } => {
                write!(
                    f,
                    "Table {} keeps {} alongside an AUTOINCREMENT column",
                    table, constraint
                )
            }
            TranslateWarning::UnsupportedFeature { table, feature } => {
                write!(f, "Unsupported feature in table {}: {}", table, feature)
            }
        }
    }
}

/// Collects warnings during translation
#[derive(Debug)]
pub struct WarningCollector {
    warnings: Vec<TranslateWarning>,
    max_warnings: usize,
    truncated: bool,
}

impl Default for WarningCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            warnings: Vec::new(),
            max_warnings: limit,
            truncated: false,
        }
    }

    /// Add a warning
    pub fn add(&mut self, warning: TranslateWarning) {
        if self.warnings.iter().any(|w| Self::is_similar(w, &warning)) {
            return;
        }
        if self.warnings.len() < self.max_warnings {
            self.warnings.push(warning);
        } else {
            self.truncated = true;
        }
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = TranslateWarning>) {
        for warning in warnings {
            self.add(warning);
        }
    }

    /// Unsupported features are reported once per feature, not per table.
    fn is_similar(a: &TranslateWarning, b: &TranslateWarning) -> bool {
        match (a, b) {
            (
                TranslateWarning::UnsupportedFeature { feature: f1, .. },
                TranslateWarning::UnsupportedFeature { feature: f2, .. },
            ) => f1 == f2,
            _ => a == b,
        }
    }

    pub fn warnings(&self) -> &[TranslateWarning] {
        &self.warnings
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_warnings(self) -> Vec<TranslateWarning> {
        self.warnings
    }
}
