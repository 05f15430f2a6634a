//! MySQL dump to SQLite dialect translation.
//!
//! The translator is a fixed pipeline of pure text passes:
//! 1. [`strip`] removes `LOCK TABLES`, `UNLOCK TABLES` and `PRAGMA` statements
//! 2. [`table`] finds every `CREATE TABLE` block and re-emits it, with
//!    [`column`] rewriting auto-increment integer columns to
//!    `INTEGER PRIMARY KEY AUTOINCREMENT` and dropping the now redundant
//!    `PRIMARY KEY (...)` constraints
//! 3. [`normalize`] collapses repeated `;` and runs of blank lines
//!
//! Translation never fails. Input the rules do not recognize is passed through
//! unchanged, and the same input always yields the same output.
//!
//! ```
//! let sql = "CREATE TABLE `users` (\n  `id` int NOT NULL AUTO_INCREMENT,\n  PRIMARY KEY (`id`)\n);";
//! assert_eq!(
//!     dump2sqlite::translate::translate(sql),
//!     "CREATE TABLE `users` (\n  `id` INTEGER PRIMARY KEY AUTOINCREMENT\n);"
//! );
//! ```

pub mod column;
mod lexer;
pub mod normalize;
pub mod strip;
pub mod table;
pub mod warnings;

use serde::Serialize;
use warnings::TranslateWarning;

/// Statistics and diagnostics from one translation
#[derive(Debug, Default, Clone, Serialize)]
pub struct TranslateReport {
    /// LOCK TABLES / UNLOCK TABLES / PRAGMA statements removed
    pub statements_stripped: usize,
    /// CREATE TABLE blocks re-emitted
    pub tables_rewritten: usize,
    /// `(table, column)` pairs rewritten to INTEGER PRIMARY KEY AUTOINCREMENT
    pub auto_increment_columns: Vec<(String, String)>,
    /// Table-level PRIMARY KEY constraints removed
    pub primary_keys_dropped: usize,
    /// MySQL table option tails removed (`ENGINE=...`, `DEFAULT CHARSET=...`)
    pub table_options_dropped: usize,
    pub warnings: Vec<TranslateWarning>,
    /// More warnings were raised than the collector keeps
    pub warnings_truncated: bool,
}

/// Translated text together with its report
#[derive(Debug, Clone)]
pub struct Translation {
    pub output: String,
    pub report: TranslateReport,
}

/// Translate a MySQL-style dump into SQLite-compatible SQL.
pub fn translate(source: &str) -> String {
    translate_with_report(source).output
}

/// Translate and report what was changed.
pub fn translate_with_report(source: &str) -> Translation {
    let stripped = strip::strip_statements(source);
    let tables = table::rewrite_tables(&stripped.output);
    let output = normalize::normalize(&tables.output);

    Translation {
        output,
        report: TranslateReport {
            statements_stripped: stripped.removed,
            tables_rewritten: tables.tables_rewritten,
            auto_increment_columns: tables.auto_increment_columns,
            primary_keys_dropped: tables.primary_keys_dropped,
            table_options_dropped: tables.table_options_dropped,
            warnings: tables.warnings,
            warnings_truncated: tables.warnings_truncated,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = concat!(
        "-- MySQL dump 10.13\n",
        "/*!40101 SET NAMES utf8 */;\n",
        "\n",
        "DROP TABLE IF EXISTS `users`;\n",
        "CREATE TABLE `users` (\n",
        "  `id` int(11) NOT NULL AUTO_INCREMENT,\n",
        "  `email` varchar(255) NOT NULL,\n",
        "  PRIMARY KEY (`id`),\n",
        "  UNIQUE KEY `email` (`email`)\n",
        ") ENGINE=InnoDB AUTO_INCREMENT=3 DEFAULT CHARSET=utf8mb4;\n",
        "\n",
        "\n",
        "\n",
        "LOCK TABLES `users` WRITE;\n",
        "INSERT INTO `users` VALUES (1,'a@example.com'),(2,'b@example.com');\n",
        "UNLOCK TABLES;\n",
    );

    #[test]
    fn test_full_dump() {
        let translation = translate_with_report(DUMP);

        assert_eq!(
            translation.output,
            concat!(
                "-- MySQL dump 10.13\n",
                "/*!40101 SET NAMES utf8 */;\n",
                "\n",
                "DROP TABLE IF EXISTS `users`;\n",
                "CREATE TABLE `users` (\n",
                "  `id` INTEGER PRIMARY KEY AUTOINCREMENT,\n",
                "  `email` varchar(255) NOT NULL,\n",
                "  UNIQUE KEY `email` (`email`)\n",
                ");\n",
                "\n",
                "INSERT INTO `users` VALUES (1,'a@example.com'),(2,'b@example.com');\n",
                "\n",
            )
        );

        let report = translation.report;
        assert_eq!(report.statements_stripped, 2);
        assert_eq!(report.tables_rewritten, 1);
        assert_eq!(report.primary_keys_dropped, 1);
        assert_eq!(report.table_options_dropped, 1);
        assert_eq!(
            report.auto_increment_columns,
            vec![("users".to_string(), "id".to_string())]
        );
        assert!(matches!(
            report.warnings.as_slice(),
            [TranslateWarning::UnsupportedFeature { feature, .. }] if feature == "UNIQUE KEY"
        ));
    }

    #[test]
    fn test_translate_is_idempotent() {
        let once = translate(DUMP);
        assert_eq!(translate(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(translate(""), "");
    }
}
