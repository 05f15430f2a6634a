//! In-process execution with the bundled SQLite library.

use super::{publish, stage_file, ExecutionSink, LoadError, LoadOutcome};
use rusqlite::Connection;
use std::path::Path;

const ENGINE: &str = "embedded";

/// Runs scripts through `rusqlite` without any external program
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSqlite;

impl ExecutionSink for EmbeddedSqlite {
    fn name(&self) -> &'static str {
        ENGINE
    }

    fn apply(&self, sql: &str, db_path: &Path) -> Result<LoadOutcome, LoadError> {
        let staged = stage_file(db_path, ".sqlite")?;
        tracing::debug!(staged = %staged.path().display(), "executing script in-process");

        let tables = {
            let conn = Connection::open(staged.path()).map_err(execution_error)?;
            conn.execute_batch(sql).map_err(execution_error)?;
            count_tables(&conn).map_err(execution_error)?
        };

        publish(staged, db_path)?;

        Ok(LoadOutcome {
            db_path: db_path.to_path_buf(),
            engine: ENGINE,
            tables: Some(tables),
            diagnostics: String::new(),
        })
    }
}

fn count_tables(conn: &Connection) -> rusqlite::Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

fn execution_error(e: rusqlite::Error) -> LoadError {
    LoadError::Execution {
        engine: ENGINE,
        status: None,
        diagnostics: e.to_string(),
    }
}
