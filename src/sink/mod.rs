//! Applying translated SQL to a SQLite database file.
//!
//! Every sink builds the database in a temporary file next to the destination
//! and renames it into place only when the whole script succeeded. A failed
//! run leaves no partial database behind and never touches an existing file
//! at the destination.
//!
//! # Engines
//!
//! - [`EmbeddedSqlite`]: the SQLite library compiled into this binary
//! - [`Sqlite3Cli`]: the `sqlite3` command-line shell, run as a subprocess

mod embedded;
mod sqlite3;

pub use embedded::EmbeddedSqlite;
pub use sqlite3::Sqlite3Cli;

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Something that can execute a SQL script against a database file
pub trait ExecutionSink {
    /// Short engine name used in reports
    fn name(&self) -> &'static str;

    /// Apply `sql` to a fresh database and move it to `db_path`.
    fn apply(&self, sql: &str, db_path: &Path) -> Result<LoadOutcome, LoadError>;
}

/// A successfully materialized database
#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    pub db_path: PathBuf,
    pub engine: &'static str,
    /// Number of user tables, when the engine can tell
    pub tables: Option<usize>,
    /// Anything the engine printed while running
    pub diagnostics: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("execution engine '{program}' not found (install the sqlite3 shell or use --engine embedded)")]
    EngineNotFound { program: String },

    #[error("{engine} failed{}: {diagnostics}", exit_status_suffix(.status))]
    Execution {
        engine: &'static str,
        status: Option<i32>,
        diagnostics: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn exit_status_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit status {}", code),
        None => String::new(),
    }
}

/// Which execution engine to load with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Embedded,
    Sqlite3,
}

impl Engine {
    /// Build the sink for this engine. `sqlite3_bin` is only used by
    /// [`Engine::Sqlite3`].
    pub fn sink(self, sqlite3_bin: &str) -> Box<dyn ExecutionSink> {
        match self {
            Engine::Embedded => Box::new(EmbeddedSqlite),
            Engine::Sqlite3 => Box::new(Sqlite3Cli::new(sqlite3_bin)),
        }
    }
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embedded" | "builtin" => Ok(Engine::Embedded),
            "sqlite3" | "cli" => Ok(Engine::Sqlite3),
            _ => Err(format!(
                "Unknown engine: {}. Valid options: embedded, sqlite3",
                s
            )),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Embedded => write!(f, "embedded"),
            Engine::Sqlite3 => write!(f, "sqlite3"),
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Create the temporary file a sink builds its database in.
fn stage_file(db_path: &Path, suffix: &str) -> io::Result<NamedTempFile> {
    let dir = parent_dir(db_path);
    std::fs::create_dir_all(dir)?;
    tempfile::Builder::new()
        .prefix(".dump2sqlite-")
        .suffix(suffix)
        .tempfile_in(dir)
}

/// Move a finished staging file over `db_path`.
fn publish(staged: NamedTempFile, db_path: &Path) -> Result<(), LoadError> {
    staged
        .persist(db_path)
        .map(|_| ())
        .map_err(|e| LoadError::Io(e.error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_str() {
        assert_eq!("embedded".parse::<Engine>().unwrap(), Engine::Embedded);
        assert_eq!("SQLite3".parse::<Engine>().unwrap(), Engine::Sqlite3);
        assert!("duckdb".parse::<Engine>().unwrap_err().contains("Valid options"));
    }

    #[test]
    fn test_execution_error_message() {
        let err = LoadError::Execution {
            engine: "sqlite3",
            status: Some(1),
            diagnostics: "Parse error near line 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "sqlite3 failed with exit status 1: Parse error near line 3"
        );
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        assert_eq!(parent_dir(Path::new("db.sqlite")), Path::new("."));
        assert_eq!(parent_dir(Path::new("out/db.sqlite")), Path::new("out"));
    }
}
