//! Execution through the `sqlite3` command-line shell.

use super::{parent_dir, publish, stage_file, ExecutionSink, LoadError, LoadOutcome};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

const ENGINE: &str = "sqlite3";

/// Runs `<program> -bail <db>` with the script on stdin
#[derive(Debug, Clone)]
pub struct Sqlite3Cli {
    program: String,
}

impl Sqlite3Cli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Sqlite3Cli {
    fn default() -> Self {
        let program = if cfg!(windows) { "sqlite3.exe" } else { "sqlite3" };
        Self::new(program)
    }
}

impl ExecutionSink for Sqlite3Cli {
    fn name(&self) -> &'static str {
        ENGINE
    }

    fn apply(&self, sql: &str, db_path: &Path) -> Result<LoadOutcome, LoadError> {
        let staged = stage_file(db_path, ".sqlite")?;

        let mut script = tempfile::Builder::new()
            .prefix(".dump2sqlite-")
            .suffix(".sql")
            .tempfile_in(parent_dir(db_path))?;
        script.write_all(sql.as_bytes())?;
        script.flush()?;

        tracing::debug!(
            program = %self.program,
            staged = %staged.path().display(),
            "running sqlite3 shell"
        );

        let output = Command::new(&self.program)
            .arg("-bail")
            .arg(staged.path())
            .stdin(File::open(script.path())?)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => LoadError::EngineNotFound {
                    program: self.program.clone(),
                },
                _ => LoadError::Io(e),
            })?;

        let diagnostics = collect_diagnostics(&output.stdout, &output.stderr);
        if !output.status.success() {
            return Err(LoadError::Execution {
                engine: ENGINE,
                status: output.status.code(),
                diagnostics,
            });
        }

        publish(staged, db_path)?;

        Ok(LoadOutcome {
            db_path: db_path.to_path_buf(),
            engine: ENGINE,
            tables: None,
            diagnostics,
        })
    }
}

fn collect_diagnostics(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    match (stdout.trim(), stderr.trim()) {
        ("", err) => err.to_string(),
        (out, "") => out.to_string(),
        (out, err) => format!("{}\n{}", out, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_program() {
        let dir = TempDir::new().unwrap();
        let sink = Sqlite3Cli::new("dump2sqlite-no-such-sqlite3");

        let err = sink
            .apply("SELECT 1;", &dir.path().join("db.sqlite"))
            .unwrap_err();

        assert!(matches!(err, LoadError::EngineNotFound { .. }));
        assert!(!dir.path().join("db.sqlite").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_keeps_existing_database() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("db.sqlite");
        std::fs::write(&db, b"previous").unwrap();

        let err = Sqlite3Cli::new("false").apply("SELECT 1;", &db).unwrap_err();

        assert!(matches!(
            err,
            LoadError::Execution {
                status: Some(1),
                ..
            }
        ));
        assert_eq!(std::fs::read(&db).unwrap(), b"previous");
        // Staging files are cleaned up
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_collect_diagnostics() {
        assert_eq!(collect_diagnostics(b"", b"Error: near line 1\n"), "Error: near line 1");
        assert_eq!(collect_diagnostics(b"ok\n", b""), "ok");
        assert_eq!(collect_diagnostics(b"a", b"b"), "a\nb");
    }
}
