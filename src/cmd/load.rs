//! Load command CLI handler: translate a dump and materialize it as a SQLite file.

use crate::config::LoadYamlConfig;
use crate::input;
use crate::progress;
use crate::sink::{Engine, ExecutionSink, LoadOutcome};
use crate::translate::{self, TranslateReport};
use anyhow::Context;
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE: &str = "db.sqlite";

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    engine: Option<String>,
    sqlite3_bin: Option<String>,
    config: Option<PathBuf>,
    keep_sql: bool,
    json: bool,
    progress: bool,
) -> anyhow::Result<()> {
    let config = LoadYamlConfig::resolve(config.as_deref())?;

    let engine = match engine {
        Some(name) => name
            .parse::<Engine>()
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        None => config.engine,
    };
    let sqlite3_bin = sqlite3_bin.unwrap_or(config.sqlite3_bin);
    let keep_sql = keep_sql || config.keep_sql;
    let db_path = output.unwrap_or_else(|| default_db_path(&file));

    let sink = engine.sink(&sqlite3_bin);
    let result = load(&file, &db_path, sink.as_ref(), keep_sql, progress && !json);

    if json {
        print_json(&result);
        if result.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let (outcome, report) = result?;
    print_summary(&outcome, &report);
    Ok(())
}

fn default_db_path(input: &Path) -> PathBuf {
    input.with_file_name(DEFAULT_DB_FILE)
}

/// `<db file name>.sql`, e.g. `db.sqlite.sql`.
fn script_path(db_path: &Path) -> PathBuf {
    let mut name = db_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_DB_FILE.into());
    name.push(".sql");
    db_path.with_file_name(name)
}

/// Refuse to write `target` when it is the input dump itself.
fn ensure_not_input(input: &Path, target: &Path, what: &str) -> anyhow::Result<()> {
    if !target.exists() {
        return Ok(());
    }
    let input = input
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", input.display()))?;
    let target_resolved = target
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", target.display()))?;
    if input == target_resolved {
        anyhow::bail!(
            "{} {} is the input dump; choose another --output",
            what,
            target.display()
        );
    }
    Ok(())
}

fn load(
    file: &Path,
    db_path: &Path,
    sink: &dyn ExecutionSink,
    keep_sql: bool,
    show_progress: bool,
) -> anyhow::Result<(LoadOutcome, TranslateReport)> {
    ensure_not_input(file, db_path, "database")?;
    let kept_script = keep_sql.then(|| script_path(db_path));
    if let Some(path) = &kept_script {
        ensure_not_input(file, path, "script")?;
    }

    let source = if show_progress {
        let size = std::fs::metadata(file)
            .with_context(|| format!("failed to read {}", file.display()))?
            .len();
        let bar = progress::byte_bar(size);
        let handle = bar.clone();
        let source = input::read_source(file, Some(Box::new(move |n: u64| handle.set_position(n))));
        bar.finish_and_clear();
        source
    } else {
        input::read_source(file, None)
    }
    .with_context(|| format!("failed to read {}", file.display()))?;

    let translation = translate::translate_with_report(&source);
    for warning in &translation.report.warnings {
        tracing::warn!("{}", warning);
    }

    if let Some(path) = &kept_script {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, &translation.output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "kept translated script");
    }

    let spinner = show_progress.then(|| progress::spinner("Loading into SQLite..."));
    let applied = sink.apply(&translation.output, db_path);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let outcome = applied?;

    tracing::info!(
        db = %outcome.db_path.display(),
        engine = outcome.engine,
        tables = ?outcome.tables,
        "database created"
    );

    Ok((outcome, translation.report))
}

fn print_json(result: &anyhow::Result<(LoadOutcome, TranslateReport)>) {
    let value = match result {
        Ok((outcome, report)) => serde_json::json!({
            "success": true,
            "db_file": outcome
                .db_path
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
            "db_path": outcome.db_path,
            "engine": outcome.engine,
            "tables": outcome.tables,
            "warnings": report.warnings,
        }),
        Err(e) => serde_json::json!({
            "success": false,
            "message": format!("{:#}", e),
        }),
    };
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("failed to serialize result: {}", e),
    }
}

fn print_summary(outcome: &LoadOutcome, report: &TranslateReport) {
    eprintln!("Created {} ({} engine)", outcome.db_path.display(), outcome.engine);
    if let Some(tables) = outcome.tables {
        eprintln!("  Tables: {}", tables);
    }
    eprintln!("  Tables rewritten: {}", report.tables_rewritten);
    eprintln!("  Statements stripped: {}", report.statements_stripped);
    if !report.warnings.is_empty() {
        eprintln!("  Warnings: {}", report.warnings.len());
    }
    if !outcome.diagnostics.is_empty() {
        eprintln!();
        eprintln!("{}", outcome.diagnostics);
    }
}
