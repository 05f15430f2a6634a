//! Translate command CLI handler.

use super::glob_util::{expand_file_pattern, MultiFileResult};
use crate::input;
use crate::progress;
use crate::translate::{self, TranslateReport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Per-file options shared by single and multi-file runs
struct TranslateOptions {
    dry_run: bool,
    progress: bool,
    header: bool,
}

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    dry_run: bool,
    progress: bool,
    strict: bool,
    no_header: bool,
    fail_fast: bool,
) -> anyhow::Result<()> {
    let files = expand_file_pattern(&file)?;
    let options = TranslateOptions {
        dry_run,
        progress,
        header: !no_header,
    };

    if let [single] = files.as_slice() {
        let report = translate_file(single, output.as_deref(), &options)?;
        print_stats(&report, dry_run, progress);

        if strict && !report.warnings.is_empty() {
            anyhow::bail!("Strict mode: {} warnings generated", report.warnings.len());
        }
        return Ok(());
    }

    let Some(output_dir) = output else {
        anyhow::bail!("Output directory required when using glob patterns. Use --output <dir>");
    };
    run_multi(&files, &output_dir, &options, strict, fail_fast)
}

fn run_multi(
    files: &[PathBuf],
    output_dir: &Path,
    options: &TranslateOptions,
    strict: bool,
    fail_fast: bool,
) -> anyhow::Result<()> {
    let total = files.len();
    let mut result = MultiFileResult::default();
    let per_file = TranslateOptions {
        progress: false,
        ..*options
    };

    if !options.dry_run {
        std::fs::create_dir_all(output_dir)?;
    }

    eprintln!("Translating {} files...\n", total);

    for (idx, file) in files.iter().enumerate() {
        eprintln!("[{}/{}] Translating: {}", idx + 1, total, file.display());

        let output_file = if options.dry_run {
            None
        } else {
            let file_name = file
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| format!("output_{}.sql", idx));
            Some(output_dir.join(strip_compression_suffix(&file_name)))
        };

        match translate_file(file, output_file.as_deref(), &per_file) {
            Ok(report) => {
                let warning_str = if report.warnings.is_empty() {
                    String::new()
                } else {
                    format!(" ({} warnings)", report.warnings.len())
                };
                eprintln!(
                    "  {} tables rewritten, {} statements stripped{}",
                    report.tables_rewritten, report.statements_stripped, warning_str
                );
                if let Some(out) = &output_file {
                    eprintln!("  → {}", out.display());
                }
                eprintln!();

                if strict && !report.warnings.is_empty() {
                    result.record_failure(
                        file,
                        format!("{} warnings in strict mode", report.warnings.len()),
                    );
                    if fail_fast {
                        break;
                    }
                } else {
                    result.record_success();
                }
            }
            Err(e) => {
                eprintln!("  Error: {}\n", e);
                result.record_failure(file, &e);
                if fail_fast {
                    break;
                }
            }
        }
    }

    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("Translation Summary:");
    eprintln!("  Total files: {}", total);
    eprintln!("  Succeeded: {}", result.succeeded);
    eprintln!("  Failed: {}", result.failed());

    if result.has_failures() {
        eprintln!();
        eprintln!("Failed files:");
        for (path, error) in &result.failures {
            eprintln!("  - {}: {}", path.display(), error);
        }
        anyhow::bail!("{} of {} files failed", result.failed(), total);
    }

    Ok(())
}

/// Output files are plain SQL even when the input was compressed.
fn strip_compression_suffix(file_name: &str) -> &str {
    [".gz", ".gzip", ".bz2", ".bzip2", ".xz", ".lzma", ".zst", ".zstd"]
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name)
}

fn translate_file(
    input_path: &Path,
    output: Option<&Path>,
    options: &TranslateOptions,
) -> anyhow::Result<TranslateReport> {
    let source = if options.progress {
        let size = std::fs::metadata(input_path)?.len();
        let bar = progress::byte_bar(size);
        let handle = bar.clone();
        let source = input::read_source(input_path, Some(Box::new(move |n: u64| handle.set_position(n))))?;
        bar.finish_and_clear();
        source
    } else {
        input::read_source(input_path, None)?
    };

    let translation = translate::translate_with_report(&source);

    let mut writer: Box<dyn Write> = if options.dry_run {
        Box::new(std::io::sink())
    } else {
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Box::new(BufWriter::with_capacity(
                    WRITER_BUFFER_SIZE,
                    File::create(path)?,
                ))
            }
            None => Box::new(BufWriter::new(std::io::stdout())),
        }
    };

    if options.header && !options.dry_run {
        write_header(&mut writer, input_path)?;
    }
    writer.write_all(translation.output.as_bytes())?;
    writer.flush()?;

    Ok(translation.report)
}

fn write_header(writer: &mut dyn Write, input_path: &Path) -> std::io::Result<()> {
    writeln!(writer, "-- Translated by dump2sqlite")?;
    writeln!(writer, "-- From: mysql → To: sqlite")?;
    writeln!(writer, "-- Source: {}", input_path.display())?;
    writeln!(writer)?;
    Ok(())
}

fn print_stats(report: &TranslateReport, dry_run: bool, progress: bool) {
    if !progress && !dry_run {
        return;
    }

    eprintln!();
    eprintln!("Translation Statistics:");
    eprintln!("  Statements stripped: {}", report.statements_stripped);
    eprintln!("  Tables rewritten: {}", report.tables_rewritten);
    eprintln!(
        "  Auto-increment columns: {}",
        report.auto_increment_columns.len()
    );
    eprintln!("  PRIMARY KEY constraints dropped: {}", report.primary_keys_dropped);
    eprintln!("  Table options dropped: {}", report.table_options_dropped);

    if !report.warnings.is_empty() {
        eprintln!();
        eprintln!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            eprintln!("  ⚠ {}", warning);
        }
        if report.warnings_truncated {
            eprintln!("  ... (additional warnings truncated)");
        }
    }

    if dry_run {
        eprintln!();
        eprintln!("(Dry run - no output written)");
    }
}
