//! Expansion of `translate` inputs given as a path or a glob pattern.

use std::path::{Path, PathBuf};

/// Whether `path` contains glob metacharacters.
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Expand a literal path or glob pattern into the files it names, sorted.
///
/// A literal path must exist. A glob must match at least one regular file.
pub fn expand_file_pattern(pattern: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern_str = pattern.to_string_lossy();

    if !is_glob_pattern(&pattern_str) {
        if !pattern.exists() {
            anyhow::bail!("file does not exist: {}", pattern.display());
        }
        return Ok(vec![pattern.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in glob::glob(&pattern_str)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", pattern_str, e))?
    {
        let path = entry
            .map_err(|e| anyhow::anyhow!("error reading path for pattern '{}': {}", pattern_str, e))?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        anyhow::bail!("no files match pattern: {}", pattern_str);
    }

    files.sort();
    Ok(files)
}

/// Outcome of running a command over several files
#[derive(Debug, Default)]
pub struct MultiFileResult {
    pub succeeded: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl MultiFileResult {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, path: &Path, error: impl ToString) {
        self.failures.push((path.to_path_buf(), error.to_string()));
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
