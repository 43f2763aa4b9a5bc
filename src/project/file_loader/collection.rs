use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::files::has_extension;
use crate::error::{Error, Result};

/// Recursively collects all files with `extension` under `dir`.
///
/// Entries are visited in file-name order at every directory level, so the
/// result is the same on every platform and every run.
pub fn collect_file_paths(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

/// Collects testbenches (`*<suffix>.<extension>`) under `dir`, sorted by path.
pub fn collect_testbenches(dir: &Path, suffix: &str, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::TestDirectoryNotFound(dir.to_path_buf()));
    }

    let mut testbenches: Vec<PathBuf> = collect_file_paths(dir, extension)?
        .into_iter()
        .filter(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.ends_with(suffix))
        })
        .collect();
    testbenches.sort();

    Ok(testbenches)
}
