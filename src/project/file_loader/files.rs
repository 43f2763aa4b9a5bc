use std::path::Path;

use crate::error::{Error, Result};

/// Reads a source file to a string.
pub fn load_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Extracts the file extension, if any.
pub fn get_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Checks the extension of `path` (case-sensitive, without the dot).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    get_extension(path) == Some(extension)
}

/// Derives the unit a testbench targets from its file name.
///
/// `mux_tb.v` with suffix `_tb` gives `mux`. A stem without the suffix is
/// returned unchanged.
pub fn testbench_unit_name(path: &Path, suffix: &str) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = stem.strip_suffix(suffix).unwrap_or(stem);
    (!name.is_empty()).then(|| name.to_string())
}
