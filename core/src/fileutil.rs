//! File Utility Functions

use std::path::Path;

/// Resolves a file name against a working directory. Absolute paths and
/// paths without a working directory are returned unchanged.
///
/// * `filename` - The file name.
/// * `cwd`      - Optional working directory (e.g. the scene directory).
pub fn resolve_filename(filename: &str, cwd: Option<&str>) -> String {
    let path = Path::new(filename);
    match cwd {
        Some(dir) if path.is_relative() && !dir.is_empty() => {
            Path::new(dir).join(path).to_string_lossy().to_string()
        }
        _ => filename.to_string(),
    }
}

/// Returns the dataset name for a measured data file: the base name up to the
/// first `.`. Falls back to the full base name when that prefix is empty.
///
/// * `path` - The file path.
pub fn dataset_name(path: &str) -> String {
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}
