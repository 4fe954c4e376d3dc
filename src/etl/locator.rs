//! Recursive discovery of data files.

use super::error::EtlError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Find every file under `root` whose extension matches `extension`.
///
/// The extension is compared case-insensitively and may be given with or
/// without its leading dot. Returned paths are absolute and sorted.
/// Symbolic links are not followed, so each file is reached by one path.
pub fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, EtlError> {
    if !root.is_dir() {
        return Err(EtlError::NotFound(root.to_path_buf()));
    }
    let root = root.canonicalize().map_err(|e| EtlError::io(root, e))?;
    let extension = extension.trim_start_matches('.');

    let mut files = Vec::new();
    for entry in WalkDir::new(&root) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root.as_path()).to_path_buf();
            EtlError::io(&path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);

        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Found {} .{} files under {:?}", files.len(), extension, root);
    Ok(files)
}
