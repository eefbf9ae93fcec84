use std::path::{Path, PathBuf};

use crate::error::SourceError;

pub const YANG_FILE_EXTENSION: &str = "yang";

/// A schema source file.
///
/// # Fields
///
/// * `location` - The path the file was read from, as shown in diagnostics
/// * `contents` - The raw text content of the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub location: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(location: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            contents: contents.into(),
        }
    }

    /// Reads a file from disk.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SourceError::SourceReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::trace!("loaded {} ({} bytes)", path.display(), contents.len());
        Ok(Self::new(path.display().to_string(), contents))
    }
}

/// Collects every `.yang` file below `dir`, sorted by path so that
/// compilation order does not depend on directory iteration order.
pub fn discover_yang_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if !dir.exists() {
        return Err(SourceError::PathNotFound(dir.to_path_buf()));
    }

    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == YANG_FILE_EXTENSION) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
