use std::path::{Path, PathBuf};

use yang_source::CONFIG_FILE_NAME;

use crate::error::CliError;

/// Finds the root directory of a project by searching upwards for `yang.toml`.
pub fn find_project_root(start_path: &Path) -> Result<PathBuf, CliError> {
    let mut current = if start_path.is_dir() {
        start_path.to_path_buf()
    } else {
        start_path
            .parent()
            .map_or_else(|| start_path.to_path_buf(), |p| p.to_path_buf())
    };

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return current.canonicalize().map_err(|e| CliError::IoError {
                path: current.clone(),
                operation: format!("canonicalizing project root '{}'", current.display()),
                source: e,
            });
        }

        if !current.pop() {
            return Err(CliError::ProjectNotFound {
                searched_path: start_path.to_path_buf(),
            });
        }
    }
}

/// The project root given on the command line, or the one enclosing the
/// working directory.
pub fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let start = match root {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| CliError::IoError {
            path: PathBuf::from("."),
            operation: "getting current directory".to_string(),
            source: e,
        })?,
    };
    find_project_root(&start)
}
