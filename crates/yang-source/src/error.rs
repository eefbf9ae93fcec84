use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while locating sources or reading the compiler configuration
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// A configured file or directory does not exist
    #[error("Path does not exist: {0}")]
    #[diagnostic(
        code("SRC-001"),
        help("Make sure the path exists and has proper permissions")
    )]
    PathNotFound(PathBuf),

    /// No `yang.toml` in the given root
    #[error("Compiler configuration file not found in {0}")]
    #[diagnostic(
        code("SRC-002"),
        help("Create a yang.toml in the project root or pass the files explicitly")
    )]
    ConfigNotFound(PathBuf),

    /// Error reading the configuration file
    #[error("Error reading compiler configuration: {0}")]
    #[diagnostic(
        code("SRC-003"),
        help("Check file permissions and ensure the file is not corrupted")
    )]
    ConfigReadError(String),

    /// Error parsing the configuration file
    #[error("Invalid compiler configuration: {0}")]
    #[diagnostic(
        code("SRC-004"),
        help("Check your yang.toml syntax against the documented layout")
    )]
    ConfigParseError(String),

    /// A schema file could not be read
    #[error("Error reading schema file {path}: {reason}")]
    #[diagnostic(code("SRC-005"))]
    SourceReadError { path: PathBuf, reason: String },

    /// A dependency entry names neither a manifest nor a directory
    #[error("Error resolving dependency '{name}': {reason}")]
    #[diagnostic(
        code("SRC-006"),
        help("Dependencies point at the yang-model.toml written by an earlier compilation")
    )]
    DependencyResolutionError { name: String, reason: String },
}

// Conversion from io::Error to SourceError
impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::ConfigReadError(err.to_string())
    }
}

// Conversion from toml::de::Error to SourceError
impl From<toml::de::Error> for SourceError {
    fn from(err: toml::de::Error) -> Self {
        SourceError::ConfigParseError(err.to_string())
    }
}
