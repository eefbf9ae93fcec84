use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use yang_source::{Report, SourceError};

use crate::snapshot::SnapshotError;

/// Errors that can occur while running a compilation.
#[derive(Debug, Error, Diagnostic)]
pub enum CompilerError {
    #[error("Source error: {0}")]
    #[diagnostic(code("DB-SOURCE-001"))]
    Source(#[from] SourceError),

    #[error("No schema files found under {0}")]
    #[diagnostic(
        code("DB-SOURCE-002"),
        help("List files under [sources] in yang.toml or add .yang files to a source directory")
    )]
    NoSources(PathBuf),

    #[error("Snapshot error: {0}")]
    #[diagnostic(code("DB-SNAPSHOT-001"))]
    Snapshot(#[from] SnapshotError),

    #[error("Invalid model manifest {path}: {reason}")]
    #[diagnostic(
        code("DB-MANIFEST-001"),
        help("Recompile the dependency to regenerate its yang-model.toml")
    )]
    Manifest { path: PathBuf, reason: String },

    #[error("Module {name} is provided by both {first} and {second}")]
    #[diagnostic(
        code("DB-MANIFEST-002"),
        help("Each module revision may only come from one dependency")
    )]
    DuplicateModule {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Every parse and link diagnostic of a failed compilation
    #[error("Compilation failed with {count} error(s)")]
    #[diagnostic(code("DB-COMPILE-001"))]
    Diagnostics {
        count: usize,
        #[related]
        diagnostics: Vec<Report>,
    },

    #[error("Error writing {path}: {reason}")]
    #[diagnostic(code("DB-OUTPUT-001"), help("Check that the output directory is writable"))]
    Output { path: PathBuf, reason: String },

    #[error("Code emission failed for module {module}: {reason}")]
    #[diagnostic(code("DB-EMIT-001"))]
    Emit { module: String, reason: String },
}

impl CompilerError {
    pub fn diagnostics(diagnostics: Vec<Report>) -> Self {
        CompilerError::Diagnostics {
            count: diagnostics.len(),
            diagnostics,
        }
    }

    pub fn output(path: impl Into<PathBuf>, err: impl ToString) -> Self {
        CompilerError::Output {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

/// Result type for compiler operations.
pub type CompilerResult<T> = Result<T, CompilerError>;
