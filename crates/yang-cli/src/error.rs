use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use yang_db::CompilerError;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Compiler(#[from] CompilerError),

    #[error("No yang.toml found in {searched_path} or any parent directory")]
    #[diagnostic(
        code(yangc::cli::project_not_found),
        help("Run yangc inside a project or pass --root")
    )]
    ProjectNotFound { searched_path: PathBuf },

    #[error("Failed {operation}")]
    #[diagnostic(code(yangc::cli::io_error))]
    IoError {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Module {name} is not part of this compilation")]
    #[diagnostic(
        code(yangc::cli::unknown_module),
        help("Available modules: {available}")
    )]
    UnknownModule { name: String, available: String },
}
