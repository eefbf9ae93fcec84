//! Source file management for the yangc schema compiler.
//!
//! This crate is responsible for:
//! - Loading `.yang` source files from the filesystem
//! - Tracking where every parsed construct came from (`LocationInfo`)
//! - Reading the compiler configuration (`yang.toml`)
//! - Rendering diagnostics with source context via miette
//!
//! ## Diagnostics
//!
//! Every error type in the workspace derives `miette::Diagnostic`. A `Report`
//! attaches the text of the offending file so labels point at the exact
//! statement that failed.

mod config;
mod diagnostic;
mod error;
mod file;
mod location;

pub use config::{
    CompilerConfig, CompilerSection, Dependency, DependencyDetails, SourcesSection, CONFIG_FILE_NAME,
};
pub use diagnostic::{Report, YangError};
pub use error::SourceError;
pub use file::{discover_yang_files, SourceFile, YANG_FILE_EXTENSION};
pub use location::LocationInfo;
