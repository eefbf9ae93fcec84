//! Diagnostic rendering for the yangc schema compiler
//!
//! Errors produced by the parser, the schema graph and the linker carry a
//! `LocationInfo` whose byte span points into the schema file. Wrapping such
//! an error in a `Report` attaches the file text, which is all miette needs
//! to render the labelled snippet.

use std::{
    error::Error,
    fmt::{self, Display},
    sync::Arc,
};

use miette::{Diagnostic, Severity};
use thiserror::Error;

use crate::file::SourceFile;

/// A report for rendering diagnostics with source code context.
///
/// # Fields
///
/// * `source_code` - The source code text to display with the error
/// * `report` - The error report containing diagnostic details
#[derive(Debug, Clone, Error)]
pub struct Report {
    /// The source code text for context in error displays
    pub source_code: String,

    /// The error report
    pub report: Arc<dyn YangError>,
}

/// Display implementation that delegates to the underlying error report
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.report.fmt(f)
    }
}

/// Delegates to the wrapped error, substituting the file text as source code.
impl miette::Diagnostic for Report {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.report.code()
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        self.report.diagnostic_source()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.report.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        self.report.labels()
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        self.report.related()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn url<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.report.url()
    }

    fn severity(&self) -> Option<Severity> {
        self.report.severity()
    }
}

/// A trait for errors that can be reported with source context.
///
/// Implemented for every `Diagnostic` that can cross threads.
pub trait YangError: Diagnostic + Send + Sync + Display + Error + 'static {
    /// Create a Report carrying the text of `file`
    fn report(self, file: &SourceFile) -> Report;
}

impl<T: Diagnostic + Send + Sync + Display + Error + 'static> YangError for T {
    fn report(self, file: &SourceFile) -> Report {
        Report {
            source_code: file.contents.clone(),
            report: Arc::new(self),
        }
    }
}
