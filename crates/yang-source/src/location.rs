use std::fmt;

use miette::SourceSpan;
use serde::{Deserialize, Serialize};

/// Where a schema construct was declared.
///
/// Lines are 1-based and character positions 0-based, matching the way the
/// statement scanner counts them. `offset` and `length` locate the statement
/// keyword in the file text so diagnostics can label it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationInfo {
    /// File the construct was read from
    pub file: String,

    /// 1-based line number
    pub line: u32,

    /// 0-based character position within the line
    pub char_position: u32,

    /// Byte offset of the statement keyword
    pub offset: usize,

    /// Byte length of the statement keyword
    pub length: usize,
}

impl LocationInfo {
    pub fn new(file: impl Into<String>, line: u32, char_position: u32) -> Self {
        Self {
            file: file.into(),
            line,
            char_position,
            offset: 0,
            length: 0,
        }
    }

    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::new(self.offset.into(), self.length)
    }
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file: {} at line: {} at position: {}",
            self.file, self.line, self.char_position
        )
    }
}
