use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use yang_schema::{ConstructType, DataModelError};
use yang_source::LocationInfo;

/// Errors raised while scanning, parsing or building the schema tree of a
/// single file. Any of them abandons that file.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("YANG file error: Unterminated quoted string in {location}")]
    #[diagnostic(code(yang_parse::unterminated_string))]
    UnterminatedString {
        location: LocationInfo,
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("YANG file error: Unterminated block comment in {location}")]
    #[diagnostic(code(yang_parse::unterminated_comment))]
    UnterminatedComment {
        location: LocationInfo,
        #[label("comment starts here")]
        span: SourceSpan,
    },

    #[error("YANG file error: Expected {expected}, found {found} in {location}")]
    #[diagnostic(code(yang_parse::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        location: LocationInfo,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("YANG file error: Unexpected end of file, expected {expected} in file: {file}")]
    #[diagnostic(code(yang_parse::unexpected_eof))]
    UnexpectedEof {
        expected: String,
        file: String,
        #[label("file ends here")]
        span: SourceSpan,
    },

    /// A construct appeared where no holder exists (e.g. a second top-level
    /// statement).
    #[error("YANG file error: Missing holder before processing {construct} in {location}")]
    #[diagnostic(
        code(yang_parse::missing_holder),
        help("A file holds exactly one module or submodule; every other statement must be nested in it")
    )]
    MissingHolder {
        construct: String,
        location: LocationInfo,
        #[label("no enclosing statement")]
        span: SourceSpan,
    },

    /// The enclosing statement cannot hold this construct.
    #[error("YANG file error: {construct} \"{name}\" cannot be held by {holder} in {location}")]
    #[diagnostic(code(yang_parse::invalid_holder))]
    InvalidHolder {
        construct: ConstructType,
        name: String,
        holder: String,
        location: LocationInfo,
        #[label("not allowed here")]
        span: SourceSpan,
    },

    #[error("YANG file error: Missing {missing} statement in {holder} \"{name}\" in {location}")]
    #[diagnostic(code(yang_parse::missing_statement))]
    MissingStatement {
        missing: ConstructType,
        holder: ConstructType,
        name: String,
        location: LocationInfo,
        #[label("declared here")]
        span: SourceSpan,
    },

    #[error("YANG file error: Missing argument of {keyword} statement in {location}")]
    #[diagnostic(code(yang_parse::missing_argument))]
    MissingArgument {
        keyword: String,
        location: LocationInfo,
        #[label("argument expected")]
        span: SourceSpan,
    },

    #[error("YANG file error: Invalid argument \"{argument}\" of {construct} statement: {reason} in {location}")]
    #[diagnostic(code(yang_parse::invalid_argument))]
    InvalidArgument {
        construct: ConstructType,
        argument: String,
        reason: String,
        location: LocationInfo,
        #[label("invalid argument")]
        span: SourceSpan,
    },

    #[error("YANG file error: Unknown statement {keyword} in {location}")]
    #[diagnostic(
        code(yang_parse::unknown_statement),
        help("Extension statements must be written with their module prefix, e.g. `ext:annotation`")
    )]
    UnknownStatement {
        keyword: String,
        location: LocationInfo,
        #[label("unknown keyword")]
        span: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    DataModel(#[from] DataModelError),
}

impl ParserError {
    pub fn missing_holder(construct: impl Into<String>, location: &LocationInfo) -> Self {
        ParserError::MissingHolder {
            construct: construct.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn invalid_holder(
        construct: ConstructType,
        name: impl Into<String>,
        holder: impl Into<String>,
        location: &LocationInfo,
    ) -> Self {
        ParserError::InvalidHolder {
            construct,
            name: name.into(),
            holder: holder.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn missing_statement(
        missing: ConstructType,
        holder: ConstructType,
        name: impl Into<String>,
        location: &LocationInfo,
    ) -> Self {
        ParserError::MissingStatement {
            missing,
            holder,
            name: name.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn missing_argument(keyword: impl Into<String>, location: &LocationInfo) -> Self {
        ParserError::MissingArgument {
            keyword: keyword.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn invalid_argument(
        construct: ConstructType,
        argument: impl Into<String>,
        reason: impl Into<String>,
        location: &LocationInfo,
    ) -> Self {
        ParserError::InvalidArgument {
            construct,
            argument: argument.into(),
            reason: reason.into(),
            location: location.clone(),
            span: location.span(),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = std::result::Result<T, ParserError>;
