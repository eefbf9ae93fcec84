use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use yang_source::LocationInfo;

use crate::kind::ConstructType;

/// Errors raised while building or mutating the schema graph.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum DataModelError {
    /// Two constructs sharing an identifier space use the same name.
    #[error("YANG file error: Identifier collision detected in {construct} \"{name}\" in {location}")]
    #[diagnostic(
        code(yang_schema::duplicate_identifier),
        help("Rename one of the declarations; data nodes, leaves and leaf-lists share one identifier space per holder")
    )]
    DuplicateIdentifier {
        construct: ConstructType,
        name: String,
        location: LocationInfo,
        #[label("second declaration here")]
        span: SourceSpan,
    },

    /// A nested construct uses the same identifier as its holder.
    #[error("YANG file error: Duplicate {construct} identifier detected, same as {holder} \"{name}\" in {location}")]
    #[diagnostic(code(yang_schema::self_collision))]
    SelfCollision {
        construct: ConstructType,
        holder: ConstructType,
        name: String,
        location: LocationInfo,
        #[label("collides with its holder")]
        span: SourceSpan,
    },

    /// A holder's child schema map already has an entry for this identifier.
    #[error("YANG file error: Duplicate schema node {entry} in \"{holder}\" in {location}")]
    #[diagnostic(code(yang_schema::duplicate_schema_entry))]
    DuplicateSchemaEntry {
        holder: String,
        entry: String,
        location: LocationInfo,
        #[label("holder declared here")]
        span: SourceSpan,
    },

    /// A `uses` was expanded before its grouping was bound.
    ///
    /// The linker treats this as a request to retry on a later pass.
    #[error("YANG file error: Unable to find base grouping for given uses \"{name}\" in {location}")]
    #[diagnostic(code(yang_schema::unresolved_grouping))]
    UnresolvedGrouping {
        name: String,
        location: LocationInfo,
        #[label("used here")]
        span: SourceSpan,
    },

    /// An operation needed a holder of a different kind.
    #[error("YANG file error: {construct} \"{name}\" cannot be held by {holder} in {location}")]
    #[diagnostic(code(yang_schema::invalid_holder))]
    InvalidHolder {
        construct: ConstructType,
        holder: ConstructType,
        name: String,
        location: LocationInfo,
        #[label("not allowed here")]
        span: SourceSpan,
    },
}

impl DataModelError {
    pub fn duplicate_identifier(
        construct: ConstructType,
        name: impl Into<String>,
        location: &LocationInfo,
    ) -> Self {
        DataModelError::DuplicateIdentifier {
            construct,
            name: name.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn unresolved_grouping(name: impl Into<String>, location: &LocationInfo) -> Self {
        DataModelError::UnresolvedGrouping {
            name: name.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn location(&self) -> &LocationInfo {
        match self {
            DataModelError::DuplicateIdentifier { location, .. }
            | DataModelError::SelfCollision { location, .. }
            | DataModelError::DuplicateSchemaEntry { location, .. }
            | DataModelError::UnresolvedGrouping { location, .. }
            | DataModelError::InvalidHolder { location, .. } => location,
        }
    }
}
