use std::fmt;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use yang_schema::DataModelError;
use yang_source::LocationInfo;

/// What a reference that could not be bound was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Module,
    Submodule,
    Grouping,
    Typedef,
    Identity,
    AugmentTarget,
    LeafrefTarget,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReferenceKind::Module => "module",
            ReferenceKind::Submodule => "submodule",
            ReferenceKind::Grouping => "grouping",
            ReferenceKind::Typedef => "typedef",
            ReferenceKind::Identity => "identity",
            ReferenceKind::AugmentTarget => "augment target",
            ReferenceKind::LeafrefTarget => "leafref target",
        };
        f.write_str(text)
    }
}

/// Errors raised while linking a set of parsed files.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Nothing matched the reference after every linking pass.
    #[error("YANG file error: Unable to find {kind} \"{name}\" in {location}")]
    #[diagnostic(
        code(yang_link::reference_not_found),
        help("Check the spelling and that the defining module is imported or included")
    )]
    ReferenceNotFound {
        kind: ReferenceKind,
        name: String,
        location: LocationInfo,
        #[label("referenced here")]
        span: SourceSpan,
    },

    /// A `uses` whose grouping was found but could never be expanded.
    #[error("YANG file error: Unable to find base grouping for given uses \"{name}\" in {location}")]
    #[diagnostic(code(yang_link::unresolved_grouping))]
    UnresolvedGrouping {
        name: String,
        location: LocationInfo,
        #[label("used here")]
        span: SourceSpan,
    },

    /// A `uses` that (directly or through other groupings) expands itself.
    #[error("YANG file error: Grouping \"{name}\" is used within its own expansion in {location}")]
    #[diagnostic(
        code(yang_link::grouping_cycle),
        help("A grouping must not use itself, directly or through other groupings")
    )]
    GroupingCycle {
        name: String,
        location: LocationInfo,
        #[label("cyclic uses")]
        span: SourceSpan,
    },

    /// Bound, but what it points at never resolved (a typedef chain that
    /// loops or ends in a missing definition).
    #[error("YANG file error: {kind} \"{name}\" depends on a definition that could not be resolved in {location}")]
    #[diagnostic(code(yang_link::unresolved_dependency))]
    UnresolvedDependency {
        kind: ReferenceKind,
        name: String,
        location: LocationInfo,
        #[label("referenced here")]
        span: SourceSpan,
    },

    #[error("YANG file error: Invalid schema node path \"{path}\": {reason} in {location}")]
    #[diagnostic(code(yang_link::invalid_path))]
    InvalidPath {
        path: String,
        reason: String,
        location: LocationInfo,
        #[label("path written here")]
        span: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    DataModel(#[from] DataModelError),
}

impl LinkError {
    pub fn not_found(kind: ReferenceKind, name: impl Into<String>, location: &LocationInfo) -> Self {
        LinkError::ReferenceNotFound {
            kind,
            name: name.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn unresolved_dependency(
        kind: ReferenceKind,
        name: impl Into<String>,
        location: &LocationInfo,
    ) -> Self {
        LinkError::UnresolvedDependency {
            kind,
            name: name.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn invalid_path(
        path: impl Into<String>,
        reason: impl Into<String>,
        location: &LocationInfo,
    ) -> Self {
        LinkError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
            location: location.clone(),
            span: location.span(),
        }
    }

    pub fn location(&self) -> &LocationInfo {
        match self {
            LinkError::ReferenceNotFound { location, .. }
            | LinkError::UnresolvedGrouping { location, .. }
            | LinkError::GroupingCycle { location, .. }
            | LinkError::UnresolvedDependency { location, .. }
            | LinkError::InvalidPath { location, .. } => location,
            LinkError::DataModel(err) => err.location(),
        }
    }
}

pub type LinkResult<T> = std::result::Result<T, LinkError>;
