use std::fmt;

use serde::{Deserialize, Serialize};

/// How far a reference site has been linked.
///
/// The ordering is meaningful: a site only ever moves forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ResolvableStatus {
    /// Nothing has been bound yet.
    #[default]
    Unresolved,
    /// Bound, but something the target depends on is still pending.
    IntraFileResolved,
    /// Bound, and everything it depends on is bound too.
    Resolved,
}

impl ResolvableStatus {
    /// Moves the status forward to `to`. Returns `true` when it changed.
    ///
    /// Requests that would move backwards are ignored.
    pub fn advance(&mut self, to: ResolvableStatus) -> bool {
        if to > *self {
            *self = to;
            true
        } else {
            false
        }
    }

    pub fn is_resolved(self) -> bool {
        self == ResolvableStatus::Resolved
    }
}

impl fmt::Display for ResolvableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ResolvableStatus::Unresolved => "UNRESOLVED",
            ResolvableStatus::IntraFileResolved => "INTRA_FILE_RESOLVED",
            ResolvableStatus::Resolved => "RESOLVED",
        };
        f.write_str(text)
    }
}
