use serde::{Deserialize, Serialize};
use yang_source::LocationInfo;

use crate::ids::NodeId;
use crate::name::PrefixedName;

/// A by-name pointer to another schema node (grouping, typedef, identity).
///
/// The status of the reference lives on the owning entity; this only records
/// what was written and what it was bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReference {
    pub target: PrefixedName,
    pub resolved: Option<NodeId>,
    pub location: LocationInfo,
}

impl NodeReference {
    pub fn new(target: PrefixedName, location: LocationInfo) -> Self {
        Self {
            target,
            resolved: None,
            location,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.resolved.is_some()
    }
}
