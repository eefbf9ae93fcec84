use serde::{Deserialize, Serialize};
use yang_source::LocationInfo;

use crate::ids::NodeId;
use crate::kind::{ConstructType, SchemaNodeType};
use crate::types::YangType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafKind {
    Leaf,
    LeafList,
}

/// A `leaf` or `leaf-list` statement.
///
/// Leaves are not tree nodes: each holder keeps ordered lists of the leaves
/// and leaf-lists it contains, and every leaf points back at its holder
/// through `contained_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub name: String,
    pub kind: LeafKind,
    pub ty: YangType,
    pub default: Option<String>,
    pub mandatory: bool,
    pub config: Option<bool>,
    pub units: Option<String>,
    /// Only meaningful for leaf-lists
    pub min_elements: Option<u32>,
    /// Only meaningful for leaf-lists
    pub max_elements: Option<u32>,
    pub namespace: Option<String>,
    pub contained_in: NodeId,
    pub location: LocationInfo,
}

impl Leaf {
    pub fn new(
        name: impl Into<String>,
        kind: LeafKind,
        ty: YangType,
        contained_in: NodeId,
        location: LocationInfo,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            default: None,
            mandatory: false,
            config: None,
            units: None,
            min_elements: None,
            max_elements: None,
            namespace: None,
            contained_in,
            location,
        }
    }

    /// A fresh copy of this leaf contained in `holder`. Nothing is shared
    /// with the original.
    pub fn duplicate_into(&self, holder: NodeId) -> Leaf {
        let mut copy = self.clone();
        copy.contained_in = holder;
        copy
    }

    pub fn construct(&self) -> ConstructType {
        match self.kind {
            LeafKind::Leaf => ConstructType::Leaf,
            LeafKind::LeafList => ConstructType::LeafList,
        }
    }

    pub fn schema_node_type(&self) -> SchemaNodeType {
        match self.kind {
            LeafKind::Leaf => SchemaNodeType::SingleInstanceLeafNode,
            LeafKind::LeafList => SchemaNodeType::MultiInstanceLeafNode,
        }
    }

    /// A leaf-list with `min-elements` above zero is mandatory as well.
    pub fn is_mandatory(&self) -> bool {
        self.mandatory || self.min_elements.is_some_and(|min| min > 0)
    }
}
