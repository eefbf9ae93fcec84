use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DataModelError;
use crate::ids::{LeafId, NodeId};
use crate::kind::NodeType;
use crate::name::SchemaNodeIdentifier;
use crate::node::SchemaNode;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A schema child: either a tree node or a leaf/leaf-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaRef {
    Node(NodeId),
    Leaf(LeafId),
}

/// Value of a child schema map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaContext {
    pub schema: SchemaRef,
    /// Node the child is declared in (may be a transparent choice/case)
    pub parent: NodeId,
}

/// Aggregates a holder keeps about its schema children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSchemas {
    pub map: FxIndexMap<SchemaNodeIdentifier, SchemaContext>,
    pub mandatory_count: u32,
    pub defaults: FxIndexMap<SchemaNodeIdentifier, SchemaRef>,
}

impl ChildSchemas {
    pub fn get(&self, id: &SchemaNodeIdentifier) -> Option<&SchemaContext> {
        self.map.get(id)
    }
}

/// Hooks a holder exposes to schema finalization.
///
/// Non-data holders (grouping, uses, typedef, identity) accept every call as
/// a no-op. An RPC records child schema entries but ignores mandatory and
/// default accumulation.
pub trait SchemaHolder {
    fn add_to_child_schema_map(
        &mut self,
        id: SchemaNodeIdentifier,
        context: SchemaContext,
    ) -> Result<(), DataModelError>;

    fn increment_mandatory_child_count(&mut self);

    fn add_to_default_child_map(&mut self, id: SchemaNodeIdentifier, schema: SchemaRef);
}

impl SchemaHolder for SchemaNode {
    fn add_to_child_schema_map(
        &mut self,
        id: SchemaNodeIdentifier,
        context: SchemaContext,
    ) -> Result<(), DataModelError> {
        if !keeps_schema_map(self.node_type()) {
            return Ok(());
        }
        if self.child_schemas.map.contains_key(&id) {
            return Err(DataModelError::DuplicateSchemaEntry {
                holder: self.name.clone(),
                entry: id.to_string(),
                location: self.location.clone(),
                span: self.location.span(),
            });
        }
        self.child_schemas.map.insert(id, context);
        Ok(())
    }

    fn increment_mandatory_child_count(&mut self) {
        if !accumulates(self.node_type()) {
            return;
        }
        self.child_schemas.mandatory_count += 1;
    }

    fn add_to_default_child_map(&mut self, id: SchemaNodeIdentifier, schema: SchemaRef) {
        if !accumulates(self.node_type()) {
            return;
        }
        self.child_schemas.defaults.insert(id, schema);
    }
}

fn keeps_schema_map(node_type: NodeType) -> bool {
    !matches!(
        node_type,
        NodeType::Grouping | NodeType::Uses | NodeType::Typedef | NodeType::Identity
    )
}

fn accumulates(node_type: NodeType) -> bool {
    !matches!(
        node_type,
        NodeType::Rpc | NodeType::Grouping | NodeType::Uses | NodeType::Typedef | NodeType::Identity
    )
}
