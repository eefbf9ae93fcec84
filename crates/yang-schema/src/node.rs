use serde::{Deserialize, Serialize};
use yang_source::LocationInfo;

use crate::holder::ChildSchemas;
use crate::ids::{LeafId, NodeId};
use crate::kind::{ConstructType, NodeType, SchemaNodeType};
use crate::reference::NodeReference;
use crate::status::ResolvableStatus;
use crate::types::YangType;

/// A node of the schema tree.
///
/// Nodes live in the `SchemaGraph` arena and are linked through ids: one
/// parent, an ordered singly linked sibling chain, and first/last child for
/// O(1) appends. Leaves and leaf-lists are kept in separate ordered lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub name: String,
    pub namespace: Option<String>,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub leaves: Vec<LeafId>,
    pub leaf_lists: Vec<LeafId>,
    pub child_schemas: ChildSchemas,
    /// Augments whose target is this node
    pub augmented_by: Vec<NodeId>,
    pub location: LocationInfo,
}

impl SchemaNode {
    pub fn new(name: impl Into<String>, kind: NodeKind, location: LocationInfo) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            leaves: vec![],
            leaf_lists: vec![],
            child_schemas: ChildSchemas::default(),
            augmented_by: vec![],
            location,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn construct(&self) -> ConstructType {
        self.node_type().construct()
    }

    pub fn schema_node_type(&self) -> SchemaNodeType {
        self.node_type().schema_node_type()
    }

    /// A copy of this node's own payload with no links, leaves or schema
    /// aggregates. Used when a grouping's subtree is replicated.
    pub fn duplicate_detached(&self) -> SchemaNode {
        SchemaNode {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            kind: self.kind.clone(),
            location: self.location.clone(),
            ..SchemaNode::new(String::new(), NodeKind::Case, LocationInfo::default())
        }
    }

    pub fn module_info(&self) -> Option<&ModuleInfo> {
        match &self.kind {
            NodeKind::Module(info) | NodeKind::Submodule(info) => Some(info),
            _ => None,
        }
    }

    pub fn module_info_mut(&mut self) -> Option<&mut ModuleInfo> {
        match &mut self.kind {
            NodeKind::Module(info) | NodeKind::Submodule(info) => Some(info),
            _ => None,
        }
    }

    pub fn uses_info(&self) -> Option<&UsesInfo> {
        match &self.kind {
            NodeKind::Uses(info) => Some(info),
            _ => None,
        }
    }

    pub fn uses_info_mut(&mut self) -> Option<&mut UsesInfo> {
        match &mut self.kind {
            NodeKind::Uses(info) => Some(info),
            _ => None,
        }
    }

    pub fn typedef_info(&self) -> Option<&TypedefInfo> {
        match &self.kind {
            NodeKind::Typedef(info) => Some(info),
            _ => None,
        }
    }

    pub fn typedef_info_mut(&mut self) -> Option<&mut TypedefInfo> {
        match &mut self.kind {
            NodeKind::Typedef(info) => Some(info),
            _ => None,
        }
    }
}

/// Per-kind payload of a `SchemaNode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Module(ModuleInfo),
    Submodule(ModuleInfo),
    Container(ContainerInfo),
    List(ListInfo),
    Choice(ChoiceInfo),
    Case,
    Grouping(GroupingInfo),
    Typedef(TypedefInfo),
    Uses(UsesInfo),
    Augment(AugmentInfo),
    Identity(IdentityInfo),
    Rpc,
    Input,
    Output,
    Notification,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Module(_) => NodeType::Module,
            NodeKind::Submodule(_) => NodeType::Submodule,
            NodeKind::Container(_) => NodeType::Container,
            NodeKind::List(_) => NodeType::List,
            NodeKind::Choice(_) => NodeType::Choice,
            NodeKind::Case => NodeType::Case,
            NodeKind::Grouping(_) => NodeType::Grouping,
            NodeKind::Typedef(_) => NodeType::Typedef,
            NodeKind::Uses(_) => NodeType::Uses,
            NodeKind::Augment(_) => NodeType::Augment,
            NodeKind::Identity(_) => NodeType::Identity,
            NodeKind::Rpc => NodeType::Rpc,
            NodeKind::Input => NodeType::Input,
            NodeKind::Output => NodeType::Output,
            NodeKind::Notification => NodeType::Notification,
        }
    }
}

/// Header of a module or submodule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub yang_version: Option<String>,
    /// Most recent `revision` date
    pub revision: Option<String>,
    pub imports: Vec<ModuleLink>,
    pub includes: Vec<ModuleLink>,
    pub belongs_to: Option<ModuleLink>,
    /// False for modules loaded from a dependency snapshot
    pub to_translate: bool,
}

impl ModuleInfo {
    pub fn import_for_prefix(&self, prefix: &str) -> Option<&ModuleLink> {
        self.imports
            .iter()
            .find(|import| import.prefix.as_deref() == Some(prefix))
    }
}

/// An `import`, `include` or `belongs-to` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLink {
    pub name: String,
    pub prefix: Option<String>,
    pub revision: Option<String>,
    pub resolved: Option<NodeId>,
    pub location: LocationInfo,
}

impl ModuleLink {
    pub fn new(name: impl Into<String>, location: LocationInfo) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            revision: None,
            resolved: None,
            location,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub presence: Option<String>,
    pub config: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    pub keys: Vec<String>,
    pub min_elements: Option<u32>,
    pub max_elements: Option<u32>,
    pub config: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceInfo {
    pub default_case: Option<String>,
    pub mandatory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingInfo {
    /// How many groupings enclose this one (0 for a top-level grouping)
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefInfo {
    pub ty: YangType,
    pub default: Option<String>,
    pub units: Option<String>,
}

/// A `uses` statement and the bookkeeping of its expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsesInfo {
    pub grouping: NodeReference,
    pub status: ResolvableStatus,
    /// How many groupings enclose this uses (0 when it sits in the data tree)
    pub current_grouping_depth: u32,
    /// Child nodes replicated into the use-site holder
    pub resolved_nodes: Vec<NodeId>,
    /// Leaves replicated into the use-site holder
    pub resolved_leaves: Vec<LeafId>,
    /// Leaf-lists replicated into the use-site holder
    pub resolved_leaf_lists: Vec<LeafId>,
    /// Post-clone work left for the linker
    pub entities_to_resolve: Vec<EntityToResolve>,
}

impl UsesInfo {
    pub fn new(grouping: NodeReference, current_grouping_depth: u32) -> Self {
        Self {
            grouping,
            status: ResolvableStatus::Unresolved,
            current_grouping_depth,
            resolved_nodes: vec![],
            resolved_leaves: vec![],
            resolved_leaf_lists: vec![],
            entities_to_resolve: vec![],
        }
    }
}

/// Work recorded by grouping expansion for a cloned leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityToResolve {
    pub leaf: LeafId,
    pub holder: NodeId,
    pub kind: DeferredKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeferredKind {
    /// Generated enumerations/unions must be re-pointed at the holder
    OwnerFixup,
    /// The cloned type still carries unbound references
    TypeReferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentInfo {
    pub target_path: String,
    pub target: Option<NodeId>,
    pub status: ResolvableStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
    pub base: Option<NodeReference>,
    pub status: ResolvableStatus,
}

impl IdentityInfo {
    pub fn new(base: Option<NodeReference>) -> Self {
        let status = if base.is_some() {
            ResolvableStatus::Unresolved
        } else {
            ResolvableStatus::Resolved
        };
        Self { base, status }
    }
}
