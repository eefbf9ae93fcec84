use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag of a schema node's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Module,
    Submodule,
    Container,
    List,
    Choice,
    Case,
    Grouping,
    Typedef,
    Uses,
    Augment,
    Identity,
    Rpc,
    Input,
    Output,
    Notification,
}

impl NodeType {
    pub fn construct(self) -> ConstructType {
        match self {
            NodeType::Module => ConstructType::Module,
            NodeType::Submodule => ConstructType::Submodule,
            NodeType::Container => ConstructType::Container,
            NodeType::List => ConstructType::List,
            NodeType::Choice => ConstructType::Choice,
            NodeType::Case => ConstructType::Case,
            NodeType::Grouping => ConstructType::Grouping,
            NodeType::Typedef => ConstructType::Typedef,
            NodeType::Uses => ConstructType::Uses,
            NodeType::Augment => ConstructType::Augment,
            NodeType::Identity => ConstructType::Identity,
            NodeType::Rpc => ConstructType::Rpc,
            NodeType::Input => ConstructType::Input,
            NodeType::Output => ConstructType::Output,
            NodeType::Notification => ConstructType::Notification,
        }
    }

    pub fn schema_node_type(self) -> SchemaNodeType {
        match self {
            NodeType::Module | NodeType::Submodule => SchemaNodeType::RootNode,
            NodeType::Container
            | NodeType::Rpc
            | NodeType::Input
            | NodeType::Output
            | NodeType::Notification => SchemaNodeType::SingleInstanceNode,
            NodeType::List => SchemaNodeType::MultiInstanceNode,
            NodeType::Choice => SchemaNodeType::ChoiceNode,
            NodeType::Case => SchemaNodeType::CaseNode,
            NodeType::Augment => SchemaNodeType::AugmentNode,
            NodeType::Grouping | NodeType::Typedef | NodeType::Uses | NodeType::Identity => {
                SchemaNodeType::NonDataNode
            }
        }
    }

    /// Whether `leaf` and `leaf-list` statements may appear directly inside.
    pub fn holds_leaves(self) -> bool {
        matches!(
            self,
            NodeType::Module
                | NodeType::Submodule
                | NodeType::Container
                | NodeType::List
                | NodeType::Case
                | NodeType::Grouping
                | NodeType::Augment
                | NodeType::Input
                | NodeType::Output
                | NodeType::Notification
        )
    }

    /// Whether data definitions (container, list, choice, uses, ...) may
    /// appear directly inside.
    pub fn holds_data_definitions(self) -> bool {
        self.holds_leaves()
    }

    /// Whether `typedef` and `grouping` statements may appear directly inside.
    pub fn holds_definitions(self) -> bool {
        matches!(
            self,
            NodeType::Module
                | NodeType::Submodule
                | NodeType::Container
                | NodeType::List
                | NodeType::Grouping
                | NodeType::Rpc
                | NodeType::Input
                | NodeType::Output
                | NodeType::Notification
        )
    }

    pub fn is_root(self) -> bool {
        matches!(self, NodeType::Module | NodeType::Submodule)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.construct().fmt(f)
    }
}

/// Data/non-data classification of schema nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaNodeType {
    RootNode,
    SingleInstanceNode,
    MultiInstanceNode,
    SingleInstanceLeafNode,
    MultiInstanceLeafNode,
    ChoiceNode,
    CaseNode,
    AugmentNode,
    NonDataNode,
}

impl SchemaNodeType {
    pub fn is_data(self) -> bool {
        !matches!(
            self,
            SchemaNodeType::RootNode | SchemaNodeType::AugmentNode | SchemaNodeType::NonDataNode
        )
    }
}

/// Statement classification used in diagnostics and collision rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructType {
    Module,
    Submodule,
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
    Grouping,
    Typedef,
    Uses,
    Augment,
    Identity,
    Rpc,
    Input,
    Output,
    Notification,
    Type,
    Import,
    Include,
    BelongsTo,
    Revision,
    RevisionDate,
    Namespace,
    Prefix,
    YangVersion,
    Default,
    Mandatory,
    Config,
    Key,
    Base,
    Enum,
    Value,
    Bit,
    Path,
    FractionDigits,
    Range,
    Length,
    Pattern,
    MinElements,
    MaxElements,
    Units,
    Presence,
}

/// Constructs that share an identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionClass {
    DataNode,
    Grouping,
    Typedef,
    Identity,
}

impl ConstructType {
    pub fn keyword(self) -> &'static str {
        match self {
            ConstructType::Module => "module",
            ConstructType::Submodule => "submodule",
            ConstructType::Container => "container",
            ConstructType::List => "list",
            ConstructType::Leaf => "leaf",
            ConstructType::LeafList => "leaf-list",
            ConstructType::Choice => "choice",
            ConstructType::Case => "case",
            ConstructType::Grouping => "grouping",
            ConstructType::Typedef => "typedef",
            ConstructType::Uses => "uses",
            ConstructType::Augment => "augment",
            ConstructType::Identity => "identity",
            ConstructType::Rpc => "rpc",
            ConstructType::Input => "input",
            ConstructType::Output => "output",
            ConstructType::Notification => "notification",
            ConstructType::Type => "type",
            ConstructType::Import => "import",
            ConstructType::Include => "include",
            ConstructType::BelongsTo => "belongs-to",
            ConstructType::Revision => "revision",
            ConstructType::RevisionDate => "revision-date",
            ConstructType::Namespace => "namespace",
            ConstructType::Prefix => "prefix",
            ConstructType::YangVersion => "yang-version",
            ConstructType::Default => "default",
            ConstructType::Mandatory => "mandatory",
            ConstructType::Config => "config",
            ConstructType::Key => "key",
            ConstructType::Base => "base",
            ConstructType::Enum => "enum",
            ConstructType::Value => "value",
            ConstructType::Bit => "bit",
            ConstructType::Path => "path",
            ConstructType::FractionDigits => "fraction-digits",
            ConstructType::Range => "range",
            ConstructType::Length => "length",
            ConstructType::Pattern => "pattern",
            ConstructType::MinElements => "min-elements",
            ConstructType::MaxElements => "max-elements",
            ConstructType::Units => "units",
            ConstructType::Presence => "presence",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<ConstructType> {
        ALL_CONSTRUCTS
            .iter()
            .copied()
            .find(|construct| construct.keyword() == keyword)
    }

    pub fn collision_class(self) -> Option<CollisionClass> {
        match self {
            ConstructType::Container
            | ConstructType::List
            | ConstructType::Leaf
            | ConstructType::LeafList
            | ConstructType::Choice
            | ConstructType::Case
            | ConstructType::Rpc
            | ConstructType::Input
            | ConstructType::Output
            | ConstructType::Notification => Some(CollisionClass::DataNode),
            ConstructType::Grouping => Some(CollisionClass::Grouping),
            ConstructType::Typedef => Some(CollisionClass::Typedef),
            ConstructType::Identity => Some(CollisionClass::Identity),
            _ => None,
        }
    }
}

const ALL_CONSTRUCTS: &[ConstructType] = &[
    ConstructType::Module,
    ConstructType::Submodule,
    ConstructType::Container,
    ConstructType::List,
    ConstructType::Leaf,
    ConstructType::LeafList,
    ConstructType::Choice,
    ConstructType::Case,
    ConstructType::Grouping,
    ConstructType::Typedef,
    ConstructType::Uses,
    ConstructType::Augment,
    ConstructType::Identity,
    ConstructType::Rpc,
    ConstructType::Input,
    ConstructType::Output,
    ConstructType::Notification,
    ConstructType::Type,
    ConstructType::Import,
    ConstructType::Include,
    ConstructType::BelongsTo,
    ConstructType::Revision,
    ConstructType::RevisionDate,
    ConstructType::Namespace,
    ConstructType::Prefix,
    ConstructType::YangVersion,
    ConstructType::Default,
    ConstructType::Mandatory,
    ConstructType::Config,
    ConstructType::Key,
    ConstructType::Base,
    ConstructType::Enum,
    ConstructType::Value,
    ConstructType::Bit,
    ConstructType::Path,
    ConstructType::FractionDigits,
    ConstructType::Range,
    ConstructType::Length,
    ConstructType::Pattern,
    ConstructType::MinElements,
    ConstructType::MaxElements,
    ConstructType::Units,
    ConstructType::Presence,
];

impl fmt::Display for ConstructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
