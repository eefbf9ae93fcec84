//! Schema node graph for the yangc schema compiler.
//!
//! Every module, submodule, container, list, grouping, uses, typedef,
//! identity and augment of a compilation lives in one `SchemaGraph` arena
//! and is addressed by a `NodeId`. Leaves and leaf-lists are separate arena
//! entities (`LeafId`) owned by the node that holds them.
//!
//! Behaviour that varies by node kind is expressed through capability traits
//! rather than per-kind types:
//! - `SchemaHolder`: child schema map, mandatory count and default hooks
//! - `CollisionDetector`: duplicate identifier and self-collision checks
//!
//! Linking state is tracked per reference site with `ResolvableStatus`,
//! which only ever moves forward.

mod collision;
mod error;
mod graph;
mod holder;
mod ids;
mod kind;
mod leaf;
mod name;
mod node;
mod reference;
mod snapshot;
mod status;
mod types;

pub use collision::CollisionDetector;
pub use error::DataModelError;
pub use graph::{Ancestors, Children, SchemaGraph, SubtreeWalk, TraversalDirection};
pub use holder::{ChildSchemas, FxIndexMap, SchemaContext, SchemaHolder, SchemaRef};
pub use ids::{LeafId, NodeId};
pub use kind::{CollisionClass, ConstructType, NodeType, SchemaNodeType};
pub use leaf::{Leaf, LeafKind};
pub use name::{PrefixedName, SchemaNodeIdentifier};
pub use node::{
    AugmentInfo, ChoiceInfo, ContainerInfo, DeferredKind, EntityToResolve, GroupingInfo,
    IdentityInfo, ListInfo, ModuleInfo, ModuleLink, NodeKind, SchemaNode, TypedefInfo, UsesInfo,
};
pub use reference::NodeReference;
pub use snapshot::ModuleSnapshot;
pub use status::ResolvableStatus;
pub use types::{DataType, EnumValue, TypeBody, YangType};
