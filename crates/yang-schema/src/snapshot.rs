//! Self-contained copies of one module's subtree.
//!
//! A snapshot renumbers every node and leaf of a module from zero so it can
//! be stored on its own and later appended to another compilation's arena.
//! References that leave the module (an imported typedef, an augment from a
//! different module) cannot be renumbered; they are dropped to `None` while
//! the owning entity keeps its status and the identifier as written.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::graph::SchemaGraph;
use crate::holder::{SchemaContext, SchemaRef};
use crate::ids::{LeafId, NodeId};
use crate::leaf::Leaf;
use crate::node::{NodeKind, SchemaNode};
use crate::reference::NodeReference;
use crate::types::{TypeBody, YangType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub name: String,
    pub revision: Option<String>,
    /// `nodes[0]` is the module or submodule itself
    pub nodes: Vec<SchemaNode>,
    pub leaves: Vec<Leaf>,
}

#[derive(Default)]
struct IdMap {
    nodes: FxHashMap<NodeId, NodeId>,
    leaves: FxHashMap<LeafId, LeafId>,
}

impl IdMap {
    fn node(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).copied()
    }

    fn leaf(&self, id: LeafId) -> Option<LeafId> {
        self.leaves.get(&id).copied()
    }

    fn schema(&self, schema: SchemaRef) -> Option<SchemaRef> {
        match schema {
            SchemaRef::Node(id) => self.node(id).map(SchemaRef::Node),
            SchemaRef::Leaf(id) => self.leaf(id).map(SchemaRef::Leaf),
        }
    }
}

trait Remap {
    fn remap(&mut self, ids: &IdMap);
}

impl Remap for NodeReference {
    fn remap(&mut self, ids: &IdMap) {
        self.resolved = self.resolved.and_then(|id| ids.node(id));
    }
}

impl Remap for YangType {
    fn remap(&mut self, ids: &IdMap) {
        self.scope = self.scope.and_then(|id| ids.node(id));
        self.typedef = self.typedef.and_then(|id| ids.node(id));
        match &mut self.body {
            TypeBody::Enumeration { owner, .. } => *owner = owner.and_then(|id| ids.node(id)),
            TypeBody::Union { members, owner } => {
                *owner = owner.and_then(|id| ids.node(id));
                for member in members {
                    member.remap(ids);
                }
            }
            TypeBody::Leafref { target, .. } => *target = target.and_then(|id| ids.leaf(id)),
            TypeBody::Identityref { base: Some(base) } => base.remap(ids),
            _ => {}
        }
    }
}

impl Remap for Leaf {
    fn remap(&mut self, ids: &IdMap) {
        self.ty.remap(ids);
        if let Some(holder) = ids.node(self.contained_in) {
            self.contained_in = holder;
        }
    }
}

impl Remap for NodeKind {
    fn remap(&mut self, ids: &IdMap) {
        match self {
            NodeKind::Module(info) | NodeKind::Submodule(info) => {
                for link in info
                    .imports
                    .iter_mut()
                    .chain(info.includes.iter_mut())
                    .chain(info.belongs_to.iter_mut())
                {
                    link.resolved = link.resolved.and_then(|id| ids.node(id));
                }
            }
            NodeKind::Typedef(info) => info.ty.remap(ids),
            NodeKind::Uses(info) => {
                info.grouping.remap(ids);
                info.resolved_nodes = info.resolved_nodes.iter().filter_map(|id| ids.node(*id)).collect();
                info.resolved_leaves = info.resolved_leaves.iter().filter_map(|id| ids.leaf(*id)).collect();
                info.resolved_leaf_lists = info
                    .resolved_leaf_lists
                    .iter()
                    .filter_map(|id| ids.leaf(*id))
                    .collect();
                info.entities_to_resolve.retain_mut(|entity| {
                    match (ids.leaf(entity.leaf), ids.node(entity.holder)) {
                        (Some(leaf), Some(holder)) => {
                            entity.leaf = leaf;
                            entity.holder = holder;
                            true
                        }
                        _ => false,
                    }
                });
            }
            NodeKind::Augment(info) => info.target = info.target.and_then(|id| ids.node(id)),
            NodeKind::Identity(info) => {
                if let Some(base) = &mut info.base {
                    base.remap(ids);
                }
            }
            NodeKind::Container(_)
            | NodeKind::List(_)
            | NodeKind::Choice(_)
            | NodeKind::Case
            | NodeKind::Grouping(_)
            | NodeKind::Rpc
            | NodeKind::Input
            | NodeKind::Output
            | NodeKind::Notification => {}
        }
    }
}

impl Remap for SchemaNode {
    fn remap(&mut self, ids: &IdMap) {
        self.parent = self.parent.and_then(|id| ids.node(id));
        self.first_child = self.first_child.and_then(|id| ids.node(id));
        self.last_child = self.last_child.and_then(|id| ids.node(id));
        self.next_sibling = self.next_sibling.and_then(|id| ids.node(id));
        self.leaves = self.leaves.iter().filter_map(|id| ids.leaf(*id)).collect();
        self.leaf_lists = self.leaf_lists.iter().filter_map(|id| ids.leaf(*id)).collect();
        self.augmented_by = self.augmented_by.iter().filter_map(|id| ids.node(*id)).collect();

        let entries = std::mem::take(&mut self.child_schemas.map);
        self.child_schemas.map = entries
            .into_iter()
            .filter_map(|(key, context)| {
                let schema = ids.schema(context.schema)?;
                let parent = ids.node(context.parent)?;
                Some((key, SchemaContext { schema, parent }))
            })
            .collect();
        let defaults = std::mem::take(&mut self.child_schemas.defaults);
        self.child_schemas.defaults = defaults
            .into_iter()
            .filter_map(|(key, schema)| Some((key, ids.schema(schema)?)))
            .collect();

        self.kind.remap(ids);
    }
}

impl SchemaGraph {
    /// Copies the subtree of `root` into a standalone snapshot.
    pub fn extract_module(&self, root: NodeId) -> ModuleSnapshot {
        let order: Vec<NodeId> = std::iter::once(root).chain(self.walk(root)).collect();

        let mut ids = IdMap::default();
        for (global, local) in order.iter().zip((0..).filter_map(NodeId::from_index)) {
            ids.nodes.insert(*global, local);
        }
        let leaf_order: Vec<LeafId> = order.iter().flat_map(|id| self.all_leaves(*id)).collect();
        for (global, local) in leaf_order.iter().zip((0..).filter_map(LeafId::from_index)) {
            ids.leaves.insert(*global, local);
        }

        let nodes = order
            .iter()
            .map(|id| {
                let mut node = self.node(*id).clone();
                node.remap(&ids);
                node
            })
            .collect();
        let leaves = leaf_order
            .iter()
            .map(|id| {
                let mut leaf = self.leaf(*id).clone();
                leaf.remap(&ids);
                leaf
            })
            .collect();

        let root_node = self.node(root);
        ModuleSnapshot {
            name: root_node.name.clone(),
            revision: root_node.module_info().and_then(|info| info.revision.clone()),
            nodes,
            leaves,
        }
    }

    /// Appends a snapshot to this graph as a read-only root and returns it.
    ///
    /// The imported module is marked as not to be translated; it only serves
    /// as a lookup target for the modules being compiled.
    pub fn import_module(&mut self, snapshot: ModuleSnapshot) -> Option<NodeId> {
        let node_base = self.nodes.len();
        let leaf_base = self.leaves.len();

        let mut ids = IdMap::default();
        for index in 0..snapshot.nodes.len() {
            if let (Some(local), Some(global)) = (
                NodeId::from_index(index),
                NodeId::from_index(node_base + index),
            ) {
                ids.nodes.insert(local, global);
            }
        }
        for index in 0..snapshot.leaves.len() {
            if let (Some(local), Some(global)) = (
                LeafId::from_index(index),
                LeafId::from_index(leaf_base + index),
            ) {
                ids.leaves.insert(local, global);
            }
        }

        let root = NodeId::from_index(node_base).filter(|_| !snapshot.nodes.is_empty())?;
        for mut node in snapshot.nodes {
            node.remap(&ids);
            self.nodes.push(node);
        }
        for mut leaf in snapshot.leaves {
            leaf.remap(&ids);
            self.leaves.push(leaf);
        }

        if let Some(info) = self.node_mut(root).module_info_mut() {
            info.to_translate = false;
        }
        self.add_root(root);
        log::debug!(
            "imported snapshot of {} as read-only root",
            self.node(root).name
        );
        Some(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::LeafKind;
    use crate::name::PrefixedName;
    use crate::node::{ContainerInfo, ModuleInfo, TypedefInfo};
    use yang_source::LocationInfo;

    fn module_with_typedef(graph: &mut SchemaGraph, name: &str) -> (NodeId, NodeId, LeafId) {
        let module = graph.add_node(SchemaNode::new(
            name,
            NodeKind::Module(ModuleInfo {
                revision: Some("2024-01-01".into()),
                to_translate: true,
                ..ModuleInfo::default()
            }),
            LocationInfo::default(),
        ));
        graph.add_root(module);
        let typedef = graph.add_node(SchemaNode::new(
            "counter",
            NodeKind::Typedef(TypedefInfo {
                ty: YangType::new(PrefixedName::local("uint32"), Some(module), LocationInfo::default()),
                default: None,
                units: None,
            }),
            LocationInfo::default(),
        ));
        graph.append_child(module, typedef);
        let container = graph.add_node(SchemaNode::new(
            "stats",
            NodeKind::Container(ContainerInfo::default()),
            LocationInfo::default(),
        ));
        graph.append_child(module, container);
        let mut ty = YangType::new(PrefixedName::local("counter"), Some(container), LocationInfo::default());
        ty.typedef = Some(typedef);
        let leaf = graph.add_leaf(Leaf::new("in", LeafKind::Leaf, ty, container, LocationInfo::default()));
        (module, container, leaf)
    }

    #[test]
    fn test_extract_then_import_preserves_structure() {
        let mut source = SchemaGraph::new();
        // pad the arena so ids differ between graphs
        module_with_typedef(&mut source, "first");
        let (module, _, _) = module_with_typedef(&mut source, "second");

        let snapshot = source.extract_module(module);
        assert_eq!(snapshot.name, "second");
        assert_eq!(snapshot.revision.as_deref(), Some("2024-01-01"));
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.leaves.len(), 1);

        let mut target = SchemaGraph::new();
        module_with_typedef(&mut target, "local");
        let root = target.import_module(snapshot).unwrap();

        assert_eq!(target.node(root).name, "second");
        assert!(!target.node(root).module_info().unwrap().to_translate);
        let children: Vec<_> = target.children(root).map(|c| target.node(c).name.clone()).collect();
        assert_eq!(children, vec!["counter", "stats"]);

        let stats = target.children(root).nth(1).unwrap();
        let leaf = target.leaf(target.node(stats).leaves[0]);
        assert_eq!(leaf.contained_in, stats);
        let typedef = target.children(root).next().unwrap();
        assert_eq!(leaf.ty.typedef, Some(typedef));
        assert_eq!(leaf.ty.scope, Some(stats));
    }

    #[test]
    fn test_references_leaving_the_module_are_dropped() {
        let mut graph = SchemaGraph::new();
        let (_, _, other_leaf) = module_with_typedef(&mut graph, "other");
        let foreign_typedef = graph.leaf(other_leaf).ty.typedef;
        let (module, _, leaf) = module_with_typedef(&mut graph, "mine");
        graph.leaf_mut(leaf).ty.typedef = foreign_typedef;

        let snapshot = graph.extract_module(module);
        assert_eq!(snapshot.leaves[0].ty.typedef, None);
        assert_eq!(snapshot.leaves[0].ty.name, PrefixedName::local("counter"));
    }

    #[test]
    fn test_empty_snapshot_is_not_imported() {
        let mut graph = SchemaGraph::new();
        let snapshot = ModuleSnapshot {
            name: "nothing".into(),
            revision: None,
            nodes: vec![],
            leaves: vec![],
        };
        assert!(graph.import_module(snapshot).is_none());
        assert!(graph.roots().is_empty());
    }
}
