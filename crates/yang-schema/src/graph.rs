use serde::{Deserialize, Serialize};

use crate::holder::SchemaRef;
use crate::ids::{LeafId, NodeId};
use crate::kind::NodeType;
use crate::leaf::{Leaf, LeafKind};
use crate::node::SchemaNode;

/// Arena holding every schema node and leaf of one compilation.
///
/// The graph is owned by a single compilation and only ever grows: grouping
/// expansion appends clones, nothing is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaGraph {
    pub(crate) nodes: Vec<SchemaNode>,
    pub(crate) leaves: Vec<Leaf>,
    pub(crate) roots: Vec<NodeId>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len()).expect("schema arena exceeds u32 ids");
        self.nodes.push(node);
        id
    }

    /// Registers a module or submodule as the root of a file.
    pub fn add_root(&mut self, root: NodeId) {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.to_index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SchemaNode {
        &mut self.nodes[id.to_index()]
    }

    pub fn leaf(&self, id: LeafId) -> &Leaf {
        &self.leaves[id.to_index()]
    }

    pub fn leaf_mut(&mut self, id: LeafId) -> &mut Leaf {
        &mut self.leaves[id.to_index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter_map(NodeId::from_index)
    }

    /// Links `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let previous_last = self.node(parent).last_child;
        {
            let child_node = self.node_mut(child);
            child_node.parent = Some(parent);
            child_node.next_sibling = None;
        }
        match previous_last {
            Some(last) => self.node_mut(last).next_sibling = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        self.node_mut(parent).last_child = Some(child);
    }

    /// Adds a leaf to the arena and to its holder's leaf or leaf-list list.
    pub fn add_leaf(&mut self, leaf: Leaf) -> LeafId {
        let id = LeafId::from_index(self.leaves.len()).expect("schema arena exceeds u32 ids");
        let holder = leaf.contained_in;
        let kind = leaf.kind;
        self.leaves.push(leaf);
        let holder = self.node_mut(holder);
        match kind {
            LeafKind::Leaf => holder.leaves.push(id),
            LeafKind::LeafList => holder.leaf_lists.push(id),
        }
        id
    }

    /// Children of `id` in declaration order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            graph: self,
            next: self.node(id).first_child,
        }
    }

    /// Leaves followed by leaf-lists of `id`.
    pub fn all_leaves(&self, id: NodeId) -> impl Iterator<Item = LeafId> + '_ {
        let node = self.node(id);
        node.leaves.iter().chain(node.leaf_lists.iter()).copied()
    }

    pub fn leaves_of(&self, id: NodeId) -> &[LeafId] {
        &self.node(id).leaves
    }

    pub fn leaf_lists_of(&self, id: NodeId) -> &[LeafId] {
        &self.node(id).leaf_lists
    }

    /// Strict ancestors of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.node(id).parent,
        }
    }

    /// The module or submodule containing `id`.
    pub fn module_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Whether `id` sits inside a grouping (is a template, not data).
    pub fn is_within_grouping(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .any(|n| self.node(n).node_type() == NodeType::Grouping)
    }

    /// Number of groupings enclosing `id`, counting `id` itself.
    pub fn grouping_depth(&self, id: NodeId) -> u32 {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|n| self.node(*n).node_type() == NodeType::Grouping)
            .count() as u32
    }

    /// The holder whose child schema map receives `id`'s entry: the nearest
    /// ancestor that is not a transparent choice, case or uses.
    pub fn schema_parent(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|n| {
            !matches!(
                self.node(*n).node_type(),
                NodeType::Choice | NodeType::Case | NodeType::Uses
            )
        })
    }

    /// Data child (node or leaf) of `holder` named `name`, looking through
    /// choices and cases.
    pub fn find_data_child(&self, holder: NodeId, name: &str) -> Option<SchemaRef> {
        let mut pending = vec![holder];
        while let Some(current) = pending.pop() {
            if let Some(leaf) = self
                .all_leaves(current)
                .find(|leaf| self.leaf(*leaf).name == name)
            {
                return Some(SchemaRef::Leaf(leaf));
            }
            for child in self.children(current) {
                let node = self.node(child);
                match node.node_type() {
                    NodeType::Choice | NodeType::Case => pending.push(child),
                    t if t.schema_node_type().is_data() && node.name == name => {
                        return Some(SchemaRef::Node(child))
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Iterative pre-order walk over the descendants of `root`.
    pub fn walk(&self, root: NodeId) -> SubtreeWalk<'_> {
        SubtreeWalk {
            graph: self,
            root,
            current: Some(root),
            direction: TraversalDirection::Child,
        }
    }

    /// Root module or submodule named `name`, preferring the given revision.
    pub fn find_root(&self, name: &str, revision: Option<&str>) -> Option<NodeId> {
        let mut candidates = self
            .roots
            .iter()
            .copied()
            .filter(|root| self.node(*root).name == name);
        match revision {
            Some(revision) => candidates.find(|root| {
                self.node(*root)
                    .module_info()
                    .and_then(|info| info.revision.as_deref())
                    == Some(revision)
            }),
            None => candidates.max_by(|a, b| {
                let rev = |id: &NodeId| {
                    self.node(*id)
                        .module_info()
                        .and_then(|info| info.revision.clone())
                };
                rev(a).cmp(&rev(b))
            }),
        }
    }
}

pub struct Children<'g> {
    graph: &'g SchemaGraph,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.node(current).next_sibling;
        Some(current)
    }
}

pub struct Ancestors<'g> {
    graph: &'g SchemaGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.node(current).parent;
        Some(current)
    }
}

/// Where the walk moves next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDirection {
    Child,
    Sibling,
    Parent,
}

/// Pre-order traversal bounded to a subtree, without recursion.
///
/// The walk descends into children first, then moves to siblings, then
/// backtracks through parents; it never leaves the subtree of `root`.
pub struct SubtreeWalk<'g> {
    graph: &'g SchemaGraph,
    root: NodeId,
    current: Option<NodeId>,
    direction: TraversalDirection,
}

impl Iterator for SubtreeWalk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let current = self.current?;
            let node = self.graph.node(current);
            match self.direction {
                TraversalDirection::Child => match node.first_child {
                    Some(child) => {
                        self.current = Some(child);
                        return Some(child);
                    }
                    None => self.direction = TraversalDirection::Sibling,
                },
                TraversalDirection::Sibling => {
                    if current == self.root {
                        self.current = None;
                        return None;
                    }
                    match node.next_sibling {
                        Some(sibling) => {
                            self.current = Some(sibling);
                            self.direction = TraversalDirection::Child;
                            return Some(sibling);
                        }
                        None => self.direction = TraversalDirection::Parent,
                    }
                }
                TraversalDirection::Parent => match node.parent {
                    Some(parent) if parent != self.root => {
                        self.current = Some(parent);
                        self.direction = TraversalDirection::Sibling;
                    }
                    _ => {
                        self.current = None;
                        return None;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ContainerInfo, GroupingInfo, ModuleInfo, NodeKind};
    use yang_source::LocationInfo;

    fn node(graph: &mut SchemaGraph, parent: Option<NodeId>, name: &str, kind: NodeKind) -> NodeId {
        let id = graph.add_node(SchemaNode::new(name, kind, LocationInfo::default()));
        if let Some(parent) = parent {
            graph.append_child(parent, id);
        }
        id
    }

    fn container() -> NodeKind {
        NodeKind::Container(ContainerInfo::default())
    }

    #[test]
    fn test_children_keep_declaration_order() {
        let mut graph = SchemaGraph::new();
        let m = node(&mut graph, None, "m", NodeKind::Module(ModuleInfo::default()));
        let a = node(&mut graph, Some(m), "a", container());
        let b = node(&mut graph, Some(m), "b", container());
        let c = node(&mut graph, Some(m), "c", container());
        assert_eq!(graph.children(m).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(graph.node(m).last_child, Some(c));
        assert_eq!(graph.module_of(c), m);
    }

    #[test]
    fn test_walk_stays_inside_subtree() {
        let mut graph = SchemaGraph::new();
        let m = node(&mut graph, None, "m", NodeKind::Module(ModuleInfo::default()));
        let g = node(&mut graph, Some(m), "g", NodeKind::Grouping(GroupingInfo::default()));
        let a = node(&mut graph, Some(g), "a", container());
        let a1 = node(&mut graph, Some(a), "a1", container());
        let a2 = node(&mut graph, Some(a), "a2", container());
        let b = node(&mut graph, Some(g), "b", container());
        let _outside = node(&mut graph, Some(m), "outside", container());

        assert_eq!(graph.walk(g).collect::<Vec<_>>(), vec![a, a1, a2, b]);
        assert_eq!(graph.walk(a).collect::<Vec<_>>(), vec![a1, a2]);
        assert_eq!(graph.walk(a2).count(), 0);
    }

    #[test]
    fn test_grouping_membership_and_depth() {
        let mut graph = SchemaGraph::new();
        let m = node(&mut graph, None, "m", NodeKind::Module(ModuleInfo::default()));
        let outer = node(&mut graph, Some(m), "outer", NodeKind::Grouping(GroupingInfo::default()));
        let inner = node(&mut graph, Some(outer), "inner", NodeKind::Grouping(GroupingInfo { depth: 1 }));
        let c = node(&mut graph, Some(inner), "c", container());
        let data = node(&mut graph, Some(m), "data", container());

        assert!(graph.is_within_grouping(c));
        assert!(!graph.is_within_grouping(data));
        assert_eq!(graph.grouping_depth(c), 2);
        assert_eq!(graph.grouping_depth(outer), 1);
    }

    #[test]
    fn test_find_root_prefers_latest_revision() {
        let mut graph = SchemaGraph::new();
        let old = node(&mut graph, None, "m", NodeKind::Module(ModuleInfo {
            revision: Some("2020-01-01".into()),
            ..ModuleInfo::default()
        }));
        let new = node(&mut graph, None, "m", NodeKind::Module(ModuleInfo {
            revision: Some("2024-05-01".into()),
            ..ModuleInfo::default()
        }));
        graph.add_root(old);
        graph.add_root(new);
        assert_eq!(graph.find_root("m", None), Some(new));
        assert_eq!(graph.find_root("m", Some("2020-01-01")), Some(old));
        assert_eq!(graph.find_root("x", None), None);
    }
}
