//! Reference lookup and the `Resolvable` reference sites.
//!
//! A name is looked up in three places, in order:
//!
//! 1. the lexical scope of the reference, innermost first: typedef and
//!    grouping children of the scope node and of each ancestor (identities
//!    only at module level);
//! 2. the imported module bound to the reference's prefix;
//! 3. included submodules, and from a submodule its belongs-to module and
//!    that module's other submodules.
//!
//! A prefix equal to the file's own prefix counts as local. During
//! self-file linking only the file itself is searched, so foreign prefixes
//! leave the reference unbound for the cross-file phase.

use std::iter;

use yang_schema::{
    DataType, LeafId, NodeId, NodeKind, NodeType, PrefixedName, ResolvableStatus, SchemaGraph,
    TypeBody, YangType,
};

use crate::augment::resolve_augment;
use crate::error::{LinkError, LinkResult};
use crate::expander::{expand, Expansion};
use crate::leafref::resolve_leafref;

/// Which part of the reference space a pass may search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Only the file being linked.
    SelfFile,
    /// The file plus imports, includes and belongs-to.
    CrossFile,
}

/// Definitions a reference can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Typedef,
    Grouping,
    Identity,
}

impl DefinitionKind {
    fn node_type(self) -> NodeType {
        match self {
            DefinitionKind::Typedef => NodeType::Typedef,
            DefinitionKind::Grouping => NodeType::Grouping,
            DefinitionKind::Identity => NodeType::Identity,
        }
    }
}

/// Prefix by which a file refers to its own definitions. A submodule uses
/// the prefix declared in its `belongs-to`.
pub fn own_prefix(graph: &SchemaGraph, root: NodeId) -> Option<&str> {
    let node = graph.node(root);
    let info = node.module_info()?;
    match node.node_type() {
        NodeType::Submodule => info.belongs_to.as_ref()?.prefix.as_deref(),
        _ => info.prefix.as_deref(),
    }
}

fn is_local(graph: &SchemaGraph, root: NodeId, prefix: Option<&str>) -> bool {
    match prefix {
        None => true,
        Some(prefix) => own_prefix(graph, root) == Some(prefix),
    }
}

fn included_roots(graph: &SchemaGraph, root: NodeId) -> Vec<NodeId> {
    graph
        .node(root)
        .module_info()
        .map(|info| info.includes.iter().filter_map(|link| link.resolved).collect())
        .unwrap_or_default()
}

/// Roots sharing a module's namespace with `root`: its included submodules,
/// and for a submodule the module it belongs to plus that module's other
/// submodules.
pub fn related_roots(graph: &SchemaGraph, root: NodeId) -> Vec<NodeId> {
    let mut related = included_roots(graph, root);
    let parent = graph
        .node(root)
        .module_info()
        .and_then(|info| info.belongs_to.as_ref())
        .and_then(|link| link.resolved);
    if let Some(parent) = parent {
        related.push(parent);
        related.extend(included_roots(graph, parent));
    }
    related.retain(|candidate| *candidate != root);
    related.dedup();
    related
}

/// Roots a name with `prefix`, written inside `from`, may be defined at.
pub fn candidate_roots(
    graph: &SchemaGraph,
    from: NodeId,
    prefix: Option<&str>,
    mode: LinkMode,
) -> Vec<NodeId> {
    let root = graph.module_of(from);
    if is_local(graph, root, prefix) {
        let mut roots = vec![root];
        if mode == LinkMode::CrossFile {
            roots.extend(related_roots(graph, root));
        }
        return roots;
    }
    if mode == LinkMode::SelfFile {
        return vec![];
    }
    let imported = prefix.and_then(|prefix| {
        graph
            .node(root)
            .module_info()?
            .import_for_prefix(prefix)?
            .resolved
    });
    match imported {
        Some(target) => {
            let mut roots = vec![target];
            roots.extend(included_roots(graph, target));
            roots
        }
        None => vec![],
    }
}

fn find_definition_in(
    graph: &SchemaGraph,
    holder: NodeId,
    name: &str,
    kind: DefinitionKind,
) -> Option<NodeId> {
    graph.children(holder).find(|child| {
        let node = graph.node(*child);
        node.node_type() == kind.node_type() && node.name == name
    })
}

/// Binds `name`, written at `scope`, to a typedef, grouping or identity.
pub fn lookup_definition(
    graph: &SchemaGraph,
    scope: NodeId,
    name: &PrefixedName,
    kind: DefinitionKind,
    mode: LinkMode,
) -> Option<NodeId> {
    let root = graph.module_of(scope);
    let prefix = name.prefix.as_deref();
    if is_local(graph, root, prefix) && kind != DefinitionKind::Identity {
        let lexical = iter::once(scope)
            .chain(graph.ancestors(scope))
            .find_map(|holder| find_definition_in(graph, holder, &name.name, kind));
        if lexical.is_some() {
            return lexical;
        }
    }
    candidate_roots(graph, scope, prefix, mode)
        .into_iter()
        .find_map(|candidate| find_definition_in(graph, candidate, &name.name, kind))
}

/// Binds every unbound derived type and identityref base in a type tree.
/// Returns whether anything was bound or advanced.
///
/// Each member is looked up from its own `scope`, which for a copy made by
/// grouping expansion is still the grouping's declaration site.
pub fn resolve_type(
    graph: &SchemaGraph,
    ty: &mut YangType,
    fallback_scope: NodeId,
    mode: LinkMode,
) -> bool {
    let mut changed = false;
    for path in ty.unresolved_paths() {
        let Some(member) = ty.member_mut(&path) else {
            continue;
        };
        let scope = member.scope.unwrap_or(fallback_scope);
        match member.data_type {
            DataType::Derived => {
                if member.typedef.is_none() {
                    member.typedef =
                        lookup_definition(graph, scope, &member.name, DefinitionKind::Typedef, mode);
                    changed |= member.typedef.is_some();
                }
                if let Some(typedef) = member.typedef {
                    let target = graph
                        .node(typedef)
                        .typedef_info()
                        .map(|info| info.ty.status)
                        .unwrap_or_default();
                    let status = if target.is_resolved() {
                        ResolvableStatus::Resolved
                    } else {
                        ResolvableStatus::IntraFileResolved
                    };
                    changed |= member.status.advance(status);
                }
            }
            DataType::Identityref => {
                if let TypeBody::Identityref { base: Some(base) } = &mut member.body {
                    if base.resolved.is_none() {
                        base.resolved = lookup_definition(
                            graph,
                            scope,
                            &base.target,
                            DefinitionKind::Identity,
                            mode,
                        );
                    }
                    if base.resolved.is_some() {
                        changed |= member.status.advance(ResolvableStatus::Resolved);
                    }
                }
            }
            _ => {}
        }
    }
    changed | ty.refresh_union_status()
}

/// Link state and binding logic of a reference site.
pub trait Resolvable {
    fn status(&self, graph: &SchemaGraph) -> ResolvableStatus;

    /// Tries to bind the site. Returns whether anything changed; a site that
    /// is already resolved is left untouched.
    fn resolve(&self, graph: &mut SchemaGraph, mode: LinkMode) -> LinkResult<bool>;
}

/// A place in the graph holding references to bind.
///
/// The variant order is the order sites are visited within a pass: types
/// before the uses that copy them, and paths after the expansions that
/// create their targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Site {
    TypedefType(NodeId),
    IdentityBase(NodeId),
    LeafType(LeafId),
    Uses(NodeId),
    Augment(NodeId),
    Leafref(LeafId),
}

impl Resolvable for Site {
    fn status(&self, graph: &SchemaGraph) -> ResolvableStatus {
        match *self {
            Site::TypedefType(id) => graph
                .node(id)
                .typedef_info()
                .map(|info| info.ty.status)
                .unwrap_or(ResolvableStatus::Resolved),
            Site::IdentityBase(id) => match &graph.node(id).kind {
                NodeKind::Identity(info) => info.status,
                _ => ResolvableStatus::Resolved,
            },
            Site::LeafType(id) => graph.leaf(id).ty.status,
            Site::Uses(id) => graph
                .node(id)
                .uses_info()
                .map(|info| info.status)
                .unwrap_or(ResolvableStatus::Resolved),
            Site::Augment(id) => match &graph.node(id).kind {
                NodeKind::Augment(info) => info.status,
                _ => ResolvableStatus::Resolved,
            },
            Site::Leafref(id) => graph
                .leaf(id)
                .ty
                .leafref()
                .map(|(_, _, status)| status)
                .unwrap_or(ResolvableStatus::Resolved),
        }
    }

    fn resolve(&self, graph: &mut SchemaGraph, mode: LinkMode) -> LinkResult<bool> {
        if self.status(graph).is_resolved() {
            return Ok(false);
        }
        match *self {
            Site::TypedefType(id) => {
                let Some(mut ty) = graph.node(id).typedef_info().map(|info| info.ty.clone()) else {
                    return Ok(false);
                };
                let fallback = graph.node(id).parent.unwrap_or(id);
                if !resolve_type(graph, &mut ty, fallback, mode) {
                    return Ok(false);
                }
                if let Some(info) = graph.node_mut(id).typedef_info_mut() {
                    info.ty = ty;
                }
                Ok(true)
            }
            Site::LeafType(id) => {
                let leaf = graph.leaf(id);
                let fallback = leaf.contained_in;
                let mut ty = leaf.ty.clone();
                if !resolve_type(graph, &mut ty, fallback, mode) {
                    return Ok(false);
                }
                graph.leaf_mut(id).ty = ty;
                Ok(true)
            }
            Site::IdentityBase(id) => Ok(resolve_identity_base(graph, id, mode)),
            Site::Uses(id) => resolve_uses(graph, id, mode),
            Site::Augment(id) => resolve_augment(graph, id, mode),
            Site::Leafref(id) => resolve_leafref(graph, id, mode),
        }
    }
}

fn resolve_identity_base(graph: &mut SchemaGraph, id: NodeId, mode: LinkMode) -> bool {
    let NodeKind::Identity(info) = &graph.node(id).kind else {
        return false;
    };
    let Some(base) = &info.base else {
        return false;
    };
    let Some(found) = lookup_definition(graph, id, &base.target, DefinitionKind::Identity, mode)
    else {
        return false;
    };
    if let NodeKind::Identity(info) = &mut graph.node_mut(id).kind {
        if let Some(base) = info.base.as_mut() {
            base.resolved = Some(found);
        }
        info.status.advance(ResolvableStatus::Resolved);
    }
    true
}

/// Binds the grouping of a `uses`, then expands it.
fn resolve_uses(graph: &mut SchemaGraph, id: NodeId, mode: LinkMode) -> LinkResult<bool> {
    let Some(info) = graph.node(id).uses_info() else {
        return Ok(false);
    };
    let before = info.status;
    let mut progress = false;
    if !info.grouping.is_bound() {
        let scope = graph.node(id).parent.unwrap_or(id);
        let target = info.grouping.target.clone();
        let Some(grouping) =
            lookup_definition(graph, scope, &target, DefinitionKind::Grouping, mode)
        else {
            return Ok(false);
        };
        if let Some(info) = graph.node_mut(id).uses_info_mut() {
            info.grouping.resolved = Some(grouping);
        }
        progress = true;
    }

    match expand(graph, id) {
        Ok(Expansion::Expanded) => Ok(true),
        Ok(Expansion::Deferred) => {
            let after = graph
                .node(id)
                .uses_info()
                .map(|info| info.status)
                .unwrap_or(before);
            Ok(progress || after > before)
        }
        Err(err) => Err(LinkError::from(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yang_schema::{GroupingInfo, ModuleInfo, ModuleLink, SchemaNode};
    use yang_source::LocationInfo;

    fn module(graph: &mut SchemaGraph, name: &str, prefix: &str) -> NodeId {
        let info = ModuleInfo {
            prefix: Some(prefix.to_string()),
            to_translate: true,
            ..ModuleInfo::default()
        };
        let id = graph.add_node(SchemaNode::new(name, NodeKind::Module(info), LocationInfo::default()));
        graph.add_root(id);
        id
    }

    fn grouping(graph: &mut SchemaGraph, parent: NodeId, name: &str) -> NodeId {
        let id = graph.add_node(SchemaNode::new(
            name,
            NodeKind::Grouping(GroupingInfo::default()),
            LocationInfo::default(),
        ));
        graph.append_child(parent, id);
        id
    }

    #[test]
    fn test_innermost_scope_wins() {
        let mut graph = SchemaGraph::new();
        let m = module(&mut graph, "m", "m");
        let outer = grouping(&mut graph, m, "g");
        let holder = grouping(&mut graph, m, "holder");
        let inner = grouping(&mut graph, holder, "g");

        let name = PrefixedName::parse("g");
        let from_holder =
            lookup_definition(&graph, holder, &name, DefinitionKind::Grouping, LinkMode::SelfFile);
        assert_eq!(from_holder, Some(inner));
        let from_module =
            lookup_definition(&graph, m, &name, DefinitionKind::Grouping, LinkMode::SelfFile);
        assert_eq!(from_module, Some(outer));
        let own_prefix = PrefixedName::parse("m:g");
        assert_eq!(
            lookup_definition(&graph, holder, &own_prefix, DefinitionKind::Grouping, LinkMode::SelfFile),
            Some(inner)
        );
    }

    #[test]
    fn test_foreign_prefix_waits_for_cross_file_linking() {
        let mut graph = SchemaGraph::new();
        let a = module(&mut graph, "a", "a");
        let b = module(&mut graph, "b", "b");
        let target = grouping(&mut graph, b, "shared");
        let mut import = ModuleLink::new("b", LocationInfo::default());
        import.prefix = Some("bp".to_string());
        graph.node_mut(a).module_info_mut().unwrap().imports.push(import);

        let name = PrefixedName::parse("bp:shared");
        assert_eq!(
            lookup_definition(&graph, a, &name, DefinitionKind::Grouping, LinkMode::SelfFile),
            None
        );
        // unbound import
        assert_eq!(
            lookup_definition(&graph, a, &name, DefinitionKind::Grouping, LinkMode::CrossFile),
            None
        );
        graph.node_mut(a).module_info_mut().unwrap().imports[0].resolved = Some(b);
        assert_eq!(
            lookup_definition(&graph, a, &name, DefinitionKind::Grouping, LinkMode::CrossFile),
            Some(target)
        );
    }

    #[test]
    fn test_resolved_site_is_left_alone() {
        let mut graph = SchemaGraph::new();
        let m = module(&mut graph, "m", "m");
        let ty = YangType::new(PrefixedName::local("string"), Some(m), LocationInfo::default());
        let leaf = graph.add_leaf(yang_schema::Leaf::new(
            "x",
            yang_schema::LeafKind::Leaf,
            ty,
            m,
            LocationInfo::default(),
        ));
        let site = Site::LeafType(leaf);
        let before = graph.clone();
        assert!(!site.resolve(&mut graph, LinkMode::CrossFile).unwrap());
        assert_eq!(graph, before);
    }
}
