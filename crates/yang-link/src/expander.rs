//! Grouping expansion: replicates a grouping's content at a `uses`.
//!
//! Copies are placed in the holder of the `uses` (the uses node itself stays
//! in the tree as a record of what it produced). Only containment is
//! rebound: every copied type keeps the `scope` it was written in, so its
//! references still resolve at the grouping's declaration site. The grouping
//! itself is never modified.

use yang_schema::{
    CollisionDetector, ConstructType, DataModelError, DeferredKind, EntityToResolve, LeafId,
    LeafKind, NodeId, NodeType, ResolvableStatus, SchemaGraph,
};
use yang_source::LocationInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Copies are in place and the uses is resolved.
    Expanded,
    /// The grouping still contains unexpanded uses; retry on a later pass.
    Deferred,
}

/// What one expansion produced.
#[derive(Debug, Default)]
struct Replicated {
    nodes: Vec<NodeId>,
    leaves: Vec<LeafId>,
    leaf_lists: Vec<LeafId>,
    entities: Vec<EntityToResolve>,
}

/// Expands the `uses` node `uses` into its holder.
///
/// Fails with `UnresolvedGrouping` when the grouping is not bound yet, which
/// the linker treats as a request to retry. Name clashes with what the holder
/// already contains are hard errors.
pub fn expand(graph: &mut SchemaGraph, uses: NodeId) -> Result<Expansion, DataModelError> {
    let node = graph.node(uses);
    let Some(info) = node.uses_info() else {
        return Err(DataModelError::unresolved_grouping(&node.name, &node.location));
    };
    if info.status.is_resolved() {
        return Ok(Expansion::Expanded);
    }
    let Some(grouping) = info.grouping.resolved else {
        return Err(DataModelError::unresolved_grouping(&node.name, &node.location));
    };
    let depth = info.current_grouping_depth;
    let location = node.location.clone();
    let Some(holder) = node.parent else {
        return Err(DataModelError::unresolved_grouping(&node.name, &node.location));
    };

    if has_pending_uses(graph, grouping) {
        log::trace!("deferring uses \"{}\": grouping has unexpanded uses", graph.node(uses).name);
        if let Some(info) = graph.node_mut(uses).uses_info_mut() {
            info.status.advance(ResolvableStatus::IntraFileResolved);
        }
        return Ok(Expansion::Deferred);
    }

    let mut replicated = Replicated::default();
    for leaf in graph.all_leaves(grouping).collect::<Vec<_>>() {
        let original = graph.leaf(leaf);
        detect_collision(graph, holder, &original.name, original.construct(), &location)?;
        let id = clone_leaf(graph, leaf, holder, depth, &mut replicated.entities);
        match graph.leaf(id).kind {
            LeafKind::Leaf => replicated.leaves.push(id),
            LeafKind::LeafList => replicated.leaf_lists.push(id),
        }
    }
    clone_subtree(graph, grouping, holder, depth, &location, &mut replicated)?;

    log::debug!(
        "expanded uses \"{}\": {} nodes, {} leaves, {} leaf-lists",
        graph.node(uses).name,
        replicated.nodes.len(),
        replicated.leaves.len(),
        replicated.leaf_lists.len()
    );
    if let Some(info) = graph.node_mut(uses).uses_info_mut() {
        info.resolved_nodes = replicated.nodes;
        info.resolved_leaves = replicated.leaves;
        info.resolved_leaf_lists = replicated.leaf_lists;
        info.entities_to_resolve = replicated.entities;
        info.status.advance(ResolvableStatus::Resolved);
    }
    Ok(Expansion::Expanded)
}

/// Whether any `uses` inside `grouping` is not resolved yet. This also
/// catches a grouping that uses itself, which stays pending forever.
pub(crate) fn has_pending_uses(graph: &SchemaGraph, grouping: NodeId) -> bool {
    graph.walk(grouping).any(|id| {
        graph
            .node(id)
            .uses_info()
            .is_some_and(|info| !info.status.is_resolved())
    })
}

/// A copy must be new to `holder` and to every augment already bound to it.
fn detect_collision(
    graph: &SchemaGraph,
    holder: NodeId,
    name: &str,
    construct: ConstructType,
    location: &LocationInfo,
) -> Result<(), DataModelError> {
    graph.detect_colliding_child(holder, name, construct, location)?;
    for augment in &graph.node(holder).augmented_by {
        graph.detect_colliding_child(*augment, name, construct, location)?;
    }
    Ok(())
}

/// Copies one leaf into `holder`, re-pointing generated enumerations and
/// unions at the new holder. Copies made at a nested depth are queued for
/// the re-pointing instead.
fn clone_leaf(
    graph: &mut SchemaGraph,
    leaf: LeafId,
    holder: NodeId,
    depth: u32,
    entities: &mut Vec<EntityToResolve>,
) -> LeafId {
    let mut copy = graph.leaf(leaf).duplicate_into(holder);
    // a copy inside another grouping keeps the original owner until the
    // linker drains this uses
    let defer_owner = depth > 0 && copy.ty.has_owned_definitions();
    if !defer_owner {
        copy.ty.set_owner(holder);
    }
    let unbound = !copy.ty.status.is_resolved();
    let id = graph.add_leaf(copy);
    if defer_owner {
        entities.push(EntityToResolve {
            leaf: id,
            holder,
            kind: DeferredKind::OwnerFixup,
        });
    }
    if unbound {
        entities.push(EntityToResolve {
            leaf: id,
            holder,
            kind: DeferredKind::TypeReferences,
        });
    }
    id
}

/// Copies the data children of `grouping` (and everything below them) into
/// `holder` without recursion. Nested uses, groupings and typedefs are
/// skipped: uses content is already present as siblings, and definitions
/// are only looked up, never instantiated.
fn clone_subtree(
    graph: &mut SchemaGraph,
    grouping: NodeId,
    holder: NodeId,
    depth: u32,
    location: &LocationInfo,
    replicated: &mut Replicated,
) -> Result<(), DataModelError> {
    let mut pending: Vec<(NodeId, NodeId)> = graph
        .children(grouping)
        .map(|child| (child, holder))
        .collect();
    pending.reverse();

    while let Some((source, parent)) = pending.pop() {
        let node = graph.node(source);
        if matches!(
            node.node_type(),
            NodeType::Uses | NodeType::Grouping | NodeType::Typedef
        ) {
            continue;
        }
        if parent == holder {
            detect_collision(graph, holder, &node.name, node.construct(), location)?;
        }
        let copy = node.duplicate_detached();
        let id = graph.add_node(copy);
        // lands after any sibling declared below the uses
        graph.append_child(parent, id);
        if parent == holder {
            replicated.nodes.push(id);
        }

        for leaf in graph.all_leaves(source).collect::<Vec<_>>() {
            clone_leaf(graph, leaf, id, depth, &mut replicated.entities);
        }
        let children: Vec<_> = graph.children(source).collect();
        pending.extend(children.into_iter().rev().map(|child| (child, id)));
    }
    Ok(())
}
