//! Binding of `augment` statements to their target nodes.

use yang_schema::{
    CollisionDetector, NodeId, NodeKind, PrefixedName, ResolvableStatus, SchemaGraph,
};

use crate::error::{LinkError, LinkResult};
use crate::expander::has_pending_uses;
use crate::path::{schema_step, PathStep, SchemaPath};
use crate::resolver::{candidate_roots, LinkMode};

/// Binds augment `id` to the node its absolute path names.
///
/// The augment waits until every `uses` inside it is expanded, so the
/// collision check sees its final content. Once bound, the augment is
/// recorded in the target's `augmented_by` list and later path lookups see
/// through it.
pub fn resolve_augment(graph: &mut SchemaGraph, id: NodeId, mode: LinkMode) -> LinkResult<bool> {
    let node = graph.node(id);
    let NodeKind::Augment(info) = &node.kind else {
        return Ok(false);
    };
    if info.status.is_resolved() {
        return Ok(false);
    }
    let text = info.target_path.clone();
    let location = node.location.clone();

    if has_pending_uses(graph, id) {
        log::trace!("augment \"{text}\" waits for its uses");
        return Ok(false);
    }

    let path = SchemaPath::parse(&text)
        .map_err(|err| LinkError::invalid_path(&text, err.reason(), &location))?;
    if !path.absolute {
        return Err(LinkError::invalid_path(
            &text,
            "augment target must be an absolute path",
            &location,
        ));
    }
    let mut names: Vec<&PrefixedName> = Vec::with_capacity(path.steps.len());
    for step in &path.steps {
        match step {
            PathStep::Child(name) => names.push(name),
            PathStep::Parent => {
                return Err(LinkError::invalid_path(
                    &text,
                    "`..` is not allowed in an augment target",
                    &location,
                ))
            }
        }
    }

    let prefix = names.first().and_then(|name| name.prefix.as_deref());
    let target = candidate_roots(graph, id, prefix, mode)
        .into_iter()
        .find_map(|root| {
            names
                .iter()
                .try_fold(root, |holder, name| schema_step(graph, holder, &name.name))
        });
    let Some(target) = target else {
        return Ok(false);
    };

    check_collisions(graph, id, target)?;

    log::debug!("augment \"{text}\" bound to \"{}\"", graph.node(target).name);
    if let NodeKind::Augment(info) = &mut graph.node_mut(id).kind {
        info.target = Some(target);
        info.status.advance(ResolvableStatus::Resolved);
    }
    let augmented_by = &mut graph.node_mut(target).augmented_by;
    if !augmented_by.contains(&id) {
        augmented_by.push(id);
    }
    Ok(true)
}

/// Every child and leaf the augment adds must be new to the target and to
/// the augments already bound to it.
fn check_collisions(graph: &SchemaGraph, augment: NodeId, target: NodeId) -> LinkResult<()> {
    let holders: Vec<NodeId> = std::iter::once(target)
        .chain(graph.node(target).augmented_by.iter().copied())
        .filter(|holder| *holder != augment)
        .collect();

    for leaf in graph.all_leaves(augment) {
        let leaf = graph.leaf(leaf);
        for holder in &holders {
            graph.detect_colliding_child(*holder, &leaf.name, leaf.construct(), &leaf.location)?;
        }
    }
    for child in graph.children(augment) {
        let child = graph.node(child);
        for holder in &holders {
            graph.detect_colliding_child(*holder, &child.name, child.construct(), &child.location)?;
        }
    }
    Ok(())
}
