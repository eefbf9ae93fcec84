use yang_schema::{LeafId, NodeId, ResolvableStatus, SchemaGraph, SchemaRef, TypeBody};

use crate::error::{LinkError, LinkResult};
use crate::path::{data_holder, data_parent, data_step, PathError, PathStep, SchemaPath};
use crate::resolver::{candidate_roots, LinkMode};

/// Binds the leafref path of `leaf` to the leaf it points at.
///
/// Only leaves of the instantiated data tree are bound; a leafref inside a
/// grouping is a template and is bound on each copy instead. Predicates are
/// ignored, so `../interface[name = current()/../ifname]/mtu` binds to
/// `mtu` of `interface`.
pub fn resolve_leafref(graph: &mut SchemaGraph, leaf: LeafId, mode: LinkMode) -> LinkResult<bool> {
    let data = graph.leaf(leaf);
    let Some((text, _, status)) = data.ty.leafref() else {
        return Ok(false);
    };
    if status.is_resolved() || graph.is_within_grouping(data.contained_in) {
        return Ok(false);
    }
    let text = text.to_string();

    let path = match SchemaPath::parse(&text) {
        Ok(path) => path,
        Err(PathError::Unsupported) => {
            log::trace!("leafref \"{text}\" is not evaluated");
            return Ok(false);
        }
        Err(err) => return Err(LinkError::invalid_path(&text, err.reason(), &data.ty.location)),
    };

    let Some(target) = follow(graph, leaf, &path, mode) else {
        return Ok(false);
    };

    log::trace!("leafref \"{text}\" bound to \"{}\"", graph.leaf(target).name);
    if let TypeBody::Leafref { target: bound, status, .. } = &mut graph.leaf_mut(leaf).ty.body {
        *bound = Some(target);
        status.advance(ResolvableStatus::Resolved);
    }
    Ok(true)
}

fn follow(graph: &SchemaGraph, leaf: LeafId, path: &SchemaPath, mode: LinkMode) -> Option<LeafId> {
    let data = graph.leaf(leaf);
    let holder = data.contained_in;
    if path.absolute {
        // prefixes in the path belong to the module the type was written in
        let scope = data.ty.scope.unwrap_or(holder);
        let prefix = path.first_child()?.prefix.as_deref();
        candidate_roots(graph, scope, prefix, mode)
            .into_iter()
            .find_map(|root| walk_steps(graph, root, &path.steps))
    } else {
        // the leaf is the context node: the first `..` lands on its holder
        let (first, rest) = path.steps.split_first()?;
        if *first != PathStep::Parent {
            return None;
        }
        let start = data_holder(graph, holder)?;
        walk_steps(graph, start, rest)
    }
}

fn walk_steps(graph: &SchemaGraph, start: NodeId, steps: &[PathStep]) -> Option<LeafId> {
    let mut current = SchemaRef::Node(start);
    for step in steps {
        let SchemaRef::Node(node) = current else {
            return None;
        };
        current = match step {
            PathStep::Parent => SchemaRef::Node(data_parent(graph, node)?),
            PathStep::Child(name) => data_step(graph, node, &name.name)?,
        };
    }
    match current {
        SchemaRef::Leaf(target) => Some(target),
        SchemaRef::Node(_) => None,
    }
}
