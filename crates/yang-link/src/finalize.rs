use yang_schema::{
    LeafId, NodeId, NodeKind, NodeType, SchemaContext, SchemaGraph, SchemaHolder,
    SchemaNodeIdentifier, SchemaRef,
};

use crate::error::LinkError;

/// Namespace every data node of `root` is placed in. A submodule shares
/// the namespace of the module it belongs to.
fn root_namespace(graph: &SchemaGraph, root: NodeId) -> Option<String> {
    let info = graph.node(root).module_info()?;
    match &info.belongs_to {
        Some(link) => graph
            .node(link.resolved?)
            .module_info()?
            .namespace
            .clone(),
        None => info.namespace.clone(),
    }
}

/// Where a child declared directly in `parent` is recorded: `parent`
/// itself, unless it is a choice, case or uses, in which case the nearest
/// enclosing holder. An augment records into its target.
fn entry_holder(graph: &SchemaGraph, parent: NodeId) -> Option<NodeId> {
    let holder = match graph.node(parent).node_type() {
        NodeType::Choice | NodeType::Case | NodeType::Uses => graph.schema_parent(parent)?,
        _ => parent,
    };
    match &graph.node(holder).kind {
        NodeKind::Augment(info) => info.target,
        _ => Some(holder),
    }
}

fn is_entry(node_type: NodeType) -> bool {
    matches!(
        node_type,
        NodeType::Container
            | NodeType::List
            | NodeType::Rpc
            | NodeType::Input
            | NodeType::Output
            | NodeType::Notification
    )
}

/// Assigns namespaces below `root` and feeds every holder's child schema
/// map, mandatory count and default map. Runs once per file, after
/// cross-file linking. Groupings are templates and are left untouched.
pub fn finalize_schema(graph: &mut SchemaGraph, root: NodeId) -> Result<(), Vec<LinkError>> {
    let namespace = root_namespace(graph, root);
    let nodes: Vec<NodeId> = std::iter::once(root)
        .chain(graph.walk(root))
        .filter(|id| !graph.is_within_grouping(*id))
        .collect();

    for id in &nodes {
        graph.node_mut(*id).namespace = namespace.clone();
        let leaves: Vec<LeafId> = graph.all_leaves(*id).collect();
        for leaf in leaves {
            graph.leaf_mut(leaf).namespace = namespace.clone();
        }
    }

    let mut errors = Vec::new();
    for id in nodes {
        let node_type = graph.node(id).node_type();
        if let Some(parent) = graph.node(id).parent {
            if is_entry(node_type) {
                if let Some(holder) = entry_holder(graph, parent) {
                    let key = SchemaNodeIdentifier::new(&graph.node(id).name, namespace.clone());
                    let context = SchemaContext {
                        schema: SchemaRef::Node(id),
                        parent,
                    };
                    if let Err(err) = graph.node_mut(holder).add_to_child_schema_map(key, context) {
                        errors.push(LinkError::from(err));
                    }
                    let mandatory = match &graph.node(id).kind {
                        NodeKind::List(info) => info.min_elements.is_some_and(|min| min > 0),
                        _ => false,
                    };
                    if mandatory {
                        graph.node_mut(holder).increment_mandatory_child_count();
                    }
                }
            } else if node_type == NodeType::Choice {
                let mandatory = matches!(&graph.node(id).kind, NodeKind::Choice(info) if info.mandatory);
                if let (true, Some(holder)) = (mandatory, entry_holder(graph, parent)) {
                    graph.node_mut(holder).increment_mandatory_child_count();
                }
            }
        }

        if !graph.node(id).node_type().holds_leaves() {
            continue;
        }
        let Some(holder) = entry_holder(graph, id) else {
            continue;
        };
        let leaves: Vec<LeafId> = graph.all_leaves(id).collect();
        for leaf in leaves {
            let data = graph.leaf(leaf);
            let key = SchemaNodeIdentifier::new(&data.name, data.namespace.clone());
            let mandatory = data.is_mandatory();
            let has_default = data.default.is_some();
            let context = SchemaContext {
                schema: SchemaRef::Leaf(leaf),
                parent: id,
            };
            let target = graph.node_mut(holder);
            if let Err(err) = target.add_to_child_schema_map(key.clone(), context) {
                errors.push(LinkError::from(err));
            }
            if mandatory {
                target.increment_mandatory_child_count();
            }
            if has_default {
                target.add_to_default_child_map(key, SchemaRef::Leaf(leaf));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
