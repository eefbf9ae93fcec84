//! Schema node paths as written in `augment` and leafref `path` statements.

use yang_schema::{NodeId, NodeKind, NodeType, PrefixedName, SchemaGraph, SchemaRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// `..`
    Parent,
    Child(PrefixedName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPath {
    pub absolute: bool,
    pub steps: Vec<PathStep>,
}

/// Why a path could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    Empty,
    UnbalancedPredicate,
    EmptySegment,
    /// `current()` outside a predicate; not evaluated.
    Unsupported,
}

impl PathError {
    pub fn reason(self) -> &'static str {
        match self {
            PathError::Empty => "path is empty",
            PathError::UnbalancedPredicate => "unbalanced `[` in predicate",
            PathError::EmptySegment => "empty path segment",
            PathError::Unsupported => "`current()` is not supported outside predicates",
        }
    }
}

impl SchemaPath {
    /// Parses `text`, dropping `[...]` predicates.
    pub fn parse(text: &str) -> Result<SchemaPath, PathError> {
        let stripped = strip_predicates(text)?;
        let trimmed: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        let (absolute, rest) = match trimmed.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, trimmed.as_str()),
        };

        let mut steps = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" => return Err(PathError::EmptySegment),
                "." => {}
                ".." => steps.push(PathStep::Parent),
                s if s.contains("current()") => return Err(PathError::Unsupported),
                s => steps.push(PathStep::Child(PrefixedName::parse(s))),
            }
        }
        if steps.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(SchemaPath { absolute, steps })
    }

    /// First named segment; its prefix selects the module an absolute path
    /// starts from.
    pub fn first_child(&self) -> Option<&PrefixedName> {
        self.steps.iter().find_map(|step| match step {
            PathStep::Child(name) => Some(name),
            PathStep::Parent => None,
        })
    }
}

fn strip_predicates(text: &str) -> Result<String, PathError> {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0u32;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.checked_sub(1).ok_or(PathError::UnbalancedPredicate)?,
            c if depth == 0 => out.push(c),
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PathError::UnbalancedPredicate);
    }
    Ok(out)
}

/// Resolves an augment to its target, `None` while unbound.
fn through_augment(graph: &SchemaGraph, id: NodeId) -> Option<NodeId> {
    match &graph.node(id).kind {
        NodeKind::Augment(info) => info.target,
        _ => Some(id),
    }
}

/// The data node `id` belongs to: `id` itself unless it is a choice, case
/// or uses, in which case the nearest ancestor that is not.
pub fn data_holder(graph: &SchemaGraph, id: NodeId) -> Option<NodeId> {
    let holder = std::iter::once(id).chain(graph.ancestors(id)).find(|n| {
        !matches!(
            graph.node(*n).node_type(),
            NodeType::Choice | NodeType::Case | NodeType::Uses
        )
    })?;
    through_augment(graph, holder)
}

/// Parent of `id` in the data tree.
pub fn data_parent(graph: &SchemaGraph, id: NodeId) -> Option<NodeId> {
    let parent = graph.schema_parent(id)?;
    through_augment(graph, parent)
}

/// A data child of `holder` named `name`, including children contributed
/// by augments bound to `holder`.
pub fn data_step(graph: &SchemaGraph, holder: NodeId, name: &str) -> Option<SchemaRef> {
    graph.find_data_child(holder, name).or_else(|| {
        graph
            .node(holder)
            .augmented_by
            .iter()
            .find_map(|augment| graph.find_data_child(*augment, name))
    })
}

/// A schema node child of `holder` that an augment may target.
pub fn schema_step(graph: &SchemaGraph, holder: NodeId, name: &str) -> Option<NodeId> {
    let direct = |parent: NodeId| {
        graph.children(parent).find(|child| {
            let node = graph.node(*child);
            node.name == name
                && matches!(
                    node.node_type(),
                    NodeType::Container
                        | NodeType::List
                        | NodeType::Choice
                        | NodeType::Case
                        | NodeType::Rpc
                        | NodeType::Input
                        | NodeType::Output
                        | NodeType::Notification
                )
        })
    };
    direct(holder).or_else(|| {
        graph
            .node(holder)
            .augmented_by
            .iter()
            .find_map(|augment| direct(*augment))
    })
}
