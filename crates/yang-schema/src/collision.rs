use yang_source::LocationInfo;

use crate::error::DataModelError;
use crate::graph::SchemaGraph;
use crate::ids::NodeId;
use crate::kind::{CollisionClass, ConstructType};

/// Name-conflict checks run whenever a child is added to a holder.
///
/// `location` is where the construct being added was declared; it is what
/// the resulting error points at.
pub trait CollisionDetector {
    /// Fails if `holder` already has a child named `name` in the identifier
    /// space of `construct`.
    fn detect_colliding_child(
        &self,
        holder: NodeId,
        name: &str,
        construct: ConstructType,
        location: &LocationInfo,
    ) -> Result<(), DataModelError>;

    /// Fails if `node` itself is named `name`.
    fn detect_self_collision(
        &self,
        node: NodeId,
        name: &str,
        construct: ConstructType,
        location: &LocationInfo,
    ) -> Result<(), DataModelError>;
}

impl CollisionDetector for SchemaGraph {
    fn detect_colliding_child(
        &self,
        holder: NodeId,
        name: &str,
        construct: ConstructType,
        location: &LocationInfo,
    ) -> Result<(), DataModelError> {
        let Some(class) = construct.collision_class() else {
            return Ok(());
        };

        if class == CollisionClass::DataNode
            && self.all_leaves(holder).any(|leaf| self.leaf(leaf).name == name)
        {
            return Err(DataModelError::duplicate_identifier(construct, name, location));
        }

        let clash = self.children(holder).any(|child| {
            let node = self.node(child);
            node.name == name && node.construct().collision_class() == Some(class)
        });
        if clash {
            log::debug!("{construct} \"{name}\" collides with a sibling in {location}");
            return Err(DataModelError::duplicate_identifier(construct, name, location));
        }
        Ok(())
    }

    fn detect_self_collision(
        &self,
        node: NodeId,
        name: &str,
        construct: ConstructType,
        location: &LocationInfo,
    ) -> Result<(), DataModelError> {
        let holder = self.node(node);
        if holder.name == name {
            return Err(DataModelError::SelfCollision {
                construct,
                holder: holder.construct(),
                name: name.to_string(),
                location: location.clone(),
                span: location.span(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{Leaf, LeafKind};
    use crate::name::PrefixedName;
    use crate::node::{ContainerInfo, GroupingInfo, ModuleInfo, NodeKind, SchemaNode};
    use crate::types::YangType;

    fn setup() -> (SchemaGraph, NodeId, NodeId) {
        let mut graph = SchemaGraph::new();
        let module = graph.add_node(SchemaNode::new(
            "m",
            NodeKind::Module(ModuleInfo::default()),
            LocationInfo::default(),
        ));
        let container = graph.add_node(SchemaNode::new(
            "c",
            NodeKind::Container(ContainerInfo::default()),
            LocationInfo::default(),
        ));
        graph.append_child(module, container);
        let ty = YangType::new(PrefixedName::local("string"), Some(container), LocationInfo::default());
        graph.add_leaf(Leaf::new("x", LeafKind::Leaf, ty, container, LocationInfo::new("m.yang", 5, 6)));
        (graph, module, container)
    }

    #[test]
    fn test_leaf_list_collides_with_leaf() {
        let (graph, _, container) = setup();
        let at = LocationInfo::new("m.yang", 6, 6);
        let err = graph
            .detect_colliding_child(container, "x", ConstructType::LeafList, &at)
            .unwrap_err();
        match err {
            DataModelError::DuplicateIdentifier { name, location, construct, .. } => {
                assert_eq!(name, "x");
                assert_eq!(construct, ConstructType::LeafList);
                assert_eq!((location.line, location.char_position), (6, 6));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_groupings_do_not_collide_with_data_nodes() {
        let (mut graph, module, _) = setup();
        graph
            .detect_colliding_child(module, "c", ConstructType::Grouping, &LocationInfo::default())
            .unwrap();
        let g = graph.add_node(SchemaNode::new(
            "g",
            NodeKind::Grouping(GroupingInfo::default()),
            LocationInfo::default(),
        ));
        graph.append_child(module, g);
        assert!(graph
            .detect_colliding_child(module, "g", ConstructType::Grouping, &LocationInfo::default())
            .is_err());
        assert!(graph
            .detect_colliding_child(module, "c", ConstructType::List, &LocationInfo::default())
            .is_err());
        graph
            .detect_colliding_child(module, "c", ConstructType::Uses, &LocationInfo::default())
            .unwrap();
    }

    #[test]
    fn test_self_collision_names_the_holder() {
        let mut graph = SchemaGraph::new();
        let rpc = graph.add_node(SchemaNode::new("input", NodeKind::Rpc, LocationInfo::default()));
        let err = graph
            .detect_self_collision(rpc, "input", ConstructType::Input, &LocationInfo::new("r.yang", 3, 4))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "YANG file error: Duplicate input identifier detected, same as rpc \"input\" in file: r.yang at line: 3 at position: 4"
        );
        graph
            .detect_self_collision(rpc, "output", ConstructType::Output, &LocationInfo::default())
            .unwrap();
    }
}
