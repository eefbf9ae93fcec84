use std::fmt::Display;
use std::str::FromStr;

use yang_schema::{
    AugmentInfo, ChoiceInfo, CollisionDetector, ConstructType, ContainerInfo, EnumValue,
    GroupingInfo, IdentityInfo, Leaf, LeafId, LeafKind, ListInfo, ModuleInfo, ModuleLink, NodeId,
    NodeKind, NodeReference, NodeType, PrefixedName, ResolvableStatus, SchemaGraph, SchemaNode,
    TypeBody, TypedefInfo, UsesInfo, YangType,
};
use yang_source::LocationInfo;

use crate::error::{ParseResult, ParserError};
use crate::parser::Statement;
use crate::walker::{StatementContext, StatementListener, WalkAction};

/// Statements that carry no information the compiler keeps.
const SKIPPED_KEYWORDS: &[&str] = &[
    "description",
    "reference",
    "contact",
    "organization",
    "status",
    "when",
    "must",
    "if-feature",
    "feature",
    "extension",
    "argument",
    "deviation",
    "refine",
    "error-message",
    "error-app-tag",
    "ordered-by",
    "unique",
    "anyxml",
    "anydata",
    "require-instance",
    "position",
    "yin-element",
    "modifier",
    "action",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeOwner {
    Leaf(LeafId),
    Typedef(NodeId),
}

/// A `type` statement being built: the leaf or typedef that owns the
/// outermost type, plus the member indices leading to a nested union member.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeSlot {
    owner: TypeOwner,
    path: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkSlot {
    Import(usize),
    Include(usize),
    BelongsTo,
}

/// Parse stack entry: the construct whose substatements are being read.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Parsable {
    Node(NodeId),
    Leaf(LeafId),
    Type(TypeSlot),
    Link { module: NodeId, slot: LinkSlot },
    Enum { slot: TypeSlot, index: usize },
}

/// Builds the schema tree of one file from statement callbacks.
///
/// Every statement that descends pushes exactly one `Parsable`; `exit` pops
/// it. Constructs check the top of the stack before attaching themselves, and
/// run collision detection against the holder as they are inserted.
pub struct SchemaListener<'g> {
    graph: &'g mut SchemaGraph,
    stack: Vec<Parsable>,
    root: Option<NodeId>,
    grouping_depth: u32,
}

impl<'g> SchemaListener<'g> {
    pub fn new(graph: &'g mut SchemaGraph) -> Self {
        Self {
            graph,
            stack: Vec::new(),
            root: None,
            grouping_depth: 0,
        }
    }

    /// The module or submodule built so far.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn describe(&self, entry: &Parsable) -> String {
        match entry {
            Parsable::Node(id) => {
                let node = self.graph.node(*id);
                format!("{} \"{}\"", node.construct(), node.name)
            }
            Parsable::Leaf(id) => {
                let leaf = self.graph.leaf(*id);
                format!("{} \"{}\"", leaf.construct(), leaf.name)
            }
            Parsable::Type(slot) => match self.type_ref(slot) {
                Some(ty) => format!("type \"{}\"", ty.name),
                None => "type".to_string(),
            },
            Parsable::Link { slot, .. } => match slot {
                LinkSlot::Import(_) => "import".to_string(),
                LinkSlot::Include(_) => "include".to_string(),
                LinkSlot::BelongsTo => "belongs-to".to_string(),
            },
            Parsable::Enum { .. } => "enum".to_string(),
        }
    }

    fn invalid_holder(&self, construct: ConstructType, name: &str, location: &LocationInfo) -> ParserError {
        match self.stack.last() {
            Some(top) => ParserError::invalid_holder(construct, name, self.describe(top), location),
            None => ParserError::missing_holder(construct.keyword(), location),
        }
    }

    /// The node on top of the stack, if it may hold `construct`.
    fn expect_holder(
        &self,
        construct: ConstructType,
        name: &str,
        location: &LocationInfo,
    ) -> ParseResult<NodeId> {
        match self.stack.last() {
            Some(Parsable::Node(id)) if can_hold(self.graph.node(*id).node_type(), construct) => Ok(*id),
            _ => Err(self.invalid_holder(construct, name, location)),
        }
    }

    fn root_type(&self, owner: TypeOwner) -> Option<&YangType> {
        match owner {
            TypeOwner::Leaf(id) => Some(&self.graph.leaf(id).ty),
            TypeOwner::Typedef(id) => self.graph.node(id).typedef_info().map(|info| &info.ty),
        }
    }

    fn root_type_mut(&mut self, owner: TypeOwner) -> Option<&mut YangType> {
        match owner {
            TypeOwner::Leaf(id) => Some(&mut self.graph.leaf_mut(id).ty),
            TypeOwner::Typedef(id) => self
                .graph
                .node_mut(id)
                .typedef_info_mut()
                .map(|info| &mut info.ty),
        }
    }

    fn type_ref(&self, slot: &TypeSlot) -> Option<&YangType> {
        self.root_type(slot.owner)?.member(&slot.path)
    }

    fn type_mut(&mut self, slot: &TypeSlot) -> Option<&mut YangType> {
        self.root_type_mut(slot.owner)?.member_mut(&slot.path)
    }

    fn link_mut(&mut self, module: NodeId, slot: LinkSlot) -> Option<&mut ModuleLink> {
        let info = self.graph.node_mut(module).module_info_mut()?;
        match slot {
            LinkSlot::Import(index) => info.imports.get_mut(index),
            LinkSlot::Include(index) => info.includes.get_mut(index),
            LinkSlot::BelongsTo => info.belongs_to.as_mut(),
        }
    }

    //--------------------------------------------------------------------------
    // Constructs that push onto the parse stack
    //--------------------------------------------------------------------------

    fn enter_root(&mut self, construct: ConstructType, statement: &Statement) -> ParseResult<WalkAction> {
        let name = argument(statement)?;
        if !self.stack.is_empty() || self.root.is_some() {
            return Err(self.invalid_holder(construct, name, &statement.location));
        }
        let info = ModuleInfo {
            to_translate: true,
            ..ModuleInfo::default()
        };
        let kind = match construct {
            ConstructType::Submodule => NodeKind::Submodule(info),
            _ => NodeKind::Module(info),
        };
        let id = self
            .graph
            .add_node(SchemaNode::new(name, kind, statement.location.clone()));
        log::debug!("building {construct} \"{name}\" from {}", statement.location.file);
        self.root = Some(id);
        self.stack.push(Parsable::Node(id));
        Ok(WalkAction::Descend)
    }

    fn enter_node(&mut self, construct: ConstructType, statement: &Statement) -> ParseResult<WalkAction> {
        let location = &statement.location;
        let name = match construct {
            ConstructType::Input | ConstructType::Output => construct.keyword(),
            _ => argument(statement)?,
        };
        let holder = self.expect_holder(construct, name, location)?;
        self.graph
            .detect_colliding_child(holder, name, construct, location)?;
        let holder_type = self.graph.node(holder).node_type();
        if matches!(construct, ConstructType::Input | ConstructType::Output)
            || (construct == ConstructType::Grouping && holder_type == NodeType::Grouping)
        {
            self.graph
                .detect_self_collision(holder, name, construct, location)?;
        }

        let kind = match construct {
            ConstructType::Container => NodeKind::Container(ContainerInfo::default()),
            ConstructType::List => NodeKind::List(ListInfo::default()),
            ConstructType::Choice => NodeKind::Choice(ChoiceInfo::default()),
            ConstructType::Case => NodeKind::Case,
            ConstructType::Grouping => NodeKind::Grouping(GroupingInfo {
                depth: self.grouping_depth,
            }),
            ConstructType::Typedef => NodeKind::Typedef(TypedefInfo {
                ty: placeholder_type(Some(holder), location),
                default: None,
                units: None,
            }),
            ConstructType::Uses => {
                let grouping = NodeReference::new(PrefixedName::parse(name), location.clone());
                NodeKind::Uses(UsesInfo::new(grouping, self.grouping_depth))
            }
            ConstructType::Augment => NodeKind::Augment(AugmentInfo {
                target_path: name.to_string(),
                target: None,
                status: ResolvableStatus::Unresolved,
            }),
            ConstructType::Identity => NodeKind::Identity(IdentityInfo::new(None)),
            ConstructType::Rpc => NodeKind::Rpc,
            ConstructType::Input => NodeKind::Input,
            ConstructType::Output => NodeKind::Output,
            ConstructType::Notification => NodeKind::Notification,
            _ => return Err(self.invalid_holder(construct, name, location)),
        };

        let id = self
            .graph
            .add_node(SchemaNode::new(name, kind, location.clone()));
        self.graph.append_child(holder, id);
        if construct == ConstructType::Grouping {
            self.grouping_depth += 1;
        }
        self.stack.push(Parsable::Node(id));
        Ok(WalkAction::Descend)
    }

    fn enter_leaf(&mut self, construct: ConstructType, statement: &Statement) -> ParseResult<WalkAction> {
        let location = &statement.location;
        let name = argument(statement)?;
        let holder = self.expect_holder(construct, name, location)?;
        self.graph
            .detect_colliding_child(holder, name, construct, location)?;
        let kind = match construct {
            ConstructType::LeafList => LeafKind::LeafList,
            _ => LeafKind::Leaf,
        };
        let leaf = Leaf::new(
            name,
            kind,
            placeholder_type(Some(holder), location),
            holder,
            location.clone(),
        );
        let id = self.graph.add_leaf(leaf);
        self.stack.push(Parsable::Leaf(id));
        Ok(WalkAction::Descend)
    }

    /// A leaf's type is scoped at the leaf's holder, a typedef's type at the
    /// typedef's parent, and a union member at its union's scope.
    fn enter_type(&mut self, statement: &Statement) -> ParseResult<WalkAction> {
        let location = &statement.location;
        let name = argument(statement)?;
        let top = self.stack.last().cloned();
        let (slot, scope) = match &top {
            Some(Parsable::Leaf(id)) => (
                TypeSlot {
                    owner: TypeOwner::Leaf(*id),
                    path: vec![],
                },
                Some(self.graph.leaf(*id).contained_in),
            ),
            Some(Parsable::Node(id)) if self.graph.node(*id).node_type() == NodeType::Typedef => (
                TypeSlot {
                    owner: TypeOwner::Typedef(*id),
                    path: vec![],
                },
                self.graph.node(*id).parent,
            ),
            Some(Parsable::Type(parent)) => match self.type_ref(parent) {
                Some(YangType {
                    body: TypeBody::Union { members, .. },
                    scope,
                    ..
                }) => {
                    let mut path = parent.path.clone();
                    path.push(members.len());
                    (
                        TypeSlot {
                            owner: parent.owner,
                            path,
                        },
                        *scope,
                    )
                }
                _ => return Err(self.invalid_holder(ConstructType::Type, name, location)),
            },
            _ => return Err(self.invalid_holder(ConstructType::Type, name, location)),
        };

        let ty = YangType::new(PrefixedName::parse(name), scope, location.clone());
        match slot.path.split_last() {
            None => {
                if let Some(current) = self.root_type_mut(slot.owner) {
                    *current = ty;
                }
            }
            Some((_, union_path)) => {
                let union = TypeSlot {
                    owner: slot.owner,
                    path: union_path.to_vec(),
                };
                if let Some(YangType {
                    body: TypeBody::Union { members, .. },
                    ..
                }) = self.type_mut(&union)
                {
                    members.push(ty);
                }
            }
        }
        self.stack.push(Parsable::Type(slot));
        Ok(WalkAction::Descend)
    }

    fn enter_link(&mut self, construct: ConstructType, statement: &Statement) -> ParseResult<WalkAction> {
        let location = &statement.location;
        let name = argument(statement)?;
        let module = self.expect_holder(construct, name, location)?;
        let link = ModuleLink::new(name, location.clone());
        let Some(info) = self.graph.node_mut(module).module_info_mut() else {
            return Err(self.invalid_holder(construct, name, location));
        };
        let slot = match construct {
            ConstructType::Import => {
                info.imports.push(link);
                LinkSlot::Import(info.imports.len() - 1)
            }
            ConstructType::Include => {
                info.includes.push(link);
                LinkSlot::Include(info.includes.len() - 1)
            }
            _ => {
                info.belongs_to = Some(link);
                LinkSlot::BelongsTo
            }
        };
        self.stack.push(Parsable::Link { module, slot });
        Ok(WalkAction::Descend)
    }

    fn enter_enum(&mut self, statement: &Statement) -> ParseResult<WalkAction> {
        let location = &statement.location;
        let name = argument(statement)?;
        let Some(Parsable::Type(slot)) = self.stack.last().cloned() else {
            return Err(self.invalid_holder(ConstructType::Enum, name, location));
        };
        let Some(YangType {
            body: TypeBody::Enumeration { values, .. },
            ..
        }) = self.type_mut(&slot)
        else {
            return Err(self.invalid_holder(ConstructType::Enum, name, location));
        };
        if values.iter().any(|value| value.name == name) {
            return Err(ParserError::invalid_argument(
                ConstructType::Enum,
                name,
                "duplicate enum name",
                location,
            ));
        }
        values.push(EnumValue {
            name: name.to_string(),
            value: None,
        });
        let index = values.len() - 1;
        self.stack.push(Parsable::Enum { slot, index });
        Ok(WalkAction::Descend)
    }

    //--------------------------------------------------------------------------
    // Simple statements: applied to the top of the stack, never descended
    //--------------------------------------------------------------------------

    fn apply_property(&mut self, construct: ConstructType, statement: &Statement) -> ParseResult<()> {
        let location = &statement.location;
        let value = argument(statement)?;
        let applied = match self.stack.last().cloned() {
            Some(Parsable::Node(id)) => self.apply_to_node(id, construct, value, location)?,
            Some(Parsable::Leaf(id)) => self.apply_to_leaf(id, construct, value, location)?,
            Some(Parsable::Type(slot)) => self.apply_to_type(&slot, construct, value, location)?,
            Some(Parsable::Link { module, slot }) => match (self.link_mut(module, slot), construct) {
                (Some(link), ConstructType::Prefix) => {
                    link.prefix = Some(value.to_string());
                    true
                }
                (Some(link), ConstructType::RevisionDate) => {
                    link.revision = Some(value.to_string());
                    true
                }
                _ => false,
            },
            Some(Parsable::Enum { slot, index }) if construct == ConstructType::Value => {
                let number = parse_number::<i64>(construct, value, location)?;
                match self.type_mut(&slot).map(|ty| &mut ty.body) {
                    Some(TypeBody::Enumeration { values, .. }) => match values.get_mut(index) {
                        Some(entry) => {
                            entry.value = Some(number);
                            true
                        }
                        None => false,
                    },
                    _ => false,
                }
            }
            _ => false,
        };
        if !applied {
            return Err(self.invalid_holder(construct, value, location));
        }
        Ok(())
    }

    fn apply_to_node(
        &mut self,
        id: NodeId,
        construct: ConstructType,
        value: &str,
        location: &LocationInfo,
    ) -> ParseResult<bool> {
        let node = self.graph.node_mut(id);
        match (&mut node.kind, construct) {
            (NodeKind::Module(info), ConstructType::Namespace) => info.namespace = Some(value.to_string()),
            (NodeKind::Module(info), ConstructType::Prefix) => info.prefix = Some(value.to_string()),
            (NodeKind::Module(info) | NodeKind::Submodule(info), ConstructType::YangVersion) => {
                info.yang_version = Some(value.to_string())
            }
            // the latest revision names the module
            (NodeKind::Module(info) | NodeKind::Submodule(info), ConstructType::Revision) => {
                if info.revision.as_deref().map_or(true, |current| value > current) {
                    info.revision = Some(value.to_string());
                }
            }
            (NodeKind::Typedef(info), ConstructType::Default) => info.default = Some(value.to_string()),
            (NodeKind::Typedef(info), ConstructType::Units) => info.units = Some(value.to_string()),
            (NodeKind::Choice(info), ConstructType::Default) => info.default_case = Some(value.to_string()),
            (NodeKind::Choice(info), ConstructType::Mandatory) => {
                info.mandatory = parse_bool(construct, value, location)?
            }
            (NodeKind::Container(info), ConstructType::Config) => {
                info.config = Some(parse_bool(construct, value, location)?)
            }
            (NodeKind::Container(info), ConstructType::Presence) => info.presence = Some(value.to_string()),
            (NodeKind::List(info), ConstructType::Config) => {
                info.config = Some(parse_bool(construct, value, location)?)
            }
            (NodeKind::List(info), ConstructType::Key) => {
                info.keys = value.split_whitespace().map(str::to_string).collect()
            }
            (NodeKind::List(info), ConstructType::MinElements) => {
                info.min_elements = Some(parse_number(construct, value, location)?)
            }
            (NodeKind::List(info), ConstructType::MaxElements) => {
                info.max_elements = parse_max_elements(value, location)?
            }
            (NodeKind::Identity(info), ConstructType::Base) => {
                let base = NodeReference::new(PrefixedName::parse(value), location.clone());
                *info = IdentityInfo::new(Some(base));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn apply_to_leaf(
        &mut self,
        id: LeafId,
        construct: ConstructType,
        value: &str,
        location: &LocationInfo,
    ) -> ParseResult<bool> {
        let leaf = self.graph.leaf_mut(id);
        match construct {
            ConstructType::Default => leaf.default = Some(value.to_string()),
            ConstructType::Units => leaf.units = Some(value.to_string()),
            ConstructType::Config => leaf.config = Some(parse_bool(construct, value, location)?),
            ConstructType::Mandatory if leaf.kind == LeafKind::Leaf => {
                leaf.mandatory = parse_bool(construct, value, location)?
            }
            ConstructType::MinElements if leaf.kind == LeafKind::LeafList => {
                leaf.min_elements = Some(parse_number(construct, value, location)?)
            }
            ConstructType::MaxElements if leaf.kind == LeafKind::LeafList => {
                leaf.max_elements = parse_max_elements(value, location)?
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn apply_to_type(
        &mut self,
        slot: &TypeSlot,
        construct: ConstructType,
        value: &str,
        location: &LocationInfo,
    ) -> ParseResult<bool> {
        let Some(ty) = self.type_mut(slot) else {
            return Ok(false);
        };
        match (&mut ty.body, construct) {
            (TypeBody::Leafref { path, .. }, ConstructType::Path) => *path = value.to_string(),
            (TypeBody::Identityref { base }, ConstructType::Base) => {
                *base = Some(NodeReference::new(PrefixedName::parse(value), location.clone()))
            }
            (TypeBody::Bits { bits }, ConstructType::Bit) => bits.push(value.to_string()),
            (TypeBody::Decimal64 { fraction_digits }, ConstructType::FractionDigits) => {
                let digits: u8 = parse_number(construct, value, location)?;
                if !(1..=18).contains(&digits) {
                    return Err(ParserError::invalid_argument(
                        construct,
                        value,
                        "fraction-digits must be between 1 and 18",
                        location,
                    ));
                }
                *fraction_digits = Some(digits);
            }
            (_, ConstructType::Range | ConstructType::Length | ConstructType::Pattern) => ty
                .restrictions
                .push((construct.keyword().to_string(), value.to_string())),
            _ => return Ok(false),
        }
        Ok(true)
    }

    //--------------------------------------------------------------------------
    // Exit checks
    //--------------------------------------------------------------------------

    fn finish_node(&mut self, id: NodeId) -> ParseResult<()> {
        let node = self.graph.node(id);
        match &node.kind {
            NodeKind::Grouping(_) => self.grouping_depth = self.grouping_depth.saturating_sub(1),
            NodeKind::Typedef(info) if info.ty.name.name.is_empty() => {
                return Err(ParserError::missing_statement(
                    ConstructType::Type,
                    ConstructType::Typedef,
                    &node.name,
                    &node.location,
                ));
            }
            NodeKind::Module(info) => {
                for (missing, present) in [
                    (ConstructType::Namespace, info.namespace.is_some()),
                    (ConstructType::Prefix, info.prefix.is_some()),
                ] {
                    if !present {
                        return Err(ParserError::missing_statement(
                            missing,
                            ConstructType::Module,
                            &node.name,
                            &node.location,
                        ));
                    }
                }
            }
            NodeKind::Submodule(info) if info.belongs_to.is_none() => {
                return Err(ParserError::missing_statement(
                    ConstructType::BelongsTo,
                    ConstructType::Submodule,
                    &node.name,
                    &node.location,
                ));
            }
            _ => {}
        }
        Ok(())
    }

    fn finish_type(&mut self, slot: &TypeSlot) -> ParseResult<()> {
        let Some(ty) = self.type_ref(slot) else {
            return Ok(());
        };
        let missing = match &ty.body {
            TypeBody::Leafref { path, .. } if path.is_empty() => Some(ConstructType::Path),
            TypeBody::Identityref { base: None } => Some(ConstructType::Base),
            TypeBody::Enumeration { values, .. } if values.is_empty() => Some(ConstructType::Enum),
            TypeBody::Union { members, .. } if members.is_empty() => Some(ConstructType::Type),
            TypeBody::Decimal64 {
                fraction_digits: None,
            } => Some(ConstructType::FractionDigits),
            _ => None,
        };
        if let Some(missing) = missing {
            return Err(ParserError::missing_statement(
                missing,
                ConstructType::Type,
                ty.name.to_string(),
                &ty.location,
            ));
        }
        // the outermost type settles unions at every depth
        if slot.path.is_empty() {
            if let Some(ty) = self.type_mut(slot) {
                ty.refresh_union_status();
            }
        }
        Ok(())
    }
}

impl StatementListener for SchemaListener<'_> {
    fn enter(&mut self, ctx: &StatementContext<'_>) -> ParseResult<WalkAction> {
        let statement = ctx.statement;
        let keyword = ctx.keyword();
        if statement.is_extension() || SKIPPED_KEYWORDS.contains(&keyword) {
            log::trace!("skipping {keyword} in {}", statement.location);
            return Ok(WalkAction::Skip);
        }
        if keyword == "augment" && ctx.parent_keyword == Some("uses") {
            log::debug!("augment inside uses is not applied, skipping it in {}", statement.location);
            return Ok(WalkAction::Skip);
        }
        let Some(construct) = ConstructType::from_keyword(keyword) else {
            return Err(ParserError::UnknownStatement {
                keyword: keyword.to_string(),
                location: statement.location.clone(),
                span: statement.location.span(),
            });
        };
        if self.stack.is_empty()
            && !matches!(construct, ConstructType::Module | ConstructType::Submodule)
        {
            return Err(ParserError::missing_holder(keyword, &statement.location));
        }

        match construct {
            ConstructType::Module | ConstructType::Submodule => self.enter_root(construct, statement),
            ConstructType::Container
            | ConstructType::List
            | ConstructType::Choice
            | ConstructType::Case
            | ConstructType::Grouping
            | ConstructType::Typedef
            | ConstructType::Uses
            | ConstructType::Augment
            | ConstructType::Identity
            | ConstructType::Rpc
            | ConstructType::Input
            | ConstructType::Output
            | ConstructType::Notification => self.enter_node(construct, statement),
            ConstructType::Leaf | ConstructType::LeafList => self.enter_leaf(construct, statement),
            ConstructType::Type => self.enter_type(statement),
            ConstructType::Import | ConstructType::Include | ConstructType::BelongsTo => {
                self.enter_link(construct, statement)
            }
            ConstructType::Enum => self.enter_enum(statement),
            _ => {
                self.apply_property(construct, statement)?;
                Ok(WalkAction::Skip)
            }
        }
    }

    fn exit(&mut self, _ctx: &StatementContext<'_>) -> ParseResult<()> {
        match self.stack.pop() {
            Some(Parsable::Node(id)) => self.finish_node(id),
            Some(Parsable::Leaf(id)) => {
                let leaf = self.graph.leaf(id);
                if leaf.ty.name.name.is_empty() {
                    return Err(ParserError::missing_statement(
                        ConstructType::Type,
                        leaf.construct(),
                        &leaf.name,
                        &leaf.location,
                    ));
                }
                Ok(())
            }
            Some(Parsable::Type(slot)) => self.finish_type(&slot),
            Some(Parsable::Link { .. }) | Some(Parsable::Enum { .. }) | None => Ok(()),
        }
    }
}

/// Which holders accept a construct directly.
fn can_hold(holder: NodeType, construct: ConstructType) -> bool {
    match construct {
        // choice accepts the short-hand case form
        ConstructType::Container
        | ConstructType::List
        | ConstructType::Choice
        | ConstructType::Leaf
        | ConstructType::LeafList => holder.holds_leaves() || holder == NodeType::Choice,
        ConstructType::Uses => holder.holds_data_definitions(),
        ConstructType::Case => holder == NodeType::Choice,
        ConstructType::Grouping | ConstructType::Typedef => holder.holds_definitions(),
        ConstructType::Augment
        | ConstructType::Identity
        | ConstructType::Rpc
        | ConstructType::Import
        | ConstructType::Include => holder.is_root(),
        ConstructType::BelongsTo => holder == NodeType::Submodule,
        ConstructType::Input | ConstructType::Output => holder == NodeType::Rpc,
        ConstructType::Notification => {
            holder.is_root()
                || matches!(
                    holder,
                    NodeType::Container | NodeType::List | NodeType::Grouping | NodeType::Augment
                )
        }
        _ => false,
    }
}

/// Stands in until the `type` substatement is read; an empty name on exit
/// means the statement was missing.
fn placeholder_type(scope: Option<NodeId>, location: &LocationInfo) -> YangType {
    YangType::new(PrefixedName::local(""), scope, location.clone())
}

fn argument(statement: &Statement) -> ParseResult<&str> {
    statement
        .argument
        .as_deref()
        .ok_or_else(|| ParserError::missing_argument(&statement.keyword, &statement.location))
}

fn parse_bool(construct: ConstructType, value: &str, location: &LocationInfo) -> ParseResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParserError::invalid_argument(
            construct,
            value,
            "expected \"true\" or \"false\"",
            location,
        )),
    }
}

fn parse_number<T>(construct: ConstructType, value: &str, location: &LocationInfo) -> ParseResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|err: T::Err| ParserError::invalid_argument(construct, value, err.to_string(), location))
}

fn parse_max_elements(value: &str, location: &LocationInfo) -> ParseResult<Option<u32>> {
    if value == "unbounded" {
        return Ok(None);
    }
    parse_number(ConstructType::MaxElements, value, location).map(Some)
}
