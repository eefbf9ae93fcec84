use std::fmt;

use serde::{Deserialize, Serialize};
use yang_source::LocationInfo;

use crate::ids::{LeafId, NodeId};
use crate::name::PrefixedName;
use crate::reference::NodeReference;
use crate::status::ResolvableStatus;

/// Built-in YANG types plus `Derived` for references to a typedef.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64,
    String,
    Boolean,
    Enumeration,
    Bits,
    Binary,
    Leafref,
    Identityref,
    Empty,
    Union,
    InstanceIdentifier,
    Derived,
}

impl DataType {
    /// Classifies a written type name. Prefixed names always denote typedefs.
    pub fn from_name(name: &PrefixedName) -> DataType {
        if name.prefix.is_some() {
            return DataType::Derived;
        }
        match name.name.as_str() {
            "int8" => DataType::Int8,
            "int16" => DataType::Int16,
            "int32" => DataType::Int32,
            "int64" => DataType::Int64,
            "uint8" => DataType::Uint8,
            "uint16" => DataType::Uint16,
            "uint32" => DataType::Uint32,
            "uint64" => DataType::Uint64,
            "decimal64" => DataType::Decimal64,
            "string" => DataType::String,
            "boolean" => DataType::Boolean,
            "enumeration" => DataType::Enumeration,
            "bits" => DataType::Bits,
            "binary" => DataType::Binary,
            "leafref" => DataType::Leafref,
            "identityref" => DataType::Identityref,
            "empty" => DataType::Empty,
            "union" => DataType::Union,
            "instance-identifier" => DataType::InstanceIdentifier,
            _ => DataType::Derived,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Uint8 => "uint8",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Uint64 => "uint64",
            DataType::Decimal64 => "decimal64",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Enumeration => "enumeration",
            DataType::Bits => "bits",
            DataType::Binary => "binary",
            DataType::Leafref => "leafref",
            DataType::Identityref => "identityref",
            DataType::Empty => "empty",
            DataType::Union => "union",
            DataType::InstanceIdentifier => "instance-identifier",
            DataType::Derived => "derived",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: Option<i64>,
}

/// Type-specific payload of a `YangType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeBody {
    Plain,
    /// `owner` is the holder under which the generated enumeration lives.
    Enumeration {
        values: Vec<EnumValue>,
        owner: Option<NodeId>,
    },
    /// `owner` is the holder under which the generated union lives.
    Union {
        members: Vec<YangType>,
        owner: Option<NodeId>,
    },
    Leafref {
        path: String,
        target: Option<LeafId>,
        status: ResolvableStatus,
    },
    Identityref {
        base: Option<NodeReference>,
    },
    Bits {
        bits: Vec<String>,
    },
    Decimal64 {
        fraction_digits: Option<u8>,
    },
}

/// A `type` statement.
///
/// `scope` is the node the statement was written in. Derived and identity
/// lookups start there, so a copy made by grouping expansion still resolves
/// against the grouping's declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YangType {
    pub name: PrefixedName,
    pub data_type: DataType,
    pub scope: Option<NodeId>,
    pub status: ResolvableStatus,
    /// Typedef bound to a `Derived` type
    pub typedef: Option<NodeId>,
    pub body: TypeBody,
    /// `range`, `length` and `pattern` arguments, kept as written
    pub restrictions: Vec<(String, String)>,
    pub location: LocationInfo,
}

impl YangType {
    pub fn new(name: PrefixedName, scope: Option<NodeId>, location: LocationInfo) -> Self {
        let data_type = DataType::from_name(&name);
        let status = match data_type {
            // a union settles once its members are known
            DataType::Derived | DataType::Identityref | DataType::Union => {
                ResolvableStatus::Unresolved
            }
            _ => ResolvableStatus::Resolved,
        };
        let body = match data_type {
            DataType::Enumeration => TypeBody::Enumeration {
                values: vec![],
                owner: scope,
            },
            DataType::Union => TypeBody::Union {
                members: vec![],
                owner: scope,
            },
            DataType::Leafref => TypeBody::Leafref {
                path: String::new(),
                target: None,
                status: ResolvableStatus::Unresolved,
            },
            DataType::Identityref => TypeBody::Identityref { base: None },
            DataType::Bits => TypeBody::Bits { bits: vec![] },
            DataType::Decimal64 => TypeBody::Decimal64 {
                fraction_digits: None,
            },
            _ => TypeBody::Plain,
        };
        Self {
            name,
            data_type,
            scope,
            status,
            typedef: None,
            body,
            restrictions: vec![],
            location,
        }
    }

    /// Recomputes a union's status from its members; monotonic like every
    /// other status change.
    pub fn refresh_union_status(&mut self) -> bool {
        let TypeBody::Union { members, .. } = &mut self.body else {
            return false;
        };
        let mut changed = false;
        for member in members.iter_mut() {
            changed |= member.refresh_union_status();
        }
        let weakest = members
            .iter()
            .map(|m| m.status)
            .min()
            .unwrap_or(ResolvableStatus::Resolved);
        changed | self.status.advance(weakest)
    }

    /// Union member addressed by `path` (indices into nested member lists).
    pub fn member(&self, path: &[usize]) -> Option<&YangType> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        match &self.body {
            TypeBody::Union { members, .. } => members.get(*first)?.member(rest),
            _ => None,
        }
    }

    pub fn member_mut(&mut self, path: &[usize]) -> Option<&mut YangType> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        match &mut self.body {
            TypeBody::Union { members, .. } => members.get_mut(*first)?.member_mut(rest),
            _ => None,
        }
    }

    /// Paths of every type in this tree (itself first) that still needs a
    /// reference bound: derived types and identityref bases.
    pub fn unresolved_paths(&self) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut pending = vec![(Vec::new(), self)];
        while let Some((path, ty)) = pending.pop() {
            let needs_binding = matches!(ty.data_type, DataType::Derived | DataType::Identityref);
            if needs_binding && !ty.status.is_resolved() {
                paths.push(path.clone());
            }
            if let TypeBody::Union { members, .. } = &ty.body {
                for (index, member) in members.iter().enumerate().rev() {
                    let mut child = path.clone();
                    child.push(index);
                    pending.push((child, member));
                }
            }
        }
        paths
    }

    /// Whether any generated enumeration or union lives under a holder.
    pub fn has_owned_definitions(&self) -> bool {
        match &self.body {
            TypeBody::Enumeration { .. } => true,
            TypeBody::Union { .. } => true,
            _ => false,
        }
    }

    /// Points every generated enumeration and union in this tree at `owner`.
    pub fn set_owner(&mut self, new_owner: NodeId) {
        match &mut self.body {
            TypeBody::Enumeration { owner, .. } => *owner = Some(new_owner),
            TypeBody::Union { members, owner } => {
                *owner = Some(new_owner);
                for member in members {
                    member.set_owner(new_owner);
                }
            }
            _ => {}
        }
    }

    pub fn leafref(&self) -> Option<(&str, Option<LeafId>, ResolvableStatus)> {
        match &self.body {
            TypeBody::Leafref {
                path,
                target,
                status,
            } => Some((path.as_str(), *target, *status)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(name: &str) -> YangType {
        YangType::new(PrefixedName::parse(name), None, LocationInfo::default())
    }

    #[test]
    fn test_builtin_types_start_resolved() {
        assert!(ty("uint32").status.is_resolved());
        assert!(ty("enumeration").status.is_resolved());
        assert_eq!(ty("counter").data_type, DataType::Derived);
        assert_eq!(ty("counter").status, ResolvableStatus::Unresolved);
        assert_eq!(ty("yang:string").data_type, DataType::Derived);
    }

    #[test]
    fn test_union_status_follows_weakest_member() {
        let mut union = ty("union");
        if let TypeBody::Union { members, .. } = &mut union.body {
            members.push(ty("string"));
            members.push(ty("t:counter"));
        }
        assert_eq!(union.unresolved_paths(), vec![vec![1]]);

        assert!(!union.refresh_union_status());
        union.member_mut(&[1]).unwrap().status = ResolvableStatus::Resolved;
        assert!(union.refresh_union_status());
        assert!(union.status.is_resolved());
        assert!(union.unresolved_paths().is_empty());
    }

    #[test]
    fn test_set_owner_reaches_nested_members() {
        let owner = NodeId::from_raw(7).unwrap();
        let mut union = ty("union");
        if let TypeBody::Union { members, .. } = &mut union.body {
            members.push(ty("enumeration"));
        }
        union.set_owner(owner);
        match &union.member(&[0]).unwrap().body {
            TypeBody::Enumeration { owner: got, .. } => assert_eq!(*got, Some(owner)),
            other => panic!("unexpected body {other:?}"),
        }
    }
}
