use std::fmt;

use serde::{Deserialize, Serialize};

/// An identifier as written in a schema file, optionally qualified by an
/// import prefix (`if:interface-type`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefixedName {
    pub prefix: Option<String>,
    pub name: String,
}

impl PrefixedName {
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((prefix, name)) if !prefix.is_empty() && !name.is_empty() => Self {
                prefix: Some(prefix.to_string()),
                name: name.to_string(),
            },
            _ => Self::local(text),
        }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self {
            prefix: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for PrefixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Key of a holder's child schema map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaNodeIdentifier {
    pub name: String,
    pub namespace: Option<String>,
}

impl SchemaNodeIdentifier {
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }
}

impl fmt::Display for SchemaNodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_prefix() {
        let name = PrefixedName::parse("if:interface-type");
        assert_eq!(name.prefix.as_deref(), Some("if"));
        assert_eq!(name.name, "interface-type");
        assert_eq!(name.to_string(), "if:interface-type");
    }

    #[test]
    fn test_parse_keeps_unprefixed_and_degenerate_names() {
        assert_eq!(PrefixedName::parse("string"), PrefixedName::local("string"));
        assert_eq!(PrefixedName::parse(":odd"), PrefixedName::local(":odd"));
    }
}
