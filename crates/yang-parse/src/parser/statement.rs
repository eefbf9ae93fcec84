use yang_source::LocationInfo;

/// A generic YANG statement: `keyword [argument] (";" | "{" statement* "}")`.
///
/// `location` points at the keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub keyword: String,
    pub argument: Option<String>,
    pub location: LocationInfo,
    pub substatements: Vec<Statement>,
}

impl Statement {
    /// Extension statements are written `prefix:keyword`.
    pub fn is_extension(&self) -> bool {
        self.keyword.contains(':')
    }

    pub fn find(&self, keyword: &str) -> Option<&Statement> {
        self.substatements.iter().find(|s| s.keyword == keyword)
    }
}
