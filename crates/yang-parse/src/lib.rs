//! Front-end of the yangc schema compiler.
//!
//! Text is scanned into tokens, parsed into a generic statement tree
//! (`keyword [argument] (";" | "{" ... "}")`), and walked with entry/exit
//! callbacks by a [`SchemaListener`] that builds the file's schema tree in a
//! shared [`SchemaGraph`].

pub mod error;
pub mod lexer;
pub mod listener;
pub mod parser;
pub mod walker;

pub use error::{ParseResult, ParserError};
pub use listener::SchemaListener;
pub use parser::{Parser, Statement};
pub use walker::{walk, StatementContext, StatementListener, WalkAction};

use yang_schema::{NodeId, SchemaGraph};
use yang_source::SourceFile;

/// Parses a file into its statement tree.
pub fn parse_statements(file: &SourceFile) -> ParseResult<Statement> {
    let tokens = lexer::lex(&file.location, &file.contents)?;
    Parser::new(&file.location, &tokens, file.contents.len()).parse_file()
}

/// Builds the schema tree of `file` into `graph` and registers its module or
/// submodule as a root.
///
/// On error the file contributes no root; nodes it created before failing stay
/// unreachable in the arena.
pub fn parse_file(graph: &mut SchemaGraph, file: &SourceFile) -> ParseResult<NodeId> {
    let statement = parse_statements(file)?;
    let mut listener = SchemaListener::new(graph);
    walk(&statement, &mut listener)?;
    let root = listener
        .root()
        .ok_or_else(|| ParserError::missing_holder(&statement.keyword, &statement.location))?;
    graph.add_root(root);
    log::debug!("parsed {} into root {:?}", file.location, root);
    Ok(root)
}

/// Convenience wrapper over [`parse_file`] for in-memory text.
pub fn parse_str(graph: &mut SchemaGraph, path: &str, text: &str) -> ParseResult<NodeId> {
    parse_file(graph, &SourceFile::new(path, text))
}
