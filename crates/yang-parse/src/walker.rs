//! Depth-first traversal of a statement tree with entry/exit callbacks.
//!
//! The walk uses an explicit stack, so deeply nested files do not grow the
//! native call stack. `exit` is only called for statements whose `enter`
//! asked to descend.

use crate::error::ParseResult;
use crate::parser::Statement;

/// What the walker should do after `enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Visit the substatements, then call `exit`.
    Descend,
    /// Skip the substatements and do not call `exit`.
    Skip,
}

/// Context handed to listener callbacks.
pub struct StatementContext<'s> {
    pub statement: &'s Statement,
    /// Keyword of the enclosing statement, `None` at the top level
    pub parent_keyword: Option<&'s str>,
}

impl StatementContext<'_> {
    pub fn keyword(&self) -> &str {
        &self.statement.keyword
    }

    pub fn argument(&self) -> Option<&str> {
        self.statement.argument.as_deref()
    }
}

pub trait StatementListener {
    fn enter(&mut self, ctx: &StatementContext<'_>) -> ParseResult<WalkAction>;
    fn exit(&mut self, ctx: &StatementContext<'_>) -> ParseResult<()>;
}

enum Frame<'s> {
    Enter(&'s Statement, Option<&'s str>),
    Exit(&'s Statement, Option<&'s str>),
}

/// Walks `root` and every descendant, stopping at the first error.
pub fn walk<L: StatementListener>(root: &Statement, listener: &mut L) -> ParseResult<()> {
    let mut stack = vec![Frame::Enter(root, None)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(statement, parent_keyword) => {
                let ctx = StatementContext {
                    statement,
                    parent_keyword,
                };
                if listener.enter(&ctx)? == WalkAction::Skip {
                    continue;
                }
                stack.push(Frame::Exit(statement, parent_keyword));
                let keyword = Some(statement.keyword.as_str());
                for child in statement.substatements.iter().rev() {
                    stack.push(Frame::Enter(child, keyword));
                }
            }
            Frame::Exit(statement, parent_keyword) => {
                listener.exit(&StatementContext {
                    statement,
                    parent_keyword,
                })?;
            }
        }
    }
    Ok(())
}
