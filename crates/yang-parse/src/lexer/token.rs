use std::borrow::Cow;

use miette::SourceSpan;

/// Lexical classes of YANG text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    Semicolon,
    /// `+` joining two quoted strings
    Plus,
    /// Double or single quoted string, already unescaped
    QuotedString,
    /// Keyword, identifier or unquoted argument
    UnquotedString,
}

impl TokenKind {
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Plus => "'+'",
            TokenKind::QuotedString => "quoted string",
            TokenKind::UnquotedString => "string",
        }
    }
}

/// A token with its position.
///
/// `line` is 1-based and `column` 0-based, counted in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: Cow<'a, str>,
    pub span: SourceSpan,
    pub line: u32,
    pub column: u32,
}
