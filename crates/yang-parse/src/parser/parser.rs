use miette::SourceSpan;
use yang_source::LocationInfo;

use crate::error::{ParseResult, ParserError};
use crate::lexer::{Token, TokenKind};
use crate::parser::Statement;

/// Recursive-descent parser over the generic YANG statement grammar.
pub struct Parser<'a> {
    file: &'a str,
    tokens: &'a [Token<'a>],
    pos: usize,
    eof: usize,
}

impl<'a> Parser<'a> {
    pub fn new(file: &'a str, tokens: &'a [Token<'a>], source_len: usize) -> Self {
        Self {
            file,
            tokens,
            pos: 0,
            eof: source_len,
        }
    }

    /// Peek at the current token without consuming it.
    fn peek(&self) -> Option<&'a Token<'a>> {
        self.tokens.get(self.pos)
    }

    /// Consume and return the current token.
    fn next(&mut self) -> Option<&'a Token<'a>> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn location_of(&self, token: &Token<'_>) -> LocationInfo {
        LocationInfo::new(self.file, token.line, token.column)
            .with_span(token.span.offset(), token.span.len())
    }

    fn unexpected(&self, expected: &str, token: &Token<'_>) -> ParserError {
        let location = self.location_of(token);
        ParserError::UnexpectedToken {
            expected: expected.to_string(),
            found: format!("{} \"{}\"", token.kind.describe(), token.text),
            span: location.span(),
            location,
        }
    }

    fn end_of_file(&self, expected: &str) -> ParserError {
        ParserError::UnexpectedEof {
            expected: expected.to_string(),
            file: self.file.to_string(),
            span: SourceSpan::new(self.eof.into(), 0usize),
        }
    }

    /// Expect the next token to be of a specific kind.
    fn expect(&mut self, expected: TokenKind) -> ParseResult<&'a Token<'a>> {
        match self.next() {
            Some(t) if t.kind == expected => Ok(t),
            Some(t) => Err(self.unexpected(expected.describe(), t)),
            None => Err(self.end_of_file(expected.describe())),
        }
    }

    //--------------------------------------------------------------------------
    // <File> ::= <Statement>
    //--------------------------------------------------------------------------

    pub fn parse_file(&mut self) -> ParseResult<Statement> {
        let root = self.parse_statement()?;
        if let Some(extra) = self.peek() {
            // a file carries exactly one module or submodule
            let location = self.location_of(extra);
            return Err(ParserError::missing_holder(extra.text.as_ref(), &location));
        }
        Ok(root)
    }

    //--------------------------------------------------------------------------
    // <Statement> ::= <keyword> [<Argument>] (";" | "{" <Statement>* "}")
    //--------------------------------------------------------------------------

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let keyword = match self.next() {
            Some(t) if t.kind == TokenKind::UnquotedString => t,
            Some(t) => return Err(self.unexpected("statement keyword", t)),
            None => return Err(self.end_of_file("statement keyword")),
        };
        let location = self.location_of(keyword);
        let argument = self.parse_argument()?;

        let mut substatements = Vec::new();
        match self.next() {
            Some(t) if t.kind == TokenKind::Semicolon => {}
            Some(t) if t.kind == TokenKind::LBrace => loop {
                match self.peek() {
                    Some(t) if t.kind == TokenKind::RBrace => {
                        self.next();
                        break;
                    }
                    Some(_) => substatements.push(self.parse_statement()?),
                    None => return Err(self.end_of_file(TokenKind::RBrace.describe())),
                }
            },
            Some(t) => return Err(self.unexpected("\";\" or \"{\"", t)),
            None => return Err(self.end_of_file("\";\" or \"{\"")),
        }

        Ok(Statement {
            keyword: keyword.text.to_string(),
            argument,
            location,
            substatements,
        })
    }

    //--------------------------------------------------------------------------
    // <Argument> ::= <unquoted> | <quoted> ("+" <quoted>)*
    //--------------------------------------------------------------------------

    fn parse_argument(&mut self) -> ParseResult<Option<String>> {
        let Some(first) = self.peek() else {
            return Ok(None);
        };
        match first.kind {
            TokenKind::UnquotedString => {
                self.next();
                Ok(Some(first.text.to_string()))
            }
            TokenKind::QuotedString => {
                self.next();
                let mut value = first.text.to_string();
                while matches!(self.peek(), Some(t) if t.kind == TokenKind::Plus) {
                    self.next();
                    value.push_str(&self.expect(TokenKind::QuotedString)?.text);
                }
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse(input: &str) -> ParseResult<Statement> {
        let tokens = lex("t.yang", input)?;
        Parser::new("t.yang", &tokens, input.len()).parse_file()
    }

    #[test]
    fn test_nested_statements() {
        let root = parse("module m { namespace \"urn:m\"; container c { leaf x { type string; } } }").unwrap();
        assert_eq!(root.keyword, "module");
        assert_eq!(root.argument.as_deref(), Some("m"));
        assert_eq!(root.substatements.len(), 2);
        let leaf = &root.substatements[1].substatements[0];
        assert_eq!(leaf.keyword, "leaf");
        assert_eq!(leaf.find("type").and_then(|t| t.argument.as_deref()), Some("string"));
    }

    #[test]
    fn test_string_concatenation() {
        let root = parse("description \"a\" + 'b' + \"c\";").unwrap();
        assert_eq!(root.argument.as_deref(), Some("abc"));
    }

    #[test]
    fn test_statement_without_argument() {
        let root = parse("input { leaf x { type int8; } }").unwrap();
        assert_eq!(root.argument, None);
        assert_eq!(root.substatements[0].location.line, 1);
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse("module m { leaf x;").unwrap_err();
        assert!(matches!(err, ParserError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_second_top_level_statement() {
        let err = parse("module a { }\nmodule b { }").unwrap_err();
        match err {
            ParserError::MissingHolder { construct, location, .. } => {
                assert_eq!(construct, "module");
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_stray_brace() {
        let err = parse("module m { } }").unwrap_err();
        assert!(matches!(err, ParserError::MissingHolder { .. }));
        let err = parse("module m { ; }").unwrap_err();
        assert!(matches!(err, ParserError::UnexpectedToken { .. }));
    }
}
