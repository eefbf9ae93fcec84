use std::borrow::Cow;

use miette::SourceSpan;
use yang_source::LocationInfo;

use crate::error::{ParseResult, ParserError};
use crate::lexer::{Token, TokenKind};

/// Scans YANG text into tokens.
///
/// Written by hand because whether `/` starts a comment or belongs to an
/// unquoted argument (`/if:interfaces`, `../name`) depends on what precedes
/// it.
pub struct Lexer<'a> {
    src: &'a str,
    file: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
}

/// Tokenizes a whole file.
pub fn lex<'a>(file: &'a str, input: &'a str) -> ParseResult<Vec<Token<'a>>> {
    let mut lexer = Lexer::new(file, input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a str, src: &'a str) -> Self {
        Self {
            src,
            file,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn column(&self) -> u32 {
        self.src[self.line_start..self.pos].chars().count() as u32
    }

    fn location(&self, line: u32, column: u32, offset: usize, length: usize) -> LocationInfo {
        LocationInfo::new(self.file, line, column).with_span(offset, length)
    }

    fn at_comment_start(&self) -> bool {
        self.peek_char() == Some('/') && matches!(self.peek_second(), Some('/') | Some('*'))
    }

    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let (start, line, column) = (self.pos, self.line, self.column());
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek_char() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                let location = self.location(line, column, start, 2);
                                return Err(ParserError::UnterminatedComment {
                                    span: location.span(),
                                    location,
                                });
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> ParseResult<Option<Token<'a>>> {
        self.skip_trivia()?;
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let (start, line, column) = (self.pos, self.line, self.column());
        let (kind, text) = match c {
            '{' => {
                self.bump();
                (TokenKind::LBrace, Cow::Borrowed("{"))
            }
            '}' => {
                self.bump();
                (TokenKind::RBrace, Cow::Borrowed("}"))
            }
            ';' => {
                self.bump();
                (TokenKind::Semicolon, Cow::Borrowed(";"))
            }
            '+' if self.peek_second().map_or(true, |n| n.is_whitespace() || n == '"' || n == '\'') => {
                self.bump();
                (TokenKind::Plus, Cow::Borrowed("+"))
            }
            '"' => (TokenKind::QuotedString, self.double_quoted(line, column)?),
            '\'' => (TokenKind::QuotedString, self.single_quoted(line, column)?),
            _ => (TokenKind::UnquotedString, Cow::Borrowed(self.unquoted())),
        };

        Ok(Some(Token {
            kind,
            text,
            span: SourceSpan::new(start.into(), self.pos - start),
            line,
            column,
        }))
    }

    fn unquoted(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || matches!(c, ';' | '{' | '}') || self.at_comment_start() {
                break;
            }
            self.bump();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    fn single_quoted(&mut self, line: u32, column: u32) -> ParseResult<Cow<'a, str>> {
        let quote = self.pos;
        self.bump();
        let start = self.pos;
        loop {
            match self.bump() {
                Some('\'') => {
                    let src = self.src;
                    return Ok(Cow::Borrowed(&src[start..self.pos - 1]));
                }
                Some(_) => {}
                None => {
                    let location = self.location(line, column, quote, 1);
                    return Err(ParserError::UnterminatedString {
                        span: location.span(),
                        location,
                    });
                }
            }
        }
    }

    /// Double-quoted strings are unescaped, and continuation lines lose the
    /// indentation up to the column after the opening quote, as well as
    /// trailing whitespace before each line break.
    fn double_quoted(&mut self, line: u32, column: u32) -> ParseResult<Cow<'a, str>> {
        let quote = self.pos;
        self.bump();
        let indent = column as usize + 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => {
                        let location = self.location(line, column, quote, 1);
                        return Err(ParserError::UnterminatedString {
                            span: location.span(),
                            location,
                        });
                    }
                },
                Some('\n') => {
                    let trimmed = value.trim_end_matches([' ', '\t']).len();
                    value.truncate(trimmed);
                    value.push('\n');
                    let mut skipped = 0;
                    while skipped < indent && matches!(self.peek_char(), Some(' ') | Some('\t')) {
                        self.bump();
                        skipped += 1;
                    }
                }
                Some(c) => value.push(c),
                None => {
                    let location = self.location(line, column, quote, 1);
                    return Err(ParserError::UnterminatedString {
                        span: location.span(),
                        location,
                    });
                }
            }
        }
        let src = self.src;
        let raw = &src[quote + 1..self.pos - 1];
        if !raw.contains(['\\', '\n']) {
            return Ok(Cow::Borrowed(raw));
        }
        Ok(Cow::Owned(value))
    }
}
