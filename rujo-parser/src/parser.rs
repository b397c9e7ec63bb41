use crate::ast::*;
use crate::lexer::{Lexer, Token, TokenKind};
use rujo_source::{Diagnostic, DiagnosticKind, Source};
use std::mem;
use thiserror::Error;

mod expr;
mod stmt;

/// A fatal syntax error. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{line}:{column}: expected {expected}, found {found}")]
    Unexpected {
        line: u32,
        column: u32,
        expected: String,
        found: String,
    },
    #[error("{line}:{column}: illegal character `{text}`")]
    Illegal { line: u32, column: u32, text: String },
    #[error("{line}:{column}: left side of `=` is not assignable")]
    InvalidAssignTarget { line: u32, column: u32 },
    #[error("{line}:{column}: integer literal `{text}` does not fit in `int`")]
    IntegerOverflow { line: u32, column: u32, text: String },
}

impl ParseError {
    /// Converts the error into a positioned [`Diagnostic`] so it can be reported alongside soft errors.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (kind, line, column, message) = match self {
            ParseError::Illegal { line, column, text } => (
                DiagnosticKind::Lexical,
                *line,
                *column,
                format!("illegal character `{}`", text),
            ),
            ParseError::Unexpected {
                line,
                column,
                expected,
                found,
            } => (
                DiagnosticKind::Syntax,
                *line,
                *column,
                format!("expected {}, found {}", expected, found),
            ),
            ParseError::InvalidAssignTarget { line, column } => (
                DiagnosticKind::Syntax,
                *line,
                *column,
                "left side of `=` is not assignable".to_string(),
            ),
            ParseError::IntegerOverflow { line, column, text } => (
                DiagnosticKind::Syntax,
                *line,
                *column,
                format!("integer literal `{}` does not fit in `int`", text),
            ),
        };
        Diagnostic::at(kind, message, line, column)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive descent parser with a two token lookahead.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token<'a>,
    /// Cached token for peeking.
    peek_token: Token<'a>,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let mut lexer = Lexer::new(source.content);
        let current_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            current_token,
            peek_token,
            source,
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses the whole input.
    ///
    /// Unrecognized tokens at the start of a top-level or block statement are reported to
    /// `source.errors` and skipped. Any other syntax error aborts the parse.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let statements = self.parse_stmt_list(TokenKind::Eof)?;
        log::debug!("parsed {} top-level statements", statements.len());
        Ok(Program { statements })
    }
}

/// Parses `source` into a [`Program`]. See [`Parser::parse_program`].
pub fn parse_program(source: &Source) -> ParseResult<Program> {
    Parser::new(source).parse_program()
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Advances the cursor and returns the token that was current.
    fn next(&mut self) -> Token<'a> {
        let peek = mem::replace(&mut self.peek_token, self.lexer.next_token());
        mem::replace(&mut self.current_token, peek)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    /// Predicate that tests whether the current token is of the given kind and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'a>> {
        if self.at(kind) {
            Ok(self.next())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        Ok(self.expect(TokenKind::Identifier)?.text.to_string())
    }

    /// Parses a type name: a primitive type keyword or a class name.
    fn parse_type_name(&mut self) -> ParseResult<String> {
        if let Some(name) = self.current_token.kind.primitive_type() {
            self.next();
            Ok(name.to_string())
        } else if self.at(TokenKind::Identifier) {
            self.expect_identifier()
        } else {
            Err(self.unexpected("type name"))
        }
    }

    /// Creates an error for the current token. Illegal tokens are always reported as such.
    fn unexpected(&self, expected: &str) -> ParseError {
        let token = &self.current_token;
        if token.kind == TokenKind::Illegal {
            ParseError::Illegal {
                line: token.line,
                column: token.column,
                text: token.text.to_string(),
            }
        } else {
            ParseError::Unexpected {
                line: token.line,
                column: token.column,
                expected: expected.to_string(),
                found: token.to_string(),
            }
        }
    }

    /// Reports the current token as a soft error and discards it.
    fn skip_unexpected(&mut self) {
        let token = self.next();
        log::trace!("skipping {} at {}:{}", token, token.line, token.column);
        self.source.errors.add_error(Diagnostic::at(
            DiagnosticKind::Syntax,
            format!("unexpected {} at start of statement", token),
            token.line,
            token.column,
        ));
    }
}
