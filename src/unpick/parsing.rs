//! Parsing module for the unpick DSL
//!
//! Recursive descent over the token stream of the [`Lexer`](crate::unpick::lexing::Lexer):
//!
//! - **items**: top-level declarations (`target_field`, `target_method`, group definitions)
//!   and their indented bodies
//! - **expression**: replacement expressions, parsed by precedence climbing
//!
//! The parser stops at the first error. Errors carry the 1-based position of the offending
//! token; see [`format_source_context`](crate::unpick::error::format_source_context) for
//! rendering them against the source.

pub mod expression;
pub mod items;

use crate::unpick::ast::{Position, Tree};
use crate::unpick::error::{ParseError, ParseErrorKind};
use crate::unpick::lexing::{DescriptorKind, Lexer, Spanned, Token};
use std::ops::Range;
use tracing::trace;

/// Parse a complete DSL file into a [`Tree`].
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new(source)?;
    let tree = items::parse_items(&mut parser)?;
    trace!(items = tree.items.len(), "parsed unpick definitions");
    Ok(tree)
}

/// Token cursor shared by the item and expression parsers.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        Ok(Self {
            lexer: Lexer::new(source)?,
        })
    }

    pub(crate) fn next(&mut self) -> Result<Spanned, ParseError> {
        self.lexer.next_token()
    }

    pub(crate) fn peek(&mut self) -> Result<&Token, ParseError> {
        Ok(&self.lexer.peek()?.token)
    }

    pub(crate) fn peek2(&mut self) -> Result<&Token, ParseError> {
        Ok(&self.lexer.peek2()?.token)
    }

    pub(crate) fn descriptor(&mut self, kind: DescriptorKind) -> Result<String, ParseError> {
        self.lexer.next_descriptor(kind).map(|(text, _)| text)
    }

    /// Consume the next token if it equals `token`.
    pub(crate) fn eat(&mut self, token: &Token) -> Result<bool, ParseError> {
        if self.peek()? == token {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn position(&self, span: &Range<usize>) -> Position {
        self.lexer.position(span.start)
    }

    /// Source text covered by `span`.
    pub(crate) fn text(&self, span: &Range<usize>) -> &'src str {
        self.lexer.source().get(span.clone()).unwrap_or_default()
    }

    pub(crate) fn error(&self, span: &Range<usize>, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.position(span), kind)
    }

    pub(crate) fn unexpected(&self, found: &Spanned, expected: &str) -> ParseError {
        self.error(
            &found.span,
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: found.token.describe(),
            },
        )
    }

    pub(crate) fn expect(&mut self, token: Token, expected: &str) -> Result<Spanned, ParseError> {
        let spanned = self.next()?;
        if spanned.token == token {
            Ok(spanned)
        } else {
            Err(self.unexpected(&spanned, expected))
        }
    }

    pub(crate) fn expect_newline(&mut self) -> Result<(), ParseError> {
        self.expect(Token::Newline, "end of line").map(|_| ())
    }

    pub(crate) fn identifier(&mut self, expected: &str) -> Result<(String, Range<usize>), ParseError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Identifier(name) => Ok((name, spanned.span)),
            _ => Err(self.unexpected(&spanned, expected)),
        }
    }

    /// A dotted name such as `com.example.Outer$Inner` or a package name.
    pub(crate) fn dotted_name(&mut self, expected: &str) -> Result<String, ParseError> {
        let (mut name, _) = self.identifier(expected)?;
        while self.eat(&Token::Dot)? {
            let (segment, _) = self.identifier("name segment after `.`")?;
            name.push('.');
            name.push_str(&segment);
        }
        Ok(name)
    }
}
