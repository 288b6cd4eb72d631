//! Lexer
//!
//! This module turns unpick DSL text into a stream of positioned tokens.
//!
//! Structure:
//!     The raw tokenization is done by the logos lexer in [`tokens`]. The [`Lexer`] wrapper
//!     adds what a regular lexer cannot express on its own:
//!     - the mandatory `unpick v3` header line
//!     - indentation: leading whitespace on a line with content becomes a single `Indent`
//!     - newlines: blank and comment-only lines vanish, every line with content ends in exactly
//!       one `Newline` (including the last line of the file), followed by `Eof`
//!     - descriptor mode: JVM descriptors are scanned on demand, see [`Lexer::next_descriptor`]
//!     - one and two token lookahead for the parser
//!
//! Indentation Handling
//!
//!     The DSL only ever nests one level deep (group bodies and method target bodies), so there
//!     is no indent/dedent pairing. A single tab or any run of spaces is one `Indent`; other
//!     tab runs are rejected. The parser decides per line whether an indented line is allowed.

pub mod descriptors;
pub mod escapes;
pub mod numbers;
pub mod tokens;

pub use descriptors::DescriptorKind;
pub use tokens::{LexErrorKind, Token};

use crate::unpick::ast::{Position, SourceLocation};
use crate::unpick::error::{ParseError, ParseErrorKind};
use logos::Logos;
use std::collections::VecDeque;
use std::ops::Range;

/// The first line every DSL file must carry.
pub const HEADER: &str = "unpick v3";

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Token>,
    location: SourceLocation<'src>,
    lookahead: VecDeque<Spanned>,
    at_line_start: bool,
    line_has_content: bool,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Check the header line and position the lexer at the start of the body.
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        let (header, body_start) = match source.find('\n') {
            Some(end) => (&source[..end], end + 1),
            None => (source, source.len()),
        };
        if header.trim_end() != HEADER {
            return Err(ParseError::new(
                Position::default(),
                ParseErrorKind::MissingHeader,
            ));
        }

        let mut inner = Token::lexer(source);
        inner.bump(body_start);

        Ok(Self {
            inner,
            location: SourceLocation::new(source),
            lookahead: VecDeque::new(),
            at_line_start: true,
            line_has_content: false,
            finished: false,
        })
    }

    pub fn source(&self) -> &'src str {
        self.inner.source()
    }

    pub fn position(&self, offset: usize) -> Position {
        self.location.byte_to_position(offset)
    }

    /// Consume the next token.
    pub fn next_token(&mut self) -> Result<Spanned, ParseError> {
        match self.lookahead.pop_front() {
            Some(spanned) => Ok(spanned),
            None => self.scan(),
        }
    }

    pub fn peek(&mut self) -> Result<&Spanned, ParseError> {
        self.fill(1)?;
        Ok(&self.lookahead[0])
    }

    /// The token after [`peek`](Self::peek); separates `(int)` casts from `(x)` groupings.
    pub fn peek2(&mut self) -> Result<&Spanned, ParseError> {
        self.fill(2)?;
        Ok(&self.lookahead[1])
    }

    /// Scan a descriptor of the given kind, skipping leading spaces.
    ///
    /// Descriptor text overlaps identifiers and operators, so tokens already buffered by
    /// lookahead are discarded and the input is rescanned from the first of them.
    pub fn next_descriptor(
        &mut self,
        kind: DescriptorKind,
    ) -> Result<(String, Range<usize>), ParseError> {
        if let Some(first) = self.lookahead.front() {
            let restart = first.span.start;
            self.lookahead.clear();
            self.inner = Token::lexer(self.inner.source());
            self.inner.bump(restart);
            self.at_line_start = false;
            self.line_has_content = true;
            self.finished = false;
        }

        let rest = self.inner.remainder();
        let skipped = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let start = self.inner.span().end + skipped;

        match descriptors::scan(&rest[skipped..], kind) {
            Some(len) => {
                let text = rest[skipped..skipped + len].to_string();
                self.inner.bump(skipped + len);
                Ok((text, start..start + len))
            }
            None => Err(ParseError::new(
                self.position(start),
                LexErrorKind::InvalidDescriptor,
            )),
        }
    }

    fn fill(&mut self, count: usize) -> Result<(), ParseError> {
        while self.lookahead.len() < count {
            let spanned = self.scan()?;
            self.lookahead.push_back(spanned);
        }
        Ok(())
    }

    fn scan(&mut self) -> Result<Spanned, ParseError> {
        loop {
            let end = self.inner.source().len();
            if self.finished {
                return Ok(Spanned {
                    token: Token::Eof,
                    span: end..end,
                });
            }

            if self.at_line_start {
                self.at_line_start = false;
                if let Some(indent) = self.scan_indent()? {
                    return Ok(indent);
                }
            }

            match self.inner.next() {
                None => {
                    self.finished = true;
                    if std::mem::take(&mut self.line_has_content) {
                        return Ok(Spanned {
                            token: Token::Newline,
                            span: end..end,
                        });
                    }
                }
                Some(Ok(Token::Whitespace | Token::Comment)) => {}
                Some(Ok(Token::Newline)) => {
                    self.at_line_start = true;
                    if std::mem::take(&mut self.line_has_content) {
                        return Ok(Spanned {
                            token: Token::Newline,
                            span: self.inner.span(),
                        });
                    }
                }
                Some(Ok(token)) => {
                    self.line_has_content = true;
                    return Ok(Spanned {
                        token,
                        span: self.inner.span(),
                    });
                }
                Some(Err(kind)) => {
                    return Err(ParseError::new(self.position(self.inner.span().start), kind));
                }
            }
        }
    }

    // Leading whitespace is an indent only when the line carries a token.
    // An indent is either one tab or a run of spaces.
    fn scan_indent(&mut self) -> Result<Option<Spanned>, ParseError> {
        let rest = self.inner.remainder();
        let trimmed = rest.trim_start_matches([' ', '\t']);
        let width = rest.len() - trimmed.len();
        let blank = trimmed.is_empty() || trimmed.starts_with(['\r', '\n', '#']);
        if width == 0 || blank {
            return Ok(None);
        }

        let start = self.inner.span().end;
        let indent = &rest[..width];
        if indent != "\t" && indent.contains('\t') {
            return Err(ParseError::new(
                self.position(start),
                LexErrorKind::InvalidIndentation,
            ));
        }

        self.inner.bump(width);
        self.line_has_content = true;
        Ok(Some(Spanned {
            token: Token::Indent,
            span: start..start + width,
        }))
    }
}

/// Tokenize a whole DSL file up to and including `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut lexer = Lexer::new(source)?;
    let mut tokens = Vec::new();
    loop {
        let spanned = lexer.next_token()?;
        let done = spanned.token == Token::Eof;
        tokens.push(spanned);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("tokenizes")
            .into_iter()
            .map(|spanned| spanned.token)
            .collect()
    }

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }

    #[test]
    fn test_header_is_required() {
        let error = tokenize("unpick v2\n").expect_err("bad header");
        assert_eq!(error.kind, ParseErrorKind::MissingHeader);
        assert_eq!(error.position, Position::new(1, 1));
        assert!(tokenize("").is_err());
    }

    #[test]
    fn test_header_only() {
        assert_eq!(kinds("unpick v3"), vec![Token::Eof]);
        assert_eq!(kinds("unpick v3\r\n"), vec![Token::Eof]);
    }

    #[test]
    fn test_indentation_and_blank_lines() {
        let source = "unpick v3\n\nconst int\n\t1 = 2\n   \n  # note\n\nflag long\n";
        assert_eq!(
            kinds(source),
            vec![
                ident("const"),
                ident("int"),
                Token::Newline,
                Token::Indent,
                Token::Number(crate::unpick::ast::Literal::int(1)),
                Token::Equals,
                Token::Number(crate::unpick::ast::Literal::int(2)),
                Token::Newline,
                ident("flag"),
                ident("long"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_indent_is_one_tab_or_spaces() {
        for indent in ["\t", " ", "    "] {
            let source = format!("unpick v3\nconst int\n{indent}1 = 2\n");
            assert_eq!(kinds(&source)[3], Token::Indent, "{indent:?}");
        }
        for indent in ["  \t ", "\t ", "\t\t"] {
            let source = format!("unpick v3\nconst int\n{indent}1 = 2\n");
            let error = tokenize(&source).expect_err("invalid indent");
            assert_eq!(
                error.kind,
                ParseErrorKind::Lex(LexErrorKind::InvalidIndentation)
            );
            assert_eq!(error.position, Position::new(3, 1));
        }
        // whitespace-only lines are blank whatever they contain
        assert_eq!(
            kinds("unpick v3\nconst int\n \t \n"),
            vec![ident("const"), ident("int"), Token::Newline, Token::Eof]
        );
    }

    #[test]
    fn test_missing_final_newline_still_terminates_line() {
        assert_eq!(
            kinds("unpick v3\nconst int # trailing"),
            vec![ident("const"), ident("int"), Token::Newline, Token::Eof]
        );
    }

    #[test]
    fn test_peek_two_tokens() {
        let mut lexer = Lexer::new("unpick v3\n(int) x").expect("header");
        assert_eq!(lexer.peek().expect("peek").token, Token::OpenParen);
        assert_eq!(lexer.peek2().expect("peek2").token, ident("int"));
        assert_eq!(lexer.next_token().expect("next").token, Token::OpenParen);
        assert_eq!(lexer.next_token().expect("next").token, ident("int"));
        assert_eq!(lexer.next_token().expect("next").token, Token::CloseParen);
    }

    #[test]
    fn test_descriptor_mode() {
        let mut lexer =
            Lexer::new("unpick v3\ntarget_field a.B c Ljava/lang/String; g").expect("header");
        for _ in 0..5 {
            lexer.next_token().expect("token");
        }
        let (descriptor, span) = lexer
            .next_descriptor(DescriptorKind::Field)
            .expect("descriptor");
        assert_eq!(descriptor, "Ljava/lang/String;");
        assert_eq!(span, 29..47);
        assert_eq!(lexer.next_token().expect("next").token, ident("g"));
    }

    #[test]
    fn test_descriptor_after_lookahead_rescans() {
        let mut lexer = Lexer::new("unpick v3\nm (I)V").expect("header");
        lexer.next_token().expect("m");
        assert_eq!(lexer.peek().expect("peek").token, Token::OpenParen);
        let (descriptor, _) = lexer
            .next_descriptor(DescriptorKind::Method)
            .expect("descriptor");
        assert_eq!(descriptor, "(I)V");
        assert_eq!(lexer.next_token().expect("next").token, Token::Newline);
    }

    #[test]
    fn test_errors_carry_positions() {
        let error = tokenize("unpick v3\nconst int\n\t1 = @").expect_err("bad char");
        assert_eq!(error.position, Position::new(3, 6));
        assert_eq!(
            error.kind,
            ParseErrorKind::Lex(LexErrorKind::UnexpectedCharacter)
        );

        let mut lexer = Lexer::new("unpick v3\nx (I").expect("header");
        lexer.next_token().expect("x");
        let error = lexer
            .next_descriptor(DescriptorKind::Method)
            .expect_err("bad descriptor");
        assert_eq!(error.position, Position::new(2, 3));
    }
}
