//! Token definitions for the unpick DSL
//!
//! This module defines the tokens produced by the logos lexer. Whitespace, comments and
//! newlines are real tokens here: indentation is only significant at the start of a line, so
//! the decision whether whitespace is an indent is left to the [`Lexer`](super::Lexer).
//!
//! `Indent`, `Descriptor` and `Eof` are synthetic: logos never produces them. Descriptors
//! overlap identifiers and operators, so the lexer scans them on demand when the grammar
//! expects one.
use super::escapes::{unescape_char, unescape_string};
use super::numbers::parse_number;
use crate::unpick::ast::Literal;
use logos::{Lexer, Logos};
use thiserror::Error;

/// Lexical errors, reported by logos callbacks.
#[derive(Debug, Clone, PartialEq, Default, Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("character literal must hold exactly one UTF-16 code unit")]
    InvalidCharacter,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("numeric literal is too large for its type")]
    NumberOverflow,
    #[error("malformed descriptor")]
    InvalidDescriptor,
    #[error("indentation must be a single tab or only spaces")]
    InvalidIndentation,
}

/// All tokens of the unpick DSL
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexErrorKind)]
pub enum Token {
    // Synthetic tokens, emitted by the Lexer wrapper
    Indent,
    Descriptor(String),
    Eof,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice().to_owned())]
    #[token("<init>", |lex| lex.slice().to_owned())]
    #[token("<clinit>", |lex| lex.slice().to_owned())]
    Identifier(String),

    #[regex(r"0[xX][0-9a-fA-F]+[lL]?", number)]
    #[regex(r"0[bB][01]+[lL]?", number)]
    #[regex(r"[0-9]+[lL]?", number)]
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fF]?", number)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fF]?", number)]
    #[regex(r"[0-9]+[fF]", number)]
    Number(Literal),

    #[regex(r#"'([^'\\\r\n]|\\[^\r\n])*'"#, character)]
    Character(u16),

    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#, string)]
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*"#, unterminated)]
    String(String),

    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&")]
    Ampersand,
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,
    #[token(">>>")]
    UnsignedShiftRight,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("~")]
    Tilde,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
}

fn number(lex: &mut Lexer<Token>) -> Result<Literal, LexErrorKind> {
    parse_number(lex.slice())
}

fn character(lex: &mut Lexer<Token>) -> Result<u16, LexErrorKind> {
    let slice = lex.slice();
    unescape_char(&slice[1..slice.len() - 1])
}

fn string(lex: &mut Lexer<Token>) -> Result<String, LexErrorKind> {
    let slice = lex.slice();
    unescape_string(&slice[1..slice.len() - 1])
}

fn unterminated(_lex: &mut Lexer<Token>) -> Result<String, LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

impl Token {
    /// Human readable name used in "expected X, found Y" messages
    pub fn describe(&self) -> String {
        match self {
            Token::Indent => "indentation".to_string(),
            Token::Descriptor(text) => format!("descriptor `{}`", text),
            Token::Eof => "end of file".to_string(),
            Token::Whitespace => "whitespace".to_string(),
            Token::Comment => "comment".to_string(),
            Token::Newline => "end of line".to_string(),
            Token::Identifier(name) => format!("`{}`", name),
            Token::Number(_) => "number".to_string(),
            Token::Character(_) => "character literal".to_string(),
            Token::String(_) => "string literal".to_string(),
            other => format!("`{}`", other.symbol().unwrap_or("?")),
        }
    }

    /// Source text of punctuation and operator tokens
    pub fn symbol(&self) -> Option<&'static str> {
        Some(match self {
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Ampersand => "&",
            Token::ShiftLeft => "<<",
            Token::ShiftRight => ">>",
            Token::UnsignedShiftRight => ">>>",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Tilde => "~",
            Token::Dot => ".",
            Token::Colon => ":",
            Token::Equals => "=",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpick::ast::Radix;

    fn lex_all(source: &str) -> Vec<Result<Token, LexErrorKind>> {
        Token::lexer(source)
            .filter(|token| token != &Ok(Token::Whitespace))
            .collect()
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            lex_all("const int $Foo_1 <init>"),
            vec![
                Ok(Token::Identifier("const".to_string())),
                Ok(Token::Identifier("int".to_string())),
                Ok(Token::Identifier("$Foo_1".to_string())),
                Ok(Token::Identifier("<init>".to_string())),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex_all("0xFF 0b101L 017 42 1.5 2f 1e3"),
            vec![
                Ok(Token::Number(Literal::Integer {
                    value: 255,
                    radix: Radix::Hex
                })),
                Ok(Token::Number(Literal::Long {
                    value: 5,
                    radix: Radix::Binary
                })),
                Ok(Token::Number(Literal::Integer {
                    value: 15,
                    radix: Radix::Octal
                })),
                Ok(Token::Number(Literal::int(42))),
                Ok(Token::Number(Literal::Double(1.5))),
                Ok(Token::Number(Literal::Float(2.0))),
                Ok(Token::Number(Literal::Double(1000.0))),
            ]
        );
    }

    #[test]
    fn test_operators_prefer_longest_match() {
        assert_eq!(
            lex_all(">>> >> << | ~"),
            vec![
                Ok(Token::UnsignedShiftRight),
                Ok(Token::ShiftRight),
                Ok(Token::ShiftLeft),
                Ok(Token::Pipe),
                Ok(Token::Tilde),
            ]
        );
    }

    #[test]
    fn test_strings_and_characters() {
        assert_eq!(
            lex_all(r#""a\tb" 'A' '\''"#),
            vec![
                Ok(Token::String("a\tb".to_string())),
                Ok(Token::Character(0x41)),
                Ok(Token::Character(b'\'' as u16)),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert_eq!(
            lex_all("\"abc"),
            vec![Err(LexErrorKind::UnterminatedString)]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        assert_eq!(
            lex_all("x # trailing\r\ny"),
            vec![
                Ok(Token::Identifier("x".to_string())),
                Ok(Token::Comment),
                Ok(Token::Newline),
                Ok(Token::Identifier("y".to_string())),
            ]
        );
    }
}
