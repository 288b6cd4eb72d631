//! Error types for reading unpick definitions
//!
//! Every error raised while reading a DSL file is fatal for that file and carries the
//! 1-based position it was detected at.

use crate::unpick::ast::{DataType, Position};
use crate::unpick::lexing::LexErrorKind;
use crate::unpick::loader::LoaderError;
use crate::unpick::remapping::RemapError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("missing `unpick v3` header")]
    MissingHeader,

    #[error("{0}")]
    Lex(#[from] LexErrorKind),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unexpected indentation")]
    UnexpectedIndent,

    #[error("unknown declaration `{0}`")]
    UnknownItem(String),

    #[error("duplicate constant key {0}")]
    DuplicateKey(String),

    #[error("parameter {0} is bound twice")]
    DuplicateParameter(usize),

    #[error("return value is bound twice")]
    DuplicateReturn,

    #[error("format is declared twice")]
    DuplicateFormat,

    #[error("flag groups must be int or long, not {0}")]
    FlagRequiresIntegral(DataType),

    #[error("{0}")]
    TypeMismatch(String),
}

/// A fatal error while reading a DSL file.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{position}: {kind}")]
pub struct ParseError {
    pub position: Position,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: Position, kind: impl Into<ParseErrorKind>) -> Self {
        Self {
            position,
            kind: kind.into(),
        }
    }
}

/// Any error the library reports.
#[derive(Debug, Error)]
pub enum UnpickError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error(transparent)]
    Remap(#[from] RemapError),
}

pub type Result<T> = std::result::Result<T, UnpickError>;

/// Format source code context around an error position
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, position: Position) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = position.line.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
        if line_num == error_line {
            let padding = " ".repeat(position.column.saturating_sub(1));
            context.push_str(&format!("         {}^\n", padding));
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let error = ParseError::new(Position::new(3, 7), ParseErrorKind::DuplicateReturn);
        assert_eq!(error.to_string(), "3:7: return value is bound twice");
    }

    #[test]
    fn test_lex_errors_convert() {
        let error = ParseError::new(Position::new(1, 1), LexErrorKind::NumberOverflow);
        assert_eq!(error.kind, ParseErrorKind::Lex(LexErrorKind::NumberOverflow));
    }

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = format_source_context(source, Position::new(4, 3));

        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("           ^"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 7"));
    }
}
