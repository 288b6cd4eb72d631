//! Position tracking for source code locations
//!
//! The lexer works on byte offsets; diagnostics are reported as 1-based `line:column`.
//! [`SourceLocation`] converts between the two with a binary search over line starts.
//!
//! Columns count characters, not bytes, so a multi-byte UTF-8 character occupies one column.

use std::fmt;

/// A 1-based line:column position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation<'src> {
    source: &'src str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'src> SourceLocation<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a 1-based line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..byte_offset)
            .map_or(byte_offset - line_start, |prefix| prefix.chars().count());

        Position::new(line + 1, column + 1)
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_byte_is_one_one() {
        let location = SourceLocation::new("unpick v3\n");
        assert_eq!(location.byte_to_position(0), Position::new(1, 1));
    }

    #[test]
    fn test_positions_after_newlines() {
        let source = "ab\ncd\n\nef";
        let location = SourceLocation::new(source);
        assert_eq!(location.byte_to_position(1), Position::new(1, 2));
        assert_eq!(location.byte_to_position(3), Position::new(2, 1));
        assert_eq!(location.byte_to_position(6), Position::new(3, 1));
        assert_eq!(location.byte_to_position(8), Position::new(4, 2));
        assert_eq!(location.line_count(), 4);
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "é = 1";
        let location = SourceLocation::new(source);
        // 'é' is two bytes wide
        assert_eq!(location.byte_to_position(3), Position::new(1, 3));
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let location = SourceLocation::new("x");
        assert_eq!(location.byte_to_position(10), Position::new(1, 2));
    }
}
