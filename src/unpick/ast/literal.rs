//! Literal values of the unpick DSL

use super::data_type::DataType;

/// The radix a numeric literal was written in.
///
/// Only retained so the writer can reproduce the original notation; it carries no semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    pub fn value(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Radix::Binary => "0b",
            Radix::Octal => "0",
            Radix::Decimal => "",
            Radix::Hex => "0x",
        }
    }
}

/// A literal as written in a DSL file.
///
/// Integer and long values hold the two's complement bits of the unsigned magnitude the
/// digits denote: `0xFFFFFFFF` is stored as `-1`. Characters are UTF-16 code units.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer { value: i32, radix: Radix },
    Long { value: i64, radix: Radix },
    Float(f32),
    Double(f64),
    Character(u16),
    String(String),
}

impl Literal {
    pub fn int(value: i32) -> Self {
        Literal::Integer {
            value,
            radix: Radix::Decimal,
        }
    }

    pub fn long(value: i64) -> Self {
        Literal::Long {
            value,
            radix: Radix::Decimal,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }

    /// The JVM type a literal of this shape has in source code
    pub fn data_type(&self) -> DataType {
        match self {
            Literal::Integer { .. } => DataType::Int,
            Literal::Long { .. } => DataType::Long,
            Literal::Float(_) => DataType::Float,
            Literal::Double(_) => DataType::Double,
            Literal::Character(_) => DataType::Char,
            Literal::String(_) => DataType::String,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Literal::String(_))
    }

    /// Arithmetic negation, keeping the radix. Returns `None` for literals that cannot be
    /// negated in place (characters and strings).
    pub fn negated(&self) -> Option<Literal> {
        match self {
            Literal::Integer { value, radix } => Some(Literal::Integer {
                value: value.wrapping_neg(),
                radix: *radix,
            }),
            Literal::Long { value, radix } => Some(Literal::Long {
                value: value.wrapping_neg(),
                radix: *radix,
            }),
            Literal::Float(value) => Some(Literal::Float(-value)),
            Literal::Double(value) => Some(Literal::Double(-value)),
            Literal::Character(_) | Literal::String(_) => None,
        }
    }
}
