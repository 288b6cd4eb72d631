//! Declared data types of groups, field references and casts

use std::fmt;

/// A primitive JVM type or `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Byte,
        DataType::Short,
        DataType::Int,
        DataType::Long,
        DataType::Float,
        DataType::Double,
        DataType::Char,
        DataType::String,
    ];

    /// Parse the DSL keyword for a data type (`int`, `String`, ...)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.keyword() == keyword)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Char => "char",
            DataType::String => "String",
        }
    }

    /// The JVM field descriptor of this type
    pub fn descriptor(self) -> &'static str {
        match self {
            DataType::Byte => "B",
            DataType::Short => "S",
            DataType::Int => "I",
            DataType::Long => "J",
            DataType::Float => "F",
            DataType::Double => "D",
            DataType::Char => "C",
            DataType::String => "Ljava/lang/String;",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            DataType::Byte | DataType::Short | DataType::Int | DataType::Long | DataType::Char
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    /// Only `int` and `long` groups may be declared as `flag` groups.
    pub fn supports_flags(self) -> bool {
        matches!(self, DataType::Int | DataType::Long)
    }

    /// Mask covering the bits of an integral value of this type as it appears in a JVM literal.
    ///
    /// `byte`, `short` and `char` literals are int literals on the JVM, so they share the int mask.
    pub fn literal_mask(self) -> Option<u64> {
        match self {
            DataType::Long => Some(u64::MAX),
            ty if ty.is_integral() => Some(u32::MAX as u64),
            _ => None,
        }
    }

    /// Java widening primitive conversion (JLS 5.1.2), excluding identity.
    pub fn widens_to(self, target: DataType) -> bool {
        use DataType::*;
        matches!(
            (self, target),
            (Byte, Short | Int | Long | Float | Double)
                | (Short, Int | Long | Float | Double)
                | (Char, Int | Long | Float | Double)
                | (Int, Long | Float | Double)
                | (Long, Float | Double)
                | (Float, Double)
        )
    }

    /// Types a literal of this type may have been widened from, nearest first.
    ///
    /// Drives the widening retry of the rewriter: a literal is retried at each of these
    /// types when its value survives the down-cast unchanged.
    pub fn widened_from(self) -> &'static [DataType] {
        match self {
            DataType::Short => &[DataType::Byte],
            DataType::Int => &[DataType::Short],
            DataType::Long => &[DataType::Int],
            DataType::Float => &[DataType::Int],
            DataType::Double => &[DataType::Float],
            _ => &[],
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_round_trip() {
        for ty in DataType::ALL {
            assert_eq!(DataType::from_keyword(ty.keyword()), Some(ty));
        }
        assert_eq!(DataType::from_keyword("string"), None);
        assert_eq!(DataType::from_keyword("boolean"), None);
    }

    #[test]
    fn test_widening_is_not_reflexive() {
        for ty in DataType::ALL {
            assert!(!ty.widens_to(ty));
        }
        assert!(DataType::Int.widens_to(DataType::Double));
        assert!(DataType::Char.widens_to(DataType::Int));
        assert!(!DataType::Char.widens_to(DataType::Short));
        assert!(!DataType::String.widens_to(DataType::Double));
    }

    #[test]
    fn test_widened_from_is_a_widening() {
        for ty in DataType::ALL {
            for narrower in ty.widened_from() {
                assert!(narrower.widens_to(ty), "{narrower} should widen to {ty}");
            }
        }
    }

    #[test]
    fn test_descriptors() {
        assert_eq!(DataType::Long.descriptor(), "J");
        assert_eq!(DataType::String.descriptor(), "Ljava/lang/String;");
    }
}
