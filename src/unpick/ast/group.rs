//! Group definitions: tables mapping literal values to symbolic expressions

use super::data_type::DataType;
use super::expression::Expression;
use super::literal::Literal;

/// Where a group's constants apply ambiently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupScope {
    Global,
    Package(String),
    Class(String),
    Method {
        class: String,
        name: String,
        descriptor: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Const,
    Flag,
}

impl GroupKind {
    pub fn keyword(self) -> &'static str {
        match self {
            GroupKind::Const => "const",
            GroupKind::Flag => "flag",
        }
    }
}

/// Textual representation a group imposes on literals it cannot replace symbolically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayFormat {
    Decimal,
    Hex,
    Binary,
    Octal,
    Char,
}

impl DisplayFormat {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "decimal" => Some(DisplayFormat::Decimal),
            "hex" => Some(DisplayFormat::Hex),
            "binary" => Some(DisplayFormat::Binary),
            "octal" => Some(DisplayFormat::Octal),
            "char" => Some(DisplayFormat::Char),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            DisplayFormat::Decimal => "decimal",
            DisplayFormat::Hex => "hex",
            DisplayFormat::Binary => "binary",
            DisplayFormat::Octal => "octal",
            DisplayFormat::Char => "char",
        }
    }
}

/// Lookup key of a group constant.
///
/// Numeric keys are unified across representations: a floating key with an integral value
/// normalizes to the integral key, so `1L` and `1.0` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstantKey {
    Integral(i64),
    /// Raw bits of a non-integral `f64`
    Floating(u64),
    Text(String),
}

impl ConstantKey {
    pub fn integral(value: i64) -> Self {
        ConstantKey::Integral(value)
    }

    pub fn floating(value: f64) -> Self {
        // 2^63 is exactly representable; anything in [-2^63, 2^63) converts without saturation.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if value.is_finite() && value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
            ConstantKey::Integral(value as i64)
        } else {
            ConstantKey::Floating(value.to_bits())
        }
    }

    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Integer { value, .. } => ConstantKey::integral(*value as i64),
            Literal::Long { value, .. } => ConstantKey::integral(*value),
            Literal::Character(unit) => ConstantKey::integral(*unit as i64),
            Literal::Float(value) => ConstantKey::floating(*value as f64),
            Literal::Double(value) => ConstantKey::floating(*value),
            Literal::String(value) => ConstantKey::Text(value.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupConstant {
    pub key: Literal,
    pub value: Expression,
}

impl GroupConstant {
    pub fn new(key: Literal, value: Expression) -> Self {
        Self { key, value }
    }

    pub fn lookup_key(&self) -> ConstantKey {
        ConstantKey::from_literal(&self.key)
    }
}

/// Identity under which definitions from several DSL sources are merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupIdentity {
    pub data_type: DataType,
    pub scope: GroupScope,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDefinition {
    pub scope: GroupScope,
    pub kind: GroupKind,
    pub strict: bool,
    pub data_type: DataType,
    pub name: Option<String>,
    pub constants: Vec<GroupConstant>,
    pub format: Option<DisplayFormat>,
}

impl GroupDefinition {
    pub fn new(kind: GroupKind, data_type: DataType) -> Self {
        Self {
            scope: GroupScope::Global,
            kind,
            strict: false,
            data_type,
            name: None,
            constants: Vec::new(),
            format: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn scoped(mut self, scope: GroupScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn formatted(mut self, format: DisplayFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_constant(mut self, key: Literal, value: Expression) -> Self {
        self.constants.push(GroupConstant::new(key, value));
        self
    }

    pub fn identity(&self) -> GroupIdentity {
        GroupIdentity {
            data_type: self.data_type,
            scope: self.scope.clone(),
            name: self.name.clone(),
        }
    }

    pub fn is_flag(&self) -> bool {
        self.kind == GroupKind::Flag
    }

    /// First constant keyed by `key`, in declaration order
    pub fn constant(&self, key: &ConstantKey) -> Option<&GroupConstant> {
        self.constants.iter().find(|c| &c.lookup_key() == key)
    }
}
