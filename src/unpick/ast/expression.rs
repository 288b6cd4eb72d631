//! Symbolic replacement expressions

use super::data_type::DataType;
use super::literal::Literal;

/// Binary operators, from lowest to highest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Ushr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Ushr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    /// Binding power; all binary operators are left associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::BitOr => 1,
            BinaryOp::BitXor => 2,
            BinaryOp::BitAnd => 3,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    BitNot,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::BitNot => "~",
        }
    }
}

/// Reference to a field constant, `Class.field[:instance][:type]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// Binary name of the declaring class (`com.example.Outer$Inner`)
    pub class: String,
    pub name: String,
    /// Declared type; `None` means the type of the enclosing group.
    pub ty: Option<DataType>,
    pub is_static: bool,
}

impl FieldRef {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            ty: None,
            is_static: true,
        }
    }

    pub fn with_type(mut self, ty: DataType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn instance(mut self) -> Self {
        self.is_static = false;
        self
    }

    /// The field's type, falling back to the enclosing group's type.
    pub fn effective_type(&self, group_type: DataType) -> DataType {
        self.ty.unwrap_or(group_type)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Binary {
        lhs: Box<Expression>,
        op: BinaryOp,
        rhs: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Cast {
        ty: DataType,
        operand: Box<Expression>,
    },
    Field(FieldRef),
    Paren(Box<Expression>),
    Literal(Literal),
}

impl Expression {
    pub fn field(class: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Field(FieldRef::new(class, name))
    }

    pub fn binary(lhs: Expression, op: BinaryOp, rhs: Expression) -> Self {
        Expression::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// True when any field reference in this expression satisfies `predicate`.
    pub fn references_field(&self, predicate: &impl Fn(&FieldRef) -> bool) -> bool {
        match self {
            Expression::Binary { lhs, rhs, .. } => {
                lhs.references_field(predicate) || rhs.references_field(predicate)
            }
            Expression::Unary { operand, .. } | Expression::Cast { operand, .. } => {
                operand.references_field(predicate)
            }
            Expression::Paren(inner) => inner.references_field(predicate),
            Expression::Field(field) => predicate(field),
            Expression::Literal(_) => false,
        }
    }

    /// Rebuild this expression with every field reference passed through `f`.
    pub fn map_fields(&self, f: &impl Fn(&FieldRef) -> FieldRef) -> Expression {
        match self {
            Expression::Binary { lhs, op, rhs } => Expression::Binary {
                lhs: Box::new(lhs.map_fields(f)),
                op: *op,
                rhs: Box::new(rhs.map_fields(f)),
            },
            Expression::Unary { op, operand } => Expression::Unary {
                op: *op,
                operand: Box::new(operand.map_fields(f)),
            },
            Expression::Cast { ty, operand } => Expression::Cast {
                ty: *ty,
                operand: Box::new(operand.map_fields(f)),
            },
            Expression::Paren(inner) => Expression::Paren(Box::new(inner.map_fields(f))),
            Expression::Field(field) => Expression::Field(f(field)),
            Expression::Literal(literal) => Expression::Literal(literal.clone()),
        }
    }
}
