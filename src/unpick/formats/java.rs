//! Java source rendering of replacement expressions

use super::writer::write_literal;
use crate::unpick::ast::{Expression, FieldRef, Literal, UnaryOp};

/// Java source text of an expression, as spliced into a rewritten file.
pub fn render_expression(expression: &Expression) -> String {
    match expression {
        Expression::Binary { lhs, op, rhs } => format!(
            "{} {} {}",
            render_expression(lhs),
            op.symbol(),
            render_expression(rhs)
        ),
        Expression::Unary { op, operand } => {
            let operand = render_expression(operand);
            // `--x` would be a decrement
            if *op == UnaryOp::Negate && operand.starts_with('-') {
                format!("- {}", operand)
            } else {
                format!("{}{}", op.symbol(), operand)
            }
        }
        Expression::Cast { ty, operand } => format!("({}) {}", ty, render_expression(operand)),
        Expression::Paren(inner) => format!("({})", render_expression(inner)),
        Expression::Field(field) => render_field(field),
        Expression::Literal(literal) => render_literal(literal),
    }
}

/// `Outer.Inner.NAME` for static fields, `this.name` for instance fields.
pub fn render_field(field: &FieldRef) -> String {
    if field.is_static {
        format!("{}.{}", field.class.replace('$', "."), field.name)
    } else {
        format!("this.{}", field.name)
    }
}

pub fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Float(value) if !value.is_finite() => non_finite("Float", *value as f64),
        Literal::Double(value) if !value.is_finite() => non_finite("Double", *value),
        // Java accepts the same escapes, radix prefixes and suffixes as the DSL.
        other => write_literal(other, true),
    }
}

fn non_finite(class: &str, value: f64) -> String {
    let constant = if value.is_nan() {
        "NaN"
    } else if value > 0.0 {
        "POSITIVE_INFINITY"
    } else {
        "NEGATIVE_INFINITY"
    };
    format!("{}.{}", class, constant)
}
