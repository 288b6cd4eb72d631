//! Canonical DSL writer
//!
//! Serializes a [`Tree`] back to unpick v3 text. Declaration order is preserved exactly: the
//! writer never sorts constants, parameters or items. Numeric literals keep the radix they
//! were written in, so `parse(write(tree)) == tree` for every tree the parser produces.

use crate::unpick::ast::{
    Expression, GroupDefinition, GroupScope, Item, Literal, Radix, TargetField, TargetMethod,
    Tree,
};
use crate::unpick::lexing::escapes::{escape_char, escape_string};
use crate::unpick::lexing::HEADER;
use serde::Deserialize;

/// Knobs of the DSL writer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Indentation unit of group and target bodies
    pub indent: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

/// Write `tree` as DSL text.
pub fn write_tree(tree: &Tree, options: &WriterOptions) -> String {
    let mut writer = DslWriter::new(options);
    writer.write_line(0, HEADER);
    for item in &tree.items {
        writer.blank_line();
        match item {
            Item::Group(group) => writer.write_group(group),
            Item::TargetField(target) => writer.write_target_field(target),
            Item::TargetMethod(target) => writer.write_target_method(target),
        }
    }
    writer.output
}

struct DslWriter<'a> {
    options: &'a WriterOptions,
    output: String,
}

impl<'a> DslWriter<'a> {
    fn new(options: &'a WriterOptions) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    fn write_line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.output.push_str(&self.options.indent);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn blank_line(&mut self) {
        self.output.push('\n');
    }

    fn write_group(&mut self, group: &GroupDefinition) {
        let mut header = String::new();
        match &group.scope {
            GroupScope::Global => {}
            GroupScope::Package(package) => header.push_str(&format!("scoped package {} ", package)),
            GroupScope::Class(class) => header.push_str(&format!("scoped class {} ", class)),
            GroupScope::Method {
                class,
                name,
                descriptor,
            } => header.push_str(&format!("scoped method {} {} {} ", class, name, descriptor)),
        }
        header.push_str(group.kind.keyword());
        if group.strict {
            header.push_str(" strict");
        }
        header.push(' ');
        header.push_str(group.data_type.keyword());
        if let Some(name) = &group.name {
            header.push(' ');
            header.push_str(name);
        }
        self.write_line(0, &header);

        if let Some(format) = group.format {
            self.write_line(1, &format!("format = {}", format.keyword()));
        }
        for constant in &group.constants {
            let line = format!(
                "{} = {}",
                write_literal(&constant.key, true),
                write_expression(&constant.value)
            );
            self.write_line(1, &line);
        }
    }

    fn write_target_field(&mut self, target: &TargetField) {
        let line = format!(
            "target_field {} {} {} {}",
            target.class, target.field, target.descriptor, target.group
        );
        self.write_line(0, &line);
    }

    fn write_target_method(&mut self, target: &TargetMethod) {
        let line = format!(
            "target_method {} {} {}",
            target.class, target.method, target.descriptor
        );
        self.write_line(0, &line);
        for (index, group) in &target.param_groups {
            self.write_line(1, &format!("param {} {}", index, group));
        }
        if let Some(group) = &target.return_group {
            self.write_line(1, &format!("return {}", group));
        }
    }
}

/// DSL text of an expression.
pub fn write_expression(expression: &Expression) -> String {
    match expression {
        Expression::Binary { lhs, op, rhs } => format!(
            "{} {} {}",
            write_expression(lhs),
            op.symbol(),
            write_expression(rhs)
        ),
        Expression::Unary { op, operand } => format!("{}{}", op.symbol(), write_expression(operand)),
        Expression::Cast { ty, operand } => format!("({}) {}", ty, write_expression(operand)),
        Expression::Paren(inner) => format!("({})", write_expression(inner)),
        Expression::Field(field) => {
            let mut text = format!("{}.{}", field.class, field.name);
            if !field.is_static {
                text.push_str(":instance");
            }
            if let Some(ty) = field.ty {
                text.push(':');
                text.push_str(ty.keyword());
            }
            text
        }
        Expression::Literal(literal) => write_literal(literal, false),
    }
}

/// DSL text of a literal.
///
/// Negative decimal values are written with a sign only when `signed` is set (constant keys);
/// inside expressions a leading `-` would parse back as a unary operator, so the unsigned
/// two's complement magnitude is written instead. Other radixes are always unsigned.
pub fn write_literal(literal: &Literal, signed: bool) -> String {
    match literal {
        Literal::Integer { value, radix } => {
            let digits = match (radix, signed) {
                (Radix::Decimal, true) => value.to_string(),
                _ => unsigned_digits(*value as u32 as u64, *radix),
            };
            format!("{}{}", radix.prefix(), digits)
        }
        Literal::Long { value, radix } => {
            let digits = match (radix, signed) {
                (Radix::Decimal, true) => value.to_string(),
                _ => unsigned_digits(*value as u64, *radix),
            };
            format!("{}{}L", radix.prefix(), digits)
        }
        Literal::Float(value) => format!("{:?}F", value),
        Literal::Double(value) => format!("{:?}", value),
        Literal::Character(unit) => escape_char(*unit),
        Literal::String(value) => escape_string(value),
    }
}

fn unsigned_digits(bits: u64, radix: Radix) -> String {
    match radix {
        Radix::Binary => format!("{:b}", bits),
        Radix::Octal => format!("{:o}", bits),
        Radix::Decimal => bits.to_string(),
        Radix::Hex => format!("{:X}", bits),
    }
}
