//! Precedence climbing parser for replacement expressions.
//!
//! Binding powers come from [`BinaryOp::precedence`]; every binary operator is left
//! associative. Unary `-` and `~` bind tighter than any binary operator and nest freely.

use super::Parser;
use crate::unpick::ast::{BinaryOp, DataType, Expression, FieldRef, Literal, UnaryOp};
use crate::unpick::error::{ParseError, ParseErrorKind};
use crate::unpick::lexing::Token;
use std::ops::Range;

pub(crate) fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_precedence(parser, 0)
}

fn parse_precedence(parser: &mut Parser, min_bp: u8) -> Result<Expression, ParseError> {
    let mut lhs = parse_unary(parser)?;

    loop {
        let Some((l_bp, r_bp, op)) = infix_binding_power(parser.peek()?) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }
        parser.next()?;
        let rhs = parse_precedence(parser, r_bp)?;
        lhs = Expression::binary(lhs, op, rhs);
    }

    Ok(lhs)
}

fn infix_binding_power(token: &Token) -> Option<(u8, u8, BinaryOp)> {
    let op = match token {
        Token::Pipe => BinaryOp::BitOr,
        Token::Caret => BinaryOp::BitXor,
        Token::Ampersand => BinaryOp::BitAnd,
        Token::ShiftLeft => BinaryOp::Shl,
        Token::ShiftRight => BinaryOp::Shr,
        Token::UnsignedShiftRight => BinaryOp::Ushr,
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Percent => BinaryOp::Rem,
        _ => return None,
    };
    // l_bp, r_bp
    let bp = op.precedence() * 2;
    Some((bp, bp + 1, op))
}

fn parse_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let op = match parser.peek()? {
        Token::Minus => UnaryOp::Negate,
        Token::Tilde => UnaryOp::BitNot,
        _ => return parse_primary(parser),
    };
    parser.next()?;
    Ok(Expression::unary(op, parse_unary(parser)?))
}

fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let spanned = parser.next()?;
    match spanned.token {
        Token::Number(literal) => Ok(Expression::Literal(literal)),
        Token::Character(unit) => Ok(Expression::Literal(Literal::Character(unit))),
        Token::String(value) => Ok(Expression::Literal(Literal::String(value))),
        Token::OpenParen => {
            if let Some(ty) = cast_type(parser)? {
                parser.next()?;
                parser.next()?;
                let operand = parse_unary(parser)?;
                return Ok(Expression::Cast {
                    ty,
                    operand: Box::new(operand),
                });
            }
            let inner = parse_expression(parser)?;
            parser.expect(Token::CloseParen, "`)`")?;
            Ok(Expression::Paren(Box::new(inner)))
        }
        Token::Identifier(first) => parse_field_ref(parser, first).map(Expression::Field),
        _ => Err(parser.unexpected(&spanned, "expression")),
    }
}

// `(` followed by a type keyword and `)` is a cast
fn cast_type(parser: &mut Parser) -> Result<Option<DataType>, ParseError> {
    let ty = match parser.peek()? {
        Token::Identifier(name) => DataType::from_keyword(name),
        _ => None,
    };
    match ty {
        Some(ty) if parser.peek2()? == &Token::CloseParen => Ok(Some(ty)),
        _ => Ok(None),
    }
}

/// `Class.field[:instance][:type]`, where the class part may itself be dotted.
fn parse_field_ref(parser: &mut Parser, first: String) -> Result<FieldRef, ParseError> {
    let mut segments = vec![first];
    let dot = parser.next()?;
    if dot.token != Token::Dot {
        return Err(parser.unexpected(&dot, "`.` followed by a field name"));
    }
    loop {
        let (segment, _) = parser.identifier("field name")?;
        segments.push(segment);
        if !parser.eat(&Token::Dot)? {
            break;
        }
    }

    let name = segments.pop().unwrap_or_default();
    let mut field = FieldRef::new(segments.join("."), name);

    if parser.eat(&Token::Colon)? {
        let (modifier, span) = parser.identifier("`instance` or a type")?;
        if modifier == "instance" {
            field = field.instance();
            if parser.eat(&Token::Colon)? {
                let (ty, span) = parser.identifier("field type")?;
                field = field.with_type(field_type(parser, &ty, &span)?);
            }
        } else {
            field = field.with_type(field_type(parser, &modifier, &span)?);
        }
    }

    Ok(field)
}

fn field_type(parser: &Parser, keyword: &str, span: &Range<usize>) -> Result<DataType, ParseError> {
    DataType::from_keyword(keyword).ok_or_else(|| {
        parser.error(
            span,
            ParseErrorKind::UnexpectedToken {
                expected: "field type".to_string(),
                found: format!("`{}`", keyword),
            },
        )
    })
}
