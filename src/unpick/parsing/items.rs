//! Top-level declarations and their indented bodies

use super::expression::parse_expression;
use super::Parser;
use crate::unpick::ast::{
    ConstantKey, DataType, DisplayFormat, GroupDefinition, GroupKind, GroupScope, Item, Literal,
    TargetField, TargetMethod, Tree,
};
use crate::unpick::error::{ParseError, ParseErrorKind};
use crate::unpick::lexing::{DescriptorKind, Spanned, Token};
use std::collections::HashSet;
use std::ops::Range;

pub(crate) fn parse_items(parser: &mut Parser) -> Result<Tree, ParseError> {
    let mut items = Vec::new();

    loop {
        let spanned = parser.next()?;
        let item = match &spanned.token {
            Token::Eof => break,
            Token::Indent => {
                return Err(parser.error(&spanned.span, ParseErrorKind::UnexpectedIndent))
            }
            Token::Identifier(keyword) => match keyword.as_str() {
                "target_field" => Item::TargetField(parse_target_field(parser)?),
                "target_method" => Item::TargetMethod(parse_target_method(parser)?),
                "scoped" | "const" | "flag" => Item::Group(parse_group(parser, spanned.clone())?),
                other => {
                    return Err(parser.error(
                        &spanned.span,
                        ParseErrorKind::UnknownItem(other.to_string()),
                    ))
                }
            },
            _ => return Err(parser.unexpected(&spanned, "declaration")),
        };
        items.push(item);
    }

    Ok(Tree::new(items))
}

fn parse_target_field(parser: &mut Parser) -> Result<TargetField, ParseError> {
    let class = parser.dotted_name("class name")?;
    let (field, _) = parser.identifier("field name")?;
    let descriptor = parser.descriptor(DescriptorKind::Field)?;
    let (group, _) = parser.identifier("group id")?;
    parser.expect_newline()?;
    Ok(TargetField {
        class,
        field,
        descriptor,
        group,
    })
}

fn parse_target_method(parser: &mut Parser) -> Result<TargetMethod, ParseError> {
    let class = parser.dotted_name("class name")?;
    let (method, _) = parser.identifier("method name")?;
    let descriptor = parser.descriptor(DescriptorKind::Method)?;
    parser.expect_newline()?;

    let mut target = TargetMethod::new(class, method, descriptor);
    while parser.eat(&Token::Indent)? {
        let (keyword, span) = parser.identifier("`param` or `return`")?;
        match keyword.as_str() {
            "param" => {
                let index = parse_param_index(parser)?;
                let (group, _) = parser.identifier("group id")?;
                if target.param_group(index).is_some() {
                    return Err(parser.error(&span, ParseErrorKind::DuplicateParameter(index)));
                }
                target.param_groups.push((index, group));
            }
            "return" => {
                let (group, _) = parser.identifier("group id")?;
                if target.return_group.is_some() {
                    return Err(parser.error(&span, ParseErrorKind::DuplicateReturn));
                }
                target.return_group = Some(group);
            }
            other => {
                return Err(parser.error(
                    &span,
                    ParseErrorKind::UnexpectedToken {
                        expected: "`param` or `return`".to_string(),
                        found: format!("`{}`", other),
                    },
                ))
            }
        }
        parser.expect_newline()?;
    }

    Ok(target)
}

fn parse_param_index(parser: &mut Parser) -> Result<usize, ParseError> {
    let spanned = parser.next()?;
    match spanned.token {
        Token::Number(Literal::Integer { value, .. }) if value >= 0 => Ok(value as usize),
        _ => Err(parser.unexpected(&spanned, "parameter index")),
    }
}

/// `[scoped <scope>] (const|flag) [strict] <dataType> [<name>]` and its body.
///
/// `first` is the already consumed `scoped`, `const` or `flag` keyword.
fn parse_group(parser: &mut Parser, first: Spanned) -> Result<GroupDefinition, ParseError> {
    let mut kind_token = first;
    let mut scope = GroupScope::Global;

    if kind_token.token == Token::Identifier("scoped".to_string()) {
        scope = parse_scope(parser)?;
        kind_token = parser.next()?;
    }

    let kind = match &kind_token.token {
        Token::Identifier(keyword) if keyword == "const" => GroupKind::Const,
        Token::Identifier(keyword) if keyword == "flag" => GroupKind::Flag,
        _ => return Err(parser.unexpected(&kind_token, "`const` or `flag`")),
    };

    let strict = parser.eat(&Token::Identifier("strict".to_string()))?;

    let (keyword, type_span) = parser.identifier("data type")?;
    let data_type = DataType::from_keyword(&keyword).ok_or_else(|| {
        parser.error(
            &type_span,
            ParseErrorKind::UnexpectedToken {
                expected: "data type".to_string(),
                found: format!("`{}`", keyword),
            },
        )
    })?;
    if kind == GroupKind::Flag && !data_type.supports_flags() {
        return Err(parser.error(&type_span, ParseErrorKind::FlagRequiresIntegral(data_type)));
    }

    let name = match parser.peek()? {
        Token::Identifier(_) => Some(parser.identifier("group name")?.0),
        _ => None,
    };
    parser.expect_newline()?;

    let mut group = GroupDefinition::new(kind, data_type);
    group.scope = scope;
    group.strict = strict;
    group.name = name;

    let mut seen = HashSet::new();
    while parser.eat(&Token::Indent)? {
        if parser.peek()? == &Token::Identifier("format".to_string()) {
            let spanned = parser.next()?;
            let format = parse_format(parser)?;
            if group.format.is_some() {
                return Err(parser.error(&spanned.span, ParseErrorKind::DuplicateFormat));
            }
            if data_type == DataType::String {
                return Err(parser.error(
                    &spanned.span,
                    ParseErrorKind::TypeMismatch(
                        "String groups cannot declare a format".to_string(),
                    ),
                ));
            }
            group.format = Some(format);
        } else {
            let (key, key_span) = parse_key(parser)?;
            check_key_type(parser, &group, &key, &key_span)?;
            if !seen.insert(ConstantKey::from_literal(&key)) {
                let text = parser.text(&key_span).to_string();
                return Err(parser.error(&key_span, ParseErrorKind::DuplicateKey(text)));
            }
            parser.expect(Token::Equals, "`=`")?;
            let value = parse_expression(parser)?;
            group = group.with_constant(key, value);
        }
        parser.expect_newline()?;
    }

    Ok(group)
}

fn parse_scope(parser: &mut Parser) -> Result<GroupScope, ParseError> {
    let (keyword, span) = parser.identifier("`package`, `class` or `method`")?;
    match keyword.as_str() {
        "package" => Ok(GroupScope::Package(parser.dotted_name("package name")?)),
        "class" => Ok(GroupScope::Class(parser.dotted_name("class name")?)),
        "method" => {
            let class = parser.dotted_name("class name")?;
            let (name, _) = parser.identifier("method name")?;
            let descriptor = parser.descriptor(DescriptorKind::Method)?;
            Ok(GroupScope::Method {
                class,
                name,
                descriptor,
            })
        }
        other => Err(parser.error(
            &span,
            ParseErrorKind::UnexpectedToken {
                expected: "`package`, `class` or `method`".to_string(),
                found: format!("`{}`", other),
            },
        )),
    }
}

fn parse_format(parser: &mut Parser) -> Result<DisplayFormat, ParseError> {
    parser.expect(Token::Equals, "`=`")?;
    let (keyword, span) = parser.identifier("display format")?;
    DisplayFormat::from_keyword(&keyword).ok_or_else(|| {
        parser.error(
            &span,
            ParseErrorKind::UnexpectedToken {
                expected: "`decimal`, `hex`, `binary`, `octal` or `char`".to_string(),
                found: format!("`{}`", keyword),
            },
        )
    })
}

/// A constant key: an optionally negated literal.
fn parse_key(parser: &mut Parser) -> Result<(Literal, Range<usize>), ParseError> {
    let first = parser.next()?;
    let negated = first.token == Token::Minus;
    let spanned = if negated { parser.next()? } else { first.clone() };
    let span = first.span.start..spanned.span.end;

    let literal = match spanned.token {
        Token::Number(literal) => literal,
        Token::Character(unit) if !negated => Literal::Character(unit),
        Token::String(value) if !negated => Literal::String(value),
        Token::Character(_) | Token::String(_) => {
            return Err(parser.error(
                &span,
                ParseErrorKind::TypeMismatch("only numeric keys can be negated".to_string()),
            ))
        }
        _ => return Err(parser.unexpected(&spanned, "constant key")),
    };

    if !negated {
        return Ok((literal, span));
    }
    match literal.negated() {
        Some(literal) => Ok((literal, span)),
        None => Err(parser.error(
            &span,
            ParseErrorKind::TypeMismatch("only numeric keys can be negated".to_string()),
        )),
    }
}

fn check_key_type(
    parser: &Parser,
    group: &GroupDefinition,
    key: &Literal,
    span: &Range<usize>,
) -> Result<(), ParseError> {
    let key_type = key.data_type();
    let accepted = match group.data_type {
        DataType::String => key_type == DataType::String,
        DataType::Int | DataType::Long if group.is_flag() => {
            matches!(key_type, DataType::Int | DataType::Long)
        }
        DataType::Char => matches!(key_type, DataType::Int | DataType::Char),
        ty if ty.is_integral() => matches!(key_type, DataType::Int | DataType::Long | DataType::Char),
        _ => matches!(
            key_type,
            DataType::Int | DataType::Long | DataType::Float | DataType::Double
        ),
    };
    if accepted {
        Ok(())
    } else {
        Err(parser.error(
            span,
            ParseErrorKind::TypeMismatch(format!(
                "{} key in a {} {} group",
                key_type,
                group.kind.keyword(),
                group.data_type
            )),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::unpick::ast::{
        DataType, DisplayFormat, Expression, GroupDefinition, GroupKind, GroupScope, Item,
        Literal, Position, Radix, TargetField, TargetMethod,
    };
    use crate::unpick::error::ParseErrorKind;
    use crate::unpick::parse;
    use rstest::rstest;

    fn single(source: &str) -> Item {
        let mut tree = parse(source).expect("parses");
        assert_eq!(tree.items.len(), 1);
        tree.items.remove(0)
    }

    fn error(source: &str) -> (Position, ParseErrorKind) {
        let error = parse(source).expect_err("should not parse");
        (error.position, error.kind)
    }

    #[test]
    fn test_target_field() {
        assert_eq!(
            single("unpick v3\n\ntarget_field com.example.Foo bar [Ljava/lang/String; names\n"),
            Item::TargetField(TargetField {
                class: "com.example.Foo".to_string(),
                field: "bar".to_string(),
                descriptor: "[Ljava/lang/String;".to_string(),
                group: "names".to_string(),
            })
        );
    }

    #[test]
    fn test_target_method_with_body() {
        let source = "unpick v3\ntarget_method a.Window <init> (IILjava/lang/String;)V\n\tparam 0 width\n\treturn size\n    param 1 height\n";
        assert_eq!(
            single(source),
            Item::TargetMethod(
                TargetMethod::new("a.Window", "<init>", "(IILjava/lang/String;)V")
                    .with_param(0, "width")
                    .with_return("size")
                    .with_param(1, "height")
            )
        );
    }

    #[test]
    fn test_group_header_variants() {
        let source = "unpick v3\nscoped method a.B run (J)V flag strict long Options\n\tformat = hex\n\t1 = a.B.ONE\n";
        let expected = GroupDefinition::new(GroupKind::Flag, DataType::Long)
            .named("Options")
            .scoped(GroupScope::Method {
                class: "a.B".to_string(),
                name: "run".to_string(),
                descriptor: "(J)V".to_string(),
            })
            .strict()
            .formatted(DisplayFormat::Hex)
            .with_constant(Literal::int(1), Expression::field("a.B", "ONE"));
        assert_eq!(single(source), Item::Group(expected));

        assert_eq!(
            single("unpick v3\nscoped package com.example const String\n"),
            Item::Group(
                GroupDefinition::new(GroupKind::Const, DataType::String)
                    .scoped(GroupScope::Package("com.example".to_string()))
            )
        );
    }

    #[test]
    fn test_negative_keys_keep_radix() {
        let source = "unpick v3\nconst int\n\t-0x10 = a.B.NEG\n\t'a' = a.B.A\n";
        let Item::Group(group) = single(source) else {
            panic!("expected a group");
        };
        assert_eq!(
            group.constants[0].key,
            Literal::Integer {
                value: -16,
                radix: Radix::Hex
            }
        );
        assert_eq!(group.constants[1].key, Literal::Character(0x61));
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let source = "unpick v3\n# header comment\n\nconst int Sizes # trailing\n\n\t# inner\n\t1 = a.B.SMALL\n\n";
        let Item::Group(group) = single(source) else {
            panic!("expected a group");
        };
        assert_eq!(group.name.as_deref(), Some("Sizes"));
        assert_eq!(group.constants.len(), 1);
    }

    #[rstest]
    #[case("unpick v3\nconst int\n\t1 = a.B.X\n\t1 = a.B.Y\n", Position::new(4, 2))]
    #[case("unpick v3\nconst double\n\t1L = a.B.X\n\t1.0 = a.B.Y\n", Position::new(4, 2))]
    fn test_duplicate_keys(#[case] source: &str, #[case] position: Position) {
        let (at, kind) = error(source);
        assert_eq!(at, position);
        assert!(matches!(kind, ParseErrorKind::DuplicateKey(_)));
    }

    #[rstest]
    #[case("unpick v3\nflag String\n", ParseErrorKind::FlagRequiresIntegral(DataType::String))]
    #[case("unpick v3\nflag double\n", ParseErrorKind::FlagRequiresIntegral(DataType::Double))]
    #[case("unpick v3\ntarget_method a.B m ()V\n\treturn x\n\treturn y\n", ParseErrorKind::DuplicateReturn)]
    #[case("unpick v3\ntarget_method a.B m (I)V\n\tparam 0 x\n\tparam 0 y\n", ParseErrorKind::DuplicateParameter(0))]
    #[case("unpick v3\nconst int\n\tformat = hex\n\tformat = octal\n", ParseErrorKind::DuplicateFormat)]
    #[case("unpick v3\n\tconst int\n", ParseErrorKind::UnexpectedIndent)]
    #[case("unpick v3\nconstant int\n", ParseErrorKind::UnknownItem("constant".to_string()))]
    #[case("unpick v3\nconst int\n\t99999999999 = a.B.C\n", ParseErrorKind::Lex(crate::unpick::lexing::LexErrorKind::NumberOverflow))]
    fn test_errors(#[case] source: &str, #[case] expected: ParseErrorKind) {
        assert_eq!(error(source).1, expected);
    }

    #[rstest]
    #[case("unpick v3\nconst String\n\t1 = a.B.C\n")]
    #[case("unpick v3\nconst int\n\t\"one\" = a.B.C\n")]
    #[case("unpick v3\nconst int\n\t1.5 = a.B.C\n")]
    #[case("unpick v3\nconst char\n\t1L = a.B.C\n")]
    #[case("unpick v3\nflag int\n\t'a' = a.B.C\n")]
    #[case("unpick v3\nconst String\n\tformat = hex\n")]
    #[case("unpick v3\nconst int\n\t-'a' = a.B.C\n")]
    fn test_type_mismatches(#[case] source: &str) {
        assert!(matches!(error(source).1, ParseErrorKind::TypeMismatch(_)));
    }

    #[test]
    fn test_error_position_points_at_token() {
        let (position, kind) = error("unpick v3\nconst int\n\t1 = a.B.C extra\n");
        assert_eq!(position, Position::new(3, 12));
        assert!(matches!(kind, ParseErrorKind::UnexpectedToken { .. }));
    }
}
