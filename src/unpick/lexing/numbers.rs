//! Numeric literal decoding
//!
//! Integer digits are read as an unsigned magnitude in their radix and stored as two's
//! complement bits, so `0xFFFFFFFF` is the int `-1` and `4294967295` is too. A leading minus
//! sign is never part of a number token; the parser applies it separately.

use super::tokens::LexErrorKind;
use crate::unpick::ast::{Literal, Radix};
use std::num::IntErrorKind;

pub(crate) fn parse_number(text: &str) -> Result<Literal, LexErrorKind> {
    let lower = text.to_ascii_lowercase();

    if let Some(digits) = lower.strip_prefix("0x") {
        return parse_integral(digits, Radix::Hex);
    }
    if let Some(digits) = lower.strip_prefix("0b") {
        return parse_integral(digits, Radix::Binary);
    }
    if lower.contains('.') || lower.contains('e') || lower.ends_with('f') {
        return parse_floating(&lower);
    }

    let unsuffixed = lower.strip_suffix('l').unwrap_or(&lower);
    if unsuffixed.len() > 1 && unsuffixed.starts_with('0') {
        parse_integral(&lower[1..], Radix::Octal)
    } else {
        parse_integral(&lower, Radix::Decimal)
    }
}

fn parse_integral(digits: &str, radix: Radix) -> Result<Literal, LexErrorKind> {
    match digits.strip_suffix('l') {
        Some(digits) => u64::from_str_radix(digits, radix.value())
            .map(|value| Literal::Long {
                value: value as i64,
                radix,
            })
            .map_err(integer_error),
        None => u32::from_str_radix(digits, radix.value())
            .map(|value| Literal::Integer {
                value: value as i32,
                radix,
            })
            .map_err(integer_error),
    }
}

fn integer_error(error: std::num::ParseIntError) -> LexErrorKind {
    match error.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => LexErrorKind::NumberOverflow,
        _ => LexErrorKind::InvalidNumber,
    }
}

fn parse_floating(text: &str) -> Result<Literal, LexErrorKind> {
    if let Some(digits) = text.strip_suffix('f') {
        let value: f32 = digits.parse().map_err(|_| LexErrorKind::InvalidNumber)?;
        if value.is_infinite() {
            return Err(LexErrorKind::NumberOverflow);
        }
        Ok(Literal::Float(value))
    } else {
        let value: f64 = text.parse().map_err(|_| LexErrorKind::InvalidNumber)?;
        if value.is_infinite() {
            return Err(LexErrorKind::NumberOverflow);
        }
        Ok(Literal::Double(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Literal::int(0))]
    #[case("2147483648", Literal::int(i32::MIN))]
    #[case("4294967295", Literal::int(-1))]
    #[case("0xFFFFFFFF", Literal::Integer { value: -1, radix: Radix::Hex })]
    #[case("0X7f", Literal::Integer { value: 127, radix: Radix::Hex })]
    #[case("0b11", Literal::Integer { value: 3, radix: Radix::Binary })]
    #[case("0777", Literal::Integer { value: 511, radix: Radix::Octal })]
    #[case("00", Literal::Integer { value: 0, radix: Radix::Octal })]
    #[case("10L", Literal::long(10))]
    #[case("0xFFFFFFFFFFFFFFFFl", Literal::Long { value: -1, radix: Radix::Hex })]
    #[case("010l", Literal::Long { value: 8, radix: Radix::Octal })]
    #[case("1.5", Literal::Double(1.5))]
    #[case("1.", Literal::Double(1.0))]
    #[case("2.5e-3", Literal::Double(0.0025))]
    #[case("3F", Literal::Float(3.0))]
    #[case("1e2f", Literal::Float(100.0))]
    fn test_parse_number(#[case] text: &str, #[case] expected: Literal) {
        assert_eq!(parse_number(text), Ok(expected));
    }

    #[rstest]
    #[case("4294967296", LexErrorKind::NumberOverflow)]
    #[case("0x1FFFFFFFF", LexErrorKind::NumberOverflow)]
    #[case("0x10000000000000000L", LexErrorKind::NumberOverflow)]
    #[case("1e39f", LexErrorKind::NumberOverflow)]
    #[case("1e309", LexErrorKind::NumberOverflow)]
    #[case("09", LexErrorKind::InvalidNumber)]
    fn test_parse_number_errors(#[case] text: &str, #[case] expected: LexErrorKind) {
        assert_eq!(parse_number(text), Err(expected));
    }
}
