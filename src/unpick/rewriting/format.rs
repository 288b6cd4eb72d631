//! Representation-only rewrites for groups with a display format

use super::value::{TypedValue, Value};
use crate::unpick::ast::{DataType, DisplayFormat, Literal};
use crate::unpick::formats::render_literal;
use crate::unpick::lexing::escapes::escape_char;

/// Java source for `value` written in `format`, or `None` when the format cannot express it
/// (octal floats, characters outside the UTF-16 unit range).
pub(crate) fn reformat(value: &TypedValue, format: DisplayFormat, uppercase: bool) -> Option<String> {
    match (&value.value, format) {
        (Value::Integral(bits), format) => integral(*bits, value.ty, format, uppercase),
        (Value::Floating(float), DisplayFormat::Decimal) => Some(decimal_float(*float, value.ty)),
        (Value::Floating(float), DisplayFormat::Hex) => Some(hex_float(*float, value.ty, uppercase)),
        _ => None,
    }
}

fn integral(value: i64, ty: DataType, format: DisplayFormat, uppercase: bool) -> Option<String> {
    let long = ty == DataType::Long;
    let suffix = if long { "l" } else { "" };
    let bits = if long {
        value as u64
    } else {
        value as i32 as u32 as u64
    };

    let digits = match format {
        DisplayFormat::Decimal if long => value.to_string(),
        DisplayFormat::Decimal => (value as i32).to_string(),
        DisplayFormat::Hex if uppercase => format!("0x{:X}", bits),
        DisplayFormat::Hex => format!("0x{:x}", bits),
        DisplayFormat::Octal if bits == 0 => "0".to_string(),
        DisplayFormat::Octal => format!("0{:o}", bits),
        DisplayFormat::Binary => format!("0b{:b}", bits),
        DisplayFormat::Char => return u16::try_from(value).ok().map(escape_char),
    };
    Some(format!("{}{}", digits, suffix))
}

fn decimal_float(value: f64, ty: DataType) -> String {
    if !value.is_finite() {
        return render_literal(&non_finite(value, ty));
    }
    if ty == DataType::Float {
        format!("{:?}f", value as f32)
    } else {
        format!("{:?}", value)
    }
}

fn non_finite(value: f64, ty: DataType) -> Literal {
    if ty == DataType::Float {
        Literal::Float(value as f32)
    } else {
        Literal::Double(value)
    }
}

/// Java's hexadecimal floating point form, `0x1.8p1` for 3.0.
fn hex_float(value: f64, ty: DataType, uppercase: bool) -> String {
    if !value.is_finite() {
        return render_literal(&non_finite(value, ty));
    }
    if ty != DataType::Float {
        return hex_double(value, uppercase);
    }

    let float = value as f32;
    if float.is_subnormal() {
        // scale into the double subnormal range so the fraction digits line up
        let scaled = float as f64 * 2f64.powi(-896);
        let text = hex_double(scaled, uppercase);
        format!("{}f", text.replace("p-1022", "p-126"))
    } else {
        format!("{}f", hex_double(float as f64, uppercase))
    }
}

fn hex_double(value: f64, uppercase: bool) -> String {
    let bits = value.to_bits();
    let sign = if bits >> 63 == 1 { "-" } else { "" };
    let exponent = ((bits >> 52) & 0x7FF) as i64;
    let fraction = bits & ((1u64 << 52) - 1);

    if exponent == 0 && fraction == 0 {
        return format!("{}0x0.0p0", sign);
    }

    let (lead, exponent) = if exponent == 0 {
        (0, -1022)
    } else {
        (1, exponent - 1023)
    };
    let digits = if uppercase {
        format!("{:013X}", fraction)
    } else {
        format!("{:013x}", fraction)
    };
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    format!("{}0x{}.{}p{}", sign, lead, digits, exponent)
}
