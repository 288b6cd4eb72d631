//! Escape sequences of string and character literals
//!
//! Both directions share one table: `\b \t \n \f \r \" \' \\`, octal escapes up to `\377`
//! and `\uXXXX` (any number of `u`s). Decoding works on UTF-16 code units because a
//! `\uXXXX` escape may name half of a surrogate pair.

use super::tokens::LexErrorKind;
use std::iter::Peekable;
use std::str::Chars;

const NAMED: [(char, u16); 8] = [
    ('b', 0x08),
    ('t', 0x09),
    ('n', 0x0A),
    ('f', 0x0C),
    ('r', 0x0D),
    ('"', 0x22),
    ('\'', 0x27),
    ('\\', 0x5C),
];

/// Decode the body of a string literal (without quotes).
pub(crate) fn unescape_string(body: &str) -> Result<String, LexErrorKind> {
    let units = decode_units(body)?;
    String::from_utf16(&units).map_err(|_| LexErrorKind::InvalidEscape)
}

/// Decode the body of a character literal (without quotes) into its single code unit.
pub(crate) fn unescape_char(body: &str) -> Result<u16, LexErrorKind> {
    match decode_units(body)?.as_slice() {
        [unit] => Ok(*unit),
        _ => Err(LexErrorKind::InvalidCharacter),
    }
}

fn decode_units(body: &str) -> Result<Vec<u16>, LexErrorKind> {
    let mut units = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    let mut buffer = [0u16; 2];

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            units.extend_from_slice(ch.encode_utf16(&mut buffer));
            continue;
        }
        let escaped = chars.next().ok_or(LexErrorKind::InvalidEscape)?;
        if let Some((_, unit)) = NAMED.iter().find(|(name, _)| *name == escaped) {
            units.push(*unit);
        } else if escaped.is_digit(8) {
            units.push(decode_octal(escaped, &mut chars));
        } else if escaped == 'u' {
            units.push(decode_unicode(&mut chars)?);
        } else {
            return Err(LexErrorKind::InvalidEscape);
        }
    }

    Ok(units)
}

// A leading digit of 0-3 allows three octal digits, anything larger only two.
fn decode_octal(first: char, chars: &mut Peekable<Chars>) -> u16 {
    let max_digits = if first <= '3' { 3 } else { 2 };
    let mut value = first.to_digit(8).unwrap_or(0);
    for _ in 1..max_digits {
        match chars.peek().and_then(|c| c.to_digit(8)) {
            Some(digit) => {
                value = value * 8 + digit;
                chars.next();
            }
            None => break,
        }
    }
    value as u16
}

fn decode_unicode(chars: &mut Peekable<Chars>) -> Result<u16, LexErrorKind> {
    while chars.peek() == Some(&'u') {
        chars.next();
    }
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(LexErrorKind::InvalidEscape)?;
        value = value * 16 + digit;
    }
    Ok(value as u16)
}

// Unicode general category Cf (format characters).
const FORMAT_CHARS: [(char, char); 21] = [
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{0890}', '\u{0891}'),
    ('\u{08E2}', '\u{08E2}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
    ('\u{110BD}', '\u{110BD}'),
    ('\u{110CD}', '\u{110CD}'),
    ('\u{13430}', '\u{1343F}'),
    ('\u{1BCA0}', '\u{1BCA3}'),
    ('\u{1D173}', '\u{1D17A}'),
    ('\u{E0001}', '\u{E0001}'),
    ('\u{E0020}', '\u{E007F}'),
];

/// False for controls (Cc), format characters (Cf) and separators (Zl, Zp, and Zs other
/// than the plain space).
fn is_printable(ch: char) -> bool {
    if ch.is_control() || (ch != ' ' && ch.is_whitespace()) {
        return false;
    }
    !FORMAT_CHARS
        .iter()
        .any(|(first, last)| (*first..=*last).contains(&ch))
}

fn push_escaped_unit(out: &mut String, unit: u16) {
    if let Some((name, _)) = NAMED.iter().find(|(_, named)| *named == unit) {
        out.push('\\');
        out.push(*name);
    } else if unit <= 0xFF {
        out.push_str(&format!("\\{:03o}", unit));
    } else {
        out.push_str(&format!("\\u{:04X}", unit));
    }
}

fn push_char(out: &mut String, ch: char, quote: char) {
    if ch == quote || ch == '\\' {
        out.push('\\');
        out.push(ch);
    } else if is_printable(ch) {
        out.push(ch);
    } else {
        let mut buffer = [0u16; 2];
        for unit in ch.encode_utf16(&mut buffer) {
            push_escaped_unit(out, *unit);
        }
    }
}

/// Render a string as a double-quoted DSL literal.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        push_char(&mut out, ch, '"');
    }
    out.push('"');
    out
}

/// Render a UTF-16 code unit as a single-quoted DSL literal.
pub fn escape_char(unit: u16) -> String {
    let mut out = String::with_capacity(8);
    out.push('\'');
    match char::from_u32(unit as u32) {
        Some(ch) => push_char(&mut out, ch, '\''),
        // lone surrogate
        None => push_escaped_unit(&mut out, unit),
    }
    out.push('\'');
    out
}
