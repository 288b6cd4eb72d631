//! Literal values as the decision engine sees them: a value plus the type it is matched at

use crate::unpick::ast::{ConstantKey, DataType, Literal};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Integral(i64),
    Floating(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TypedValue {
    pub value: Value,
    pub ty: DataType,
}

impl TypedValue {
    /// `negated` folds in a preceding unary minus; characters and strings cannot be negated.
    pub fn of(literal: &Literal, negated: bool) -> Option<Self> {
        let literal = if negated {
            literal.negated()?
        } else {
            literal.clone()
        };
        let value = match &literal {
            Literal::Integer { value, .. } => Value::Integral(*value as i64),
            Literal::Long { value, .. } => Value::Integral(*value),
            Literal::Character(unit) => Value::Integral(*unit as i64),
            Literal::Float(value) => Value::Floating(*value as f64),
            Literal::Double(value) => Value::Floating(*value),
            Literal::String(value) => Value::Text(value.clone()),
        };
        Some(Self {
            value,
            ty: literal.data_type(),
        })
    }

    pub fn key(&self) -> ConstantKey {
        match &self.value {
            Value::Integral(value) => ConstantKey::integral(*value),
            Value::Floating(value) => ConstantKey::floating(*value),
            Value::Text(value) => ConstantKey::Text(value.clone()),
        }
    }

    /// Unsigned bits and width mask, for int and long values only.
    pub fn flag_bits(&self) -> Option<(u64, u64)> {
        match (&self.value, self.ty) {
            (Value::Integral(value), DataType::Int | DataType::Long) => {
                let mask = self.ty.literal_mask()?;
                Some((*value as u64 & mask, mask))
            }
            _ => None,
        }
    }

    /// Cast down to `target`, if the value survives the cast unchanged.
    pub fn narrow_to(&self, target: DataType) -> Option<TypedValue> {
        let value = match (&self.value, target) {
            (Value::Integral(value), DataType::Byte) => {
                i8::try_from(*value).ok().map(|_| Value::Integral(*value))
            }
            (Value::Integral(value), DataType::Short) => {
                i16::try_from(*value).ok().map(|_| Value::Integral(*value))
            }
            (Value::Integral(value), DataType::Int) => {
                i32::try_from(*value).ok().map(|_| Value::Integral(*value))
            }
            (Value::Floating(value), DataType::Int) => {
                let narrowed = *value as i32;
                let negative_zero = *value == 0.0 && value.is_sign_negative();
                (narrowed as f64 == *value && !negative_zero)
                    .then_some(Value::Integral(narrowed as i64))
            }
            (Value::Floating(value), DataType::Float) => {
                let narrowed = *value as f32;
                (narrowed as f64 == *value || value.is_nan())
                    .then_some(Value::Floating(narrowed as f64))
            }
            _ => None,
        }?;
        Some(TypedValue { value, ty: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpick::ast::Radix;

    #[test]
    fn test_negation_applies_at_literal_width() {
        let value = TypedValue::of(&Literal::int(i32::MIN), true).expect("numeric");
        assert_eq!(value.value, Value::Integral(i32::MIN as i64));
        assert!(TypedValue::of(&Literal::Character(65), true).is_none());
    }

    #[test]
    fn test_flag_bits_are_unsigned() {
        let value = TypedValue::of(
            &Literal::Integer {
                value: -1,
                radix: Radix::Hex,
            },
            false,
        )
        .expect("numeric");
        assert_eq!(value.flag_bits(), Some((0xFFFF_FFFF, 0xFFFF_FFFF)));
        let float = TypedValue::of(&Literal::Float(1.0), false).expect("numeric");
        assert_eq!(float.flag_bits(), None);
    }

    #[test]
    fn test_narrowing_is_lossless_only() {
        let long = TypedValue::of(&Literal::long(1 << 40), false).expect("numeric");
        assert!(long.narrow_to(DataType::Int).is_none());
        let small = TypedValue::of(&Literal::long(7), false).expect("numeric");
        assert_eq!(
            small.narrow_to(DataType::Int).map(|v| v.ty),
            Some(DataType::Int)
        );

        let half = TypedValue::of(&Literal::Double(0.5), false).expect("numeric");
        assert!(half.narrow_to(DataType::Float).is_some());
        let tenth = TypedValue::of(&Literal::Double(0.1), false).expect("numeric");
        assert!(tenth.narrow_to(DataType::Float).is_none());

        let float = TypedValue::of(&Literal::Float(3.0), false).expect("numeric");
        assert_eq!(
            float.narrow_to(DataType::Int).map(|v| v.value),
            Some(Value::Integral(3))
        );
        let fraction = TypedValue::of(&Literal::Float(3.5), false).expect("numeric");
        assert!(fraction.narrow_to(DataType::Int).is_none());
    }
}
