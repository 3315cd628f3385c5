//! Numeric classification against the scalar type lattice.

use crate::types::{ColumnType, RawValue};

/// Result of an explicit parse attempt on a raw cell.
///
/// An `Integer` is any finite numeric value with a zero fractional part; whether it
/// fits a given storage width is the lattice's concern, not the parser's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberClass {
    /// A mathematical integer (carried as `f64`; may exceed any fixed width).
    Integer(f64),
    /// A non-integral number.
    Float(f64),
    /// Does not parse as a number.
    NotANumber,
}

/// Classify a raw cell as integer / float / not-a-number.
///
/// Textual `inf`/`NaN` spellings are not treated as numbers: only finite parses
/// count. Already-numeric scalars are classified as-is.
pub fn classify_number(value: &RawValue) -> NumberClass {
    match value {
        RawValue::Int(n) => NumberClass::Integer(*n as f64),
        RawValue::Float(f) => classify_f64(*f),
        RawValue::Text(s) => match s.parse::<f64>() {
            Ok(f) if f.is_finite() => classify_f64(f),
            _ => NumberClass::NotANumber,
        },
    }
}

fn classify_f64(f: f64) -> NumberClass {
    if f.is_finite() && f.fract() == 0.0 {
        NumberClass::Integer(f)
    } else {
        NumberClass::Float(f)
    }
}

/// The narrowest column type that accommodates a single raw cell.
///
/// Returns `None` for null sentinels, which contribute no widening signal.
/// Integral values outside the i32 range widen straight to [`ColumnType::Text`]:
/// oversized integers are treated as opaque text rather than lossily coerced to
/// floating point.
pub fn narrowest_type(value: &RawValue) -> Option<ColumnType> {
    if value.is_null() {
        return None;
    }
    Some(match classify_number(value) {
        NumberClass::Integer(n) => {
            if n >= i32::MIN as f64 && n <= i32::MAX as f64 {
                ColumnType::Int32
            } else {
                ColumnType::Text
            }
        }
        NumberClass::Float(_) => ColumnType::Float32,
        NumberClass::NotANumber => ColumnType::Text,
    })
}

/// Apply one observed cell to a column's current type, widening if required.
pub fn widen(current: ColumnType, value: &RawValue) -> ColumnType {
    match narrowest_type(value) {
        Some(observed) => current.widen_to(observed),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::from(s)
    }

    #[test]
    fn classification_is_an_explicit_tri_state() {
        assert_eq!(classify_number(&text("42")), NumberClass::Integer(42.0));
        assert_eq!(classify_number(&text("-3")), NumberClass::Integer(-3.0));
        assert_eq!(classify_number(&text("3.5")), NumberClass::Float(3.5));
        assert_eq!(classify_number(&text("1e3")), NumberClass::Integer(1000.0));
        assert_eq!(classify_number(&text("red")), NumberClass::NotANumber);
        assert_eq!(classify_number(&text("NaN")), NumberClass::NotANumber);
        assert_eq!(classify_number(&text("inf")), NumberClass::NotANumber);
        assert_eq!(classify_number(&text("2020-01-15")), NumberClass::NotANumber);
        assert_eq!(classify_number(&RawValue::Float(2.0)), NumberClass::Integer(2.0));
    }

    #[test]
    fn narrowest_type_follows_the_lattice() {
        assert_eq!(narrowest_type(&text("7")), Some(ColumnType::Int32));
        assert_eq!(narrowest_type(&text("7.5")), Some(ColumnType::Float32));
        assert_eq!(narrowest_type(&text("seven")), Some(ColumnType::Text));
        assert_eq!(narrowest_type(&text("na")), None);
    }

    #[test]
    fn oversized_integers_widen_to_text_not_float() {
        assert_eq!(narrowest_type(&text("2147483647")), Some(ColumnType::Int32));
        assert_eq!(narrowest_type(&text("2147483648")), Some(ColumnType::Text));
        assert_eq!(narrowest_type(&text("-2147483649")), Some(ColumnType::Text));
        assert_eq!(narrowest_type(&text("1e20")), Some(ColumnType::Text));
    }

    #[test]
    fn widening_ignores_null_sentinels() {
        let mut ty = ColumnType::Int32;
        for v in ["1", "na", "2", "", "3"] {
            ty = widen(ty, &text(v));
        }
        assert_eq!(ty, ColumnType::Int32);

        ty = widen(ty, &text("2.5"));
        assert_eq!(ty, ColumnType::Float32);
        ty = widen(ty, &text("4"));
        assert_eq!(ty, ColumnType::Float32); // never narrows back
        ty = widen(ty, &text("x"));
        assert_eq!(ty, ColumnType::Text);
    }
}
