// Field values as seen by the rules

use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// A field's current value, reduced to what the built-in rules care about.
///
/// `Absent` is an unset optional. `Text("")` is a present but empty string;
/// the two are kept apart so `not-zero` and `required` can tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Unset optional value.
    Absent,
    /// String-like value.
    Text(Cow<'a, str>),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Point in time.
    Timestamp(DateTime<Utc>),
    /// Boolean.
    Bool(bool),
    /// Present value with no textual or numeric reading (maps, lists, ...).
    Opaque,
}

impl<'a> FieldValue<'a> {
    /// Borrowed text value
    pub fn text(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }

    /// Whether the value is an unset optional
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Textual reading used by the length and allow-list rules.
    ///
    /// Absent and opaque values read as the empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Absent | FieldValue::Opaque => Cow::Borrowed(""),
            FieldValue::Text(s) => Cow::Borrowed(s.as_ref()),
            FieldValue::Int(n) => Cow::Owned(n.to_string()),
            FieldValue::UInt(n) => Cow::Owned(n.to_string()),
            FieldValue::Float(n) => Cow::Owned(n.to_string()),
            FieldValue::Timestamp(t) => Cow::Owned(t.to_rfc3339()),
            FieldValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// Read a JSON value. `null` is treated as absent.
    pub fn from_json(value: &'a serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Absent,
            Value::String(s) => FieldValue::text(s),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::UInt(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or_default())
                }
            }
            Value::Array(_) | Value::Object(_) => FieldValue::Opaque,
        }
    }
}

/// Conversion of a field into a [`FieldValue`].
///
/// `Option<T>` maps `None` to [`FieldValue::Absent`] and otherwise defers to
/// `T`, so optional fields validate exactly like their inner value.
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::text(self)
    }
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::text(self)
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value(),
            None => FieldValue::Absent,
        }
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(impl AsFieldValue for $t {
            fn as_field_value(&self) -> FieldValue<'_> {
                FieldValue::Int(i64::from(*self))
            }
        })*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(impl AsFieldValue for $t {
            fn as_field_value(&self) -> FieldValue<'_> {
                FieldValue::UInt(u64::from(*self))
            }
        })*
    };
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl AsFieldValue for isize {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Int(*self as i64)
    }
}

impl AsFieldValue for usize {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::UInt(*self as u64)
    }
}

impl AsFieldValue for f32 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(f64::from(*self))
    }
}

impl AsFieldValue for f64 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(*self)
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

impl AsFieldValue for DateTime<Utc> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Timestamp(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_unwraps_to_inner() {
        let some: Option<String> = Some("abc".to_string());
        let none: Option<String> = None;

        assert_eq!(some.as_field_value(), FieldValue::text("abc"));
        assert!(none.as_field_value().is_absent());
    }

    #[test]
    fn test_empty_string_is_present() {
        let empty = Some(String::new());
        assert_eq!(empty.as_field_value(), FieldValue::text(""));
        assert!(!empty.as_field_value().is_absent());
    }

    #[test]
    fn test_json_reading() {
        let json = serde_json::json!({"n": 3, "s": "x", "z": null, "f": 1.5, "o": {}});
        assert_eq!(FieldValue::from_json(&json["n"]), FieldValue::Int(3));
        assert_eq!(FieldValue::from_json(&json["s"]), FieldValue::text("x"));
        assert!(FieldValue::from_json(&json["z"]).is_absent());
        assert_eq!(FieldValue::from_json(&json["f"]), FieldValue::Float(1.5));
        assert_eq!(FieldValue::from_json(&json["o"]), FieldValue::Opaque);
    }

    #[test]
    fn test_numbers_as_text() {
        assert_eq!(FieldValue::Int(-12).as_text(), "-12");
        assert_eq!(FieldValue::Absent.as_text(), "");
    }
}
