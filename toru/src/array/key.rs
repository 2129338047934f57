use std::fmt;
use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::error;
use crate::value::Value;

/// A key of a materialized [`Array`](crate::Array).
///
/// Sequences may use any value as a key, but an array only knows integer and
/// string keys. Other scalars are normalized on the way in, see
/// [`ArrayKey::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKey {
    Int(i64),
    Str(Rc<str>),
}

impl ArrayKey {
    /// Normalize a value into an array key.
    ///
    /// - Integers are used as is.
    ///
    /// - Booleans become `0` and `1`.
    ///
    /// - `Null` becomes the empty string.
    ///
    /// - Floats are truncated towards zero.
    ///
    /// - Strings in canonical decimal integer form (`"7"`, `"-7"`, but not
    ///   `"07"`, `"+7"`, `"-0"` or `"7 "`) become integers; other strings
    ///   stay strings.
    ///
    /// Arrays, sequences and callables cannot be keys.
    pub fn new(value: &Value) -> error::Result<Self> {
        match value {
            Value::Int(i) => Ok(ArrayKey::Int(*i)),
            Value::Bool(b) => Ok(ArrayKey::Int(i64::from(*b))),
            Value::Null => Ok(ArrayKey::Str("".into())),
            // `as` saturates, NaN becomes 0
            Value::Float(OrderedFloat(f)) => Ok(ArrayKey::Int(*f as i64)),
            Value::String(s) => Ok(Self::from_string(s.clone())),
            _ => Err(error::Error::IllegalKey {
                type_name: value.type_name(),
            }),
        }
    }

    /// Whether a merging materialization appends a pair with this key
    /// instead of writing to it.
    ///
    /// That's the case for integers, booleans and canonical integer strings.
    /// Floats are not integer-like even when they have no fraction.
    pub(crate) fn is_integer_like(value: &Value) -> bool {
        match value {
            Value::Int(_) | Value::Bool(_) => true,
            Value::String(s) => canonical_integer(s).is_some(),
            _ => false,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArrayKey::Int(i) => Some(*i),
            ArrayKey::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArrayKey::Int(_) => None,
            ArrayKey::Str(s) => Some(s),
        }
    }

    fn from_string(s: Rc<str>) -> Self {
        match canonical_integer(&s) {
            Some(i) => ArrayKey::Int(i),
            None => ArrayKey::Str(s),
        }
    }
}

fn canonical_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.starts_with('0') && (digits.len() > 1 || digits.len() != s.len()) {
        // leading zeros and negative zero
        return None;
    }
    // out of range strings stay strings
    s.parse().ok()
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(i) => write!(f, "{}", i),
            ArrayKey::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(i: i64) -> Self {
        ArrayKey::Int(i)
    }
}

impl From<i32> for ArrayKey {
    fn from(i: i32) -> Self {
        ArrayKey::Int(i.into())
    }
}

impl From<usize> for ArrayKey {
    fn from(i: usize) -> Self {
        ArrayKey::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<bool> for ArrayKey {
    fn from(b: bool) -> Self {
        ArrayKey::Int(i64::from(b))
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        Self::from_string(s.into())
    }
}

impl From<String> for ArrayKey {
    fn from(s: String) -> Self {
        Self::from_string(s.into())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", Some(0))]
    #[case("42", Some(42))]
    #[case("-42", Some(-42))]
    #[case("-0", None)]
    #[case("007", None)]
    #[case("+7", None)]
    #[case("7 ", None)]
    #[case("2.5", None)]
    #[case("", None)]
    #[case("-", None)]
    #[case("9223372036854775807", Some(i64::MAX))]
    #[case("9223372036854775808", None)]
    fn test_canonical_integer(#[case] s: &str, #[case] expected: Option<i64>) {
        assert_eq!(canonical_integer(s), expected);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(ArrayKey::new(&Value::from(true)).unwrap(), ArrayKey::Int(1));
        assert_eq!(ArrayKey::new(&Value::Null).unwrap(), ArrayKey::Str("".into()));
        assert_eq!(ArrayKey::new(&Value::from(2.9)).unwrap(), ArrayKey::Int(2));
        assert_eq!(ArrayKey::new(&Value::from("12")).unwrap(), ArrayKey::Int(12));
        assert_eq!(ArrayKey::new(&Value::from("x")).unwrap(), ArrayKey::from("x"));
    }

    #[test]
    fn test_illegal_key() {
        let err = ArrayKey::new(&Value::from(crate::Array::new())).unwrap_err();
        assert!(matches!(
            err,
            error::Error::IllegalKey { type_name: "array" }
        ));
    }

    #[test]
    fn test_integer_like() {
        assert!(ArrayKey::is_integer_like(&Value::from(3)));
        assert!(ArrayKey::is_integer_like(&Value::from(false)));
        assert!(ArrayKey::is_integer_like(&Value::from("3")));
        assert!(!ArrayKey::is_integer_like(&Value::from("3.0")));
        assert!(!ArrayKey::is_integer_like(&Value::from(3.0)));
        assert!(!ArrayKey::is_integer_like(&Value::Null));
    }
}
