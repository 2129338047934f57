use std::fmt;
use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::array::{Array, ArrayKey};
use crate::callable::Callable;
use crate::error;
use crate::regenerator::Regenerator;
use crate::sequence::Sequence;

/// A dynamically typed value.
///
/// Both the keys and the values of a sequence are `Value`s. Cloning a value
/// is cheap: strings, arrays, sequences and callables are reference counted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A float. `NaN` compares equal to itself.
    Float(OrderedFloat<f64>),
    /// A string.
    String(Rc<str>),
    /// A materialized, ordered array.
    Array(Array),
    /// A lazy sequence of pairs.
    Sequence(Sequence),
    /// A callable taking any number of arguments.
    Callable(Callable),
}

impl Value {
    /// A short name of the type of the value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Sequence(_) => "sequence",
            Value::Callable(_) => "callable",
        }
    }

    /// Truthiness of the value.
    ///
    /// - `Null` is false.
    ///
    /// - Numbers are false if zero.
    ///
    /// - Strings are false if empty or `"0"`.
    ///
    /// - Arrays are false if empty.
    ///
    /// - Sequences and callables are always true; a sequence is not iterated
    ///   to find out.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(OrderedFloat(f)) => *f != 0.0,
            Value::String(s) => !s.is_empty() && s.as_ref() != "0",
            Value::Array(a) => !a.is_empty(),
            Value::Sequence(_) | Value::Callable(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(OrderedFloat(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Whether the value can be iterated as a sequence.
    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Sequence(_))
    }

    /// View the value as a sequence, if it is sequence-shaped.
    ///
    /// Arrays become multi-pass sequences; sequences are returned as-is.
    pub fn to_sequence(&self) -> Option<Sequence> {
        match self {
            Value::Array(a) => Some(Sequence::Array(a.clone())),
            Value::Sequence(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl TryFrom<Value> for Sequence {
    type Error = error::Error;

    fn try_from(value: Value) -> error::Result<Sequence> {
        match value {
            Value::Array(a) => Ok(Sequence::Array(a)),
            Value::Sequence(s) => Ok(s),
            value => Err(error::Error::NotIterable { value }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(OrderedFloat(v)) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(a) => write!(f, "{}", a),
            Value::Sequence(_) => write!(f, "<sequence>"),
            Value::Callable(_) => write!(f, "<callable>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i.into())
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::String(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(option: Option<T>) -> Self {
        option.map(Into::into).unwrap_or_default()
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

// an array-backed sequence is just the array
impl From<Sequence> for Value {
    fn from(s: Sequence) -> Self {
        match s {
            Sequence::Array(a) => Value::Array(a),
            s => Value::Sequence(s),
        }
    }
}

impl From<Regenerator> for Value {
    fn from(r: Regenerator) -> Self {
        Value::Sequence(r.into())
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

impl From<ArrayKey> for Value {
    fn from(key: ArrayKey) -> Self {
        match key {
            ArrayKey::Int(i) => Value::Int(i),
            ArrayKey::Str(s) => Value::String(s),
        }
    }
}

impl From<&ArrayKey> for Value {
    fn from(key: &ArrayKey) -> Self {
        key.clone().into()
    }
}
