// A Sequence is a description of how to produce pairs, not a cursor. Opening
// it creates a cursor. Arrays and combinator chains built on them can be
// opened any number of times; a one-shot source shares a single cursor.

use std::fmt;
use std::rc::Rc;

use crate::array::Array;
use crate::error;
use crate::value::Value;

use super::one_shot::OneShot;

/// A boxed cursor over the pairs of a sequence.
pub type BoxedPairIter = Box<dyn Iterator<Item = error::Result<Pair>>>;

/// A single (key, value) unit of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: Value,
    pub value: Value,
}

impl Pair {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Pair {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Something that can be opened into a cursor over pairs.
///
/// Every combinator is a `Source` holding its upstream sequences; implement
/// it to plug a custom producer into the engine.
pub trait Source {
    /// Open a new cursor.
    ///
    /// This must not pull any pair yet. A source that can only be iterated
    /// once should return an error when it is reopened after being
    /// exhausted.
    fn open(&self) -> error::Result<BoxedPairIter>;

    /// The number of pairs, if it is known without iterating.
    fn count(&self) -> Option<usize> {
        None
    }

    /// A short name, used for debugging output.
    fn name(&self) -> &'static str {
        "source"
    }
}

/// An ordered, lazily produced stream of [`Pair`]s.
///
/// Cloning a sequence is cheap and does not copy or consume anything.
#[derive(Clone, Default)]
pub enum Sequence {
    /// The sequence without pairs.
    #[default]
    Empty,
    /// A multi-pass sequence backed by an array.
    Array(Array),
    /// A single-pass sequence over an iterator.
    OneShot(OneShot),
    /// Any other source, most notably combinators.
    Lazy(Rc<dyn Source>),
}

impl Sequence {
    pub fn empty() -> Self {
        Self::Empty
    }

    /// A single-pass sequence over the given pairs.
    ///
    /// The iterator is not touched until the sequence is iterated. Once it is
    /// exhausted, iterating the sequence again is an error.
    pub fn one_shot<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: 'static,
        K: Into<Value>,
        V: Into<Value>,
    {
        let iter = pairs
            .into_iter()
            .map(|(key, value)| Ok(Pair::new(key, value)));
        Self::OneShot(OneShot::new(Box::new(iter)))
    }

    /// A single-pass sequence over a cursor that may fail.
    pub fn one_shot_fallible<I>(pairs: I) -> Self
    where
        I: Iterator<Item = error::Result<Pair>> + 'static,
    {
        Self::OneShot(OneShot::new(Box::new(pairs)))
    }

    /// A sequence from a custom source.
    pub fn from_source(source: impl Source + 'static) -> Self {
        Self::Lazy(Rc::new(source))
    }

    /// Open a cursor over the pairs of the sequence.
    ///
    /// Opening does not pull any pairs.
    pub fn open(&self) -> error::Result<BoxedPairIter> {
        match self {
            Sequence::Empty => Ok(Box::new(std::iter::empty())),
            Sequence::Array(array) => Ok(Box::new(array.pairs())),
            Sequence::OneShot(one_shot) => one_shot.open(),
            Sequence::Lazy(source) => source.open(),
        }
    }

    /// The number of pairs, if known without iterating.
    pub fn count_hint(&self) -> Option<usize> {
        match self {
            Sequence::Empty => Some(0),
            Sequence::Array(array) => Some(array.len()),
            Sequence::OneShot(_) => None,
            Sequence::Lazy(source) => source.count(),
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Empty => write!(f, "Empty"),
            Sequence::Array(array) => f.debug_tuple("Array").field(array).finish(),
            Sequence::OneShot(_) => write!(f, "OneShot"),
            Sequence::Lazy(source) => f.debug_tuple("Lazy").field(&source.name()).finish(),
        }
    }
}

// Arrays compare by content; everything else by identity, as comparing would
// mean consuming.
impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Sequence::Empty, Sequence::Empty) => true,
            (Sequence::Array(a), Sequence::Array(b)) => a == b,
            (Sequence::OneShot(a), Sequence::OneShot(b)) => a.same(b),
            (Sequence::Lazy(a), Sequence::Lazy(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl From<Array> for Sequence {
    fn from(array: Array) -> Self {
        Self::Array(array)
    }
}

impl<V> From<Vec<V>> for Sequence
where
    V: Into<Value>,
{
    fn from(values: Vec<V>) -> Self {
        Self::Array(Array::from_values(values))
    }
}
