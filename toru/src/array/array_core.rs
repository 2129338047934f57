use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error;
use crate::sequence::Pair;
use crate::value::Value;

use super::key::ArrayKey;

type Entries = IndexMap<ArrayKey, Value, ahash::RandomState>;

/// An ordered array of key/value entries with unique keys.
///
/// This is what materializing a sequence produces. Entries keep the order in
/// which their key was first inserted. Arrays are also the multi-pass source
/// of sequences: every iteration starts from the first entry.
///
/// Equality is order sensitive.
#[derive(Clone, Default)]
pub struct Array(Rc<Entries>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an array from values, keyed `0, 1, 2, ...`.
    pub fn from_values<V>(values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (ArrayKey::from(i), value.into()))
            .collect();
        Self(Rc::new(entries))
    }

    /// Create an array from entries. A later entry overwrites an earlier one
    /// with the same key.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<ArrayKey>,
        V: Into<Value>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self(Rc::new(entries))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: impl Into<ArrayKey>) -> Option<&Value> {
        self.0.get(&key.into())
    }

    pub fn contains_key(&self, key: impl Into<ArrayKey>) -> bool {
        self.0.contains_key(&key.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    /// A fresh cursor over the entries as pairs.
    pub(crate) fn pairs(&self) -> ArrayIter {
        ArrayIter {
            array: self.clone(),
            index: 0,
        }
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} => {}", key, value)?;
        }
        write!(f, "]")
    }
}

impl<V> From<Vec<V>> for Array
where
    V: Into<Value>,
{
    fn from(values: Vec<V>) -> Self {
        Self::from_values(values)
    }
}

impl<V> FromIterator<V> for Array
where
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self::from_values(iter)
    }
}

/// A cursor over an array, yielding its entries as pairs.
pub(crate) struct ArrayIter {
    array: Array,
    index: usize,
}

impl Iterator for ArrayIter {
    type Item = error::Result<Pair>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.array.0.get_index(self.index)?;
        self.index += 1;
        Some(Ok(Pair::new(key, value.clone())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len() - self.index;
        (remaining, Some(remaining))
    }
}

/// Builds an array out of pairs, one collision policy per method.
#[derive(Default)]
pub(crate) struct ArrayBuilder {
    entries: Entries,
    // the slot used by the next append; unset until an integer key is seen
    next_index: Option<i64>,
}

impl ArrayBuilder {
    /// Write the value under the key, overwriting any previous value. The
    /// key keeps the position of its first insertion.
    pub(crate) fn insert(&mut self, key: ArrayKey, value: Value) {
        if let ArrayKey::Int(i) = key {
            if self.next_index.is_none_or(|next| i >= next) {
                self.next_index = Some(i.saturating_add(1));
            }
        }
        self.entries.insert(key, value);
    }

    /// Append the value at the next free integer slot: one past the highest
    /// integer key written so far, or 0 when there is none yet.
    pub(crate) fn push(&mut self, value: Value) {
        self.insert(ArrayKey::Int(self.next_index.unwrap_or(0)), value);
    }

    pub(crate) fn build(self) -> Array {
        Array(Rc::new(self.entries))
    }
}
