// Terminal operations consume (part of) a sequence and return a value. These
// are the only places where pairs actually get pulled.

use crate::callable::Predicate;
use crate::error;
use crate::sequence::{BoxedPairIter, Pair, Sequence};
use crate::value::Value;

/// Fold the sequence into a single value, left to right.
///
/// The reducer receives `(carry, value, key)` and returns the new carry. An
/// empty sequence returns `initial` as is.
pub fn reduce<F, V>(
    sequence: impl Into<Sequence>,
    reducer: F,
    initial: impl Into<Value>,
) -> error::Result<Value>
where
    F: Fn(Value, &Value, &Value) -> V,
    V: Into<Value>,
{
    let mut carry = initial.into();
    for pair in sequence.into().open()? {
        let pair = pair?;
        carry = reducer(carry, &pair.value, &pair.key).into();
    }
    Ok(carry)
}

fn find_pair(sequence: &Sequence, predicate: &Predicate) -> error::Result<Option<Pair>> {
    for pair in sequence.open()? {
        let pair = pair?;
        if predicate.test(&pair.value, &pair.key) {
            return Ok(Some(pair));
        }
    }
    Ok(None)
}

/// The first value for which `predicate(value, key)` holds, or `default`.
///
/// Stops pulling as soon as a match is found.
pub fn search<F>(
    sequence: impl Into<Sequence>,
    predicate: F,
    default: impl Into<Value>,
) -> error::Result<Value>
where
    F: Fn(&Value, &Value) -> bool + 'static,
{
    let found = find_pair(&sequence.into(), &Predicate::new(predicate))?;
    Ok(found.map_or_else(|| default.into(), |pair| pair.value))
}

/// The first value for which `predicate(value, key)` holds.
///
/// Fails with [`NoMatch`](error::Error::NoMatch) when there is none.
pub fn search_or_fail<F>(sequence: impl Into<Sequence>, predicate: F) -> error::Result<Value>
where
    F: Fn(&Value, &Value) -> bool + 'static,
{
    let input = sequence.into();
    let predicate = Predicate::new(predicate);
    match find_pair(&input, &predicate)? {
        Some(pair) => Ok(pair.value),
        None => Err(error::Error::NoMatch { input, predicate }),
    }
}

fn first_pair(sequence: &Sequence) -> error::Result<Option<Pair>> {
    sequence.open()?.next().transpose()
}

fn empty(input: Sequence) -> error::Error {
    error::Error::EmptyCollection { input }
}

/// The first value, failing with
/// [`EmptyCollection`](error::Error::EmptyCollection) on an empty sequence.
pub fn first_value(sequence: impl Into<Sequence>) -> error::Result<Value> {
    let input = sequence.into();
    first_pair(&input)?
        .map(|pair| pair.value)
        .ok_or_else(|| empty(input))
}

/// The first key, failing with
/// [`EmptyCollection`](error::Error::EmptyCollection) on an empty sequence.
pub fn first_key(sequence: impl Into<Sequence>) -> error::Result<Value> {
    let input = sequence.into();
    first_pair(&input)?
        .map(|pair| pair.key)
        .ok_or_else(|| empty(input))
}

/// The first value, or `default` on an empty sequence.
pub fn first_value_or_default(
    sequence: impl Into<Sequence>,
    default: impl Into<Value>,
) -> error::Result<Value> {
    let first = first_pair(&sequence.into())?;
    Ok(first.map_or_else(|| default.into(), |pair| pair.value))
}

/// The first key, or `default` on an empty sequence.
pub fn first_key_or_default(
    sequence: impl Into<Sequence>,
    default: impl Into<Value>,
) -> error::Result<Value> {
    let first = first_pair(&sequence.into())?;
    Ok(first.map_or_else(|| default.into(), |pair| pair.key))
}

/// The number of pairs.
///
/// Sequences that know their size answer without being iterated; all others
/// are consumed to the end. Never returns for an endless sequence.
pub fn count(sequence: impl Into<Sequence>) -> error::Result<usize> {
    let sequence = sequence.into();
    if let Some(count) = sequence.count_hint() {
        return Ok(count);
    }
    let mut count = 0;
    for pair in sequence.open()? {
        pair?;
        count += 1;
    }
    Ok(count)
}

/// A cursor over the pairs.
///
/// A single-pass sequence shares its cursor, so the cursor continues where
/// any previous iteration stopped.
pub fn to_iterator(sequence: impl Into<Sequence>) -> error::Result<BoxedPairIter> {
    sequence.into().open()
}

/// Turn a sequence-shaped value into a sequence.
///
/// Sequences are returned as they are and arrays are wrapped; any other
/// value is a [`NotIterable`](error::Error::NotIterable) error.
pub fn ensure_sequence(input: impl Into<Value>) -> error::Result<Sequence> {
    Sequence::try_from(input.into())
}
