use crate::callable::{Effect, Predicate, Producer, ValueFn};
use crate::sequence::{BoxedPairIter, Sequence};
use crate::value::Value;

use super::iter::{
    FilterIter, FlipIter, KeysOnlyIter, LimitIter, MapIter, OmitIter, ProduceIter, ReindexIter,
    RemapIter, RepeatIter, TapIter, UnfoldIter, ValuesOnlyIter,
};
use super::source::{Chained, CountRule, Cycled, Decorated, Generated};

fn decorated<F>(name: &'static str, sequence: Sequence, count_rule: CountRule, decorate: F) -> Sequence
where
    F: Fn(BoxedPairIter) -> BoxedPairIter + 'static,
{
    Sequence::from_source(Decorated::new(name, sequence, count_rule, decorate))
}

/// Chain sequences one after another.
///
/// A sequence is opened only once the ones before it are exhausted. Keys are
/// kept as they are, so the result may contain duplicate keys.
pub fn chain<I>(sequences: I) -> Sequence
where
    I: IntoIterator,
    I::Item: Into<Sequence>,
{
    let sequences: Vec<Sequence> = sequences.into_iter().map(Into::into).collect();
    if sequences.is_empty() {
        return Sequence::Empty;
    }
    Sequence::from_source(Chained::new(sequences))
}

/// Map values and keys in one pass.
///
/// Both functions receive the original value and key. With a single
/// function this behaves like [`map`] or [`reindex`]; with none the input is
/// returned as is.
pub fn adjust(
    sequence: impl Into<Sequence>,
    values: Option<ValueFn>,
    keys: Option<ValueFn>,
) -> Sequence {
    let sequence = sequence.into();
    match (values, keys) {
        (None, None) => sequence,
        (Some(values), None) => decorated("map", sequence, CountRule::Preserved, move |iter| {
            Box::new(MapIter::new(iter, values.clone()))
        }),
        (None, Some(keys)) => decorated("reindex", sequence, CountRule::Preserved, move |iter| {
            Box::new(ReindexIter::new(iter, keys.clone()))
        }),
        (Some(values), Some(keys)) => {
            decorated("adjust", sequence, CountRule::Preserved, move |iter| {
                Box::new(RemapIter::new(iter, values.clone(), keys.clone()))
            })
        }
    }
}

/// Map values with `values(value, key)`. Keys are kept.
pub fn map<F, V>(sequence: impl Into<Sequence>, values: F) -> Sequence
where
    F: Fn(&Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    adjust(
        sequence,
        Some(ValueFn::new(move |value, key| values(value, key).into())),
        None,
    )
}

/// Alias of [`map`].
pub fn apply<F, V>(sequence: impl Into<Sequence>, values: F) -> Sequence
where
    F: Fn(&Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    map(sequence, values)
}

/// Map keys with `keys(value, key)`. Values are kept.
pub fn reindex<F, K>(sequence: impl Into<Sequence>, keys: F) -> Sequence
where
    F: Fn(&Value, &Value) -> K + 'static,
    K: Into<Value>,
{
    adjust(
        sequence,
        None,
        Some(ValueFn::new(move |value, key| keys(value, key).into())),
    )
}

/// Replace every pair with the pairs of the sequence `mapper(value, key)`
/// returns.
///
/// The mapper must return an array or a sequence. Anything else is a
/// [`NotIterable`](crate::error::Error::NotIterable) error when the offending
/// pair is pulled.
pub fn unfold<F, V>(sequence: impl Into<Sequence>, mapper: F) -> Sequence
where
    F: Fn(&Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    let mapper = ValueFn::new(move |value, key| mapper(value, key).into());
    decorated("unfold", sequence.into(), CountRule::Unknown, move |iter| {
        Box::new(UnfoldIter::new(iter, mapper.clone()))
    })
}

/// Drop the keys, replacing them with positions `0, 1, 2, ...`.
pub fn values_only(sequence: impl Into<Sequence>) -> Sequence {
    decorated("values_only", sequence.into(), CountRule::Preserved, |iter| {
        Box::new(ValuesOnlyIter::new(iter))
    })
}

/// Yield the keys as values, under positions `0, 1, 2, ...`.
pub fn keys_only(sequence: impl Into<Sequence>) -> Sequence {
    decorated("keys_only", sequence.into(), CountRule::Preserved, |iter| {
        Box::new(KeysOnlyIter::new(iter))
    })
}

/// Swap keys and values.
pub fn flip(sequence: impl Into<Sequence>) -> Sequence {
    decorated("flip", sequence.into(), CountRule::Preserved, |iter| {
        Box::new(FlipIter::new(iter))
    })
}

/// Keep the pairs for which `predicate(value, key)` holds.
pub fn filter<F>(sequence: impl Into<Sequence>, predicate: F) -> Sequence
where
    F: Fn(&Value, &Value) -> bool + 'static,
{
    let predicate = Predicate::new(predicate);
    decorated("filter", sequence.into(), CountRule::Unknown, move |iter| {
        Box::new(FilterIter::new(iter, predicate.clone()))
    })
}

/// Yield at most `limit` pairs.
///
/// A non-positive limit yields an empty sequence without ever touching the
/// input.
pub fn limit(sequence: impl Into<Sequence>, limit: i64) -> Sequence {
    let Some(limit) = positive(limit) else {
        return Sequence::Empty;
    };
    decorated("limit", sequence.into(), CountRule::AtMost(limit), move |iter| {
        Box::new(LimitIter::new(iter, limit))
    })
}

/// Skip the first `omit` pairs. A non-positive count skips nothing.
pub fn omit(sequence: impl Into<Sequence>, omit: i64) -> Sequence {
    let sequence = sequence.into();
    let Some(omit) = positive(omit) else {
        return sequence;
    };
    decorated("omit", sequence, CountRule::Fewer(omit), move |iter| {
        Box::new(OmitIter::new(iter, omit))
    })
}

/// Skip `offset` pairs, then yield at most `length` pairs.
pub fn slice(sequence: impl Into<Sequence>, offset: i64, length: i64) -> Sequence {
    limit(omit(sequence, offset), length)
}

/// Call `effect(value, key)` for every pair as it is pulled.
pub fn tap<F>(sequence: impl Into<Sequence>, effect: F) -> Sequence
where
    F: Fn(&Value, &Value) + 'static,
{
    let effect = Effect::new(effect);
    decorated("tap", sequence.into(), CountRule::Observed, move |iter| {
        Box::new(TapIter::new(iter, effect.clone()))
    })
}

/// Alias of [`tap`].
pub fn each<F>(sequence: impl Into<Sequence>, effect: F) -> Sequence
where
    F: Fn(&Value, &Value) + 'static,
{
    tap(sequence, effect)
}

/// A single-pass sequence over the given values, under positions
/// `0, 1, 2, ...`.
pub fn make<I>(values: I) -> Sequence
where
    I: IntoIterator,
    I::IntoIter: 'static,
    I::Item: Into<Value>,
{
    Sequence::one_shot(values.into_iter().enumerate())
}

/// An endless sequence of `producer(index)` results.
///
/// The producer is called once per pulled pair, with the index of the pair,
/// which is also its key.
pub fn produce<F, V>(producer: F) -> Sequence
where
    F: Fn(usize) -> V + 'static,
    V: Into<Value>,
{
    let producer = Producer::new(move |index| producer(index).into());
    Sequence::from_source(Generated::new("produce", move || {
        Box::new(ProduceIter::new(producer.clone()))
    }))
}

/// An endless sequence of the same value.
pub fn repeat(value: impl Into<Value>) -> Sequence {
    let value = value.into();
    Sequence::from_source(Generated::new("repeat", move || {
        Box::new(RepeatIter::new(value.clone()))
    }))
}

/// Iterate the sequence over and over, forever.
///
/// Keys are those of each pass. A pass that yields nothing ends the loop.
/// Every pass opens the input anew, so a single-pass input fails on its
/// second pass; wrap its producer in a [`Regenerator`](crate::Regenerator).
pub fn r#loop(sequence: impl Into<Sequence>) -> Sequence {
    Sequence::from_source(Cycled::new(sequence.into(), None))
}

/// Iterate the sequence `times` times over.
pub fn replicate(sequence: impl Into<Sequence>, times: i64) -> Sequence {
    let Some(times) = positive(times) else {
        return Sequence::Empty;
    };
    Sequence::from_source(Cycled::new(sequence.into(), Some(times)))
}

// Negative counts are treated as zero.
fn positive(n: i64) -> Option<usize> {
    usize::try_from(n).ok().filter(|n| *n > 0)
}
