//! Partially applied operations.
//!
//! Each function here fixes every argument of an operation except the input,
//! and returns the rest as a [`Stage`]: a function from the input to the
//! result. Stages compose with [`try_through`](crate::pipeline::try_through).
//!
//! ```
//! use toru::{array, Value};
//! use toru_dash::{partial, pipeline};
//!
//! let result = pipeline::try_through(
//!     Value::from(array![1, 2, 3, 4]),
//!     [
//!         partial::filter(|value, _| value.as_int().unwrap_or(0) % 2 == 0),
//!         partial::map(|value, _| value.as_int().unwrap_or(0) * 10),
//!         partial::to_array_values(),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(result, Value::from(array![20, 40]));
//! ```
//!
//! Stages take and return [`Value`]s so they can be mixed freely; combinator
//! stages return sequences. The input must be an array or a sequence, except
//! for [`repeat`], which repeats its input whatever it is.

use tracing::debug;

use toru::error;
use toru::{Effect, Predicate, Reducer, Sequence, Value, ValueFn};

use crate::operation::{resolve, Operation};

/// A partially applied operation.
pub type Stage = Box<dyn Fn(Value) -> error::Result<Value>>;

fn stage(operation: Operation) -> Stage {
    Box::new(move |input| Ok(operation.apply_value(input)?.into_value()))
}

fn value_fn<F, V>(f: F) -> ValueFn
where
    F: Fn(&Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    ValueFn::new(move |value, key| f(value, key).into())
}

/// Build a stage by operation name, with dynamic arguments.
///
/// Fails right away on unknown names and badly shaped arguments. `make` and
/// `produce` take no input and are refused.
pub fn named(name: &str, args: &[Value]) -> error::Result<Stage> {
    let op = resolve(name)?;
    if op.is_generator() {
        debug!(%op, "generator cannot be partially applied");
        return Err(error::Error::BadMethodCall {
            name: name.to_string(),
            hint: "The method is not supported in partially applied form.".to_string(),
        });
    }
    Ok(stage(Operation::with_args(op, args)?))
}

pub fn adjust(values: Option<ValueFn>, keys: Option<ValueFn>) -> Stage {
    stage(Operation::Adjust { values, keys })
}

pub fn map<F, V>(values: F) -> Stage
where
    F: Fn(&Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    stage(Operation::Map(value_fn(values)))
}

pub fn apply<F, V>(values: F) -> Stage
where
    F: Fn(&Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    map(values)
}

pub fn reindex<F, K>(keys: F) -> Stage
where
    F: Fn(&Value, &Value) -> K + 'static,
    K: Into<Value>,
{
    stage(Operation::Reindex(value_fn(keys)))
}

pub fn filter<F>(predicate: F) -> Stage
where
    F: Fn(&Value, &Value) -> bool + 'static,
{
    stage(Operation::Filter(Predicate::new(predicate)))
}

pub fn limit(limit: i64) -> Stage {
    stage(Operation::Limit(limit))
}

pub fn omit(omit: i64) -> Stage {
    stage(Operation::Omit(omit))
}

pub fn slice(offset: i64, length: i64) -> Stage {
    stage(Operation::Slice { offset, length })
}

/// Chain the given sequences after the input.
pub fn chain<I>(others: I) -> Stage
where
    I: IntoIterator,
    I::Item: Into<Sequence>,
{
    stage(Operation::Chain(others.into_iter().map(Into::into).collect()))
}

pub fn append<I>(others: I) -> Stage
where
    I: IntoIterator,
    I::Item: Into<Sequence>,
{
    chain(others)
}

pub fn tap<F>(effect: F) -> Stage
where
    F: Fn(&Value, &Value) + 'static,
{
    stage(Operation::Tap(Effect::new(effect)))
}

pub fn each<F>(effect: F) -> Stage
where
    F: Fn(&Value, &Value) + 'static,
{
    tap(effect)
}

pub fn unfold<F, V>(mapper: F) -> Stage
where
    F: Fn(&Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    stage(Operation::Unfold(value_fn(mapper)))
}

pub fn values_only() -> Stage {
    stage(Operation::ValuesOnly)
}

pub fn keys_only() -> Stage {
    stage(Operation::KeysOnly)
}

pub fn flip() -> Stage {
    stage(Operation::Flip)
}

/// An endless sequence of the input value.
pub fn repeat() -> Stage {
    stage(Operation::Repeat)
}

pub fn r#loop() -> Stage {
    stage(Operation::Loop)
}

pub fn replicate(times: i64) -> Stage {
    stage(Operation::Replicate(times))
}

/// Passes a sequence on unchanged. There is no value for a cursor, so this
/// is the same as [`ensure_sequence`].
pub fn to_iterator() -> Stage {
    stage(Operation::ToIterator)
}

pub fn ensure_sequence() -> Stage {
    stage(Operation::EnsureSequence)
}

pub fn reduce<F, V>(reducer: F, initial: impl Into<Value>) -> Stage
where
    F: Fn(Value, &Value, &Value) -> V + 'static,
    V: Into<Value>,
{
    stage(Operation::Reduce {
        reducer: Reducer::new(move |carry, value, key| reducer(carry, value, key).into()),
        initial: initial.into(),
    })
}

pub fn search<F>(predicate: F, default: impl Into<Value>) -> Stage
where
    F: Fn(&Value, &Value) -> bool + 'static,
{
    stage(Operation::Search {
        predicate: Predicate::new(predicate),
        default: default.into(),
    })
}

pub fn search_or_fail<F>(predicate: F) -> Stage
where
    F: Fn(&Value, &Value) -> bool + 'static,
{
    stage(Operation::SearchOrFail(Predicate::new(predicate)))
}

pub fn first_value() -> Stage {
    stage(Operation::FirstValue)
}

pub fn first_key() -> Stage {
    stage(Operation::FirstKey)
}

pub fn first_value_or_default(default: impl Into<Value>) -> Stage {
    stage(Operation::FirstValueOrDefault(default.into()))
}

pub fn first_key_or_default(default: impl Into<Value>) -> Stage {
    stage(Operation::FirstKeyOrDefault(default.into()))
}

pub fn count() -> Stage {
    stage(Operation::Count)
}

pub fn to_array() -> Stage {
    stage(Operation::ToArray)
}

pub fn to_array_merge() -> Stage {
    stage(Operation::ToArrayMerge)
}

pub fn to_array_values() -> Stage {
    stage(Operation::ToArrayValues)
}
