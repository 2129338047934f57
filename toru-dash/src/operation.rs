// Every surface of this crate funnels its calls through the one dispatch
// table here: a name resolves to an `OpName`, the name plus its arguments
// make an `Operation`, and `Operation::apply` runs it on a sequence.

use std::str::FromStr;

use strum_macros::{Display, EnumString, VariantNames};
use tracing::{debug, trace};

use toru::error;
use toru::{itera, Callable, Effect, Predicate, Reducer, Sequence, Value, ValueFn};

/// The names of the operations, as used in dynamic calls.
///
/// Names are camelCase, as in `"valuesOnly"`. A few operations answer to an
/// alias too: `append` for `chain`, `apply` for `map`, `each` for `tap` and
/// `ensureTraversable` for `ensureSequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, VariantNames)]
#[strum(serialize_all = "camelCase")]
pub enum OpName {
    Adjust,
    #[strum(to_string = "map", serialize = "apply")]
    Map,
    Reindex,
    Filter,
    Limit,
    Omit,
    Slice,
    #[strum(to_string = "chain", serialize = "append")]
    Chain,
    #[strum(to_string = "tap", serialize = "each")]
    Tap,
    Unfold,
    ValuesOnly,
    KeysOnly,
    Flip,
    Repeat,
    Loop,
    Replicate,
    Produce,
    Make,
    ToIterator,
    #[strum(to_string = "ensureSequence", serialize = "ensureTraversable")]
    EnsureSequence,
    Reduce,
    Search,
    SearchOrFail,
    FirstValue,
    FirstKey,
    FirstValueOrDefault,
    FirstKeyOrDefault,
    Count,
    ToArray,
    ToArrayMerge,
    ToArrayValues,
}

impl OpName {
    /// Whether the operation creates a sequence out of nothing, rather than
    /// working on an input.
    pub fn is_generator(&self) -> bool {
        matches!(self, OpName::Produce | OpName::Make)
    }
}

fn hint(name: &str) -> &'static str {
    match name {
        "values" => "Did you mean `valuesOnly`?",
        "keys" => "Did you mean `keysOnly`?",
        "find" | "findOrDefault" => "Did you mean `search`?",
        "findOrFail" => "Did you mean `searchOrFail`?",
        _ => "To include custom decorators in the chain, `alter()` or `aggregate()` may be used.",
    }
}

/// Resolve an operation name.
///
/// Unknown names fail with [`BadMethodCall`](error::Error::BadMethodCall),
/// carrying a hint towards what was most likely meant.
pub fn resolve(name: &str) -> error::Result<OpName> {
    match OpName::from_str(name) {
        Ok(op) => {
            trace!(name, %op, "resolved operation");
            Ok(op)
        }
        Err(_) => {
            debug!(name, "unknown operation");
            Err(error::Error::BadMethodCall {
                name: name.to_string(),
                hint: hint(name).to_string(),
            })
        }
    }
}

/// The result of applying an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Combinators yield a sequence.
    Sequence(Sequence),
    /// Terminal operations yield a value.
    Value(Value),
}

impl Outcome {
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Sequence(sequence) => sequence.into(),
            Outcome::Value(value) => value,
        }
    }
}

/// An operation with all its arguments except the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Adjust {
        values: Option<ValueFn>,
        keys: Option<ValueFn>,
    },
    Map(ValueFn),
    Reindex(ValueFn),
    Filter(Predicate),
    Limit(i64),
    Omit(i64),
    Slice {
        offset: i64,
        length: i64,
    },
    /// Chain the input with further sequences.
    Chain(Vec<Sequence>),
    Tap(Effect),
    Unfold(ValueFn),
    ValuesOnly,
    KeysOnly,
    Flip,
    /// Repeat the input itself, as a value.
    Repeat,
    Loop,
    Replicate(i64),
    ToIterator,
    EnsureSequence,
    Reduce {
        reducer: Reducer,
        initial: Value,
    },
    Search {
        predicate: Predicate,
        default: Value,
    },
    SearchOrFail(Predicate),
    FirstValue,
    FirstKey,
    FirstValueOrDefault(Value),
    FirstKeyOrDefault(Value),
    Count,
    ToArray,
    ToArrayMerge,
    ToArrayValues,
}

// Positional access to the arguments of a dynamic call.
struct Args<'a> {
    op: OpName,
    args: &'a [Value],
}

impl Args<'_> {
    fn bad(&self, index: usize, expected: &'static str) -> error::Error {
        debug!(operation = %self.op, position = index + 1, expected, "bad argument");
        error::Error::BadArgument {
            operation: self.op.to_string(),
            position: index + 1,
            expected,
        }
    }

    fn value(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_default()
    }

    fn callable(&self, index: usize) -> error::Result<Callable> {
        match self.args.get(index) {
            Some(Value::Callable(callable)) => Ok(callable.clone()),
            _ => Err(self.bad(index, "a callable")),
        }
    }

    fn optional_callable(&self, index: usize) -> error::Result<Option<Callable>> {
        match self.args.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Callable(callable)) => Ok(Some(callable.clone())),
            Some(_) => Err(self.bad(index, "a callable or null")),
        }
    }

    fn int(&self, index: usize) -> error::Result<i64> {
        match self.args.get(index) {
            Some(Value::Int(i)) => Ok(*i),
            _ => Err(self.bad(index, "an integer")),
        }
    }

    fn sequences(&self) -> error::Result<Vec<Sequence>> {
        self.args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                arg.to_sequence()
                    .ok_or_else(|| self.bad(index, "an iterable collection"))
            })
            .collect()
    }
}

impl Operation {
    /// Build an operation from a name and dynamic arguments.
    ///
    /// Callables are expected as [`Value::Callable`]; predicates use the
    /// truthiness of what the callable returns. Missing optional arguments
    /// default to null and surplus arguments are ignored.
    pub fn from_call(name: &str, args: &[Value]) -> error::Result<Self> {
        Self::with_args(resolve(name)?, args)
    }

    /// Build an operation from a resolved name and dynamic arguments.
    pub fn with_args(op: OpName, args: &[Value]) -> error::Result<Self> {
        let args = Args { op, args };
        let operation = match op {
            OpName::Adjust => Operation::Adjust {
                values: args.optional_callable(0)?.map(ValueFn::from),
                keys: args.optional_callable(1)?.map(ValueFn::from),
            },
            OpName::Map => Operation::Map(args.callable(0)?.into()),
            OpName::Reindex => Operation::Reindex(args.callable(0)?.into()),
            OpName::Filter => Operation::Filter(args.callable(0)?.into()),
            OpName::Limit => Operation::Limit(args.int(0)?),
            OpName::Omit => Operation::Omit(args.int(0)?),
            OpName::Slice => Operation::Slice {
                offset: args.int(0)?,
                length: args.int(1)?,
            },
            OpName::Chain => Operation::Chain(args.sequences()?),
            OpName::Tap => Operation::Tap(args.callable(0)?.into()),
            OpName::Unfold => Operation::Unfold(args.callable(0)?.into()),
            OpName::ValuesOnly => Operation::ValuesOnly,
            OpName::KeysOnly => Operation::KeysOnly,
            OpName::Flip => Operation::Flip,
            OpName::Repeat => Operation::Repeat,
            OpName::Loop => Operation::Loop,
            OpName::Replicate => Operation::Replicate(args.int(0)?),
            OpName::Produce | OpName::Make => {
                debug!(%op, "generator called with an input");
                return Err(error::Error::BadMethodCall {
                    name: op.to_string(),
                    hint: format!(
                        "The operation takes no input. Call `itera::{op}` instead, then wrap the result."
                    ),
                });
            }
            OpName::ToIterator => Operation::ToIterator,
            OpName::EnsureSequence => Operation::EnsureSequence,
            OpName::Reduce => Operation::Reduce {
                reducer: args.callable(0)?.into(),
                initial: args.value(1),
            },
            OpName::Search => Operation::Search {
                predicate: args.callable(0)?.into(),
                default: args.value(1),
            },
            OpName::SearchOrFail => Operation::SearchOrFail(args.callable(0)?.into()),
            OpName::FirstValue => Operation::FirstValue,
            OpName::FirstKey => Operation::FirstKey,
            OpName::FirstValueOrDefault => Operation::FirstValueOrDefault(args.value(0)),
            OpName::FirstKeyOrDefault => Operation::FirstKeyOrDefault(args.value(0)),
            OpName::Count => Operation::Count,
            OpName::ToArray => Operation::ToArray,
            OpName::ToArrayMerge => Operation::ToArrayMerge,
            OpName::ToArrayValues => Operation::ToArrayValues,
        };
        Ok(operation)
    }

    /// Apply the operation to a sequence.
    ///
    /// Combinators are lazy: they return at once with a sequence describing
    /// the work. Terminal operations consume the input.
    pub fn apply(&self, input: Sequence) -> error::Result<Outcome> {
        use Outcome::{Sequence as Seq, Value as Val};

        let outcome = match self {
            Operation::Adjust { values, keys } => {
                Seq(itera::adjust(input, values.clone(), keys.clone()))
            }
            Operation::Map(values) => Seq(itera::adjust(input, Some(values.clone()), None)),
            Operation::Reindex(keys) => Seq(itera::adjust(input, None, Some(keys.clone()))),
            Operation::Filter(predicate) => {
                let predicate = predicate.clone();
                Seq(itera::filter(input, move |value, key| predicate.test(value, key)))
            }
            Operation::Limit(limit) => Seq(itera::limit(input, *limit)),
            Operation::Omit(omit) => Seq(itera::omit(input, *omit)),
            Operation::Slice { offset, length } => Seq(itera::slice(input, *offset, *length)),
            Operation::Chain(others) => Seq(itera::chain(
                std::iter::once(input).chain(others.iter().cloned()),
            )),
            Operation::Tap(effect) => {
                let effect = effect.clone();
                Seq(itera::tap(input, move |value, key| effect.call(value, key)))
            }
            Operation::Unfold(mapper) => {
                let mapper = mapper.clone();
                Seq(itera::unfold(input, move |value, key| mapper.call(value, key)))
            }
            Operation::ValuesOnly => Seq(itera::values_only(input)),
            Operation::KeysOnly => Seq(itera::keys_only(input)),
            Operation::Flip => Seq(itera::flip(input)),
            Operation::Repeat => Seq(itera::repeat(input)),
            Operation::Loop => Seq(itera::r#loop(input)),
            Operation::Replicate(times) => Seq(itera::replicate(input, *times)),
            Operation::ToIterator | Operation::EnsureSequence => Seq(input),
            Operation::Reduce { reducer, initial } => {
                let reducer = reducer.clone();
                Val(itera::reduce(
                    input,
                    move |carry, value, key| reducer.call(carry, value, key),
                    initial.clone(),
                )?)
            }
            Operation::Search { predicate, default } => {
                let predicate = predicate.clone();
                Val(itera::search(
                    input,
                    move |value, key| predicate.test(value, key),
                    default.clone(),
                )?)
            }
            Operation::SearchOrFail(predicate) => {
                let predicate = predicate.clone();
                Val(itera::search_or_fail(input, move |value, key| {
                    predicate.test(value, key)
                })?)
            }
            Operation::FirstValue => Val(itera::first_value(input)?),
            Operation::FirstKey => Val(itera::first_key(input)?),
            Operation::FirstValueOrDefault(default) => {
                Val(itera::first_value_or_default(input, default.clone())?)
            }
            Operation::FirstKeyOrDefault(default) => {
                Val(itera::first_key_or_default(input, default.clone())?)
            }
            Operation::Count => Val(Value::from(itera::count(input)?)),
            Operation::ToArray => Val(Value::from(itera::to_array(input)?)),
            Operation::ToArrayMerge => Val(Value::from(itera::to_array_merge(input)?)),
            Operation::ToArrayValues => Val(Value::from(itera::to_array_values(input)?)),
        };
        Ok(outcome)
    }

    /// Apply the operation to any value.
    ///
    /// [`Repeat`](Operation::Repeat) repeats the value as it is; every other
    /// operation needs a sequence-shaped input and fails with
    /// [`NotIterable`](error::Error::NotIterable) otherwise.
    pub fn apply_value(&self, input: Value) -> error::Result<Outcome> {
        if let Operation::Repeat = self {
            return Ok(Outcome::Sequence(itera::repeat(input)));
        }
        self.apply(itera::ensure_sequence(input)?)
    }
}
