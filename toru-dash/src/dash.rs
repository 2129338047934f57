use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use toru::error;
use toru::{itera, Array, BoxedPairIter, Sequence, Value, ValueFn};

use crate::operation::{resolve, OpName, Operation, Outcome};

type Wrap = Rc<dyn Fn(Sequence) -> Sequence>;

/// Configuration shared by a [`Dash`] and every `Dash` derived from it.
#[derive(Clone, Default)]
pub struct DashConfig {
    wrap: Option<Wrap>,
}

impl DashConfig {
    /// Wrap a sequence using this configuration.
    pub fn collect(&self, sequence: impl Into<Sequence>) -> Dash {
        let sequence = sequence.into();
        let sequence = match &self.wrap {
            Some(wrap) => wrap(sequence),
            None => sequence,
        };
        Dash {
            sequence,
            config: self.clone(),
        }
    }
}

impl fmt::Debug for DashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashConfig")
            .field("wrap", &self.wrap.is_some())
            .finish()
    }
}

/// Builds a [`DashConfig`].
#[derive(Clone, Default)]
pub struct DashBuilder {
    wrap: Option<Wrap>,
}

impl DashBuilder {
    /// Set a factory that every collected sequence passes through before it
    /// gets wrapped.
    ///
    /// Calling this multiple times will override the factory.
    pub fn wrap<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(Sequence) -> Sequence + 'static,
    {
        self.wrap = Some(Rc::new(factory));
        self
    }

    /// Build the configuration.
    pub fn build(&self) -> DashConfig {
        DashConfig {
            wrap: self.wrap.clone(),
        }
    }

    /// Wrap a sequence with the configuration built so far.
    pub fn collect(&self, sequence: impl Into<Sequence>) -> Dash {
        self.build().collect(sequence)
    }
}

/// What a [`Dash`] call returned: either a new wrapper, or a plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum Returned {
    Wrapped(Dash),
    Value(Value),
}

impl Returned {
    pub fn into_value(self) -> Value {
        match self {
            Returned::Wrapped(dash) => dash.out().into(),
            Returned::Value(value) => value,
        }
    }
}

/// A fluent wrapper around a [`Sequence`].
///
/// Every combinator returns a new `Dash`, so calls chain:
///
/// ```
/// use toru::array;
/// use toru_dash::Dash;
///
/// let array = Dash::collect(array!["a" => 1, "b" => 2, "c" => 3])
///     .filter(|value, _| value.as_int() != Some(2))
///     .map(|value, key| format!("{key}{value}"))
///     .to_array_values()
///     .unwrap();
/// assert_eq!(array, array!["a1", "c3"]);
/// ```
///
/// A `Dash` is immutable; every call leaves the wrapper it was called on
/// untouched.
#[derive(Debug, Clone)]
pub struct Dash {
    sequence: Sequence,
    config: DashConfig,
}

impl PartialEq for Dash {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl Dash {
    /// Wrap a sequence with the default configuration.
    pub fn collect(sequence: impl Into<Sequence>) -> Self {
        DashConfig::default().collect(sequence)
    }

    pub fn builder() -> DashBuilder {
        DashBuilder::default()
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    // derived wrappers keep the configuration, but the wrap factory only
    // applies to collected input
    fn derive(&self, sequence: Sequence) -> Self {
        Self {
            sequence,
            config: self.config.clone(),
        }
    }

    /// The wrapped sequence.
    pub fn out(&self) -> Sequence {
        self.sequence.clone()
    }

    /// Open a cursor over the wrapped sequence.
    pub fn iter(&self) -> error::Result<BoxedPairIter> {
        itera::to_iterator(self.out())
    }

    /// Apply a custom combinator.
    pub fn alter<F, S>(&self, decorator: F) -> Self
    where
        F: FnOnce(Sequence) -> S,
        S: Into<Sequence>,
    {
        self.derive(decorator(self.out()).into())
    }

    /// Apply a custom terminal operation.
    pub fn aggregate<F, T>(&self, aggregate: F) -> T
    where
        F: FnOnce(Sequence) -> T,
    {
        aggregate(self.out())
    }

    pub fn adjust(&self, values: Option<ValueFn>, keys: Option<ValueFn>) -> Self {
        self.derive(itera::adjust(self.out(), values, keys))
    }

    pub fn map<F, V>(&self, values: F) -> Self
    where
        F: Fn(&Value, &Value) -> V + 'static,
        V: Into<Value>,
    {
        self.derive(itera::map(self.out(), values))
    }

    pub fn apply<F, V>(&self, values: F) -> Self
    where
        F: Fn(&Value, &Value) -> V + 'static,
        V: Into<Value>,
    {
        self.map(values)
    }

    pub fn reindex<F, K>(&self, keys: F) -> Self
    where
        F: Fn(&Value, &Value) -> K + 'static,
        K: Into<Value>,
    {
        self.derive(itera::reindex(self.out(), keys))
    }

    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        self.derive(itera::filter(self.out(), predicate))
    }

    pub fn limit(&self, limit: i64) -> Self {
        self.derive(itera::limit(self.out(), limit))
    }

    pub fn omit(&self, omit: i64) -> Self {
        self.derive(itera::omit(self.out(), omit))
    }

    pub fn slice(&self, offset: i64, length: i64) -> Self {
        self.derive(itera::slice(self.out(), offset, length))
    }

    /// Chain further sequences after the wrapped one.
    pub fn chain<I>(&self, others: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Sequence>,
    {
        let others = others.into_iter().map(Into::into);
        self.derive(itera::chain(std::iter::once(self.out()).chain(others)))
    }

    pub fn append<I>(&self, others: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Sequence>,
    {
        self.chain(others)
    }

    pub fn tap<F>(&self, effect: F) -> Self
    where
        F: Fn(&Value, &Value) + 'static,
    {
        self.derive(itera::tap(self.out(), effect))
    }

    pub fn each<F>(&self, effect: F) -> Self
    where
        F: Fn(&Value, &Value) + 'static,
    {
        self.tap(effect)
    }

    pub fn unfold<F, V>(&self, mapper: F) -> Self
    where
        F: Fn(&Value, &Value) -> V + 'static,
        V: Into<Value>,
    {
        self.derive(itera::unfold(self.out(), mapper))
    }

    pub fn values_only(&self) -> Self {
        self.derive(itera::values_only(self.out()))
    }

    pub fn keys_only(&self) -> Self {
        self.derive(itera::keys_only(self.out()))
    }

    pub fn flip(&self) -> Self {
        self.derive(itera::flip(self.out()))
    }

    /// An endless sequence repeating the wrapped sequence itself as a value.
    pub fn repeat(&self) -> Self {
        self.derive(itera::repeat(self.out()))
    }

    pub fn r#loop(&self) -> Self {
        self.derive(itera::r#loop(self.out()))
    }

    pub fn replicate(&self, times: i64) -> Self {
        self.derive(itera::replicate(self.out(), times))
    }

    /// Fold the sequence. A reduction that is itself a sequence comes back
    /// wrapped, so that it can be chained on.
    pub fn reduce<F, V>(&self, reducer: F, initial: impl Into<Value>) -> error::Result<Returned>
    where
        F: Fn(Value, &Value, &Value) -> V,
        V: Into<Value>,
    {
        let reduction = itera::reduce(self.out(), reducer, initial)?;
        Ok(self.wrap_reduction(reduction))
    }

    fn wrap_reduction(&self, reduction: Value) -> Returned {
        match reduction {
            Value::Sequence(sequence) => Returned::Wrapped(self.derive(sequence)),
            value => Returned::Value(value),
        }
    }

    pub fn search<F>(&self, predicate: F, default: impl Into<Value>) -> error::Result<Value>
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        itera::search(self.out(), predicate, default)
    }

    pub fn search_or_fail<F>(&self, predicate: F) -> error::Result<Value>
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        itera::search_or_fail(self.out(), predicate)
    }

    pub fn first_value(&self) -> error::Result<Value> {
        itera::first_value(self.out())
    }

    pub fn first_key(&self) -> error::Result<Value> {
        itera::first_key(self.out())
    }

    pub fn first_value_or_default(&self, default: impl Into<Value>) -> error::Result<Value> {
        itera::first_value_or_default(self.out(), default)
    }

    pub fn first_key_or_default(&self, default: impl Into<Value>) -> error::Result<Value> {
        itera::first_key_or_default(self.out(), default)
    }

    pub fn count(&self) -> error::Result<usize> {
        itera::count(self.out())
    }

    pub fn to_array(&self) -> error::Result<Array> {
        itera::to_array(self.out())
    }

    pub fn to_array_merge(&self) -> error::Result<Array> {
        itera::to_array_merge(self.out())
    }

    pub fn to_array_values(&self) -> error::Result<Array> {
        itera::to_array_values(self.out())
    }

    /// Call an operation by name.
    ///
    /// Combinators come back wrapped, terminal operations as plain values.
    /// `toIterator` and `ensureSequence` return the wrapper itself. The
    /// generators `make` and `produce` are refused, as there is nothing for
    /// them to work on; call them directly and wrap the result.
    ///
    /// ```
    /// use toru::{array, Value};
    /// use toru_dash::{Dash, Returned};
    ///
    /// let dash = Dash::collect(array![1, 2, 3]);
    /// let limited = dash.call("limit", &[Value::from(2)]).unwrap();
    /// let Returned::Wrapped(limited) = limited else { panic!() };
    /// assert_eq!(limited.call("count", &[]).unwrap(), Returned::Value(Value::from(2)));
    /// ```
    pub fn call(&self, name: &str, args: &[Value]) -> error::Result<Returned> {
        let op = resolve(name)?;
        trace!(%op, args = args.len(), "dash call");
        match op {
            OpName::Make | OpName::Produce => {
                debug!(%op, "generator called on a wrapper");
                Err(error::Error::BadMethodCall {
                    name: name.to_string(),
                    hint: format!(
                        "The method is not supported by the `Dash` wrapper. Instead, call `itera::{op}()`, then wrap the result."
                    ),
                })
            }
            OpName::ToIterator | OpName::EnsureSequence => Ok(Returned::Wrapped(self.clone())),
            _ => match Operation::with_args(op, args)?.apply(self.out())? {
                Outcome::Sequence(sequence) => Ok(Returned::Wrapped(self.derive(sequence))),
                Outcome::Value(value) if op == OpName::Reduce => Ok(self.wrap_reduction(value)),
                Outcome::Value(value) => Ok(Returned::Value(value)),
            },
        }
    }
}

impl From<Dash> for Sequence {
    fn from(dash: Dash) -> Self {
        dash.sequence
    }
}

impl From<Dash> for Value {
    fn from(dash: Dash) -> Self {
        dash.sequence.into()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use insta::assert_snapshot;
    use toru::{array, Callable};

    use super::*;

    #[test]
    fn test_calls_leave_wrapper_untouched() {
        let dash = Dash::collect(array!["a", "b", "c"]);
        let limited = dash.limit(1);
        assert_eq!(limited.count().unwrap(), 1);
        assert_eq!(dash.count().unwrap(), 3);
    }

    #[test]
    fn test_wrap_applies_to_collected() {
        let wrapped = Rc::new(Cell::new(0));
        let counter = wrapped.clone();
        let config = Dash::builder()
            .wrap(move |sequence| {
                counter.set(counter.get() + 1);
                itera::values_only(sequence)
            })
            .build();
        let dash = config.collect(array!["x" => "a", "y" => "b"]);
        let flipped = dash.flip();
        assert_eq!(wrapped.get(), 1);
        assert!(flipped.config().wrap.is_some());
        assert_eq!(flipped.to_array().unwrap(), array!["a" => 0, "b" => 1]);
    }

    #[test]
    fn test_reduce_wraps_sequences() {
        let dash = Dash::collect(array![array![1, 2], array![3]]);
        let flattened = dash
            .reduce(
                |carry, value, _| {
                    itera::chain([carry, value.clone()].map(|v| v.to_sequence().unwrap_or_default()))
                },
                Sequence::empty(),
            )
            .unwrap();
        let Returned::Wrapped(flattened) = flattened else {
            panic!("expected a wrapper")
        };
        assert_eq!(flattened.to_array_values().unwrap(), array![1, 2, 3]);

        let sum = dash.reduce(
            |carry, value, _| {
                carry.as_int().unwrap_or(0) + value.as_array().map_or(0, |a| a.len() as i64)
            },
            0,
        );
        assert_eq!(sum.unwrap(), Returned::Value(Value::from(3)));
    }

    #[test]
    fn test_reduce_keeps_arrays_plain() {
        let dash = Dash::collect(array!["a"]);
        let reduced = dash.reduce(|_, _, _| array!["x"], Value::Null).unwrap();
        assert_eq!(reduced, Returned::Value(array!["x"].into()));
    }

    #[test]
    fn test_call_forwards() {
        let dash = Dash::collect(array!["a", "b"]);
        let upper = Callable::new(|args| Value::from(args[0].to_string().to_uppercase()));
        let Returned::Wrapped(mapped) = dash.call("apply", &[upper.into()]).unwrap() else {
            panic!("expected a wrapper")
        };
        assert_eq!(mapped.to_array().unwrap(), array!["A", "B"]);
        assert_eq!(
            mapped.call("firstValue", &[]).unwrap(),
            Returned::Value(Value::from("A"))
        );
    }

    #[test]
    fn test_call_returns_self() {
        let dash = Dash::collect(array!["a"]);
        assert_eq!(
            dash.call("toIterator", &[]).unwrap(),
            Returned::Wrapped(dash.clone())
        );
        assert_eq!(
            dash.call("ensureTraversable", &[]).unwrap(),
            Returned::Wrapped(dash)
        );
    }

    #[test]
    fn test_call_misuse() {
        let dash = Dash::collect(array!["a"]);
        assert_snapshot!(
            dash.call("produce", &[]).unwrap_err().to_string(),
            @"Invalid call to `produce`. The method is not supported by the `Dash` wrapper. Instead, call `itera::produce()`, then wrap the result."
        );
        assert_snapshot!(
            dash.call("values", &[]).unwrap_err().to_string(),
            @"Invalid call to `values`. Did you mean `valuesOnly`?"
        );
    }

    #[test]
    fn test_alter_and_aggregate() {
        let dash = Dash::collect(array![1, 2, 3]);
        let altered = dash.alter(|sequence| itera::omit(sequence, 1));
        assert_eq!(altered.aggregate(|sequence| itera::count(sequence)).unwrap(), 2);
    }
}
