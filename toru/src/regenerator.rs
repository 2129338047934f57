use std::rc::Rc;

use tracing::trace;

use crate::callable::Callable;
use crate::error;
use crate::sequence::{BoxedPairIter, Sequence, Source};
use crate::value::Value;

/// A sequence that invokes its producer every time it is iterated.
///
/// This turns a producer of single-pass sequences into a multi-pass
/// sequence, at the expense of running the producer again for each pass.
/// That's what [`loop`](crate::itera::r#loop) and
/// [`replicate`](crate::itera::replicate) need when the underlying source
/// can only be iterated once.
///
/// The producer must return an array or a sequence; anything else is an
/// [`InvalidProducerResult`](error::Error::InvalidProducerResult) error,
/// raised as soon as the sequence is opened.
///
/// ```
/// use toru::{itera, Regenerator, Sequence};
///
/// let regenerator = Regenerator::new(|| Sequence::one_shot([(0, "a"), (1, "b")]));
/// let twice = itera::to_array_values(itera::replicate(regenerator, 2)).unwrap();
/// assert_eq!(twice.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Regenerator {
    callable: Callable,
}

impl Regenerator {
    /// Wrap a producer that takes no arguments.
    pub fn new<F, V>(producer: F) -> Self
    where
        F: Fn() -> V + 'static,
        V: Into<Value>,
    {
        Self {
            callable: Callable::new(move |_args| producer().into()),
        }
    }

    /// Wrap a callable. It is invoked without arguments on every pass.
    pub fn from_callable(callable: Callable) -> Self {
        Self { callable }
    }

    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Invoke the producer directly, passing the arguments along.
    ///
    /// The result is returned as is: it is neither validated nor turned into
    /// a sequence.
    pub fn call(&self, args: &[Value]) -> Value {
        self.callable.call(args)
    }
}

impl Source for Regenerator {
    fn open(&self) -> error::Result<BoxedPairIter> {
        trace!("invoking regenerator producer");
        match self.callable.call(&[]) {
            Value::Array(array) => Sequence::Array(array).open(),
            Value::Sequence(sequence) => sequence.open(),
            value => Err(error::Error::InvalidProducerResult { value }),
        }
    }

    fn name(&self) -> &'static str {
        "regenerator"
    }
}

impl From<Regenerator> for Sequence {
    fn from(regenerator: Regenerator) -> Self {
        Sequence::Lazy(Rc::new(regenerator))
    }
}
