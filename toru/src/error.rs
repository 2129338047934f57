use strum_macros::Display;

use crate::callable::Predicate;
use crate::sequence::Sequence;
use crate::value::Value;

/// Broad classes of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// An exceptional but legitimate situation, such as an empty input.
    Exceptional,
    /// The library was used in a way it does not support.
    Misuse,
}

/// Toru error.
///
/// Errors that concern a particular input carry that input, so it can be
/// inspected when diagnosing the failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Empty input collection.
    ///
    /// Raised by the strict first element accessors. Use the `_or_default`
    /// variants when an empty input is expected.
    #[error("Empty input collection encountered.")]
    EmptyCollection { input: Sequence },

    /// No matching element.
    ///
    /// Raised by a strict search that exhausted its input.
    #[error("No element matching the search criteria found in the collection.")]
    NoMatch {
        input: Sequence,
        predicate: Predicate,
    },

    /// Producer returned something that cannot be iterated.
    #[error("The value returned by the producer is not an iterable collection, got `{}`.", .value.type_name())]
    InvalidProducerResult { value: Value },

    /// A sequence was expected.
    #[error("Expected an iterable collection, got `{}`.", .value.type_name())]
    NotIterable { value: Value },

    /// Unknown or unsupported operation.
    #[error("Invalid call to `{name}`. {hint}")]
    BadMethodCall { name: String, hint: String },

    /// An operation was invoked with an argument of the wrong shape.
    #[error("Invalid argument #{position} for `{operation}`, expected {expected}.")]
    BadArgument {
        operation: String,
        position: usize,
        expected: &'static str,
    },

    /// A value that cannot be used as an array key.
    #[error("Illegal key of type `{type_name}`, only scalar values can be array keys.")]
    IllegalKey { type_name: &'static str },

    /// A single-pass sequence was iterated again after it was exhausted.
    #[error("The single-pass sequence has already been consumed.")]
    SpentSource,

    /// A single-pass sequence was pulled while it was already being pulled.
    #[error("The single-pass sequence is already being iterated.")]
    ReentrantPull,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCollection { .. } | Error::NoMatch { .. } => ErrorKind::Exceptional,
            _ => ErrorKind::Misuse,
        }
    }

    /// The input the error concerns, if it carries one.
    pub fn input(&self) -> Option<&Sequence> {
        match self {
            Error::EmptyCollection { input } | Error::NoMatch { input, .. } => Some(input),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
