//! Lazy key/value sequences.
//!
//! A [`Sequence`] is an ordered stream of (key, value) [`Pair`]s, produced on
//! demand. The [`itera`] module holds the combinators that transform
//! sequences and the terminal operations that consume them.
//!
//! ```
//! use toru::{array, itera};
//!
//! let sequence = itera::slice(itera::chain([array!["a", "b"], array!["c", "d"]]), 1, 2);
//! assert_eq!(itera::to_array_values(sequence).unwrap(), array!["b", "c"]);
//! ```
pub mod error;
pub mod itera;

mod array;
mod callable;
mod regenerator;
mod sequence;
mod value;

pub use array::{Array, ArrayKey};
pub use callable::{Callable, Effect, Predicate, Producer, Reducer, ValueFn};
pub use regenerator::Regenerator;
pub use sequence::{BoxedPairIter, OneShot, Pair, Sequence, Source};
pub use value::Value;
