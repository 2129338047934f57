//! The sequence engine.
//!
//! Combinators take one or more sequences and return a new sequence
//! describing the transformation. Nothing is pulled until a terminal
//! operation ([`reduce`], [`search`], [`first_value`], [`to_array`], ...)
//! iterates the result, and then only as far as that operation needs.
//!
//! ```
//! use toru::{array, itera, Value};
//!
//! let doubled_odds = itera::filter(
//!     itera::map(array![1, 2, 3, 4, 5], |v, _| Value::from(v.as_int().unwrap_or(0) * 2)),
//!     |_, k| k.as_int().unwrap_or(0) % 2 == 0,
//! );
//! assert_eq!(itera::to_array_values(doubled_odds).unwrap(), array![2, 6, 10]);
//! ```
//!
//! Combinator chains can be iterated any number of times, as long as the
//! sequences at their roots can. A single-pass root fails with
//! [`SpentSource`](crate::error::Error::SpentSource) once exhausted.
mod combinators;
mod iter;
mod materialize;
mod source;
mod terminal;

pub use combinators::{
    adjust, apply, chain, each, filter, flip, keys_only, limit, make, map, omit, produce,
    r#loop, reindex, repeat, replicate, slice, tap, unfold, values_only,
};
pub use iter::{
    ChainIter, CycleIter, FilterIter, FlipIter, KeysOnlyIter, LimitIter, MapIter, OmitIter,
    ProduceIter, ReindexIter, RemapIter, RepeatIter, TapIter, UnfoldIter, ValuesOnlyIter,
};
pub use materialize::{to_array, to_array_merge, to_array_values};
pub use terminal::{
    count, ensure_sequence, first_key, first_key_or_default, first_value,
    first_value_or_default, reduce, search, search_or_fail, to_iterator,
};
