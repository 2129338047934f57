/// A sequence is an ordered stream of (key, value) pairs. Sequences are lazy:
/// nothing is produced until a cursor is opened and pulled.
mod one_shot;
mod sequence_core;

pub use one_shot::OneShot;
pub use sequence_core::{BoxedPairIter, Pair, Sequence, Source};
