// Collapsing a sequence into an array. The strategies differ in how they
// resolve key collisions.

use crate::array::{Array, ArrayBuilder, ArrayKey};
use crate::error;
use crate::sequence::Sequence;

use super::combinators::values_only;

/// Collect the pairs into an array, keeping keys.
///
/// A later pair overwrites the value of an earlier pair with an equal key;
/// the key keeps its first position. Keys are normalized as described on
/// [`ArrayKey::new`]. An array-backed sequence is returned as is.
pub fn to_array(sequence: impl Into<Sequence>) -> error::Result<Array> {
    let sequence = sequence.into();
    if let Sequence::Array(array) = sequence {
        return Ok(array);
    }
    let mut builder = ArrayBuilder::default();
    for pair in sequence.open()? {
        let pair = pair?;
        builder.insert(ArrayKey::new(&pair.key)?, pair.value);
    }
    Ok(builder.build())
}

/// Collect the pairs into an array, appending the pairs with integer-like
/// keys.
///
/// Pairs keyed by an integer, a boolean or a canonical integer string are
/// appended at the next free integer position and never overwrite anything.
/// All other keys behave as in [`to_array`]. An array-backed sequence is
/// returned as is.
pub fn to_array_merge(sequence: impl Into<Sequence>) -> error::Result<Array> {
    let sequence = sequence.into();
    if let Sequence::Array(array) = sequence {
        return Ok(array);
    }
    let mut builder = ArrayBuilder::default();
    for pair in sequence.open()? {
        let pair = pair?;
        if ArrayKey::is_integer_like(&pair.key) {
            builder.push(pair.value);
        } else {
            builder.insert(ArrayKey::new(&pair.key)?, pair.value);
        }
    }
    Ok(builder.build())
}

/// Collect the values into a list, discarding keys.
pub fn to_array_values(sequence: impl Into<Sequence>) -> error::Result<Array> {
    to_array(values_only(sequence))
}
