/// Materialized arrays: ordered, keyed by integers or strings.
mod array_core;
mod key;

pub use array_core::Array;
pub(crate) use array_core::ArrayBuilder;
pub use key::ArrayKey;

/// Create an [`Array`].
///
/// ```
/// use toru::array;
///
/// let list = array!["a", "b"];
/// assert_eq!(list.get(1).unwrap().as_str(), Some("b"));
///
/// let map = array!["x" => 1, 10 => 2];
/// assert!(map.contains_key("x"));
///
/// assert!(array![].is_empty());
/// ```
#[macro_export]
macro_rules! array {
    () => {
        $crate::Array::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Array::from_entries([$(($crate::ArrayKey::from($key), $crate::Value::from($value))),+])
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Array::from_values([$($crate::Value::from($value)),+])
    };
}
