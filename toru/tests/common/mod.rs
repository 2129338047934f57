// not every test file uses every helper
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use toru::{error, itera, Array, Sequence, Value};

/// Counts how many pairs were pulled through it.
#[derive(Clone, Default)]
pub(crate) struct PullCounter(Rc<Cell<usize>>);

impl PullCounter {
    pub(crate) fn count(&self) -> usize {
        self.0.get()
    }

    /// Wrap the sequence so pulls are counted.
    pub(crate) fn watch(&self, sequence: impl Into<Sequence>) -> Sequence {
        let counter = self.0.clone();
        itera::tap(sequence, move |_, _| counter.set(counter.get() + 1))
    }
}

pub(crate) fn values(sequence: impl Into<Sequence>) -> error::Result<Vec<Value>> {
    Ok(itera::to_array_values(sequence)?.values().cloned().collect())
}

pub(crate) fn pairs(sequence: impl Into<Sequence>) -> error::Result<Vec<(Value, Value)>> {
    itera::to_iterator(sequence)?
        .map(|pair| pair.map(|pair| (pair.key, pair.value)))
        .collect()
}

pub(crate) fn letters() -> Array {
    toru::array!["a", "b", "c"]
}

pub(crate) fn kv(key: impl Into<Value>, value: impl Into<Value>) -> (Value, Value) {
    (key.into(), value.into())
}
