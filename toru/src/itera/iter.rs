// One state machine per combinator. Each holds its upstream cursor plus
// whatever counters it needs, and does the work of exactly one pair per pull.
// Errors from upstream are passed along untouched.

use std::rc::Rc;

use crate::callable::{Effect, Predicate, Producer, ValueFn};
use crate::error;
use crate::sequence::{BoxedPairIter, Pair, Sequence};
use crate::value::Value;

type PairResult = error::Result<Pair>;

/// Pull the next pair, returning early on exhaustion or error.
macro_rules! next_pair {
    ($iter:expr) => {
        match $iter.next()? {
            Ok(pair) => pair,
            Err(e) => return Some(Err(e)),
        }
    };
}

/// Replaces values.
pub struct MapIter<I> {
    iter: I,
    values: ValueFn,
}

impl<I> MapIter<I> {
    pub(crate) fn new(iter: I, values: ValueFn) -> Self {
        Self { iter, values }
    }
}

impl<I> Iterator for MapIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = next_pair!(self.iter);
        let value = self.values.call(&pair.value, &pair.key);
        Some(Ok(Pair {
            key: pair.key,
            value,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Replaces keys.
pub struct ReindexIter<I> {
    iter: I,
    keys: ValueFn,
}

impl<I> ReindexIter<I> {
    pub(crate) fn new(iter: I, keys: ValueFn) -> Self {
        Self { iter, keys }
    }
}

impl<I> Iterator for ReindexIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = next_pair!(self.iter);
        let key = self.keys.call(&pair.value, &pair.key);
        Some(Ok(Pair {
            key,
            value: pair.value,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Replaces both values and keys, both computed from the original pair.
pub struct RemapIter<I> {
    iter: I,
    values: ValueFn,
    keys: ValueFn,
}

impl<I> RemapIter<I> {
    pub(crate) fn new(iter: I, values: ValueFn, keys: ValueFn) -> Self {
        Self { iter, values, keys }
    }
}

impl<I> Iterator for RemapIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = next_pair!(self.iter);
        let key = self.keys.call(&pair.value, &pair.key);
        let value = self.values.call(&pair.value, &pair.key);
        Some(Ok(Pair { key, value }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Flattens the sequence the mapper returns for each pair.
pub struct UnfoldIter<I> {
    iter: I,
    mapper: ValueFn,
    inner: Option<BoxedPairIter>,
}

impl<I> UnfoldIter<I> {
    pub(crate) fn new(iter: I, mapper: ValueFn) -> Self {
        Self {
            iter,
            mapper,
            inner: None,
        }
    }
}

impl<I> Iterator for UnfoldIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // if there are any more pairs in the current expansion, supply
            // those
            if let Some(inner) = &mut self.inner {
                if let Some(item) = inner.next() {
                    return Some(item);
                }
                self.inner = None;
            }
            // if not, expand the next pair
            let pair = next_pair!(self.iter);
            let expansion = self.mapper.call(&pair.value, &pair.key);
            let opened = Sequence::try_from(expansion).and_then(|sequence| sequence.open());
            match opened {
                Ok(inner) => self.inner = Some(inner),
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // every pair may expand into any number of pairs
        (0, None)
    }
}

/// Yields values under positional keys.
pub struct ValuesOnlyIter<I> {
    iter: I,
    index: usize,
}

impl<I> ValuesOnlyIter<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self { iter, index: 0 }
    }
}

impl<I> Iterator for ValuesOnlyIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = next_pair!(self.iter);
        let key = Value::from(self.index);
        self.index += 1;
        Some(Ok(Pair {
            key,
            value: pair.value,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Yields keys as values, under positional keys.
pub struct KeysOnlyIter<I> {
    iter: I,
    index: usize,
}

impl<I> KeysOnlyIter<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self { iter, index: 0 }
    }
}

impl<I> Iterator for KeysOnlyIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = next_pair!(self.iter);
        let key = Value::from(self.index);
        self.index += 1;
        Some(Ok(Pair {
            key,
            value: pair.key,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Swaps keys and values.
pub struct FlipIter<I> {
    iter: I,
}

impl<I> FlipIter<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I> Iterator for FlipIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = next_pair!(self.iter);
        Some(Ok(Pair {
            key: pair.value,
            value: pair.key,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Skips pairs failing the predicate.
pub struct FilterIter<I> {
    iter: I,
    predicate: Predicate,
}

impl<I> FilterIter<I> {
    pub(crate) fn new(iter: I, predicate: Predicate) -> Self {
        Self { iter, predicate }
    }
}

impl<I> Iterator for FilterIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pair = next_pair!(self.iter);
            if self.predicate.test(&pair.value, &pair.key) {
                return Some(Ok(pair));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

/// Stops after a number of pairs, without pulling any further.
pub struct LimitIter<I> {
    iter: I,
    remaining: usize,
}

impl<I> LimitIter<I> {
    pub(crate) fn new(iter: I, limit: usize) -> Self {
        Self {
            iter,
            remaining: limit,
        }
    }
}

impl<I> Iterator for LimitIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        let upper = upper.map_or(self.remaining, |upper| upper.min(self.remaining));
        (lower.min(self.remaining), Some(upper))
    }
}

/// Skips a number of pairs at the start, upon the first pull.
pub struct OmitIter<I> {
    iter: I,
    omit: usize,
}

impl<I> OmitIter<I> {
    pub(crate) fn new(iter: I, omit: usize) -> Self {
        Self { iter, omit }
    }
}

impl<I> Iterator for OmitIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        while self.omit > 0 {
            self.omit -= 1;
            next_pair!(self.iter);
        }
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.saturating_sub(self.omit),
            upper.map(|upper| upper.saturating_sub(self.omit)),
        )
    }
}

/// Invokes an effect for every pair as it passes through.
pub struct TapIter<I> {
    iter: I,
    effect: Effect,
}

impl<I> TapIter<I> {
    pub(crate) fn new(iter: I, effect: Effect) -> Self {
        Self { iter, effect }
    }
}

impl<I> Iterator for TapIter<I>
where
    I: Iterator<Item = PairResult>,
{
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = next_pair!(self.iter);
        self.effect.call(&pair.value, &pair.key);
        Some(Ok(pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Yields the same value forever.
pub struct RepeatIter {
    value: Value,
    index: usize,
}

impl RepeatIter {
    pub(crate) fn new(value: Value) -> Self {
        Self { value, index: 0 }
    }
}

impl Iterator for RepeatIter {
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let key = Value::from(self.index);
        self.index += 1;
        Some(Ok(Pair {
            key,
            value: self.value.clone(),
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Calls the producer for every pull, forever.
pub struct ProduceIter {
    producer: Producer,
    index: usize,
}

impl ProduceIter {
    pub(crate) fn new(producer: Producer) -> Self {
        Self { producer, index: 0 }
    }
}

impl Iterator for ProduceIter {
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        self.index += 1;
        let value = self.producer.call(index);
        Some(Ok(Pair::new(index, value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Goes through the sequences one after another. A sequence is opened only
/// once the previous one is exhausted.
pub struct ChainIter {
    sequences: Rc<[Sequence]>,
    index: usize,
    current: Option<BoxedPairIter>,
}

impl ChainIter {
    pub(crate) fn new(sequences: Rc<[Sequence]>) -> Self {
        Self {
            sequences,
            index: 0,
            current: None,
        }
    }
}

impl Iterator for ChainIter {
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(item) = current.next() {
                    return Some(item);
                }
                self.current = None;
            }
            let sequence = self.sequences.get(self.index)?;
            self.index += 1;
            match sequence.open() {
                Ok(iter) => self.current = Some(iter),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Opens the sequence again each time it's exhausted, either a fixed number
/// of times or forever.
pub struct CycleIter {
    sequence: Sequence,
    // `None` cycles forever
    remaining: Option<usize>,
    current: Option<BoxedPairIter>,
    // whether the current pass yielded anything
    yielded: bool,
}

impl CycleIter {
    pub(crate) fn new(sequence: Sequence, times: Option<usize>) -> Self {
        Self {
            sequence,
            remaining: times,
            current: None,
            yielded: false,
        }
    }
}

impl Iterator for CycleIter {
    type Item = PairResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(item) = current.next() {
                    self.yielded = true;
                    return Some(item);
                }
                self.current = None;
                // an endless cycle over a pass without pairs would never
                // yield again
                if self.remaining.is_none() && !self.yielded {
                    self.remaining = Some(0);
                }
            }
            match &mut self.remaining {
                Some(0) => return None,
                Some(remaining) => *remaining -= 1,
                None => {}
            }
            self.yielded = false;
            match self.sequence.open() {
                Ok(iter) => self.current = Some(iter),
                Err(e) => {
                    self.remaining = Some(0);
                    return Some(Err(e));
                }
            }
        }
    }
}
