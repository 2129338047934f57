// The re-openable nodes a combinator chain is made of. Each node keeps its
// upstream sequences and builds a fresh state machine over a fresh upstream
// cursor whenever it is opened.

use std::rc::Rc;

use crate::error;
use crate::sequence::{BoxedPairIter, Sequence, Source};

use super::iter::{ChainIter, CycleIter};

type Decorate = Rc<dyn Fn(BoxedPairIter) -> BoxedPairIter>;
type Generate = Rc<dyn Fn() -> BoxedPairIter>;

/// How a decorating combinator changes the number of pairs.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CountRule {
    /// One pair out for every pair in.
    Preserved,
    /// At most this many pairs.
    AtMost(usize),
    /// This many fewer pairs.
    Fewer(usize),
    /// Depends on the pairs themselves.
    Unknown,
    /// One pair out for every pair in, but every pair has to be pulled for
    /// its side effect, so the size is never reported.
    Observed,
}

impl CountRule {
    fn apply(self, upstream: Option<usize>) -> Option<usize> {
        match self {
            CountRule::Preserved => upstream,
            CountRule::AtMost(n) => upstream.map(|count| count.min(n)),
            CountRule::Fewer(n) => upstream.map(|count| count.saturating_sub(n)),
            CountRule::Unknown | CountRule::Observed => None,
        }
    }
}

/// A combinator over a single upstream sequence.
pub(crate) struct Decorated {
    name: &'static str,
    upstream: Sequence,
    count_rule: CountRule,
    decorate: Decorate,
}

impl Decorated {
    pub(crate) fn new<F>(
        name: &'static str,
        upstream: Sequence,
        count_rule: CountRule,
        decorate: F,
    ) -> Self
    where
        F: Fn(BoxedPairIter) -> BoxedPairIter + 'static,
    {
        Self {
            name,
            upstream,
            count_rule,
            decorate: Rc::new(decorate),
        }
    }
}

impl Source for Decorated {
    fn open(&self) -> error::Result<BoxedPairIter> {
        let upstream = self.upstream.open()?;
        Ok((self.decorate)(upstream))
    }

    fn count(&self) -> Option<usize> {
        self.count_rule.apply(self.upstream.count_hint())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// An infinite generator without upstream.
pub(crate) struct Generated {
    name: &'static str,
    generate: Generate,
}

impl Generated {
    pub(crate) fn new<F>(name: &'static str, generate: F) -> Self
    where
        F: Fn() -> BoxedPairIter + 'static,
    {
        Self {
            name,
            generate: Rc::new(generate),
        }
    }
}

impl Source for Generated {
    fn open(&self) -> error::Result<BoxedPairIter> {
        Ok((self.generate)())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Sequences one after another.
pub(crate) struct Chained {
    sequences: Rc<[Sequence]>,
}

impl Chained {
    pub(crate) fn new(sequences: Vec<Sequence>) -> Self {
        Self {
            sequences: sequences.into(),
        }
    }
}

impl Source for Chained {
    fn open(&self) -> error::Result<BoxedPairIter> {
        // the sequences themselves are opened as they are reached
        Ok(Box::new(ChainIter::new(self.sequences.clone())))
    }

    fn count(&self) -> Option<usize> {
        self.sequences
            .iter()
            .map(Sequence::count_hint)
            .try_fold(0usize, |total, count| total.checked_add(count?))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

/// A sequence iterated several times over, or forever.
pub(crate) struct Cycled {
    upstream: Sequence,
    times: Option<usize>,
}

impl Cycled {
    pub(crate) fn new(upstream: Sequence, times: Option<usize>) -> Self {
        Self { upstream, times }
    }
}

impl Source for Cycled {
    fn open(&self) -> error::Result<BoxedPairIter> {
        Ok(Box::new(CycleIter::new(self.upstream.clone(), self.times)))
    }

    fn count(&self) -> Option<usize> {
        let count = self.upstream.count_hint()?;
        match self.times {
            Some(times) => count.checked_mul(times),
            // an endless cycle over nothing is still nothing
            None if count == 0 => Some(0),
            None => None,
        }
    }

    fn name(&self) -> &'static str {
        match self.times {
            Some(_) => "replicate",
            None => "loop",
        }
    }
}
