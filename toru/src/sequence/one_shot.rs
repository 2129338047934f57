use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::error;

use super::sequence_core::{BoxedPairIter, Pair};

struct State {
    iter: BoxedPairIter,
    exhausted: bool,
}

/// A single-pass source.
///
/// All cursors opened on a one-shot source share the same underlying
/// iterator, so a new cursor continues where the previous one stopped.
/// Opening it after it has been exhausted is an error.
#[derive(Clone)]
pub struct OneShot(Rc<RefCell<State>>);

impl OneShot {
    pub(crate) fn new(iter: BoxedPairIter) -> Self {
        Self(Rc::new(RefCell::new(State {
            iter,
            exhausted: false,
        })))
    }

    pub(crate) fn open(&self) -> error::Result<BoxedPairIter> {
        let state = self
            .0
            .try_borrow()
            .map_err(|_| error::Error::ReentrantPull)?;
        if state.exhausted {
            debug!("reopening an exhausted single-pass sequence");
            return Err(error::Error::SpentSource);
        }
        Ok(Box::new(OneShotCursor {
            state: self.0.clone(),
            done: false,
        }))
    }

    pub(crate) fn same(&self, other: &OneShot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct OneShotCursor {
    state: Rc<RefCell<State>>,
    done: bool,
}

impl Iterator for OneShotCursor {
    type Item = error::Result<Pair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // a callback further down the chain may pull this very source while
        // we're pulling it
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return Some(Err(error::Error::ReentrantPull));
        };
        if state.exhausted {
            self.done = true;
            return None;
        }
        let next = state.iter.next();
        if next.is_none() {
            state.exhausted = true;
            self.done = true;
        }
        next
    }
}
