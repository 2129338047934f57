// The engine takes plain closures. These reference counted wrappers exist so
// that callables can be stored in re-openable sequences, carried by errors
// and passed around as values.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

macro_rules! callable_type {
    ($(#[$meta:meta])* $name:ident, $($signature:tt)+) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Rc<dyn $($signature)+>);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name)).finish_non_exhaustive()
            }
        }

        // callables have identity, not structure
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
            }
        }
    };
}

callable_type!(
    /// A callable taking any number of arguments, the dynamic counterpart of
    /// the typed callables below.
    Callable,
    Fn(&[Value]) -> Value
);

callable_type!(
    /// Computes a value (or a key) from a pair; signature `(value, key)`.
    ValueFn,
    Fn(&Value, &Value) -> Value
);

callable_type!(
    /// Tests a pair; signature `(value, key)`.
    Predicate,
    Fn(&Value, &Value) -> bool
);

callable_type!(
    /// Folds a pair into a carry; signature `(carry, value, key)`.
    Reducer,
    Fn(Value, &Value, &Value) -> Value
);

callable_type!(
    /// A side effect invoked with a pair; signature `(value, key)`.
    Effect,
    Fn(&Value, &Value)
);

callable_type!(
    /// Produces a value from an iteration index.
    Producer,
    Fn(usize) -> Value
);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl ValueFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, value: &Value, key: &Value) -> Value {
        (self.0)(value, key)
    }
}

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn test(&self, value: &Value, key: &Value) -> bool {
        (self.0)(value, key)
    }
}

impl Reducer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value, &Value, &Value) -> Value + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, carry: Value, value: &Value, key: &Value) -> Value {
        (self.0)(carry, value, key)
    }
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, value: &Value, key: &Value) {
        (self.0)(value, key)
    }
}

impl Producer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(usize) -> Value + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(&self, index: usize) -> Value {
        (self.0)(index)
    }
}

// Adapting a dynamic callable into the typed ones. Arguments are passed in
// the documented order; predicates use the truthiness of the result.

impl From<Callable> for ValueFn {
    fn from(c: Callable) -> Self {
        ValueFn::new(move |value, key| c.call(&[value.clone(), key.clone()]))
    }
}

impl From<Callable> for Predicate {
    fn from(c: Callable) -> Self {
        Predicate::new(move |value, key| c.call(&[value.clone(), key.clone()]).is_truthy())
    }
}

impl From<Callable> for Reducer {
    fn from(c: Callable) -> Self {
        Reducer::new(move |carry, value, key| c.call(&[carry, value.clone(), key.clone()]))
    }
}

impl From<Callable> for Effect {
    fn from(c: Callable) -> Self {
        Effect::new(move |value, key| {
            c.call(&[value.clone(), key.clone()]);
        })
    }
}

impl From<Callable> for Producer {
    fn from(c: Callable) -> Self {
        Producer::new(move |index| c.call(&[Value::from(index)]))
    }
}
