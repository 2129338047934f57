//! Fluent and composable surfaces over [`toru`] sequences.
//!
//! - [`Dash`] wraps a sequence and forwards every operation to the engine,
//!   so calls chain.
//!
//! - [`partial`] fixes the arguments of an operation ahead of time, leaving
//!   a [`Stage`](partial::Stage) that takes the input.
//!
//! - [`pipeline`] threads a value through stages.
//!
//! All three dispatch through [`Operation`], which is also how operations
//! are invoked by name.
mod dash;
mod operation;
pub mod partial;
pub mod pipeline;

pub use dash::{Dash, DashBuilder, DashConfig, Returned};
pub use operation::{resolve, OpName, Operation, Outcome};
