#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime for gi.
//!
//! Two execution strategies over the same compiled state: the tree-walk
//! interpreter advances along CFG edges invoking each node's primitive,
//! and the register-machine executor runs code emitted by the backend.
//! Both produce their output into a pending buffer owned by the caller.

pub mod engine;

pub use engine::{Interp, NoopTracer, RuntimeError, StepTracer, Tracer, execute};
