//! Execution engines.

mod error;
mod exec;
mod interp;
mod trace;

#[cfg(test)]
mod interp_tests;

pub use error::RuntimeError;
pub use exec::execute;
pub use interp::Interp;
pub use trace::{NoopTracer, StepTracer, Tracer};
