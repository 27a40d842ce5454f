//! Backend code emission: the emitter trait, the portable code buffer,
//! and the AST-driven code generator.

mod codegen;
mod emitter;

#[cfg(test)]
mod emit_tests;

pub use codegen::{EmitError, compile};
pub use emitter::{CodeBuf, Emitter};
