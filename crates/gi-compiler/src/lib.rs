#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compilation pipeline for the gi language:
//! - `scan` - dispatch-table lexical scanner
//! - `parse` - per-token constructors and precedence climbing
//! - `lower` - AST to CFG overlay, entry-point resolution
//! - `emit` - backend code generation

pub mod emit;
pub mod lower;
pub mod parse;
pub mod scan;

#[cfg(test)]
mod scan_tests;

pub use emit::{CodeBuf, EmitError, Emitter, compile};
pub use lower::{lower, resolve_program};
pub use parse::parse;
pub use scan::{Scan, TokenKind, scan, unscan};
