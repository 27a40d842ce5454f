//! Runtime errors.
//!
//! Runtime faults do not unwind: the run loop reports them to standard
//! error and continues with the destination slot unchanged.

#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    #[error("divide by zero")]
    DivideByZero,
}
