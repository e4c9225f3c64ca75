//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to syntax errors, which the parser
//! absorbs), and [`HeapError`] for failed heap operations.
//!
//! All runtime errors are fatal - they halt execution, and the history recorded
//! up to that point stays available for inspection.

use crate::interpreter::builtins::Arity;
use thiserror::Error;

/// Heap operation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("Out of memory: heap limit of {limit} objects reached")]
    OutOfMemory { limit: usize },

    #[error("Use-after-free: address 0x{address:x} has been freed")]
    UseAfterFree { address: u64 },

    #[error("Double free detected at address 0x{address:x}")]
    DoubleFree { address: u64 },

    #[error("Invalid address 0x{address:x}: never allocated")]
    InvalidAddress { address: u64 },

    #[error("Address 0x{address:x} holds a {kind}, not a cell")]
    NotACell { address: u64, kind: &'static str },
}

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// `execute` was handed something other than a program
    #[error("Not a valid program: got {found}")]
    NotAProgram { found: &'static str },

    /// A stack item queued against a different global context
    #[error("Item '{label}' belongs to another runtime")]
    ForeignItem { label: String },

    #[error("Unbound symbol '{name}'")]
    UnboundSymbol { name: String },

    #[error("Cannot call {value}: not a function")]
    NotCallable { value: String },

    #[error("Function '{function}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        function: String,
        expected: Arity,
        got: usize,
    },

    #[error("Type error in '{function}': expected {expected}, got {got}")]
    TypeError {
        function: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Division by zero in '{operation}'")]
    DivisionByZero { operation: &'static str },

    /// Malformed special form, e.g. `(define 1 2)`
    #[error("Invalid '{form}' form: {message}")]
    InvalidForm { form: &'static str, message: String },

    #[error(transparent)]
    Heap(#[from] HeapError),

    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: usize },

    /// Stepping past either end of the recorded history
    #[error("{0}")]
    HistoryBoundary(&'static str),

    #[error("Snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },
}
