//! S-expression parser
//!
//! This module transforms source text into an immutable tree of lists and
//! literals:
//! - [`primitives`]: single-shape parsers over a text cursor
//! - [`literals`]: null, boolean, string, number and atom literals
//! - [`parse`]: lists and whole programs
//! - [`ast`]: node definitions
//!
//! # Grammar
//!
//! ```text
//! program := (list | gap)*
//! list    := '(' ws* (literal | list) (ws+ (literal | list))* ws* ')'
//! literal := null | true | false | string | number | atom
//! ```
//!
//! # Error Policy
//!
//! Every parser returns `Result` and backtracks by discarding the failed
//! branch's remainder. [`parse_program`] is total: spans it cannot recognize
//! are skipped, never reported.

pub mod ast;
pub mod literals;
pub mod parse;
pub mod primitives;

pub use parse::{parse_list, parse_program};
pub use primitives::SyntaxError;
