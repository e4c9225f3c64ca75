//! # Introduction
//!
//! listty parses a small parenthesized list language and runs it on a
//! first-in-first-out execution stack, capturing a snapshot of the runtime
//! state at every function application. The snapshot history is then
//! navigated forward and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Primitive parsers → Literals → Lists → Program → Runtime → Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: backtracking combinators that build a [`parser::ast::Program`]
//!    of top-level lists. Parsing never fails; unrecognized text is skipped.
//! 2. [`interpreter`]: queues each top-level list as a stack item and
//!    evaluates items in order with an explicit continuation stack.
//! 3. [`memory`]: values, two-tier contexts (item-local, then global), the
//!    heap of cells and lambdas, and the execution and call stacks.
//! 4. [`snapshot`]: history with a configurable memory limit, and the
//!    [`snapshot::OutputLog`] that records `print` output.
//! 5. [`compiler`]: prints a program back as canonical text.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use listty::config::RuntimeConfig;
//! use listty::interpreter::engine::Runtime;
//! use listty::parser::parse_program;
//!
//! let program = parse_program("(define x 20) (print (add x 22))");
//! let mut runtime = Runtime::new(RuntimeConfig::unrecorded());
//! runtime.execute(program).unwrap();
//! assert_eq!(runtime.output().get_output(), vec!["42"]);
//! ```

pub mod compiler;
pub mod config;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;
