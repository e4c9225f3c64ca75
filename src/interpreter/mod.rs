//! List interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Runtime`](engine::Runtime) driver and evaluation loop
//! - [`forms`]: special forms (`define`, `if`, `fn`, `defer`, ...)
//! - [`builtins`]: native functions resolved by name
//! - [`errors`]: Runtime error types
//! - [`constants`]: addresses and default limits
//!
//! # Execution Model
//!
//! Each top-level list of a program becomes one item on a first-in-first-out
//! work-list. An item is evaluated with an explicit continuation stack, so
//! deeply nested or recursive programs never grow the native call stack;
//! runaway programs are stopped by the step limit instead.
//!
//! After each function application a snapshot is taken to enable
//! time-travel debugging.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod forms;
