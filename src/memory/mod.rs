//! Memory model for the interpreter
//!
//! This module provides the core runtime storage:
//! - [`value`]: Runtime value representation
//! - [`context`]: Variable scopes with a parent link
//! - [`stack`]: The FIFO execution stack and the per-item call stack
//! - [`heap`]: Cells and lambdas with explicit free and tombstone tracking
//!
//! # Scoping
//!
//! Lookup is two-tier. Every local context is a child of the single root
//! context, so a function body sees its own parameters and the globals but
//! never the locals of its caller.

pub mod context;
pub mod heap;
pub mod stack;
pub mod value;
