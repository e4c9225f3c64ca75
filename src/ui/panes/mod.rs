//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code with syntax highlighting and the current item marked
//! - [`stack`]: Call frames, globals and the pending work-list
//! - [`heap`]: Heap cells and lambdas, including tombstones
//! - [`terminal`]: Output of `print`
//! - [`status`]: Status bar with keybindings and execution state
//! - `utils`: Shared block, scrolling and highlighting helpers
//!
//! Each pane module exports a `render_*_pane()` function plus the scroll
//! state or render data it takes.

mod utils;

pub mod heap;
pub mod source;
pub mod stack;
pub mod status;
pub mod terminal;

// Re-export render functions for convenience
pub use heap::{render_heap_pane, HeapScrollState};
pub use source::{render_source_pane, span_lines, SourceScrollState};
pub use stack::{render_stack_pane, StackRenderData, StackScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
