// Snapshot management for stepping through execution history

use crate::interpreter::errors::RuntimeError;
use crate::memory::context::Context;
use crate::memory::heap::Heap;
use crate::parser::ast::Span;

/// Captured program output from `print`
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    pub lines: Vec<OutputLine>,
}

impl OutputLog {
    pub fn new() -> Self {
        OutputLog { lines: Vec::new() }
    }

    /// Append one line of output
    pub fn print_line(&mut self, text: String) {
        self.lines.push(OutputLine { text, span: None });
    }

    /// Tag lines produced since `from` with the form that printed them
    pub fn attribute(&mut self, from: usize, span: Option<Span>) {
        for line in self.lines.iter_mut().skip(from) {
            if line.span.is_none() {
                line.span = span;
            }
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A line of output with the top-level form that produced it
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub text: String,
    pub span: Option<Span>,
}

/// Printable copy of a context's bindings
#[derive(Debug, Clone, PartialEq)]
pub struct ContextView {
    pub label: String,
    pub bindings: Vec<(String, String)>, // Name -> printed value
}

impl ContextView {
    pub fn of(context: &Context) -> Self {
        ContextView {
            label: context.label.clone(),
            bindings: context
                .bindings()
                .map(|(name, value)| (name.to_string(), value.repr()))
                .collect(),
        }
    }
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub event: String,               // What just happened, for the status line
    pub span: Option<Span>,          // Top-level form being evaluated
    pub pending: Vec<String>,        // Queued work-list items, next first
    pub frames: Vec<ContextView>,    // Active call frames, item scope first
    pub globals: ContextView,
    pub heap: Heap,
    pub output: OutputLog,
    pub continuation_depth: usize,   // Outstanding continuation frames
    pub steps: usize,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // This is a rough estimate
        let binding_count: usize = self
            .frames
            .iter()
            .chain(std::iter::once(&self.globals))
            .map(|view| view.bindings.len())
            .sum();
        let bindings_size = binding_count * 64;

        // Heap: assume 64 bytes per block (tombstones included)
        let heap_size = self.heap.allocations().len() * 64;

        let pending_size: usize = self.pending.iter().map(String::len).sum();

        // Output: assume 50 bytes per line on average
        let output_size = self.output.len() * 50;

        bindings_size + heap_size + pending_size + output_size + self.event.len()
    }
}

/// Manages execution history for stepping backward and forward
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), RuntimeError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(RuntimeError::SnapshotLimitExceeded {
                current: self.current_memory + snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Add a snapshot even if it exceeds the limit (used for the final error state)
    pub fn push_unchecked(&mut self, snapshot: Snapshot) {
        self.current_memory += snapshot.estimated_size();
        self.snapshots.push(snapshot);
    }

    /// Discard all history
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.current_memory = 0;
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
