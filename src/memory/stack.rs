//! Execution stack and call frames
//!
//! This module provides the two stack structures the runtime drives:
//! - [`ExecutionStack`]: the work-list of pending [`StackItem`]s. Top-level
//!   forms are queued in source order and taken first-in-first-out.
//! - [`CallStack`]: the active function calls while one item is evaluated,
//!   each with its own local [`Context`].
//!
//! # Ownership
//!
//! Each `StackItem` owns its local context. The root context is shared by
//! every item and by the runtime through a [`ContextRef`].

use super::context::{Context, ContextRef};
use crate::parser::ast::{List, Span};
use std::collections::VecDeque;
use std::rc::Rc;

/// One unit of pending work: a list to evaluate and the scopes to do it in
#[derive(Debug, Clone)]
pub struct StackItem {
    pub callee: Rc<List>,
    pub local: Context,
    pub root: ContextRef,
    pub span: Option<Span>, // Source range, for top-level items only
}

impl StackItem {
    pub fn new(callee: Rc<List>, root: &ContextRef, span: Option<Span>, label: String) -> Self {
        StackItem {
            callee,
            local: Context::child(root, label),
            root: Rc::clone(root),
            span,
        }
    }
}

/// FIFO work-list of pending items
#[derive(Debug, Clone, Default)]
pub struct ExecutionStack {
    items: VecDeque<StackItem>,
    queued_total: usize, // Items ever queued, used for labels
}

impl ExecutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one item per list, in order, each with a fresh local context
    pub fn initiate(&mut self, lists: &[Rc<List>], spans: &[Span], global: &ContextRef) {
        for (index, list) in lists.iter().enumerate() {
            self.push_list(Rc::clone(list), spans.get(index).copied(), global);
        }
    }

    /// Queue a further list behind everything already pending
    pub fn push_list(&mut self, list: Rc<List>, span: Option<Span>, global: &ContextRef) {
        self.queued_total += 1;
        let label = format!("item #{}", self.queued_total);
        self.items.push_back(StackItem::new(list, global, span, label));
    }

    /// Drop all pending items and restart label numbering
    pub fn clear(&mut self) {
        self.items.clear();
        self.queued_total = 0;
    }

    /// Whether work remains
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Remove and return the earliest-queued item
    pub fn get_next(&mut self) -> Option<StackItem> {
        self.items.pop_front()
    }

    /// Pending items, next first (for snapshots)
    pub fn pending(&self) -> impl Iterator<Item = &StackItem> {
        self.items.iter()
    }
}

/// Activation record for one evaluation scope
#[derive(Debug, Clone)]
pub struct CallFrame {
    pub function_name: String,
    pub context: Context,
}

/// Active scopes while evaluating a single item.
///
/// Frame 0 is the item's own local context; each lambda application pushes
/// one more frame and pops it when the body finishes.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new frame
    pub fn push_frame(&mut self, function_name: String, context: Context) {
        self.frames.push(CallFrame {
            function_name,
            context,
        });
    }

    /// Pop the top frame
    pub fn pop_frame(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    /// Frame at `depth` (0 = item scope)
    pub fn frame(&self, depth: usize) -> Option<&CallFrame> {
        self.frames.get(depth)
    }

    pub fn frame_mut(&mut self, depth: usize) -> Option<&mut CallFrame> {
        self.frames.get_mut(depth)
    }

    /// Get all frames (for UI display)
    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::Value;
    use crate::parser::ast::Node;

    fn list(name: &str) -> Rc<List> {
        Rc::new(List::new(vec![Node::atom(name)]))
    }

    #[test]
    fn test_initiate_is_fifo() {
        let global = Context::root().shared();
        let lists = vec![list("l1"), list("l2"), list("l3")];
        let mut stack = ExecutionStack::new();
        stack.initiate(&lists, &[], &global);

        assert_eq!(stack.len(), 3);
        for expected in &lists {
            assert!(!stack.is_empty());
            let item = stack.get_next().unwrap();
            assert!(Rc::ptr_eq(&item.callee, expected));
        }
        assert!(stack.is_empty());
        assert!(stack.get_next().is_none());
    }

    #[test]
    fn test_items_share_root_but_not_locals() {
        let global = Context::root().shared();
        let mut stack = ExecutionStack::new();
        stack.initiate(&[list("a"), list("b")], &[], &global);

        let mut first = stack.get_next().unwrap();
        let second = stack.get_next().unwrap();
        assert!(Rc::ptr_eq(&first.root, &global));
        assert!(Rc::ptr_eq(&second.root, &global));

        first.local.define("x", Value::Number(1.0));
        assert!(second.local.lookup("x").is_none());
        assert!(!first.local.is_empty());
        assert!(second.local.is_empty());
    }

    #[test]
    fn test_push_list_goes_to_back() {
        let global = Context::root().shared();
        let mut stack = ExecutionStack::new();
        stack.initiate(&[list("first")], &[], &global);
        stack.push_list(list("deferred"), None, &global);

        let labels: Vec<String> = stack.pending().map(|item| item.local.label.clone()).collect();
        assert_eq!(labels, vec!["item #1", "item #2"]);
        assert_eq!(stack.get_next().unwrap().callee.head(), Some(&Node::atom("first")));
    }

    #[test]
    fn test_call_stack_frames() {
        let global = Context::root().shared();
        let mut calls = CallStack::new();
        calls.push_frame("item".to_string(), Context::child(&global, "item"));
        calls.push_frame("square".to_string(), Context::child(&global, "square"));

        assert_eq!(calls.depth(), 2);
        assert_eq!(calls.frame(1).unwrap().function_name, "square");
        assert_eq!(calls.pop_frame().unwrap().function_name, "square");
        assert_eq!(calls.depth(), 1);
    }
}
