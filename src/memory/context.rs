//! Variable scopes
//!
//! A [`Context`] maps names to values and optionally links to an enclosing
//! context. The runtime creates one root context per execution; every local
//! context (one per top-level item and one per function call) is a child of
//! the root, so lookup is two-tier: local first, then global.

use super::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a context, used for the root scope
pub type ContextRef = Rc<RefCell<Context>>;

#[derive(Debug, Clone, Default)]
pub struct Context {
    pub label: String,
    bindings: FxHashMap<String, Value>,
    insertion_order: Vec<String>, // Track order of definitions for display
    parent: Option<ContextRef>,
}

impl Context {
    /// A root context with no parent
    pub fn root() -> Self {
        Context {
            label: "global".to_string(),
            ..Context::default()
        }
    }

    /// Wrap a context in a shared handle
    pub fn shared(self) -> ContextRef {
        Rc::new(RefCell::new(self))
    }

    /// A fresh, empty context enclosed by `parent`
    pub fn child(parent: &ContextRef, label: impl Into<String>) -> Self {
        Context {
            label: label.into(),
            parent: Some(Rc::clone(parent)),
            ..Context::default()
        }
    }

    pub fn parent(&self) -> Option<&ContextRef> {
        self.parent.as_ref()
    }

    /// Bind `name` in this context, replacing any previous binding here
    pub fn define(&mut self, name: &str, value: Value) {
        if self.bindings.insert(name.to_string(), value).is_none() {
            self.insertion_order.push(name.to_string());
        }
    }

    /// Binding in this context only
    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Resolve `name` through this context and its ancestors
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }

        let mut next = self.parent.clone();
        while let Some(ctx) = next {
            let ctx = ctx.borrow();
            if let Some(value) = ctx.bindings.get(name) {
                return Some(value.clone());
            }
            next = ctx.parent.clone();
        }
        None
    }

    /// Update the nearest existing binding of `name`.
    /// Returns false if no context in the chain binds it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            return true;
        }

        let mut next = self.parent.clone();
        while let Some(ctx) = next {
            let mut ctx = ctx.borrow_mut();
            if let Some(slot) = ctx.bindings.get_mut(name) {
                *slot = value;
                return true;
            }
            next = ctx.parent.clone();
        }
        false
    }

    /// Bindings in definition order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.bindings.get(name).map(|value| (name.as_str(), value)))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_shadows_parent() {
        let root = Context::root().shared();
        root.borrow_mut().define("x", Value::Number(1.0));

        let mut local = Context::child(&root, "item");
        assert_eq!(local.lookup("x"), Some(Value::Number(1.0)));

        local.define("x", Value::Number(2.0));
        assert_eq!(local.lookup("x"), Some(Value::Number(2.0)));
        assert_eq!(root.borrow().get_local("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let root = Context::root().shared();
        root.borrow_mut().define("counter", Value::Number(0.0));

        let mut local = Context::child(&root, "item");
        assert!(local.assign("counter", Value::Number(5.0)));
        assert_eq!(root.borrow().get_local("counter"), Some(&Value::Number(5.0)));
        assert!(local.get_local("counter").is_none());

        assert!(!local.assign("missing", Value::Null));
    }

    #[test]
    fn test_bindings_keep_definition_order() {
        let mut ctx = Context::root();
        ctx.define("b", Value::Number(1.0));
        ctx.define("a", Value::Number(2.0));
        ctx.define("b", Value::Number(3.0));

        let names: Vec<&str> = ctx.bindings().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_sibling_contexts_are_isolated() {
        let root = Context::root().shared();
        let mut first = Context::child(&root, "first");
        let second = Context::child(&root, "second");

        first.define("local", Value::Bool(true));
        assert!(second.lookup("local").is_none());
    }
}
