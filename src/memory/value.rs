//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the result of evaluating any node.
//! Parsed literals map onto the scalar variants; compound and mutable data
//! live in the [`Heap`](super::heap::Heap) and are referenced by address.
//!
//! # Value Types
//!
//! - [`Value::Null`], [`Value::Bool`], [`Value::Number`], [`Value::Str`]
//! - [`Value::Symbol`]: an atom produced by `quote`
//! - [`Value::List`]: an immutable list of values (`list`, `quote`, `()`)
//! - [`Value::Ref`]: address of a heap object (cell or lambda)
//! - [`Value::Builtin`]: a native function
//!
//! # Truthiness
//!
//! `null` and `false` are false; every other value is true.

use crate::interpreter::builtins::Builtin;
use crate::parser::ast::{Literal, Node};
use std::fmt;

/// Heap address type (64-bit)
pub type Address = u64;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Symbol(String),
    List(Vec<Value>),
    Ref(Address),
    Builtin(Builtin),
}

impl Value {
    /// Convert a literal to its constant value. Atoms become symbols; the
    /// evaluator resolves them before this is reached.
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::String(s) => Value::Str(s.clone()),
            Literal::Number(n) => Value::Number(*n),
            Literal::Null => Value::Null,
            Literal::Atom(name) => Value::Symbol(name.clone()),
        }
    }

    /// Quote a node: lists become list values without evaluation
    pub fn from_node(node: &Node) -> Self {
        match node {
            Node::Literal(literal) => Value::from_literal(literal),
            Node::List(list) => Value::List(list.items().iter().map(Value::from_node).collect()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_ref_address(&self) -> Option<Address> {
        match self {
            Value::Ref(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Ref(_) => "ref",
            Value::Builtin(_) => "builtin",
        }
    }

    /// Printed form with strings quoted, used inside lists and by the UI
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::Symbol(name) => f.write_str(name),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::repr).collect();
                write!(f, "({})", parts.join(" "))
            }
            Value::Ref(addr) => write!(f, "#<ref 0x{:x}>", addr),
            Value::Builtin(builtin) => write!(f, "#<builtin {}>", builtin.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::Str(String::new()).is_truthy());
        assert!(Value::List(Vec::new()).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("hi".to_string()).to_string(), "hi");
        let list = Value::List(vec![
            Value::Number(1.0),
            Value::Str("a".to_string()),
            Value::List(vec![Value::Null]),
        ]);
        assert_eq!(list.to_string(), "(1 \"a\" (null))");
        assert_eq!(Value::Ref(0x1000_0000).to_string(), "#<ref 0x10000000>");
    }

    #[test]
    fn test_quote_node() {
        let node = Node::list(vec![Node::atom("a"), Node::number(1.0), Node::list(Vec::new())]);
        assert_eq!(
            Value::from_node(&node),
            Value::List(vec![
                Value::Symbol("a".to_string()),
                Value::Number(1.0),
                Value::List(Vec::new()),
            ])
        );
    }
}
