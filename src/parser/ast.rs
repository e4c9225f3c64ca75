// AST (S-expression tree) definitions for the interpreter

use std::fmt;
use std::rc::Rc;

/// Byte range of a node inside the program source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 1-based line number of the span start within `source`
    pub fn line(&self, source: &str) -> usize {
        let end = self.start.min(source.len());
        source[..end].matches('\n').count() + 1
    }
}

/// Tag of a [`Literal`], independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Boolean,
    String,
    Number,
    Null,
    Atom,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::Boolean => "Boolean",
            LiteralKind::String => "String",
            LiteralKind::Number => "Number",
            LiteralKind::Null => "Null",
            LiteralKind::Atom => "Atom",
        };
        f.write_str(name)
    }
}

/// Atomic value node produced by the literal parser
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    String(String),
    Number(f64),
    Null,
    Atom(String), // Symbol name
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Boolean(_) => LiteralKind::Boolean,
            Literal::String(_) => LiteralKind::String,
            Literal::Number(_) => LiteralKind::Number,
            Literal::Null => LiteralKind::Null,
            Literal::Atom(_) => LiteralKind::Atom,
        }
    }

    /// Symbol name if this is an atom
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Literal::Atom(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Null => f.write_str("null"),
            Literal::Atom(name) => f.write_str(name),
        }
    }
}

/// A child of a [`List`]: either a literal or a nested list
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Literal),
    List(Rc<List>),
}

impl Node {
    pub fn atom(name: &str) -> Self {
        Node::Literal(Literal::Atom(name.to_string()))
    }

    pub fn number(n: f64) -> Self {
        Node::Literal(Literal::Number(n))
    }

    pub fn string(s: &str) -> Self {
        Node::Literal(Literal::String(s.to_string()))
    }

    pub fn boolean(b: bool) -> Self {
        Node::Literal(Literal::Boolean(b))
    }

    pub fn null() -> Self {
        Node::Literal(Literal::Null)
    }

    pub fn list(children: Vec<Node>) -> Self {
        Node::List(Rc::new(List::new(children)))
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Node::Literal(lit) => lit.as_atom(),
            Node::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&Rc<List>> {
        match self {
            Node::List(list) => Some(list),
            Node::Literal(_) => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(lit) => lit.fmt(f),
            Node::List(list) => list.fmt(f),
        }
    }
}

/// Parenthesized sequence of nodes.
///
/// `length` is cached at construction and always equals the number of
/// children; the fields are private so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    length: usize,
    value: Vec<Node>,
}

impl List {
    pub fn new(value: Vec<Node>) -> Self {
        List {
            length: value.len(),
            value,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn items(&self) -> &[Node] {
        &self.value
    }

    /// Head of the list, if any
    pub fn head(&self) -> Option<&Node> {
        self.value.first()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, child) in self.value.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", child)?;
        }
        f.write_str(")")
    }
}

/// Parse result for a whole source unit
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub source: String,
    pub value: Vec<Rc<List>>,
    pub spans: Vec<Span>, // Parallel to `value`
}

impl Program {
    pub fn new(source: &str) -> Self {
        Program {
            source: source.to_string(),
            value: Vec::new(),
            spans: Vec::new(),
        }
    }

    pub fn push(&mut self, list: List, span: Span) {
        self.value.push(Rc::new(list));
        self.spans.push(span);
    }

    pub fn lists(&self) -> &[Rc<List>] {
        &self.value
    }

    pub fn span(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied()
    }

    /// Source text of the `index`-th top-level list
    pub fn snippet(&self, index: usize) -> Option<&str> {
        self.span(index)
            .and_then(|span| self.source.get(span.start..span.end))
    }
}

/// Any value the parser can hand to the runtime.
///
/// Only [`Tree::Program`] is executable; the other variants exist so callers
/// holding a bare list or literal get a fatal error instead of a silent no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Program(Program),
    List(Rc<List>),
    Literal(Literal),
}

impl Tree {
    pub fn tag(&self) -> &'static str {
        match self {
            Tree::Program(_) => "Program",
            Tree::List(_) => "List",
            Tree::Literal(_) => "Literal",
        }
    }
}

impl From<Program> for Tree {
    fn from(program: Program) -> Self {
        Tree::Program(program)
    }
}

impl From<List> for Tree {
    fn from(list: List) -> Self {
        Tree::List(Rc::new(list))
    }
}

impl From<Rc<List>> for Tree {
    fn from(list: Rc<List>) -> Self {
        Tree::List(list)
    }
}

impl From<Literal> for Tree {
    fn from(literal: Literal) -> Self {
        Tree::Literal(literal)
    }
}
