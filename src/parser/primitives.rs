//! Primitive parsers over a text cursor
//!
//! Every parser takes the remaining input as a `&str` and returns a fresh
//! [`Parsed`] pair of result and unconsumed suffix. Nothing is mutated in
//! place, so a caller that abandons a failed branch simply keeps its own
//! slice and tries the next alternative.

use thiserror::Error;

/// Maximum number of input characters quoted in a [`SyntaxError`]
pub const SNIPPET_LEN: usize = 10;

/// Deepest list nesting the parser accepts.
///
/// Parsing, printing and dropping a tree all recurse once per level, so this
/// bounds native stack use for any input.
pub const MAX_NESTING: usize = 128;

/// A successful parse: the recognized value plus the remaining input
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<'a, T> {
    pub res: T,
    pub input: &'a str,
}

impl<'a, T> Parsed<'a, T> {
    pub fn new(res: T, input: &'a str) -> Self {
        Parsed { res, input }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<'a, U> {
        Parsed {
            res: f(self.res),
            input: self.input,
        }
    }
}

/// The expected lexical shape was not found at the cursor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error: expected {expected}, found {found:?}")]
pub struct SyntaxError {
    pub expected: String,
    pub found: String,
}

impl SyntaxError {
    pub fn new(expected: impl Into<String>, input: &str) -> Self {
        SyntaxError {
            expected: expected.into(),
            found: snippet(input),
        }
    }
}

pub type ParseResult<'a, T> = Result<Parsed<'a, T>, SyntaxError>;

/// Truncate `input` for diagnostics
pub fn snippet(input: &str) -> String {
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(SNIPPET_LEN).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Succeeds iff the first character of `input` is `expected`
pub fn parse_char(expected: char, input: &str) -> ParseResult<'_, char> {
    match input.chars().next() {
        Some(c) if c == expected => Ok(Parsed::new(c, &input[c.len_utf8()..])),
        _ => Err(SyntaxError::new(format!("'{}'", expected), input)),
    }
}

/// Succeeds iff `input` starts with `expected` verbatim
pub fn parse_string<'a>(expected: &str, input: &'a str) -> ParseResult<'a, String> {
    let mut rest = input;
    for c in expected.chars() {
        rest = parse_char(c, rest)
            .map_err(|_| SyntaxError::new(format!("\"{}\"", expected), input))?
            .input;
    }
    Ok(Parsed::new(expected.to_string(), rest))
}

/// Text up to (not including) the first `stop`; fails if `stop` never appears
pub fn parse_till(stop: char, input: &str) -> ParseResult<'_, String> {
    match input.find(stop) {
        Some(idx) => Ok(Parsed::new(input[..idx].to_string(), &input[idx..])),
        None => Err(SyntaxError::new(format!("'{}' before end of input", stop), input)),
    }
}

/// Consumes characters while `pred` is false; the remainder starts at the
/// first character satisfying `pred`. Fails if no character does.
pub fn parse_till_class(pred: impl Fn(char) -> bool, input: &str) -> ParseResult<'_, String> {
    match input.char_indices().find(|&(_, c)| pred(c)) {
        Some((idx, _)) => Ok(Parsed::new(input[..idx].to_string(), &input[idx..])),
        None => Err(SyntaxError::new("character class before end of input", input)),
    }
}

/// Tests exactly one character against `pred`
pub fn parse_char_class(pred: impl Fn(char) -> bool, input: &str) -> ParseResult<'_, char> {
    match input.chars().next() {
        Some(c) if pred(c) => Ok(Parsed::new(c, &input[c.len_utf8()..])),
        _ => Err(SyntaxError::new("character class", input)),
    }
}

/// Consumes the (possibly empty) run of characters satisfying `pred`.
///
/// Unlike [`parse_till_class`], end of input is a valid boundary, so this
/// never fails.
pub fn parse_while(pred: impl Fn(char) -> bool, input: &str) -> Parsed<'_, &str> {
    let idx = input
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(input.len(), |(idx, _)| idx);
    Parsed::new(&input[..idx], &input[idx..])
}

/// Skips a whitespace run, returning the slice after it
pub fn skip_whitespace(input: &str) -> Parsed<'_, &str> {
    parse_while(char::is_whitespace, input)
}
