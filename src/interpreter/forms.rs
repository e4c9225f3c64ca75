//! Special forms
//!
//! A list whose head atom names a special form is not a function call: its
//! arguments are handed to the engine unevaluated. Special-form names are
//! reserved and cannot be shadowed by bindings.

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{List, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Define, // (define name expr)   bind in the global context
    Let,    // (let name expr)      bind in the current local context
    Set,    // (set name expr)      update the nearest existing binding
    If,     // (if cond then [else])
    Do,     // (do expr...)
    And,    // (and expr...)
    Or,     // (or expr...)
    Quote,  // (quote x)
    Fn,     // (fn (params) body...)
    Defn,   // (defn name (params) body...)
    Defer,  // (defer list...)    queue lists as new work-list items
}

impl SpecialForm {
    pub fn from_name(name: &str) -> Option<Self> {
        let form = match name {
            "define" => SpecialForm::Define,
            "let" => SpecialForm::Let,
            "set" => SpecialForm::Set,
            "if" => SpecialForm::If,
            "do" => SpecialForm::Do,
            "and" => SpecialForm::And,
            "or" => SpecialForm::Or,
            "quote" => SpecialForm::Quote,
            "fn" => SpecialForm::Fn,
            "defn" => SpecialForm::Defn,
            "defer" => SpecialForm::Defer,
            _ => return None,
        };
        Some(form)
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Define => "define",
            SpecialForm::Let => "let",
            SpecialForm::Set => "set",
            SpecialForm::If => "if",
            SpecialForm::Do => "do",
            SpecialForm::And => "and",
            SpecialForm::Or => "or",
            SpecialForm::Quote => "quote",
            SpecialForm::Fn => "fn",
            SpecialForm::Defn => "defn",
            SpecialForm::Defer => "defer",
        }
    }

    /// The special form a call site invokes, if any
    pub fn of_site(site: &List) -> Option<Self> {
        site.head()
            .and_then(Node::as_atom)
            .and_then(SpecialForm::from_name)
    }

    pub(crate) fn invalid(self, message: impl Into<String>) -> RuntimeError {
        RuntimeError::InvalidForm {
            form: self.name(),
            message: message.into(),
        }
    }

    /// Check the number of arguments (excluding the head)
    pub(crate) fn expect_args(self, args: &[Node], min: usize, max: Option<usize>) -> Result<(), RuntimeError> {
        let count = args.len();
        let too_many = max.is_some_and(|max| count > max);
        if count < min || too_many {
            let expected = match max {
                Some(max) if max == min => format!("{}", min),
                Some(max) => format!("{} to {}", min, max),
                None => format!("at least {}", min),
            };
            return Err(self.invalid(format!(
                "expected {} argument(s), got {}",
                expected, count
            )));
        }
        Ok(())
    }

    /// Argument `index` must be an atom naming a binding target
    pub(crate) fn expect_name(self, args: &[Node], index: usize) -> Result<String, RuntimeError> {
        args.get(index)
            .and_then(Node::as_atom)
            .map(str::to_string)
            .ok_or_else(|| self.invalid(format!("argument {} must be a name", index + 1)))
    }

    /// Argument `index` must be a list of atoms
    pub(crate) fn expect_params(self, args: &[Node], index: usize) -> Result<Vec<String>, RuntimeError> {
        let list = args
            .get(index)
            .and_then(Node::as_list)
            .ok_or_else(|| self.invalid("parameters must be a list"))?;

        let mut params: Vec<String> = Vec::with_capacity(list.len());
        for node in list.items() {
            let name = node
                .as_atom()
                .ok_or_else(|| self.invalid(format!("parameter {} is not a name", node)))?;
            if params.iter().any(|p| p == name) {
                return Err(self.invalid(format!("duplicate parameter '{}'", name)));
            }
            params.push(name.to_string());
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_list;

    fn site(src: &str) -> List {
        parse_list(src).unwrap().res
    }

    #[test]
    fn test_of_site() {
        assert_eq!(SpecialForm::of_site(&site("(define x 1)")), Some(SpecialForm::Define));
        assert_eq!(SpecialForm::of_site(&site("(add 1 2)")), None);
        assert_eq!(SpecialForm::of_site(&site("((fn (x) x) 1)")), None);
        assert_eq!(SpecialForm::of_site(&site("()")), None);
    }

    #[test]
    fn test_expect_args() {
        let list = site("(if a b c d)");
        let err = SpecialForm::If.expect_args(&list.items()[1..], 2, Some(3)).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::InvalidForm {
                form: "if",
                message: "expected 2 to 3 argument(s), got 4".to_string(),
            }
        );
        assert!(SpecialForm::Do.expect_args(&[], 0, None).is_ok());
    }

    #[test]
    fn test_expect_params() {
        let list = site("(fn (a b) (add a b))");
        let params = SpecialForm::Fn.expect_params(&list.items()[1..], 0).unwrap();
        assert_eq!(params, vec!["a", "b"]);

        let list = site("(fn (a 1) a)");
        assert!(SpecialForm::Fn.expect_params(&list.items()[1..], 0).is_err());

        let list = site("(fn (a a) a)");
        assert!(SpecialForm::Fn.expect_params(&list.items()[1..], 0).is_err());

        let list = site("(fn x x)");
        assert!(SpecialForm::Fn.expect_params(&list.items()[1..], 0).is_err());
    }

    #[test]
    fn test_expect_name() {
        let list = site("(define 1 2)");
        assert!(SpecialForm::Define.expect_name(&list.items()[1..], 0).is_err());
        let list = site("(define x 2)");
        assert_eq!(SpecialForm::Define.expect_name(&list.items()[1..], 0).unwrap(), "x");
    }
}
