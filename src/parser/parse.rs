//! List and program parsers
//!
//! [`parse_list`] is recursive descent with backtracking: at each child
//! position it tries a literal, then a nested list, and treats failure of
//! both as the end of the list body. [`parse_program`] is total; it collects
//! every top-level list it can recognize and skips everything else.

use super::ast::{List, Node, Program, Span};
use super::literals::parse_literal;
use super::primitives::{
    parse_char, parse_till_class, skip_whitespace, ParseResult, Parsed, SyntaxError, MAX_NESTING,
};
use std::rc::Rc;
use tracing::trace;

/// Parse one child: literal first, then nested list
fn parse_node(input: &str, depth: usize) -> ParseResult<'_, Node> {
    if let Ok(parsed) = parse_literal(input) {
        return Ok(parsed.map(Node::Literal));
    }
    parse_nested(input, depth).map(|parsed| parsed.map(|list| Node::List(Rc::new(list))))
}

/// Parse a parenthesized, whitespace-separated list.
///
/// Fails if lists nest deeper than [`MAX_NESTING`].
pub fn parse_list(input: &str) -> ParseResult<'_, List> {
    parse_nested(input, 1)
}

fn parse_nested(input: &str, depth: usize) -> ParseResult<'_, List> {
    let open = parse_char('(', input)?;
    if depth > MAX_NESTING {
        return Err(SyntaxError::new(
            format!("at most {} nested lists", MAX_NESTING),
            input,
        ));
    }
    let mut rest = skip_whitespace(open.input).input;
    let mut children = Vec::new();

    while let Ok(child) = parse_node(rest, depth + 1) {
        children.push(child.res);

        let gap = skip_whitespace(child.input);
        rest = gap.input;
        // Children must be separated by whitespace
        if gap.res.is_empty() {
            break;
        }
    }

    let close = parse_char(')', rest)
        .map_err(|_| SyntaxError::new("')' closing list", rest))?;
    Ok(Parsed::new(List::new(children), close.input))
}

/// Skip past an unparseable span.
///
/// Consumes at least one character, then everything up to the next
/// whitespace or `(`, then the whitespace run that follows.
fn recover(input: &str) -> &str {
    let mut chars = input.chars();
    if chars.next().is_none() {
        return input;
    }
    let after_first = chars.as_str();
    let next = match parse_till_class(|c| c.is_whitespace() || c == '(', after_first) {
        Ok(parsed) => parsed.input,
        Err(_) => "",
    };
    skip_whitespace(next).input
}

/// Parse a whole source unit. Never fails.
pub fn parse_program(source: &str) -> Program {
    let mut program = Program::new(source);
    let mut rest = skip_whitespace(source).input;

    while !rest.is_empty() {
        let start = source.len() - rest.len();
        match parse_list(rest) {
            Ok(parsed) => {
                let end = source.len() - parsed.input.len();
                program.push(parsed.res, Span::new(start, end));
                rest = skip_whitespace(parsed.input).input;
            }
            Err(err) => {
                let next = recover(rest);
                trace!(
                    offset = start,
                    skipped = &rest[..rest.len() - next.len()],
                    %err,
                    "skipping unparseable span"
                );
                rest = next;
            }
        }
    }

    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Literal;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_list() {
        let parsed = parse_list("()").unwrap();
        assert_eq!(parsed.res, List::new(Vec::new()));
        assert_eq!(parsed.res.len(), 0);
        assert_eq!(parsed.input, "");

        assert!(parse_list("( )").unwrap().res.is_empty());
    }

    #[test]
    fn test_flat_list() {
        let parsed = parse_list("(a 1 \"s\" true null) tail").unwrap();
        assert_eq!(
            parsed.res,
            List::new(vec![
                Node::atom("a"),
                Node::number(1.0),
                Node::string("s"),
                Node::boolean(true),
                Node::null(),
            ])
        );
        assert_eq!(parsed.input, " tail");
    }

    #[test]
    fn test_nested_list_consumes_exactly_to_matching_paren() {
        let parsed = parse_list("(a (b (c)) d)(e)").unwrap();
        assert_eq!(parsed.res.len(), 3);
        assert_eq!(parsed.input, "(e)");
        let inner = parsed.res.items()[1].as_list().unwrap();
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn test_whitespace_around_children() {
        let parsed = parse_list("(  a\n\tb  )").unwrap();
        assert_eq!(parsed.res, List::new(vec![Node::atom("a"), Node::atom("b")]));
    }

    #[test]
    fn test_unclosed_list_fails() {
        assert!(parse_list("(a b").is_err());
        assert!(parse_list("(a (b)").is_err());
        assert!(parse_list("a b)").is_err());
    }

    #[test]
    fn test_missing_separator_fails() {
        assert!(parse_list("(a\"b\")").is_err());
        assert!(parse_list("(12abc)").is_err());
    }

    #[test]
    fn test_program_collects_top_level_lists() {
        let program = parse_program("(define x 1)\n(print x)\n");
        assert_eq!(program.lists().len(), 2);
        assert_eq!(program.snippet(0), Some("(define x 1)"));
        assert_eq!(program.snippet(1), Some("(print x)"));
        assert_eq!(program.source, "(define x 1)\n(print x)\n");
    }

    #[test]
    fn test_program_skips_garbage_between_lists() {
        let program = parse_program("junk (a) 42 \"str\" (b c) )))");
        assert_eq!(program.lists().len(), 2);
        assert_eq!(program.lists()[0].items(), &[Node::atom("a")]);
        assert_eq!(
            program.lists()[1].items(),
            &[Node::atom("b"), Node::atom("c")]
        );
    }

    #[test]
    fn test_program_is_total() {
        for input in ["", "   ", "garbage", "(((", ")))", "(a $ b)", "\"open", "1.2.3"] {
            let program = parse_program(input);
            assert!(program.lists().is_empty(), "input {:?}", input);
            assert_eq!(program.source, input);
        }
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        let input = nested(MAX_NESTING);
        let parsed = parse_list(&input).unwrap();
        assert_eq!(parsed.input, "");

        assert!(parse_list(&nested(MAX_NESTING + 1)).is_err());
    }

    #[test]
    fn test_program_recovers_innermost_lists_past_limit() {
        let source = format!("{} (ok)", nested(MAX_NESTING + 3));
        let program = parse_program(&source);

        // The three outermost parens are skipped one at a time
        assert_eq!(program.lists().len(), 2);
        assert_eq!(program.span(0), Some(Span::new(3, 3 + 2 * MAX_NESTING)));
        assert_eq!(program.lists()[1].to_string(), "(ok)");
    }

    #[test]
    fn test_program_recovers_inside_broken_list() {
        let program = parse_program("((a $) (b))");
        assert_eq!(program.lists().len(), 1);
        assert_eq!(program.lists()[0].items(), &[Node::atom("b")]);
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let program = parse_program("  (x)  (y z)");
        assert_eq!(program.span(0), Some(Span::new(2, 5)));
        assert_eq!(program.span(1), Some(Span::new(7, 12)));
        assert!(matches!(
            program.lists()[1].items()[1],
            Node::Literal(Literal::Atom(ref s)) if s == "z"
        ));
    }
}
