// Parser behavior through the public API

use listty::parser::ast::{List, Literal, LiteralKind, Node};
use listty::parser::literals::parse_literal;
use listty::parser::primitives::MAX_NESTING;
use listty::parser::{parse_list, parse_program};
use pretty_assertions::assert_eq;

#[test]
fn test_list_consumes_exactly_to_matching_paren() {
    let inputs = [
        ("(a)", " rest"),
        ("(a (b (c)) d)", "(e)"),
        ("( () (()) )", ""),
        ("(print \"(not a paren\" 1)", ") trailing"),
    ];
    for (list, tail) in inputs {
        let input = format!("{}{}", list, tail);
        let parsed = parse_list(&input).unwrap();
        assert_eq!(parsed.input, tail, "input {:?}", input);
    }
}

#[test]
fn test_program_is_total() {
    let empty = parse_program("");
    assert!(empty.lists().is_empty());
    assert_eq!(empty.source, "");

    for garbage in ["garbage", "))) 12 \"x", "(unclosed", "(a)(b)", "\u{1F600} ü (", "((("] {
        let program = parse_program(garbage);
        assert_eq!(program.source, garbage);
        assert_eq!(program.lists().len(), program.spans.len());
    }

    let program = parse_program("just some words");
    assert!(program.lists().is_empty());
    assert_eq!(program.source, "just some words");
}

#[test]
fn test_keyword_priority() {
    assert_eq!(parse_literal("true").unwrap().res, Literal::Boolean(true));
    assert_eq!(parse_literal("false)").unwrap().res, Literal::Boolean(false));
    assert_eq!(parse_literal("null").unwrap().res, Literal::Null);

    for word in ["nullish", "nullable", "trueish", "false_flag"] {
        let parsed = parse_literal(word).unwrap();
        assert_eq!(parsed.res, Literal::Atom(word.to_string()));
        assert_eq!(parsed.input, "");
    }
}

#[test]
fn test_nested_structure() {
    let parsed = parse_list("(a b (c 1 2.5 \"hi\") true null)").unwrap();
    let list = parsed.res;
    assert_eq!(list.len(), 5);

    let nested = list.items()[2].as_list().unwrap();
    assert_eq!(nested.len(), 4);
    assert_eq!(
        nested.items(),
        &[
            Node::atom("c"),
            Node::number(1.0),
            Node::number(2.5),
            Node::string("hi"),
        ]
    );

    let kinds: Vec<Option<LiteralKind>> = list
        .items()
        .iter()
        .map(|node| match node {
            Node::Literal(literal) => Some(literal.kind()),
            Node::List(_) => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(LiteralKind::Atom),
            Some(LiteralKind::Atom),
            None,
            Some(LiteralKind::Boolean),
            Some(LiteralKind::Null),
        ]
    );
}

#[test]
fn test_empty_list() {
    let parsed = parse_list("()").unwrap();
    assert_eq!(parsed.res, List::new(Vec::new()));
    assert!(parsed.res.is_empty());
}

#[test]
fn test_malformed_number_is_skipped() {
    assert!(parse_literal("1.2.3").is_err());

    // The bad literal ends the list body, so the list never closes
    let program = parse_program("(a 1.2.3) (b 2)");
    assert_eq!(program.lists().len(), 1);
    assert_eq!(program.lists()[0].to_string(), "(b 2)");
}

#[test]
fn test_spans_cover_source_text() {
    let source = "  (define x 1)\n  junk\n(print\n  x)";
    let program = parse_program(source);
    assert_eq!(program.lists().len(), 2);
    assert_eq!(program.snippet(0), Some("(define x 1)"));
    assert_eq!(program.snippet(1), Some("(print\n  x)"));
    assert_eq!(program.span(1).unwrap().line(source), 3);
}

fn depth(list: &List) -> usize {
    1 + list
        .items()
        .iter()
        .filter_map(Node::as_list)
        .map(|inner| depth(inner))
        .max()
        .unwrap_or(0)
}

#[test]
fn test_deep_balanced_nesting_is_bounded() {
    let source = format!("{}{}", "(".repeat(2000), ")".repeat(2000));
    let program = parse_program(&source);

    assert_eq!(program.lists().len(), 1);
    assert_eq!(depth(&program.lists()[0]), MAX_NESTING);
    assert_eq!(program.lists()[0].to_string().len(), 2 * MAX_NESTING);
}

#[test]
fn test_deep_unbalanced_nesting_yields_empty_program() {
    for count in [5_000, 20_000] {
        let source = "(".repeat(count);
        let program = parse_program(&source);
        assert!(program.lists().is_empty(), "{} open parens", count);
        assert_eq!(program.source.len(), count);
    }

    let program = parse_program(&format!("{} (x)", ")".repeat(5_000)));
    assert_eq!(program.lists().len(), 1);
}

#[test]
fn test_nesting_at_limit_parses() {
    let source = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    let list = parse_list(&source).unwrap().res;
    assert_eq!(depth(&list), MAX_NESTING);
    assert!(parse_list(&format!("({})", source)).is_err());
}
