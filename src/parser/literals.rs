//! Literal parsers
//!
//! [`parse_literal`] tries each literal kind in a fixed priority order:
//! null, boolean, string, number, atom. Atom comes last because its
//! character class also covers the keywords.

use super::ast::Literal;
use super::primitives::{
    parse_char, parse_char_class, parse_string, parse_till, parse_while, ParseResult, Parsed,
    SyntaxError,
};

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse `keyword` and require a word boundary after it, so that `nullable`
/// is left for the atom parser instead of splitting into `null` + `able`
fn parse_keyword<'a>(keyword: &str, input: &'a str) -> ParseResult<'a, String> {
    let parsed = parse_string(keyword, input)?;
    match parsed.input.chars().next() {
        Some(c) if is_ident_char(c) => Err(SyntaxError::new(
            format!("word boundary after \"{}\"", keyword),
            input,
        )),
        _ => Ok(parsed),
    }
}

pub fn parse_null(input: &str) -> ParseResult<'_, Literal> {
    Ok(parse_keyword("null", input)?.map(|_| Literal::Null))
}

pub fn parse_true(input: &str) -> ParseResult<'_, Literal> {
    Ok(parse_keyword("true", input)?.map(|_| Literal::Boolean(true)))
}

pub fn parse_false(input: &str) -> ParseResult<'_, Literal> {
    Ok(parse_keyword("false", input)?.map(|_| Literal::Boolean(false)))
}

pub fn parse_boolean(input: &str) -> ParseResult<'_, Literal> {
    parse_true(input).or_else(|_| parse_false(input))
}

/// Double-quoted string, no escape sequences
pub fn parse_str(input: &str) -> ParseResult<'_, Literal> {
    let open = parse_char('"', input)?;
    let body = parse_till('"', open.input)?;
    let close = parse_char('"', body.input)?;
    Ok(Parsed::new(Literal::String(body.res), close.input))
}

/// A digit followed by digits and dots.
///
/// The token must convert to a finite `f64`; `1.2.3` is a syntax error
/// rather than a NaN literal.
pub fn parse_number(input: &str) -> ParseResult<'_, Literal> {
    let first = parse_char_class(|c| c.is_ascii_digit(), input)?;
    let rest = parse_while(|c| c.is_ascii_digit() || c == '.', first.input);
    let token = &input[..input.len() - rest.input.len()];

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Parsed::new(Literal::Number(value), rest.input)),
        _ => Err(SyntaxError::new("number", input)),
    }
}

/// A letter followed by letters, digits or underscores
pub fn parse_atom(input: &str) -> ParseResult<'_, Literal> {
    let first = parse_char_class(|c| c.is_ascii_alphabetic(), input)?;
    let rest = parse_while(is_ident_char, first.input);
    let name = &input[..input.len() - rest.input.len()];
    Ok(Parsed::new(Literal::Atom(name.to_string()), rest.input))
}

/// First successful literal parse, in priority order
pub fn parse_literal(input: &str) -> ParseResult<'_, Literal> {
    const PARSERS: [fn(&str) -> ParseResult<'_, Literal>; 5] =
        [parse_null, parse_boolean, parse_str, parse_number, parse_atom];

    for parser in PARSERS {
        if let Ok(parsed) = parser(input) {
            return Ok(parsed);
        }
    }
    Err(SyntaxError::new("literal", input))
}
