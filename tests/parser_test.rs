use pretty_assertions::assert_eq;

use rstt::error::{LexError, ParseError};
use rstt::lexer::{Expected, MAX_DEPTH};
use rstt::*;

fn truth_sequence(input: &str) -> Vec<bool> {
    let (statement, variables) = parse(input).expect("valid statement").into_parts();
    variables
        .assignments()
        .expect("statement has variables")
        .map(|assignment| statement.evaluate(&assignment))
        .collect()
}

fn names(input: &str) -> String {
    parse(input)
        .expect("valid statement")
        .variables
        .names()
        .iter()
        .collect()
}

#[test]
fn test_single_variable() {
    let parsed = parse("a").expect("valid statement");
    assert_eq!(parsed.variables.names(), &['a']);
    assert_eq!(parsed.evaluate(0), Some(false));
    assert_eq!(parsed.evaluate(1), Some(true));
}

#[test]
fn test_binary_operators() {
    assert_eq!(truth_sequence("a&b"), vec![false, false, false, true]);
    assert_eq!(truth_sequence("a|b"), vec![false, true, true, true]);
    assert_eq!(truth_sequence("a^b"), vec![false, true, true, false]);
    assert_eq!(truth_sequence("a>b"), vec![true, false, true, true]);
    assert_eq!(truth_sequence("a=b"), vec![true, false, false, true]);
    assert_eq!(truth_sequence("!(a>b)"), vec![false, true, false, false]);
}

#[test]
fn test_operand_order_is_independent_of_shift_order() {
    // b has shift 1 regardless of where it appears
    assert_eq!(truth_sequence("b>a"), vec![true, true, false, true]);
}

#[test]
fn test_variable_names_are_canonical() {
    assert_eq!(names("z | (A & (m = Z))"), "AZmz");
    assert_eq!(names("(a & a) | (a ^ !a)"), "a");
    assert_eq!(names("(b & 1) | !0"), "b");
    assert_eq!(names("0 = 1"), "");
}

#[test]
fn test_extreme_assignments() {
    let parsed = parse("(a & B) & (c & D)").expect("valid statement");
    let last = parsed.variables.assignment_count() - 1;

    assert_eq!(parsed.evaluate(0), Some(false));
    assert_eq!(parsed.evaluate(last), Some(true));
    assert_eq!(parsed.evaluate(last + 1), None);
}

#[test]
fn test_canonical_rendering() {
    assert_eq!(
        parse("(a&!0)>!!1").expect("valid statement").to_string(),
        "(a & !0) > 1"
    );
    assert_eq!(
        parse("!(!(a = b) | !0) > (c ^ d)")
            .expect("valid statement")
            .statement
            .render(),
        "!(!(a = b) | !0) > (c ^ d)"
    );
}

#[test]
fn test_chained_operators_are_rejected() {
    assert_eq!(
        parse("a & b > c").map(|p| p.statement),
        Err(ParseError::ChainedOperator {
            operator: '>',
            position: 6
        })
    );
}

#[test]
fn test_malformed_inputs() {
    let cases = [
        (
            "",
            ParseError::Lex(LexError::UnexpectedEnd {
                expected: Expected::Value,
                open_groups: 0,
            }),
        ),
        (
            "()",
            ParseError::Lex(LexError::UnexpectedChar {
                found: ')',
                position: 1,
                expected: Expected::Value,
            }),
        ),
        (
            "(",
            ParseError::Lex(LexError::UnexpectedEnd {
                expected: Expected::Value,
                open_groups: 1,
            }),
        ),
        (
            ")",
            ParseError::Lex(LexError::UnexpectedChar {
                found: ')',
                position: 0,
                expected: Expected::Value,
            }),
        ),
        (
            "^a",
            ParseError::Lex(LexError::UnexpectedChar {
                found: '^',
                position: 0,
                expected: Expected::Value,
            }),
        ),
        (
            "a>",
            ParseError::Lex(LexError::UnexpectedEnd {
                expected: Expected::Value,
                open_groups: 0,
            }),
        ),
        ("(a & b))", ParseError::Lex(LexError::UnmatchedClose { position: 7 })),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).map(|p| p.statement), Err(expected), "{input:?}");
    }
}

#[test]
fn test_error_positions() {
    let error = parse("a & (b | ?)").expect_err("invalid statement");
    assert_eq!(error.position(), Some(9));
    assert!(error.is_lexical());
    assert_eq!(
        error.to_string(),
        "unexpected char '?' at position 9; expected '!', '(', '0', '1', or a statement"
    );

    let error = parse("(a").expect_err("invalid statement");
    assert_eq!(error.position(), None);
}

#[test]
fn test_constant_statement_cannot_be_enumerated() {
    let parsed = parse("!(1 & 0)").expect("valid statement");
    assert!(parsed.variables.is_empty());
    assert_eq!(
        parsed.variables.assignments().err(),
        Some(EnumerationError::NoVariables)
    );
    assert_eq!(parsed.evaluate(0), Some(true));
}

#[test]
fn test_index_is_reusable_across_sweeps() {
    let parsed = parse("a ^ (b ^ c)").expect("valid statement");
    let first: Vec<bool> = parsed
        .variables
        .assignments()
        .expect("statement has variables")
        .map(|a| parsed.statement.evaluate(&a))
        .collect();
    let second: Vec<bool> = parsed
        .variables
        .assignments()
        .expect("statement has variables")
        .map(|a| parsed.statement.evaluate(&a))
        .collect();

    assert_eq!(first.len(), 8);
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![false, true, true, false, true, false, false, true]
    );
}

#[test]
fn test_all_fifty_two_variables() {
    let letters: Vec<char> = ('A'..='Z').chain('a'..='z').collect();
    let input = letters
        .iter()
        .skip(1)
        .fold(letters[0].to_string(), |acc, c| format!("({acc}) | {c}"));
    let parsed = parse(&input).expect("valid statement");

    assert_eq!(parsed.variables.names(), letters.as_slice());
    assert_eq!(parsed.variables.assignment_count(), 1 << 52);
    assert_eq!(parsed.evaluate(0), Some(false));
    assert_eq!(parsed.evaluate(1 << 51), Some(true));
}

#[test]
fn test_nesting_up_to_the_limit() {
    let input = (0..MAX_DEPTH).fold("a".to_string(), |acc, _| format!("(!a ^ {acc})"));
    let parsed = parse(&input).expect("valid statement");

    assert_eq!(parsed.evaluate(0), Some(false));
    assert_eq!(parsed.evaluate(1), Some(true));

    let rendered = parsed.statement.render();
    assert!(rendered.starts_with("!a ^ (!a ^ "));
    assert_eq!(
        parse(&rendered).expect("rendered statement is valid").statement.render(),
        rendered
    );
}

#[test]
fn test_nesting_beyond_the_limit() {
    let error = parse(&format!("{}a{}", "(".repeat(5_000), ")".repeat(5_000)))
        .expect_err("too deeply nested");
    assert_eq!(
        error,
        ParseError::Lex(LexError::TooDeep {
            position: MAX_DEPTH,
            limit: MAX_DEPTH
        })
    );
    assert_eq!(error.position(), Some(MAX_DEPTH));

    assert!(parse(&"(".repeat(50_000)).is_err());
    assert!(parse(&"!(".repeat(20_000)).is_err_and(|e| e.is_lexical()));
}
