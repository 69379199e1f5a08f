use crate::examples::arithmetic::arithmetic_lexer;
use crate::{Action, Lexer, LexNode, Terminal, DEDENT, EOI, INDENT, UNKNOWN};
use indexmap::IndexMap;
use regex::Regex;

#[test]
fn tokenize_expression() {
    let lexer = arithmetic_lexer();
    let stream = lexer.lex("3 + 2*1").unwrap();

    assert_eq!(
        stream,
        vec![
            LexNode::new("number", vec!["3".to_string()], 0, 0),
            LexNode::new("whitespace", vec![" ".to_string()], 1, 0),
            LexNode::new("add", vec!["+".to_string()], 2, 0),
            LexNode::new("whitespace", vec![" ".to_string()], 3, 0),
            LexNode::new("number", vec!["2".to_string()], 4, 0),
            LexNode::new("mul", vec!["*".to_string()], 5, 0),
            LexNode::new("number", vec!["1".to_string()], 6, 0),
            LexNode::eoi(7, 0),
        ]
    );
}

#[test]
fn tokenize_empty_input() {
    let lexer = arithmetic_lexer();
    assert_eq!(lexer.lex("").unwrap(), vec![LexNode::eoi(0, 0)]);
}

#[test]
fn capture_groups_are_returned() {
    let lexer = Lexer::new(vec![
        Terminal::new("assign", r"([a-z]+)\s*=\s*([0-9]+)").unwrap()
    ]);
    let stream = lexer.lex("x = 10").unwrap();

    assert_eq!(
        stream[0],
        LexNode::new(
            "assign",
            vec!["x = 10".to_string(), "x".to_string(), "10".to_string()],
            0,
            0
        )
    );
}

fn summary(stream: &[LexNode]) -> Vec<(String, String)> {
    stream
        .iter()
        .filter(|token| !token.is(EOI))
        .map(|token| (token.token.clone(), token.text().to_string()))
        .collect()
}

#[test]
fn tokenizing_concatenated_inputs_concatenates_streams() {
    let lexer = arithmetic_lexer();
    let left = lexer.lex("12+").unwrap();
    let right = lexer.lex("34*5").unwrap();
    let whole = lexer.lex("12+34*5").unwrap();

    let mut expected = summary(&left);
    expected.extend(summary(&right));
    assert_eq!(summary(&whole), expected);
}

#[test]
fn unrecognized_input_reports_position() {
    let lexer = arithmetic_lexer();
    let err = lexer.lex("3 & 4").unwrap_err();

    assert_eq!((err.line, err.index), (0, 2));
    assert!(err.to_string().ends_with("at line 1:3"));
}

#[test]
fn nullable_patterns_are_rejected() {
    assert!(Terminal::new("opt", "a*").is_err());
    assert!(Terminal::new("empty", "").is_err());
}

#[test]
fn reserved_terminal_names_are_rejected() {
    assert!(Terminal::new("$", "x").is_err());
    assert!(Terminal::new("unknown", "x").is_err());
}

#[test]
fn active_set_restricts_the_scan() {
    let lexer = Lexer::new(vec![
        Terminal::new("id", "[ab]+").unwrap(),
        Terminal::new("a", "a").unwrap(),
    ]);

    // Without context the earlier, greedier terminal wins.
    let token = lexer.next("ab", 0, 0, None).unwrap();
    assert_eq!((token.token.as_str(), token.text()), ("id", "ab"));

    // With an active row that only accepts `a`, the id terminal is skipped.
    let mut row: IndexMap<String, Action> = IndexMap::new();
    row.insert(
        "a".to_string(),
        Action::Shift {
            next: 1,
            came_from: Vec::new(),
        },
    );
    let token = lexer.next("ab", 0, 0, Some(&row)).unwrap();
    assert_eq!((token.token.as_str(), token.text()), ("a", "a"));
}

#[test]
fn split_wraps_lines_and_drops_comments() {
    let lexer = arithmetic_lexer();
    let comment = Regex::new("^#").unwrap();
    let tokens = lexer.split("one\n#skip\nthree", Some(&comment));

    assert_eq!(
        tokens,
        vec![
            LexNode::raw_line("one", 0),
            LexNode::raw_line("three", 2),
            LexNode::eoi(5, 2),
        ]
    );
}

#[test]
fn split_handles_carriage_returns() {
    let lexer = arithmetic_lexer();
    let tokens = lexer.split("a\r\nb", None);

    assert_eq!(
        tokens,
        vec![
            LexNode::raw_line("a", 0),
            LexNode::raw_line("b", 1),
            LexNode::eoi(1, 1),
        ]
    );
}

#[test]
fn split_offside_emits_indent_markers() {
    let lexer = arithmetic_lexer();
    let tokens = lexer.split_offside("a\n  b\n  c\nd", None).unwrap();

    let outline: Vec<(&str, &str, usize)> = tokens
        .iter()
        .map(|token| (token.token.as_str(), token.text(), token.line))
        .collect();
    assert_eq!(
        outline,
        vec![
            (UNKNOWN, "a", 0),
            (INDENT, "", 1),
            (UNKNOWN, "  b", 1),
            (UNKNOWN, "  c", 2),
            (DEDENT, "", 3),
            (UNKNOWN, "d", 3),
            (EOI, "", 3),
        ]
    );
}

#[test]
fn split_offside_skips_blank_lines() {
    let lexer = arithmetic_lexer();
    let tokens = lexer.split_offside("a\n\n  b", None).unwrap();

    let kinds: Vec<&str> = tokens.iter().map(|token| token.token.as_str()).collect();
    assert_eq!(kinds, vec![UNKNOWN, INDENT, UNKNOWN, DEDENT, EOI]);
}

#[test]
fn split_offside_closes_nested_levels_at_end_of_input() {
    let lexer = arithmetic_lexer();
    let tokens = lexer.split_offside("a\n  b\n    c", None).unwrap();

    let kinds: Vec<&str> = tokens.iter().map(|token| token.token.as_str()).collect();
    assert_eq!(
        kinds,
        vec![UNKNOWN, INDENT, UNKNOWN, INDENT, UNKNOWN, DEDENT, DEDENT, EOI]
    );
}

#[test]
fn split_offside_rejects_mismatched_dedent() {
    let lexer = arithmetic_lexer();
    let err = lexer.split_offside("a\n    b\n  c", None).unwrap_err();

    assert_eq!((err.line, err.index), (2, 2));
}
