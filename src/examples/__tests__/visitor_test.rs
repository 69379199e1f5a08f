use crate::examples::arithmetic::{arithmetic_lexer, arithmetic_parser, arithmetic_visitor};
use crate::{SyntaxTree, Visitor};

fn evaluate(input: &str) -> Option<i64> {
    let lexer = arithmetic_lexer();
    let parser = arithmetic_parser();
    let tree = parser.parse_text(&lexer, input).unwrap();
    arithmetic_visitor().visit(&mut (), &tree)
}

#[test]
fn evaluates_with_precedence_and_left_associativity() {
    assert_eq!(evaluate("3 + 2 * 1"), Some(5));
    assert_eq!(evaluate("2 * 3 + 4"), Some(10));
    assert_eq!(evaluate("8 / 2 / 2"), Some(2));
    assert_eq!(evaluate("3 - 2 - 1"), Some(0));
}

#[test]
fn collapsed_dispatch_delegates_through_unit_productions() {
    // A bare number is wrapped in addExpr and mulExpr unit productions; the
    // collapsed dispatches fall through to the number handler.
    assert_eq!(evaluate("7"), Some(7));
}

#[test]
fn missing_dispatch_falls_back_to_the_last_child() {
    let lexer = arithmetic_lexer();
    let parser = arithmetic_parser();
    let tree = parser.parse_text(&lexer, "3 + 2 * 1").unwrap();

    let mut visitor: Visitor<(), i64> = Visitor::new();
    visitor.on("number", |_, _, tree| {
        tree.text().map_or(0, |text| text.parse().unwrap_or(0))
    });
    // No dispatch for root, addExpr or mulExpr: the walk descends and the
    // result of the last child wins.
    assert_eq!(visitor.visit(&mut (), &tree), Some(1));
}

#[test]
fn leaf_without_dispatch_yields_none() {
    let visitor: Visitor<(), i64> = Visitor::new();
    let lexer = arithmetic_lexer();
    let leaf = lexer.next("7", 0, 0, None).unwrap();
    assert_eq!(visitor.visit(&mut (), &SyntaxTree::Leaf(leaf)), None);
}

#[test]
fn state_threads_through_the_walk() {
    let lexer = arithmetic_lexer();
    let parser = arithmetic_parser();
    let tree = parser.parse_text(&lexer, "1 + 2 + 3").unwrap();

    let mut visitor: Visitor<Vec<i64>, ()> = Visitor::new();
    visitor.on("number", |_, seen, tree| {
        if let Some(Ok(value)) = tree.text().map(|text| text.parse()) {
            seen.push(value);
        }
    });
    let mut seen = Vec::new();
    visitor.visit(&mut seen, &tree);
    assert_eq!(seen, vec![1, 2, 3]);
}
