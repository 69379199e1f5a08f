//! A four-operation arithmetic language with left associative operators.

use crate::{Lexer, Parser, RuleSet, Terminal, Visitor};

pub fn arithmetic_lexer() -> Lexer {
    Lexer::new(vec![
        Terminal::new("number", "[0-9]+").unwrap(),
        Terminal::new("add", r"[+\-]").unwrap(),
        Terminal::new("mul", r"[*/]").unwrap(),
        Terminal::new("whitespace", r"\s+").unwrap(),
    ])
}

pub fn arithmetic_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.add("root", vec![vec!["addExpr"]]);
    rules.add(
        "addExpr",
        vec![vec!["addExpr", "add", "mulExpr"], vec!["mulExpr"]],
    );
    rules.add(
        "mulExpr",
        vec![vec!["mulExpr", "mul", "number"], vec!["number"]],
    );
    rules
}

pub fn arithmetic_parser() -> Parser {
    Parser::new(arithmetic_rules(), "root").unwrap()
}

/// A visitor folding a parsed expression into its value.
pub fn arithmetic_visitor() -> Visitor<(), i64> {
    let mut visitor: Visitor<(), i64> = Visitor::new();
    visitor.on("number", |_, _, tree| {
        tree.text().map_or(0, |text| text.parse().unwrap_or(0))
    });
    visitor.on_collapsed("addExpr", |visitor, state, tree| {
        let children = tree.children();
        let left = visitor.visit(state, &children[0]).unwrap_or(0);
        let right = visitor.visit(state, &children[2]).unwrap_or(0);
        match children[1].text() {
            Some("+") => left + right,
            _ => left - right,
        }
    });
    visitor.on_collapsed("mulExpr", |visitor, state, tree| {
        let children = tree.children();
        let left = visitor.visit(state, &children[0]).unwrap_or(0);
        let right = visitor.visit(state, &children[2]).unwrap_or(0);
        match children[1].text() {
            Some("*") => left * right,
            _ => left / right,
        }
    });
    visitor
}
