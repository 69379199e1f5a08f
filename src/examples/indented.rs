//! A small outline language structured by indentation.
//!
//! Each line is a single word; a deeper indented group of lines forms the
//! block of the entry above it. The token stream comes from
//! [split_offside](crate::Lexer::split_offside), so the grammar consumes the
//! `indent`/`dedent` markers like ordinary terminals.

use crate::{Lexer, Parser, RuleSet, Terminal};

pub fn outline_lexer() -> Lexer {
    Lexer::new(vec![
        Terminal::new("word", r"[A-Za-z0-9_]+").unwrap(),
        Terminal::new("whitespace", r"\s+").unwrap(),
    ])
}

pub fn outline_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.add("outline", vec![vec!["entry+"]]);
    rules.add("entry", vec![vec!["word", "block?"]]);
    rules.add("block", vec![vec!["indent", "entry+", "dedent"]]);
    rules
}

pub fn outline_parser() -> Parser {
    Parser::new(outline_rules(), "outline").unwrap()
}
