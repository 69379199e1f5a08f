use crate::examples::arithmetic::{arithmetic_parser, arithmetic_rules};
use crate::grammar::{base, can_omit, can_repeat, first_sets, follow_sets};
use crate::{Parser, RuleSet};

#[test]
fn element_helpers() {
    assert_eq!(base("item"), "item");
    assert_eq!(base("item?"), "item");
    assert_eq!(base("item*"), "item");
    assert_eq!(base("item+"), "item");

    assert!(can_omit("item?"));
    assert!(can_omit("item*"));
    assert!(!can_omit("item+"));
    assert!(!can_omit("item"));

    assert!(can_repeat("item*"));
    assert!(can_repeat("item+"));
    assert!(!can_repeat("item?"));
    assert!(!can_repeat("item"));
}

fn list_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.add("list", vec![vec!["[", "item*", "]"]]);
    rules.add("item", vec![vec!["a"]]);
    rules
}

#[test]
fn first_of_quantified_rules() {
    let rules = list_rules();
    let first = first_sets(&rules);

    let list: Vec<&str> = first["list"].iter().map(|s| s.as_str()).collect();
    assert_eq!(list, vec!["["]);
    let item: Vec<&str> = first["item"].iter().map(|s| s.as_str()).collect();
    assert_eq!(item, vec!["a"]);
    // A terminal is its own first set.
    assert!(first["a"].contains("a"));
}

#[test]
fn first_scans_past_omissible_elements() {
    let mut rules = RuleSet::new();
    rules.add("pair", vec![vec!["prefix?", "word"]]);
    rules.add("prefix", vec![vec!["dash"]]);
    let first = first_sets(&rules);

    assert!(first["pair"].contains("dash"));
    assert!(first["pair"].contains("word"));
}

#[test]
fn follow_of_repeated_element_includes_itself() {
    let rules = list_rules();
    let first = first_sets(&rules);
    let follow = follow_sets(&rules, "list", &first);

    // A repeated `item` may be followed by another item or the closing bracket.
    assert!(follow["item"].contains("a"));
    assert!(follow["item"].contains("]"));
    assert_eq!(follow["item"].len(), 2);
    // The start symbol is followed by end of input only.
    let list: Vec<&str> = follow["list"].iter().map(|s| s.as_str()).collect();
    assert_eq!(list, vec!["$"]);
}

#[test]
fn follow_falls_through_to_parent() {
    let mut rules = RuleSet::new();
    rules.add("root", vec![vec!["inner", "end"]]);
    rules.add("inner", vec![vec!["word", "tail?"]]);
    rules.add("tail", vec![vec!["comma", "word"]]);
    let first = first_sets(&rules);
    let follow = follow_sets(&rules, "root", &first);

    // `tail?` is the last element of `inner`, so whatever follows `inner`
    // follows `tail` as well.
    assert!(follow["tail"].contains("end"));
    assert!(follow["inner"].contains("end"));
}

#[test]
fn ambiguous_grammar_is_rejected() {
    let mut rules = RuleSet::new();
    rules.add("S", vec![vec!["S", "S"], vec!["a"]]);
    let err = Parser::new(rules, "S").unwrap_err();

    assert_eq!(err.what(), "Conflict");
    assert!(err.message().contains("S -> S S"), "got: {}", err.message());
    assert!(err.message().contains("shift/reduce"), "got: {}", err.message());
}

#[test]
fn empty_rule_sets_are_rejected() {
    let mut rules = RuleSet::new();
    rules.add("x", vec![]);
    let err = Parser::new(rules, "x").unwrap_err();
    assert_eq!(err.what(), "EmptyRule");

    let mut rules = RuleSet::new();
    rules.add("x", vec![vec![]]);
    let err = Parser::new(rules, "x").unwrap_err();
    assert_eq!(err.what(), "EmptyRule");
}

#[test]
fn unknown_start_symbol_is_rejected() {
    let err = Parser::new(arithmetic_rules(), "expression").unwrap_err();
    assert_eq!(err.what(), "UnknownSymbol");
}

#[test]
fn table_construction_is_reproducible() {
    let first = arithmetic_parser();
    let second = arithmetic_parser();
    assert_eq!(first.table(), second.table());
    assert_eq!(first.start(), "root");
}

#[test]
fn every_state_has_at_most_one_action_per_symbol() {
    // The row is a map, so the property holds by construction; make sure the
    // built table is populated and state 0 can only start an expression.
    let parser = arithmetic_parser();
    assert!(parser.table().len() > 4);
    let row = &parser.table()[0];
    assert!(row.contains_key("number"));
    assert!(!row.contains_key("$"));
}
