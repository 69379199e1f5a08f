//! dsl_parser is a toolkit to build parsers for small domain specific languages (DSL).
//!
//! # Overview
//! Writing a language front end by hand couples the tokenizer, the grammar and the
//! tree consumers into one custom program which is expensive to maintain.
//! This library splits the work into three reusable pieces.
//! The user provides an ordered list of named terminal patterns for the [Lexer],
//! a [RuleSet] of production rules for the [Parser], and optional [Visitor] dispatches
//! which fold the resulting [SyntaxTree] into a value.
//!
//! # Design
//!
//! The [Parser] compiles the rule set into an LR(0) action table, using FOLLOW sets
//! for reductions. The three quantifier suffixes `?`, `*` and `+` on rule elements are
//! folded directly into item closure and goto, so an optional or repeated element never
//! enlarges the grammar with helper rules.
//! Two couplings make the runtime suitable for ad-hoc language syntax:
//!
//! * The parser hands the lexer the set of terminals acceptable in the current state,
//!   so a source fragment which is ambiguous at character level is tokenized by
//!   grammatical context rather than by declaration order alone.
//! * Each shift action carries a `came_from` chain which lets the runtime count how
//!   many consecutive symbols a quantified element has consumed, giving reductions of
//!   quantified rules their correct, dynamic width.
//!
//! The [Lexer] can also split input into raw lines ([Lexer::split]) or into raw lines
//! with `indent`/`dedent` markers ([Lexer::split_offside]) for offside-rule languages,
//! deferring the actual tokenization until the parser can supply state context.
//!
//! # Example
//!
//! ```
//! use dsl_parser::{Lexer, Parser, RuleSet, Terminal, Visitor};
//!
//! let lexer = Lexer::new(vec![
//!     Terminal::new("number", "[0-9]+").unwrap(),
//!     Terminal::new("add", r"[+\-]").unwrap(),
//!     Terminal::new("mul", r"[*/]").unwrap(),
//!     Terminal::new("whitespace", r"\s+").unwrap(),
//! ]);
//!
//! let mut rules = RuleSet::new();
//! rules.add("root", vec![vec!["addExpr"]]);
//! rules.add(
//!     "addExpr",
//!     vec![vec!["addExpr", "add", "mulExpr"], vec!["mulExpr"]],
//! );
//! rules.add(
//!     "mulExpr",
//!     vec![vec!["mulExpr", "mul", "number"], vec!["number"]],
//! );
//!
//! let parser = Parser::new(rules, "root").unwrap();
//! let tree = parser.parse_text(&lexer, "3 + 2 * 1").unwrap();
//! assert_eq!(tree.kind(), "root");
//!
//! let mut visitor: Visitor<(), i64> = Visitor::new();
//! visitor.on("number", |_, _, tree| {
//!     tree.text().map_or(0, |t| t.parse().unwrap_or(0))
//! });
//! visitor.on_collapsed("addExpr", |visitor, state, tree| {
//!     let children = tree.children();
//!     let left = visitor.visit(state, &children[0]).unwrap_or(0);
//!     let right = visitor.visit(state, &children[2]).unwrap_or(0);
//!     match children[1].text() {
//!         Some("+") => left + right,
//!         _ => left - right,
//!     }
//! });
//! visitor.on_collapsed("mulExpr", |visitor, state, tree| {
//!     let children = tree.children();
//!     let left = visitor.visit(state, &children[0]).unwrap_or(0);
//!     let right = visitor.visit(state, &children[2]).unwrap_or(0);
//!     match children[1].text() {
//!         Some("*") => left * right,
//!         _ => left / right,
//!     }
//! });
//! assert_eq!(visitor.visit(&mut (), &tree), Some(5));
//! ```
mod ast_node;
mod error;
pub mod examples;
mod grammar;
mod item;
mod lex;
mod logger;
mod parsing;
mod position;
mod table;
mod terminal;
mod tokenization;
mod visitor;

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// Reserved token name marking end of input.
pub const EOI: &str = "$";
/// Reserved token name for a raw line whose tokenization is deferred.
pub const UNKNOWN: &str = "unknown";
/// Token name whose matches are silently discarded by the parser.
pub const WHITESPACE: &str = "whitespace";
/// Marker token emitted by [Lexer::split_offside] when a line opens a deeper block.
pub const INDENT: &str = "indent";
/// Marker token emitted by [Lexer::split_offside] when a line closes one indentation level.
pub const DEDENT: &str = "dedent";

#[derive(Debug, Clone)]
/// A named terminal pattern, the atomic unit of the [Lexer].
///
/// The regular expression is anchored internally and matched at incremental
/// positions of the input.
pub struct Terminal {
    name: String,
    regexp: Regex,
}

#[derive(Debug, Hash, Clone, PartialEq, Eq)]
/// A tokenized leaf of the parse tree.
///
/// `matched[0]` is the full matched text, followed by the values of the
/// pattern's capture groups. `index` is the 0-based column within the line
/// and `line` the 0-based line number.
pub struct LexNode {
    pub token: String,
    pub matched: Vec<String>,
    pub index: usize,
    pub line: usize,
}

#[derive(Clone, PartialEq, Eq)]
/// An internal node of the [SyntaxTree], produced by a reduction of a grammar rule.
pub struct ParseNode {
    pub node: String,
    pub children: Vec<SyntaxTree>,
}

#[derive(Clone, PartialEq, Eq)]
/// A node of the parsed tree: either a tokenized leaf or a reduced rule.
pub enum SyntaxTree {
    Leaf(LexNode),
    Node(ParseNode),
}

#[derive(Debug, Clone)]
/// An ordered collection of production rules keyed by non-terminal name.
///
/// Each rule is an ordered list of element names. An element is a non-terminal
/// defined in the set, the name of a declared [Terminal], or any other name,
/// which is promoted to a verbatim string-literal terminal. A trailing `?`,
/// `*` or `+` quantifies the element's base name as optional, zero-or-more or
/// one-or-more.
pub struct RuleSet {
    productions: IndexMap<Rc<str>, Vec<Rc<Vec<String>>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A production rule with a dot marking how much of it has been recognized.
struct DottedRule {
    key: Rc<str>,
    children: Rc<Vec<String>>,
    dot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single entry of the action table.
pub enum Action {
    /// Consume the symbol and move to state `next`. `came_from` maps each item
    /// of the target state to the item of the source state it advanced from,
    /// when it is a direct successor rather than a closure expansion.
    Shift {
        next: usize,
        came_from: Vec<Option<usize>>,
    },
    /// Pop the symbols recognized under item `rule` and emit a `key` node.
    Reduce { key: String, rule: usize },
    /// The start symbol has been fully recognized.
    Accept { key: String },
}

/// A pattern matching tokenizer over an ordered list of [Terminal]s.
///
/// Earlier terminals win when several match at the same position.
pub struct Lexer {
    terminals: Vec<Terminal>,
    log: OnceCell<Log<&'static str>>,
}

/// A table driven LR parser for a [RuleSet].
///
/// The action table is built once at construction; a parser is immutable
/// afterwards and can be reused across any number of [parse](Parser::parse) calls.
#[derive(Debug)]
pub struct Parser {
    start: String,
    literals: Vec<Terminal>,
    table: Vec<IndexMap<String, Action>>,
    log: OnceCell<Log<&'static str>>,
}

type VisitFn<TState, TValue> =
    Rc<dyn Fn(&Visitor<TState, TValue>, &mut TState, &SyntaxTree) -> Option<TValue>>;

/// A tree walker dispatching on node type name.
///
/// For a node without a registered dispatch the visitor descends into the
/// children and returns the result of the last one.
pub struct Visitor<TState, TValue> {
    handlers: HashMap<String, VisitFn<TState, TValue>>,
}

#[derive(Debug)]
/// An error returned when a [RuleSet] fails validation or table construction.
pub struct GrammarError {
    what: String,
    message: String,
}

#[derive(Debug, Clone)]
/// An error raised while tokenizing or parsing input.
///
/// `line` and `index` are 0-based; the [Display](std::fmt::Display) form is 1-based.
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// The 1-based line and column information at a source point.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// A enum structure to assign multiple level debugging to the lexer and the parser.
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
