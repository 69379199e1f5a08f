use crate::grammar::base;
use crate::table;
use crate::{
    Action, GrammarError, Lexer, LexNode, Log, ParseError, ParseNode, Parser, RuleSet, SyntaxTree,
    Terminal, EOI, UNKNOWN, WHITESPACE,
};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use std::collections::HashMap;

impl Parser {
    /// Build a parser for the rule set with the given start symbol.
    ///
    /// Construction compiles the grammar into an action table and fails with
    /// a [GrammarError] on empty rules, unknown start symbols and LR
    /// conflicts.
    pub fn new(rules: RuleSet, start: &str) -> Result<Self, GrammarError> {
        rules.validate()?;
        let table = table::build(&rules, start)?;
        Parser::assemble(&rules, start, table)
    }

    /// Build a parser whose action table is persisted under a version tag.
    ///
    /// An existing `dsl-parser_v<version>.json` in the working directory is
    /// loaded instead of rebuilding the table; otherwise the freshly built
    /// table is written there for the next construction.
    pub fn with_version(rules: RuleSet, start: &str, version: &str) -> Result<Self, GrammarError> {
        rules.validate()?;
        match table::load(version)? {
            Some(stored) => Parser::assemble(&rules, start, stored),
            None => {
                let built = table::build(&rules, start)?;
                table::store(version, &built)?;
                Parser::assemble(&rules, start, built)
            }
        }
    }

    fn assemble(
        rules: &RuleSet,
        start: &str,
        table: Vec<IndexMap<String, Action>>,
    ) -> Result<Self, GrammarError> {
        let literals = collect_literals(rules)?;
        Ok(Self {
            start: start.to_string(),
            literals,
            table,
            log: OnceCell::new(),
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    /// The compiled action table: one symbol-to-action row per state.
    pub fn table(&self) -> &[IndexMap<String, Action>] {
        &self.table
    }

    /// Set a log label to debug the parser.
    /// Based on the level of the [Log], the parser will report its moves.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Split the input into raw lines and parse them.
    pub fn parse_text(&self, lexer: &Lexer, input: &str) -> Result<SyntaxTree, ParseError> {
        self.parse(lexer, &lexer.split(input, None))
    }

    /// Drive the action table over the token stream.
    ///
    /// `unknown` tokens are tokenized on demand, passing the current state's
    /// action row to the lexer so that only grammatically acceptable
    /// terminals are attempted. `whitespace` tokens are discarded. The
    /// stream must be terminated by a single `$` token.
    pub fn parse(&self, lexer: &Lexer, tokens: &[LexNode]) -> Result<SyntaxTree, ParseError> {
        // Promoted literals shadowed by a declared terminal of this lexer
        // are dropped; the declaration keeps its meaning.
        let literals: Vec<&Terminal> = self
            .literals
            .iter()
            .filter(|literal| !lexer.declares(literal.name()))
            .collect();

        let mut symbol_stack: Vec<SyntaxTree> = Vec::new();
        let mut state_stack: Vec<usize> = vec![0];
        let mut read_stack: Vec<HashMap<usize, usize>> = vec![HashMap::new()];

        let mut cursor = 0;
        let mut column = 0;
        let mut pending: Option<LexNode> = None;

        loop {
            let state = top(&state_stack);
            let current = match &pending {
                Some(token) => token.clone(),
                None => match tokens.get(cursor) {
                    Some(token) => token.clone(),
                    None => {
                        return Err(ParseError::new(
                            "Token stream ended without an end-of-input marker".to_string(),
                            0,
                            0,
                        ));
                    }
                },
            };

            if current.is(UNKNOWN) {
                let row = self.row(state, &current)?;
                let token =
                    lexer.scan_with(&literals, current.text(), column, current.line, Some(row))?;
                if token.is(EOI) {
                    // The line is exhausted; move to the next stream token.
                    cursor += 1;
                    column = 0;
                    pending = None;
                } else {
                    column += token.text().len();
                    pending = Some(token);
                }
                continue;
            }

            if current.is(WHITESPACE) {
                if pending.is_some() {
                    pending = None;
                } else {
                    cursor += 1;
                }
                continue;
            }

            let action = match self.row(state, &current)?.get(&current.token) {
                Some(action) => action.clone(),
                None => {
                    self.log_failure(&current);
                    return Err(ParseError::new(
                        format!("Unexpected {} '{}'", current.token, current.text()),
                        current.line,
                        current.index,
                    ));
                }
            };

            match action {
                Action::Accept { .. } => {
                    debug_assert_eq!(symbol_stack.len(), 1);
                    return match symbol_stack.pop() {
                        Some(root) => Ok(root),
                        None => Err(ParseError::new(
                            "Accepted an empty symbol stack".to_string(),
                            current.line,
                            current.index,
                        )),
                    };
                }
                Action::Shift { next, came_from } => {
                    self.log_shift(&current, next);
                    symbol_stack.push(SyntaxTree::Leaf(current));
                    if pending.is_some() {
                        pending = None;
                    } else {
                        cursor += 1;
                    }
                    push_state(&mut state_stack, &mut read_stack, next, &came_from);
                }
                Action::Reduce { key, rule } => {
                    // The read counter accumulated under this item is the
                    // number of stack symbols the rule consumed; quantified
                    // elements make it differ per reduction.
                    let width = read_stack
                        .last()
                        .and_then(|entry| entry.get(&rule))
                        .copied()
                        .unwrap_or(0);
                    let keep = match symbol_stack.len().checked_sub(width) {
                        Some(keep) => keep,
                        None => {
                            return Err(ParseError::new(
                                format!("Action table is inconsistent for rule '{}'", key),
                                current.line,
                                current.index,
                            ));
                        }
                    };
                    let children = symbol_stack.split_off(keep);
                    state_stack.truncate(state_stack.len() - width);
                    read_stack.truncate(read_stack.len() - width);
                    let parent = SyntaxTree::Node(ParseNode::new(&key, children));
                    self.log_reduce(&parent, width);

                    let next_state = top(&state_stack);
                    match self.row(next_state, &current)?.get(key.as_str()) {
                        Some(Action::Shift { next, came_from }) => {
                            let (next, came_from) = (*next, came_from.clone());
                            symbol_stack.push(parent);
                            push_state(&mut state_stack, &mut read_stack, next, &came_from);
                        }
                        _ => {
                            return Err(ParseError::from_tree(
                                format!("No transition for reduced symbol '{}'", key),
                                &parent,
                            ));
                        }
                    }
                    // The input token is not consumed; it is dispatched again
                    // from the new state.
                }
            }
        }
    }

    fn row(&self, state: usize, at: &LexNode) -> Result<&IndexMap<String, Action>, ParseError> {
        match self.table.get(state) {
            Some(row) => Ok(row),
            None => Err(ParseError::new(
                format!("State {} is missing from the action table", state),
                at.line,
                at.index,
            )),
        }
    }

    fn log_shift(&self, _token: &LexNode, _next: usize) {
        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Verbose(()).order() {
                println!(
                    "[{}; Shift]: {} '{}' -> state {} at {}",
                    log,
                    _token.token,
                    _token.text(),
                    _next,
                    crate::Position::from(_token)
                );
            }
        }
    }

    fn log_reduce(&self, _parent: &SyntaxTree, _width: usize) {
        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Verbose(()).order() {
                println!(
                    "[{}; Reduce]: {} from {} symbols",
                    log,
                    _parent.kind(),
                    _width
                );
            }
        }
    }

    fn log_failure(&self, _token: &LexNode) {
        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Default(()).order() {
                println!(
                    "[{}; ParseError]: no action for {} at {}",
                    log,
                    _token.token,
                    crate::Position::from(_token)
                );
            }
        }
    }
}

fn top(stack: &[usize]) -> usize {
    stack.last().copied().unwrap_or(0)
}

/// Push the target state and the read counters its shift carries: every item
/// with a defined predecessor continues that predecessor's count.
fn push_state(
    state_stack: &mut Vec<usize>,
    read_stack: &mut Vec<HashMap<usize, usize>>,
    next: usize,
    came_from: &[Option<usize>],
) {
    let mut entry: HashMap<usize, usize> = HashMap::new();
    for (item, source) in came_from.iter().enumerate() {
        if let Some(source) = source {
            let count = read_stack
                .last()
                .and_then(|previous| previous.get(source))
                .copied()
                .unwrap_or(0);
            entry.insert(item, count + 1);
        }
    }
    state_stack.push(next);
    read_stack.push(entry);
}

/// One string-literal terminal per rule element that is neither a defined
/// non-terminal nor the reserved end-of-input name.
fn collect_literals(rules: &RuleSet) -> Result<Vec<Terminal>, GrammarError> {
    let mut literals: Vec<Terminal> = Vec::new();
    for (_, alternatives) in rules.iter() {
        for rule in alternatives {
            for element in rule.iter() {
                let b = base(element);
                if rules.contains(b) || b == EOI {
                    continue;
                }
                if literals.iter().any(|literal| literal.name() == b) {
                    continue;
                }
                let literal =
                    Terminal::literal(b).map_err(|err| GrammarError::new("Terminal", err))?;
                literals.push(literal);
            }
        }
    }
    Ok(literals)
}
