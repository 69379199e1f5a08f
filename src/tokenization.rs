use crate::{Action, Lexer, LexNode, Log, ParseError, Terminal};
use crate::{DEDENT, EOI, INDENT, WHITESPACE};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use regex::Regex;

impl Lexer {
    /// Create a new [Lexer] from an ordered list of terminals.
    /// Earlier terminals win when several match at the same position.
    pub fn new(terminals: Vec<Terminal>) -> Self {
        Self {
            terminals,
            log: OnceCell::new(),
        }
    }

    /// Set a log label to debug the tokenization.
    /// Based on the level of the [Log], the lexer will report match results.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub(crate) fn declares(&self, name: &str) -> bool {
        self.terminals.iter().any(|terminal| terminal.name() == name)
    }

    /// Scan the terminals in declaration order and return the first one
    /// matching at `index`.
    ///
    /// With `active` (an action table row), a terminal is attempted only if
    /// its name is a key of the row or it is `whitespace`, so the grammar
    /// decides which tokens may appear here. At end of input a synthetic `$`
    /// token is returned.
    pub fn next(
        &self,
        input: &str,
        index: usize,
        line: usize,
        active: Option<&IndexMap<String, Action>>,
    ) -> Result<LexNode, ParseError> {
        let result = scan_terminals(self.terminals.iter(), input, index, line, active);
        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            match &result {
                Ok(token) => {
                    if log.order() >= Log::Success(()).order() {
                        println!(
                            "[{}; LexemeSuccess]: token: {} at {}",
                            log,
                            token,
                            crate::Position::from(token)
                        );
                    }
                }
                Err(err) => {
                    if log.order() >= Log::Result(()).order() {
                        println!(
                            "[{}; LexemeError]: at {}",
                            log,
                            crate::Position::new(err.line + 1, err.index + 1)
                        );
                    }
                }
            }
        }
        result
    }

    /// Scan this lexer's terminals followed by `extra` ones; the parse
    /// runtime appends the string-literal terminals promoted from the
    /// grammar.
    pub(crate) fn scan_with(
        &self,
        extra: &[&Terminal],
        input: &str,
        index: usize,
        line: usize,
        active: Option<&IndexMap<String, Action>>,
    ) -> Result<LexNode, ParseError> {
        scan_terminals(
            self.terminals.iter().chain(extra.iter().copied()),
            input,
            index,
            line,
            active,
        )
    }

    /// Tokenize the whole input and return the stream, terminated by `$`.
    pub fn lex(&self, input: &str) -> Result<Vec<LexNode>, ParseError> {
        let mut stream: Vec<LexNode> = Vec::new();
        let mut index = 0;
        loop {
            let token = self.next(input, index, 0, None)?;
            index += token.text().len();
            let done = token.is(EOI);
            stream.push(token);
            if done {
                break Ok(stream);
            }
        }
    }

    /// Split the input into raw line tokens, deferring tokenization until the
    /// parser can supply its state context. Lines matching `comment` are
    /// dropped. A `$` token is appended at the final position.
    pub fn split(&self, input: &str, comment: Option<&Regex>) -> Vec<LexNode> {
        let mut tokens: Vec<LexNode> = Vec::new();
        let mut last = (0, 0);
        for (line, text) in split_lines(input) {
            last = (line, text.len());
            if comment.map_or(false, |c| c.is_match(text)) {
                continue;
            }
            tokens.push(LexNode::raw_line(text, line));
        }
        tokens.push(LexNode::eoi(last.1, last.0));
        tokens
    }

    /// Split the input into raw line tokens with offside markers.
    ///
    /// A stack of indentation columns starts at `[0]`. A line indented deeper
    /// than the top of the stack emits `indent`; a shallower line pops the
    /// stack, emitting one `dedent` per level, and must land exactly on an
    /// open level. Blank lines and lines matching `comment` emit nothing. At
    /// end of input every open level is closed with `dedent` before `$`.
    pub fn split_offside(
        &self,
        input: &str,
        comment: Option<&Regex>,
    ) -> Result<Vec<LexNode>, ParseError> {
        let mut tokens: Vec<LexNode> = Vec::new();
        let mut levels: Vec<usize> = vec![0];
        let mut last = (0, 0);
        for (line, text) in split_lines(input) {
            last = (line, text.len());
            if comment.map_or(false, |c| c.is_match(text)) {
                continue;
            }
            let column = match text.find(|c: char| !c.is_whitespace()) {
                Some(column) => column,
                None => continue,
            };
            let top = levels.last().copied().unwrap_or(0);
            if column > top {
                levels.push(column);
                tokens.push(LexNode::new(INDENT, vec![String::new()], column, line));
            } else if column < top {
                while levels.last().map_or(false, |level| column < *level) {
                    levels.pop();
                    tokens.push(LexNode::new(DEDENT, vec![String::new()], column, line));
                }
                if levels.last().map_or(true, |level| *level != column) {
                    return Err(ParseError::new(
                        format!("Indentation column {} matches no open block", column + 1),
                        line,
                        column,
                    ));
                }
            }
            tokens.push(LexNode::raw_line(text, line));
        }
        while levels.len() > 1 {
            levels.pop();
            tokens.push(LexNode::new(DEDENT, vec![String::new()], 0, last.0));
        }
        tokens.push(LexNode::eoi(last.1, last.0));
        Ok(tokens)
    }
}

fn split_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
}

pub(crate) fn scan_terminals<'t, I: Iterator<Item = &'t Terminal>>(
    terminals: I,
    input: &str,
    index: usize,
    line: usize,
    active: Option<&IndexMap<String, Action>>,
) -> Result<LexNode, ParseError> {
    if index >= input.len() {
        return Ok(LexNode::eoi(index, line));
    }
    for terminal in terminals {
        if let Some(row) = active {
            // Whitespace stays eligible so noise between tokens can be
            // discarded regardless of the grammar state.
            if !row.contains_key(terminal.name()) && terminal.name() != WHITESPACE {
                continue;
            }
        }
        if let Some(matched) = terminal.try_match(input, index) {
            return Ok(LexNode::new(terminal.name(), matched, index, line));
        }
    }
    Err(ParseError::new(
        "No terminal matches the input".to_string(),
        line,
        index,
    ))
}
