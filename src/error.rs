use crate::{GrammarError, ParseError, SyntaxTree};
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new(what: &str, message: String) -> Self {
        Self {
            what: what.to_string(),
            message,
        }
    }

    /// The failure category, e.g. `EmptyRule` or `Conflict`.
    pub fn what(&self) -> &str {
        &self.what
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}-{}", self.what, self.message)
    }
}

impl ParseError {
    pub fn new(message: String, line: usize, index: usize) -> Self {
        Self {
            message,
            line,
            index,
        }
    }

    /// Position the error at the leftmost leaf beneath the given tree node.
    pub fn from_tree(message: String, tree: &SyntaxTree) -> Self {
        let (line, index) = tree.position().unwrap_or((0, 0));
        Self {
            message,
            line,
            index,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}:{}",
            self.message,
            self.line + 1,
            self.index + 1
        )
    }
}
