use crate::{LexNode, EOI, UNKNOWN};
use std::fmt::{Display, Formatter};

impl LexNode {
    pub fn new(token: &str, matched: Vec<String>, index: usize, line: usize) -> Self {
        Self {
            token: token.to_string(),
            matched,
            index,
            line,
        }
    }

    /// Synthetic end-of-input token at the given position.
    pub fn eoi(index: usize, line: usize) -> Self {
        LexNode::new(EOI, vec![String::new()], index, line)
    }

    /// Wrap a raw line whose tokenization is deferred until parse time.
    pub fn raw_line(text: &str, line: usize) -> Self {
        LexNode::new(UNKNOWN, vec![text.to_string()], 0, line)
    }

    pub fn is(&self, token: &str) -> bool {
        self.token == token
    }

    /// The full matched text of the token.
    pub fn text(&self) -> &str {
        self.matched.first().map_or("", |s| s.as_str())
    }
}

impl Display for LexNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("")
            .field(&self.token)
            .field(&self.text())
            .field(&self.line)
            .field(&self.index)
            .finish()
    }
}
