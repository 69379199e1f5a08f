use std::fmt::{Display, Formatter};

use crate::{LexNode, Position};

impl Position {
    /// Create a new Position object based on the 1-based line and column number.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<&LexNode> for Position {
    fn from(token: &LexNode) -> Self {
        Position::new(token.line + 1, token.index + 1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}
