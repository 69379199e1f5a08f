use crate::{Terminal, EOI, UNKNOWN};
use regex::Regex;
use std::fmt::{Display, Formatter};

impl Terminal {
    /// Create a new [Terminal] from a name and a regular expression pattern.
    /// ## Arguments
    /// `name` - Token name to be returned for the lexical data
    /// `pattern` - Associated regular expression pattern to be matched
    ///
    /// The pattern is anchored internally; it is matched only at the position
    /// the lexer is currently scanning. Given regex expression should not
    /// match an empty string.
    pub fn new(name: &str, pattern: &str) -> Result<Self, String> {
        if name == EOI || name == UNKNOWN {
            return Err(format!("Terminal name '{}' is reserved.", name));
        }
        Terminal::anchored(name, pattern)
    }

    /// Create a terminal matching the given text verbatim.
    ///
    /// Grammar elements which are neither non-terminals nor declared
    /// terminals are promoted to this form.
    pub(crate) fn literal(text: &str) -> Result<Self, String> {
        Terminal::anchored(text, &regex::escape(text))
    }

    fn anchored(name: &str, pattern: &str) -> Result<Self, String> {
        let regexp = Regex::new(&format!("^(?:{})", pattern))
            .map_err(|err| format!("Pattern should be a valid regex expression.{:?}", err))?;
        if regexp.is_match("") {
            return Err(format!(
                "Regex expression '{}' should not be nullable.",
                pattern
            ));
        }
        Ok(Self {
            name: name.to_string(),
            regexp,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Match the pattern at `index` and return the full match followed by the
    /// capture group values. Unmatched groups yield an empty string.
    pub(crate) fn try_match(&self, input: &str, index: usize) -> Option<Vec<String>> {
        let captures = self.regexp.captures(&input[index..])?;
        let whole = captures.get(0)?;
        debug_assert_eq!(whole.start(), 0);
        if whole.end() == whole.start() {
            return None;
        }
        Some(
            captures
                .iter()
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} : /{}/",
            self.name,
            self.regexp.as_str().replace('/', "\\/")
        )
    }
}
