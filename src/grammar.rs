use crate::{GrammarError, RuleSet, EOI};
use indexmap::{IndexMap, IndexSet};
use std::fmt::{Display, Formatter, Write};
use std::rc::Rc;

/// Strip a trailing `?`, `*` or `+` quantifier from an element name.
pub(crate) fn base(element: &str) -> &str {
    element
        .strip_suffix(|c| matches!(c, '?' | '*' | '+'))
        .unwrap_or(element)
}

/// Whether the element may match zero symbols (`?` or `*`).
pub(crate) fn can_omit(element: &str) -> bool {
    element.ends_with('?') || element.ends_with('*')
}

/// Whether the element may match consecutive symbols (`*` or `+`).
pub(crate) fn can_repeat(element: &str) -> bool {
    element.ends_with('*') || element.ends_with('+')
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            productions: IndexMap::new(),
        }
    }

    /// Add alternative rules for a non-terminal.
    /// Repeated calls for the same key extend the existing alternatives.
    pub fn add(&mut self, key: &str, alternatives: Vec<Vec<&str>>) {
        let rules: Vec<Rc<Vec<String>>> = alternatives
            .into_iter()
            .map(|rule| Rc::new(rule.into_iter().map(String::from).collect()))
            .collect();
        match self.productions.get_mut(key) {
            Some(existing) => existing.extend(rules),
            None => {
                self.productions.insert(Rc::from(key), rules);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.productions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.productions.keys().map(|key| key.as_ref())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Vec<Rc<Vec<String>>>)> {
        self.productions.iter()
    }

    pub(crate) fn entry_of(&self, key: &str) -> Option<(&Rc<str>, &Vec<Rc<Vec<String>>>)> {
        self.productions
            .get_full(key)
            .map(|(_, stored_key, rules)| (stored_key, rules))
    }

    /// Every non-terminal must carry at least one rule, every rule at least
    /// one element, and no element may be empty or the reserved `$`.
    pub(crate) fn validate(&self) -> Result<(), GrammarError> {
        for (key, alternatives) in &self.productions {
            if alternatives.is_empty() {
                return Err(GrammarError::new(
                    "EmptyRule",
                    format!("Non terminal '{}' has no production rule.", key),
                ));
            }
            for rule in alternatives {
                if rule.is_empty() {
                    return Err(GrammarError::new(
                        "EmptyRule",
                        format!("A production rule of '{}' has no elements.", key),
                    ));
                }
                for element in rule.iter() {
                    let b = base(element);
                    if b.is_empty() {
                        return Err(GrammarError::new(
                            "EmptyRule",
                            format!("A production rule of '{}' contains an empty element.", key),
                        ));
                    }
                    if b == EOI {
                        return Err(GrammarError::new(
                            "EmptyRule",
                            format!(
                                "A production rule of '{}' uses the reserved element '{}'.",
                                key, EOI
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::new()
    }
}

impl Display for RuleSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (key, alternatives) in &self.productions {
            let mut rendered = String::new();
            for (index, rule) in alternatives.iter().enumerate() {
                if index > 0 {
                    rendered.push_str(" | ");
                }
                write!(rendered, "{}", rule.join(" "))?;
            }
            writeln!(f, "{:>4}{} : {} ;", "", key, rendered)?;
        }
        Ok(())
    }
}

/// FIRST sets over the quantified rules.
///
/// A terminal's FIRST set is itself. A non-terminal accumulates the FIRST
/// sets of the leading elements of each rule, scanning past omissible ones.
pub(crate) fn first_sets(rules: &RuleSet) -> IndexMap<String, IndexSet<String>> {
    let mut first: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for key in rules.keys() {
        first.insert(key.to_string(), IndexSet::new());
    }
    for (_, alternatives) in rules.iter() {
        for rule in alternatives {
            for element in rule.iter() {
                let b = base(element);
                if !rules.contains(b) && !first.contains_key(b) {
                    let mut set = IndexSet::new();
                    set.insert(b.to_string());
                    first.insert(b.to_string(), set);
                }
            }
        }
    }
    loop {
        let mut changed = false;
        for (key, alternatives) in rules.iter() {
            for rule in alternatives {
                for element in rule.iter() {
                    let additions: Vec<String> = first
                        .get(base(element))
                        .map_or_else(Vec::new, |set| set.iter().cloned().collect());
                    if let Some(target) = first.get_mut(key.as_ref()) {
                        for symbol in additions {
                            changed |= target.insert(symbol);
                        }
                    }
                    if !can_omit(element) {
                        break;
                    }
                }
            }
        }
        if !changed {
            break first;
        }
    }
}

/// FOLLOW sets over the quantified rules. The start symbol is followed by `$`.
///
/// A repeatable element may be followed by another instance of itself, then
/// by the FIRST sets of the elements after it, scanning past omissible ones;
/// when the scan falls off the rule, by the FOLLOW set of the rule's key.
pub(crate) fn follow_sets(
    rules: &RuleSet,
    start: &str,
    first: &IndexMap<String, IndexSet<String>>,
) -> IndexMap<String, IndexSet<String>> {
    let mut follow: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for key in rules.keys() {
        follow.insert(key.to_string(), IndexSet::new());
    }
    if let Some(set) = follow.get_mut(start) {
        set.insert(EOI.to_string());
    }
    loop {
        let mut changed = false;
        for (key, alternatives) in rules.iter() {
            for rule in alternatives {
                for (at, element) in rule.iter().enumerate() {
                    let b = base(element);
                    if !rules.contains(b) {
                        continue;
                    }
                    let mut additions: IndexSet<String> = IndexSet::new();
                    if can_repeat(element) {
                        if let Some(set) = first.get(b) {
                            additions.extend(set.iter().cloned());
                        }
                    }
                    let mut fell_through = true;
                    for next in rule.iter().skip(at + 1) {
                        if let Some(set) = first.get(base(next)) {
                            additions.extend(set.iter().cloned());
                        }
                        if !can_omit(next) {
                            fell_through = false;
                            break;
                        }
                    }
                    if fell_through {
                        if let Some(set) = follow.get(key.as_ref()) {
                            additions.extend(set.iter().cloned());
                        }
                    }
                    if let Some(target) = follow.get_mut(b) {
                        for symbol in additions {
                            changed |= target.insert(symbol);
                        }
                    }
                }
            }
        }
        if !changed {
            break follow;
        }
    }
}
