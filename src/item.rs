use crate::grammar::{base, can_omit, can_repeat};
use crate::{DottedRule, GrammarError, RuleSet};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

impl DottedRule {
    pub(crate) fn new(key: Rc<str>, children: Rc<Vec<String>>, dot: usize) -> Self {
        Self { key, children, dot }
    }

    /// The element at the dot, if the dot is not at the end.
    pub(crate) fn symbol(&self) -> Option<&str> {
        self.children.get(self.dot).map(|element| element.as_str())
    }

    pub(crate) fn at_end(&self) -> bool {
        self.dot >= self.children.len()
    }

    fn moved(&self, steps: usize) -> Self {
        DottedRule::new(self.key.clone(), self.children.clone(), self.dot + steps)
    }

    pub(crate) fn describe(&self) -> String {
        format!("{} -> {}", self.key, self.children.join(" "))
    }
}

/// The item itself plus one item per consecutive omissible element after the
/// dot, with the dot advanced past each. Folding `?`/`*` nullability into the
/// item sets this way removes the need for any separate epsilon handling.
pub(crate) fn skip_omit(item: &DottedRule) -> Vec<DottedRule> {
    let mut chain = vec![item.clone()];
    let mut dot = item.dot;
    while item.children.get(dot).map_or(false, |el| can_omit(el)) {
        dot += 1;
        chain.push(DottedRule::new(item.key.clone(), item.children.clone(), dot));
    }
    chain
}

/// Breadth-first closure of the seed items.
///
/// Every item with a non-terminal at the dot pulls in that non-terminal's
/// rules at dot zero, expanded through [skip_omit]. The resulting order
/// defines the item indices referenced by reduce actions.
pub(crate) fn closure(seed: Vec<DottedRule>, rules: &RuleSet) -> Vec<DottedRule> {
    let mut items: Vec<DottedRule> = Vec::new();
    let mut known: HashSet<DottedRule> = HashSet::new();
    for item in seed {
        for expanded in skip_omit(&item) {
            if known.insert(expanded.clone()) {
                items.push(expanded);
            }
        }
    }
    let mut cursor = 0;
    while cursor < items.len() {
        let at_dot = items[cursor].symbol().map(|symbol| base(symbol).to_string());
        cursor += 1;
        if let Some(symbol) = at_dot {
            if let Some((key, alternatives)) = rules.entry_of(&symbol) {
                let key = key.clone();
                for children in alternatives.clone() {
                    let item = DottedRule::new(key.clone(), children, 0);
                    for expanded in skip_omit(&item) {
                        if known.insert(expanded.clone()) {
                            items.push(expanded);
                        }
                    }
                }
            }
        }
    }
    items
}

/// The transition of an item set over a grammar element.
///
/// Each matching item contributes the closure of its dot-advanced form and,
/// when the element is repeatable, the closure of itself with the dot held in
/// place, in that order. The returned `came_from` vector maps each produced
/// item to the index of its source item, but only when the produced item is a
/// direct successor (on the [skip_omit] chain of the moved item) rather than
/// a closure expansion. The runtime uses that chain to count how many
/// consecutive symbols a rule has consumed.
pub(crate) fn goto(
    items: &[DottedRule],
    element: &str,
    rules: &RuleSet,
) -> Result<(Vec<DottedRule>, Vec<Option<usize>>), GrammarError> {
    let mut produced: Vec<DottedRule> = Vec::new();
    let mut came_from: Vec<Option<usize>> = Vec::new();
    let mut positions: HashMap<DottedRule, usize> = HashMap::new();
    for (source, item) in items.iter().enumerate() {
        let matched = match item.symbol() {
            Some(symbol) if base(symbol) == element => symbol.to_string(),
            _ => continue,
        };
        // Advance first, then stay put; the order fixes the item indices of
        // the produced state.
        let steps: &[usize] = if can_repeat(&matched) { &[1, 0] } else { &[1] };
        for &step in steps {
            let moved = item.moved(step);
            let chain: HashSet<DottedRule> = skip_omit(&moved).into_iter().collect();
            for next in closure(vec![moved], rules) {
                let direct = chain.contains(&next);
                match positions.get(&next) {
                    Some(&at) => {
                        if direct {
                            match came_from[at] {
                                Some(previous) if previous != source => {
                                    return Err(GrammarError::new(
                                        "Conflict",
                                        format!(
                                            "reduce/reduce conflict: item {} is a successor of two items of the same state",
                                            next.describe()
                                        ),
                                    ));
                                }
                                _ => came_from[at] = Some(source),
                            }
                        }
                    }
                    None => {
                        positions.insert(next.clone(), produced.len());
                        came_from.push(if direct { Some(source) } else { None });
                        produced.push(next);
                    }
                }
            }
        }
    }
    Ok((produced, came_from))
}
