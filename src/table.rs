use crate::grammar::{base, first_sets, follow_sets};
use crate::item::{closure, goto};
use crate::{Action, DottedRule, GrammarError, RuleSet, EOI};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Build the action table for the rule set.
///
/// The canonical collection is seeded with the closure of a synthetic
/// one-element rule whose single child is the start symbol. States are
/// discovered breadth-first; items are interned so states are deduplicated
/// by their item sets rather than by deep comparison.
///
/// The caller is expected to have validated the rule set.
pub(crate) fn build(
    rules: &RuleSet,
    start: &str,
) -> Result<Vec<IndexMap<String, Action>>, GrammarError> {
    let start_key = match rules.entry_of(start) {
        Some((key, _)) => key.clone(),
        None => {
            return Err(GrammarError::new(
                "UnknownSymbol",
                format!("Start symbol '{}' is not defined in the rule set.", start),
            ));
        }
    };
    let first = first_sets(rules);
    let follow = follow_sets(rules, start, &first);

    let synthetic: Rc<Vec<String>> = Rc::new(vec![start.to_string()]);
    let seed = DottedRule::new(start_key, synthetic.clone(), 0);

    let mut interner = StateInterner::default();
    interner.intern(closure(vec![seed], rules));

    let mut table: Vec<IndexMap<String, Action>> = Vec::new();
    let mut state = 0;
    while state < interner.states.len() {
        let items = interner.states[state].clone();
        let mut row: IndexMap<String, Action> = IndexMap::new();
        for (index, item) in items.iter().enumerate() {
            if item.at_end() {
                if Rc::ptr_eq(&item.children, &synthetic) {
                    install(&mut row, EOI, Action::Accept { key: start.to_string() }, item)?;
                } else if let Some(set) = follow.get(item.key.as_ref()) {
                    for symbol in set {
                        install(
                            &mut row,
                            symbol,
                            Action::Reduce {
                                key: item.key.to_string(),
                                rule: index,
                            },
                            item,
                        )?;
                    }
                }
            } else {
                let element = match item.symbol() {
                    Some(symbol) => base(symbol).to_string(),
                    None => continue,
                };
                match row.get(&element) {
                    // An earlier item with the same element already installed
                    // the transition; goto covered every matching item.
                    Some(Action::Shift { .. }) => {}
                    Some(Action::Reduce { rule, .. }) => {
                        return Err(GrammarError::new(
                            "Conflict",
                            format!(
                                "shift/reduce conflict on '{}' for rule {}",
                                element,
                                items[*rule].describe()
                            ),
                        ));
                    }
                    Some(Action::Accept { .. }) => {
                        return Err(GrammarError::new(
                            "Conflict",
                            format!(
                                "accept/shift conflict on '{}' for rule {}",
                                element,
                                item.describe()
                            ),
                        ));
                    }
                    None => {
                        let (produced, came_from) = goto(&items, &element, rules)?;
                        let (next, came_from) = interner.resolve(produced, came_from);
                        row.insert(element, Action::Shift { next, came_from });
                    }
                }
            }
        }
        table.push(row);
        state += 1;
    }
    Ok(table)
}

fn kind_of(action: &Action) -> &'static str {
    match action {
        Action::Shift { .. } => "shift",
        Action::Reduce { .. } => "reduce",
        Action::Accept { .. } => "accept",
    }
}

fn install(
    row: &mut IndexMap<String, Action>,
    symbol: &str,
    action: Action,
    item: &DottedRule,
) -> Result<(), GrammarError> {
    if let Some(existing) = row.get(symbol) {
        return Err(GrammarError::new(
            "Conflict",
            format!(
                "{}/{} conflict on '{}' for rule {}",
                kind_of(existing),
                kind_of(&action),
                symbol,
                item.describe()
            ),
        ));
    }
    row.insert(symbol.to_string(), action);
    Ok(())
}

/// Hash-consing store for the canonical collection. Items are interned to
/// numeric ids and a state is keyed on its sorted id set, so discovering an
/// already known state costs a hash lookup instead of a deep comparison.
#[derive(Default)]
struct StateInterner {
    states: Vec<Vec<DottedRule>>,
    item_ids: HashMap<DottedRule, usize>,
    by_key: HashMap<Vec<usize>, usize>,
}

impl StateInterner {
    fn item_id(&mut self, item: &DottedRule) -> usize {
        match self.item_ids.get(item) {
            Some(id) => *id,
            None => {
                let id = self.item_ids.len();
                self.item_ids.insert(item.clone(), id);
                id
            }
        }
    }

    fn key_of(&mut self, items: &[DottedRule]) -> Vec<usize> {
        let mut ids: Vec<usize> = items.iter().map(|item| self.item_id(item)).collect();
        ids.sort_unstable();
        ids
    }

    fn intern(&mut self, items: Vec<DottedRule>) -> usize {
        let key = self.key_of(&items);
        match self.by_key.get(&key) {
            Some(&at) => at,
            None => {
                let at = self.states.len();
                self.by_key.insert(key, at);
                self.states.push(items);
                at
            }
        }
    }

    /// Intern a goto result. When the state was discovered earlier, possibly
    /// with a different item order, `came_from` is remapped onto the stored
    /// order so reduce indices stay consistent.
    fn resolve(
        &mut self,
        produced: Vec<DottedRule>,
        came_from: Vec<Option<usize>>,
    ) -> (usize, Vec<Option<usize>>) {
        let key = self.key_of(&produced);
        match self.by_key.get(&key) {
            Some(&at) => {
                let stored = &self.states[at];
                let mut remapped = vec![None; stored.len()];
                for (index, item) in produced.iter().enumerate() {
                    if let Some(position) = stored.iter().position(|existing| existing == item) {
                        remapped[position] = came_from[index];
                    }
                }
                (at, remapped)
            }
            None => {
                let at = self.states.len();
                self.by_key.insert(key, at);
                self.states.push(produced);
                (at, came_from)
            }
        }
    }
}

pub(crate) fn table_path(version: &str) -> String {
    format!("dsl-parser_v{}.json", version)
}

/// Load a persisted action table for the version tag, if one exists in the
/// working directory.
pub(crate) fn load(version: &str) -> Result<Option<Vec<IndexMap<String, Action>>>, GrammarError> {
    let path = table_path(version);
    if !Path::new(&path).exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(&path).map_err(|err| {
        GrammarError::new(
            "Persistence",
            format!("Failed to read action table '{}': {}", path, err),
        )
    })?;
    let table = serde_json::from_str(&data).map_err(|err| {
        GrammarError::new(
            "Persistence",
            format!("Action table '{}' is not a valid serialization: {}", path, err),
        )
    })?;
    Ok(Some(table))
}

/// Persist the action table for the version tag. The file is staged and
/// renamed so a concurrent reader never observes a partial write.
pub(crate) fn store(
    version: &str,
    table: &Vec<IndexMap<String, Action>>,
) -> Result<(), GrammarError> {
    let path = table_path(version);
    let data = serde_json::to_string(table).map_err(|err| {
        GrammarError::new(
            "Persistence",
            format!("Failed to serialize the action table: {}", err),
        )
    })?;
    let staged = format!("{}.tmp", path);
    fs::write(&staged, data).map_err(|err| {
        GrammarError::new(
            "Persistence",
            format!("Failed to write action table '{}': {}", staged, err),
        )
    })?;
    fs::rename(&staged, &path).map_err(|err| {
        GrammarError::new(
            "Persistence",
            format!("Failed to move action table into '{}': {}", path, err),
        )
    })?;
    Ok(())
}
