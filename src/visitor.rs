use crate::{SyntaxTree, Visitor};
use std::collections::HashMap;
use std::rc::Rc;

impl<TState, TValue> Visitor<TState, TValue> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a dispatch for the given node type name.
    pub fn on<F>(&mut self, kind: &str, dispatch: F)
    where
        F: Fn(&Self, &mut TState, &SyntaxTree) -> TValue + 'static,
    {
        self.handlers.insert(
            kind.to_string(),
            Rc::new(move |visitor, state, tree| Some(dispatch(visitor, state, tree))),
        );
    }

    /// Register a dispatch which collapses unit productions: when the node
    /// has exactly one child, the child's own dispatch is used instead.
    pub fn on_collapsed<F>(&mut self, kind: &str, dispatch: F)
    where
        F: Fn(&Self, &mut TState, &SyntaxTree) -> TValue + 'static,
    {
        self.handlers.insert(
            kind.to_string(),
            Rc::new(move |visitor, state, tree| match tree.children() {
                [only] => visitor.visit(state, only),
                _ => Some(dispatch(visitor, state, tree)),
            }),
        );
    }

    /// Dispatch on the node's type name. A node without a dispatch delegates
    /// to its children; a leaf without a dispatch yields [None].
    pub fn visit(&self, state: &mut TState, tree: &SyntaxTree) -> Option<TValue> {
        match self.handlers.get(tree.kind()) {
            Some(dispatch) => dispatch(self, state, tree),
            None if !tree.children().is_empty() => self.visit_children(state, tree),
            None => None,
        }
    }

    /// Visit every child in order and return the result of the last one.
    pub fn visit_children(&self, state: &mut TState, tree: &SyntaxTree) -> Option<TValue> {
        let mut result = None;
        for child in tree.children() {
            result = self.visit(state, child);
        }
        result
    }
}

impl<TState, TValue> Default for Visitor<TState, TValue> {
    fn default() -> Self {
        Visitor::new()
    }
}
