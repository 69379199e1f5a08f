use crate::{LexNode, ParseNode, SyntaxTree};
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};

impl ParseNode {
    /// Create a new internal tree node.
    pub fn new(node: &str, children: Vec<SyntaxTree>) -> Self {
        Self {
            node: node.to_string(),
            children,
        }
    }
}

impl SyntaxTree {
    /// The type name of the node: the token name of a leaf or the
    /// non-terminal name of a reduced rule.
    pub fn kind(&self) -> &str {
        match self {
            SyntaxTree::Leaf(leaf) => &leaf.token,
            SyntaxTree::Node(node) => &node.node,
        }
    }

    pub fn children(&self) -> &[SyntaxTree] {
        match self {
            SyntaxTree::Leaf(_) => &[],
            SyntaxTree::Node(node) => &node.children,
        }
    }

    /// The matched text of a leaf node.
    pub fn text(&self) -> Option<&str> {
        match self {
            SyntaxTree::Leaf(leaf) => Some(leaf.text()),
            SyntaxTree::Node(_) => None,
        }
    }

    /// The 0-based (line, index) of the leftmost leaf beneath this node.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            SyntaxTree::Leaf(leaf) => Some((leaf.line, leaf.index)),
            SyntaxTree::Node(node) => node.children.first().and_then(|child| child.position()),
        }
    }

    /// Whether self or any nested child has the given type name.
    pub fn contains(&self, kind: &str) -> bool {
        self.kind() == kind || self.children().iter().any(|child| child.contains(kind))
    }

    /// Search through all nested children and return the first node with the given type name.
    pub fn find(&self, kind: &str) -> Option<&SyntaxTree> {
        if self.kind() == kind {
            Some(self)
        } else {
            self.children().iter().find_map(|child| child.find(kind))
        }
    }

    /// All leaf tokens beneath this node, in source order.
    pub fn leaves(&self) -> Vec<&LexNode> {
        let mut list = Vec::new();
        self.collect_leaves(&mut list);
        list
    }

    fn collect_leaves<'this>(&'this self, list: &mut Vec<&'this LexNode>) {
        match self {
            SyntaxTree::Leaf(leaf) => list.push(leaf),
            SyntaxTree::Node(node) => {
                for child in &node.children {
                    child.collect_leaves(list);
                }
            }
        }
    }

    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}

impl Display for SyntaxTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxTree::Leaf(leaf) => write!(f, "{}", leaf.text()),
            SyntaxTree::Node(node) => {
                write!(f, "({}", node.node)?;
                for child in &node.children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Debug for SyntaxTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxTree::Leaf(leaf) => f
                .debug_struct("Leaf")
                .field("token", &leaf.token)
                .field("text", &leaf.text())
                .field("line", &leaf.line)
                .field("index", &leaf.index)
                .finish(),
            SyntaxTree::Node(node) => {
                let mut debug_struct = f.debug_struct("Node");
                debug_struct.field("node", &node.node);
                if !node.children.is_empty() {
                    debug_struct.field("children", &node.children);
                }
                debug_struct.finish()
            }
        }
    }
}

impl TreeItem for SyntaxTree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self {
            SyntaxTree::Leaf(leaf) => {
                write!(f, "{} {:?} # {}:{}", leaf.token, leaf.text(), leaf.line, leaf.index)
            }
            SyntaxTree::Node(node) => write!(f, "{}", node.node),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        match self {
            SyntaxTree::Leaf(_) => Cow::Owned(Vec::new()),
            SyntaxTree::Node(node) => Cow::from(&node.children),
        }
    }
}
