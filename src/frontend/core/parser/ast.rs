//! Abstract Syntax Tree
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Each node
//! keeps its parent index, so the expression parser can rotate subtrees by
//! rewriting indices.

use crate::frontend::core::lexer::{Operator, Token};
use smallvec::SmallVec;
use std::fmt::{self, Write};

/// Stable index of a node in the [`Ast`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    VarDef,
    Type,
    Identifier,
    Integer,
    /// Insertion point for the expression trailing a `ret`
    Section,
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Return,
}

impl NodeKind {
    /// The operator this node applies, if it is an operator node
    pub fn operator(self) -> Option<Operator> {
        match self {
            NodeKind::Assign => Some(Operator::Assign),
            NodeKind::Add => Some(Operator::Add),
            NodeKind::Sub => Some(Operator::Sub),
            NodeKind::Mul => Some(Operator::Mul),
            NodeKind::Div => Some(Operator::Div),
            _ => None,
        }
    }

    /// Operator precedence; `None` for non-operator nodes
    #[inline]
    pub fn precedence(self) -> Option<u8> {
        self.operator().map(Operator::precedence)
    }

    #[inline]
    pub fn is_operator(self) -> bool {
        self.operator().is_some()
    }
}

impl From<Operator> for NodeKind {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Assign => NodeKind::Assign,
            Operator::Add => NodeKind::Add,
            Operator::Sub => NodeKind::Sub,
            Operator::Mul => NodeKind::Mul,
            Operator::Div => NodeKind::Div,
        }
    }
}

/// A tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'src> {
    pub kind: NodeKind,
    /// Children in insertion order
    pub children: SmallVec<[NodeId; 2]>,
    pub parent: Option<NodeId>,
    /// Originating token (absent for Program and Section)
    pub token: Option<Token<'src>>,
}

/// Arena-backed syntax tree; node 0 is the Program root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast<'src> {
    nodes: Vec<Node<'src>>,
}

impl Default for Ast<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src> Ast<'src> {
    /// Create a tree holding only the Program root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Program,
                children: SmallVec::new(),
                parent: None,
                token: None,
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    #[inline]
    pub fn node(
        &self,
        id: NodeId,
    ) -> &Node<'src> {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn kind(
        &self,
        id: NodeId,
    ) -> NodeKind {
        self.nodes[id.0].kind
    }

    #[inline]
    pub fn children(
        &self,
        id: NodeId,
    ) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[inline]
    pub fn parent(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[inline]
    pub fn token(
        &self,
        id: NodeId,
    ) -> Option<&Token<'src>> {
        self.nodes[id.0].token.as_ref()
    }

    /// Top-level statements in source order
    pub fn statements(&self) -> &[NodeId] {
        self.children(self.root())
    }

    /// Allocate a node, appending it to `parent`'s children when given
    pub fn push(
        &mut self,
        kind: NodeKind,
        token: Option<Token<'src>>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: SmallVec::new(),
            parent,
            token,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Insert a new node of `kind` in `target`'s place and hang `target` below it
    /// as the first child.
    pub fn rotate(
        &mut self,
        target: NodeId,
        kind: NodeKind,
        token: Option<Token<'src>>,
    ) -> NodeId {
        let parent = self.nodes[target.0].parent;
        let id = NodeId(self.nodes.len());
        let mut children = SmallVec::new();
        children.push(target);
        self.nodes.push(Node {
            kind,
            children,
            parent,
            token,
        });
        self.nodes[target.0].parent = Some(id);

        if let Some(parent) = parent {
            for child in self.nodes[parent.0].children.iter_mut() {
                if *child == target {
                    *child = id;
                }
            }
        }
        id
    }

    /// Render a subtree as an s-expression
    pub fn sexpr(
        &self,
        id: NodeId,
    ) -> String {
        let mut out = String::new();
        self.write_sexpr(id, &mut out);
        out
    }

    fn write_sexpr(
        &self,
        id: NodeId,
        out: &mut String,
    ) {
        // explicit stack; left-associative chains can be arbitrarily deep
        let mut work = vec![Sexpr::Node(id)];
        while let Some(item) = work.pop() {
            let id = match item {
                Sexpr::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Sexpr::Node(id) => id,
            };
            let node = self.node(id);
            let text = node.token.map(|t| t.text).unwrap_or_default();
            match node.kind {
                NodeKind::Identifier | NodeKind::Integer | NodeKind::Type => out.push_str(text),
                // sections are transparent
                NodeKind::Section | NodeKind::Program => {
                    for (i, child) in node.children.iter().enumerate().rev() {
                        work.push(Sexpr::Node(*child));
                        if i > 0 {
                            work.push(Sexpr::Text(" "));
                        }
                    }
                }
                kind => {
                    let head = match kind {
                        NodeKind::VarDef => "def",
                        NodeKind::Return => text,
                        _ => kind.operator().map(Operator::symbol).unwrap_or("?"),
                    };
                    let _ = write!(out, "({}", head);
                    work.push(Sexpr::Text(")"));
                    for child in node.children.iter().rev() {
                        work.push(Sexpr::Node(*child));
                        work.push(Sexpr::Text(" "));
                    }
                }
            }
        }
    }
}

enum Sexpr<'src> {
    Node(NodeId),
    Text(&'src str),
}

impl fmt::Display for Ast<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for stmt in self.statements() {
            writeln!(f, "{}", self.sexpr(*stmt))?;
        }
        Ok(())
    }
}
