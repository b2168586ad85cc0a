//! Language-agnostic syntax tree handed to rules by a source parser.
//!
//! Front ends (see `chroma-lint-ts`) lower their concrete syntax trees into
//! this arena. Only the shapes the color rule cares about are kept apart;
//! everything else is [`NodeKind::Other`].

use crate::policy::SyntaxContext;

/// Byte range plus 1-indexed start position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line of `start` (1-indexed).
    pub line: usize,
    /// Column of `start` (1-indexed, in bytes).
    pub column: usize,
}

impl Span {
    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: Self = Self(0);
}

/// Name of an object property key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyKey {
    /// Identifier or string-literal text of the key. Empty for computed keys.
    pub name: String,
    /// `{ [expr]: value }`.
    pub computed: bool,
}

impl PropertyKey {
    /// A plain `name: value` key.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            computed: false,
        }
    }

    /// A `[expr]: value` key.
    #[must_use]
    pub fn computed() -> Self {
        Self {
            name: String::new(),
            computed: true,
        }
    }
}

/// One piece of a templated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Literal text between interpolations.
    Static {
        /// The text, as written.
        text: String,
        /// Where the text sits in the file.
        span: Span,
    },
    /// An interpolated expression. Opaque to the color rule.
    Dynamic {
        /// Where the interpolation sits in the file.
        span: Span,
    },
}

/// Shape of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A plain string literal.
    StringLiteral {
        /// Literal contents without quotes.
        value: String,
    },
    /// A templated string, split into static and dynamic parts.
    TemplateLiteral {
        /// Parts in source order.
        parts: Vec<TemplatePart>,
    },
    /// An array literal.
    Array,
    /// An object property (`key: value`).
    Property {
        /// The property key.
        key: PropertyKey,
    },
    /// Anything else; `kind` is the front end's node name.
    Other {
        /// Front-end node kind, for debugging.
        kind: String,
    },
}

/// Role a child plays inside its parent, where it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The key of a [`NodeKind::Property`].
    Key,
    /// The value of a [`NodeKind::Property`].
    Value,
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Shape of this node.
    pub kind: NodeKind,
    /// Source span.
    pub span: Span,
    /// Parent node; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Role within the parent.
    pub field: Option<Field>,
    /// Children in source order.
    pub children: Vec<NodeId>,
}

/// Arena-allocated syntax tree for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Creates a tree holding only a root node of kind `root_kind`.
    #[must_use]
    pub fn new(root_kind: impl Into<String>, span: Span) -> Self {
        Self {
            nodes: vec![SyntaxNode {
                kind: NodeKind::Other {
                    kind: root_kind.into(),
                },
                span,
                parent: None,
                field: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn push(
        &mut self,
        parent: NodeId,
        field: Option<Field>,
        kind: NodeKind,
        span: Span,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent: Some(parent),
            field,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0)
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        &self.nodes[0]
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Structural context of `id`, taken from its immediate parent.
    ///
    /// A node without a parent (the root, or an id from another tree) has
    /// [`SyntaxContext::Other`]; it is never exempt.
    #[must_use]
    pub fn context_of(&self, id: NodeId) -> SyntaxContext {
        let Some(node) = self.get(id) else {
            return SyntaxContext::Other;
        };
        let Some(parent) = node.parent.and_then(|p| self.get(p)) else {
            return SyntaxContext::Other;
        };

        match &parent.kind {
            NodeKind::Array => SyntaxContext::ArrayElement,
            NodeKind::Property { key } if node.field == Some(Field::Value) => {
                SyntaxContext::PropertyValue {
                    key: key.name.clone(),
                    computed: key.computed,
                }
            }
            _ => SyntaxContext::Other,
        }
    }

    /// Depth-first, pre-order walk in source order.
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }
}

/// Iterator returned by [`SyntaxTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (NodeId, &'a SyntaxNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}
