//! Arena-backed derivation tree.
//!
//! Nodes are addressed by [`NodeId`], a stable index into the arena. Each
//! node stores the index of its parent and the indices of its children, so
//! reconstructing a derivation is a walk up the parent chain with no shared
//! ownership involved.

use crate::definition::Production;

/// Stable index of a node in a [`DerivationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One sentential form in the tree.
#[derive(Debug, Clone)]
pub struct DerivationNode<'g> {
    /// The sentential form
    pub form: Vec<char>,
    /// Node this one was derived from; `None` for the root
    pub parent: Option<NodeId>,
    /// Production applied to the parent to reach this form
    pub production: Option<&'g Production>,
    /// Enqueued children, in expansion order
    pub children: Vec<NodeId>,
}

/// Tree of sentential forms rooted at the start variable.
#[derive(Debug, Clone)]
pub struct DerivationTree<'g> {
    nodes: Vec<DerivationNode<'g>>,
}

impl<'g> DerivationTree<'g> {
    /// A tree holding only the root form `start`.
    pub fn new(start: char) -> Self {
        Self {
            nodes: vec![DerivationNode {
                form: vec![start],
                parent: None,
                production: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is present from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> &DerivationNode<'g> {
        &self.nodes[id.0]
    }

    /// Attach `form` under `parent`, reached by `production`.
    pub fn add_child(&mut self, parent: NodeId, form: Vec<char>, production: &'g Production) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DerivationNode {
            form,
            parent: Some(parent),
            production: Some(production),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Nodes from the root down to `leaf`.
    pub fn path(&self, leaf: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.nodes[id.0].parent;
        }
        path.reverse();
        path
    }
}
