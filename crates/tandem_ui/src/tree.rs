//! Node tree recorded by the measure pass.
//!
//! Nodes are appended in declaration order, so a node's index is its
//! pre-order position. Pass 2 walks the declaration again and checks each
//! node against the one recorded here at the same index.

use tandem_shared::Vec2;

use crate::id::ElementId;
use crate::layout::GroupLayout;

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain group.
    Group,
    /// Group acting as a scroll viewport.
    Scroll,
    /// Group acting as a slider.
    Slider,
    /// Texture leaf.
    Image,
    /// Single-line text leaf.
    Label,
    /// Wrapped text leaf.
    MultiLineLabel,
    /// Editable text leaf.
    Edit,
    /// Caller-rendered leaf.
    Custom,
}

impl NodeKind {
    /// Returns true for group kinds.
    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group | Self::Scroll | Self::Slider)
    }
}

/// One recorded node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node kind.
    pub kind: NodeKind,
    /// Identity.
    pub id: ElementId,
    /// Parent group index.
    pub parent: Option<usize>,
    /// Child indices in declaration order.
    pub children: Vec<usize>,
    /// Nesting depth (roots are 0).
    pub depth: usize,
    /// Measured size in virtual units.
    pub size: Vec2,
    /// Layout parameters (groups only).
    pub layout: GroupLayout,
    /// Size of the children plus margin. Equals `size` except for scroll groups.
    pub content_size: Vec2,
}

/// Nodes of one measure pass.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    modal_barrier: Option<usize>,
}

impl LayoutTree {
    /// Creates a new empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(256),
            roots: Vec::with_capacity(4),
            modal_barrier: None,
        }
    }

    /// Drops all nodes, keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.modal_barrier = None;
    }

    /// Appends a node under `parent` and returns its index.
    pub fn push(&mut self, kind: NodeKind, id: ElementId, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        let depth = parent
            .and_then(|p| self.nodes.get(p))
            .map_or(0, |p| p.depth + 1);

        self.nodes.push(Node {
            kind,
            id,
            parent,
            children: Vec::new(),
            depth,
            size: Vec2::ZERO,
            layout: GroupLayout::default(),
            content_size: Vec2::ZERO,
        });

        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => parent.children.push(index),
            None => self.roots.push(index),
        }
        index
    }

    /// Gets a node.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Gets mutable access to a node.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the children of a node.
    #[must_use]
    pub fn children(&self, index: usize) -> &[usize] {
        self.nodes.get(index).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Measured sizes of a node's children, in order.
    #[must_use]
    pub fn child_sizes(&self, index: usize) -> Vec<Vec2> {
        self.children(index)
            .iter()
            .filter_map(|&c| self.nodes.get(c).map(|n| n.size))
            .collect()
    }

    /// Returns all root nodes.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Marks a group as the input barrier; the last call wins.
    pub fn set_modal_barrier(&mut self, index: usize) {
        self.modal_barrier = Some(index);
    }

    /// Returns true if elements at `index` are blocked by the modal barrier.
    #[must_use]
    pub fn is_behind_barrier(&self, index: usize) -> bool {
        self.modal_barrier.is_some_and(|barrier| index < barrier)
    }

    /// Returns all node indices in depth-first order.
    pub fn iter_dfs(&self) -> impl Iterator<Item = usize> + '_ {
        NodeDfsIterator {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

/// Depth-first iterator over the node tree.
struct NodeDfsIterator<'a> {
    tree: &'a LayoutTree,
    stack: Vec<usize>,
}

impl Iterator for NodeDfsIterator<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        self.stack.extend(self.tree.children(index).iter().rev().copied());

        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dfs_matches_declaration_order() {
        let mut tree = LayoutTree::new();
        let root = tree.push(NodeKind::Group, ElementId::DEFAULT_GROUP, None);
        let a = tree.push(NodeKind::Group, ElementId::new("a"), Some(root));
        tree.push(NodeKind::Label, ElementId::new("x"), Some(a));
        tree.push(NodeKind::Image, ElementId::new("y"), Some(root));
        tree.push(NodeKind::Group, ElementId::new("second_root"), None);

        let order: Vec<_> = tree.iter_dfs().collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert_eq!(tree.roots(), &[0, 4]);
        assert_eq!(tree.get(2).map(|n| n.depth), Some(2));
    }

    #[test]
    fn test_modal_barrier() {
        let mut tree = LayoutTree::new();
        tree.push(NodeKind::Group, ElementId::DEFAULT_GROUP, None);
        tree.push(NodeKind::Label, ElementId::new("behind"), Some(0));
        let modal = tree.push(NodeKind::Group, ElementId::new("dialog"), None);
        tree.set_modal_barrier(modal);

        assert!(tree.is_behind_barrier(1));
        assert!(!tree.is_behind_barrier(modal));
        assert!(!tree.is_behind_barrier(3));
    }

    #[test]
    fn test_child_sizes() {
        let mut tree = LayoutTree::new();
        let root = tree.push(NodeKind::Group, ElementId::DEFAULT_GROUP, None);
        let leaf = tree.push(NodeKind::Custom, ElementId::new("c"), Some(root));
        if let Some(node) = tree.get_mut(leaf) {
            node.size = Vec2::new(3.0, 4.0);
        }
        assert_eq!(tree.child_sizes(root), vec![Vec2::new(3.0, 4.0)]);
        assert!(tree.children(leaf).is_empty());
    }
}
