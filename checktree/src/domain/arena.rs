use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::NodeKind;
use crate::domain::error::{DomainError, TreeResult};

/// Data payload for checklist tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Stable unique identifier
    pub id: String,
    /// Display label, the only field that is edited in place
    pub label: String,
    /// Opaque permission string from the source document
    pub permission: String,
    /// Folder or file
    pub kind: NodeKind,
}

impl NodeData {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            permission: String::new(),
            kind,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Checklist data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for top-level nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in document order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based forest of checklist nodes.
///
/// The arena is the single node registry: nodes are addressed by generational
/// [`Index`], and `by_id` maps every stable id to its index. Parent links are
/// stored on insertion, so ancestor lookups never depend on a flattened view.
#[derive(Debug, Default)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Top-level nodes in document order
    roots: Vec<Index>,
    /// Stable id to arena index
    by_id: HashMap<String, Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node as the last child of `parent`, or as a new top-level
    /// node when `parent` is `None`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> TreeResult<Index> {
        if self.by_id.contains_key(&data.id) {
            return Err(DomainError::DuplicateId(data.id));
        }
        if let Some(parent_idx) = parent {
            let parent_node = self
                .arena
                .get(parent_idx)
                .ok_or_else(|| DomainError::NotFound(format!("{parent_idx:?}")))?;
            if !parent_node.data.kind.is_folder() {
                return Err(DomainError::InvalidParent(parent_node.data.id.clone()));
            }
        }

        let id = data.id.clone();
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::new(),
        });
        self.by_id.insert(id, node_idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        Ok(node_idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Resolves a stable id to its arena index.
    pub fn index_of(&self, id: &str) -> TreeResult<Index> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    pub fn node(&self, id: &str) -> TreeResult<&TreeNode> {
        let idx = self.index_of(id)?;
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Replaces the label of a node, leaving id and structure untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn set_label(&mut self, id: &str, label: &str) -> TreeResult<()> {
        let idx = self.index_of(id)?;
        let node = self
            .arena
            .get_mut(idx)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        node.data.label = label.to_string();
        Ok(())
    }

    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|node| node.parent)
    }

    /// Ancestors of `idx`, nearest first, ending at its top-level node.
    pub fn ancestors(&self, idx: Index) -> AncestorIterator {
        AncestorIterator {
            arena: self,
            current: self.parent_of(idx),
        }
    }

    /// Descendants of `idx` in pre-order, excluding `idx` itself.
    pub fn descendants(&self, idx: Index) -> TreeIterator {
        let stack = self
            .get_node(idx)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        TreeIterator { arena: self, stack }
    }

    /// Pre-order walk over the whole forest.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator {
            arena: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest branch, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the ids of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct AncestorIterator<'a> {
    arena: &'a TreeArena,
    current: Option<Index>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        let node = self.arena.get_node(idx)?;
        self.current = node.parent;
        Some((idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots().iter().rev().map(|&root| (root, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
