//! Depth-annotated flattening of a checklist forest for row-based views.

use std::collections::HashSet;

use generational_arena::Index;

use crate::domain::arena::TreeArena;
use crate::domain::entities::TriState;
use crate::domain::selection::Selection;

/// Which folders show their children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Expansion {
    #[default]
    All,
    /// Only the listed folder ids are expanded
    Only(HashSet<String>),
}

impl Expansion {
    /// Everything expanded except the given folder ids.
    pub fn collapsing(tree: &TreeArena, collapsed: &[String]) -> Self {
        if collapsed.is_empty() {
            return Expansion::All;
        }
        let expanded = tree
            .iter()
            .filter(|(_, node)| node.data.kind.is_folder())
            .map(|(_, node)| node.data.id.clone())
            .filter(|id| !collapsed.contains(id))
            .collect();
        Expansion::Only(expanded)
    }

    fn is_expanded(&self, id: &str) -> bool {
        match self {
            Expansion::All => true,
            Expansion::Only(ids) => ids.contains(id),
        }
    }
}

/// One visible row of a flattened checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    pub id: String,
    pub label: String,
    /// Zero-based depth, `0` for top-level rows
    pub depth: usize,
    /// Folders are expandable, files are not
    pub expandable: bool,
    pub state: TriState,
}

impl FlatNode {
    /// Row without a label yet, typically a freshly inserted item.
    pub fn has_no_content(&self) -> bool {
        self.label.is_empty()
    }
}

/// Flatten the forest in pre-order, skipping children of collapsed folders.
pub fn flatten(tree: &TreeArena, selection: &Selection, expansion: &Expansion) -> Vec<FlatNode> {
    let mut rows = Vec::with_capacity(tree.len());
    let mut stack: Vec<(Index, usize)> = tree.roots().iter().rev().map(|&idx| (idx, 0)).collect();

    while let Some((idx, depth)) = stack.pop() {
        let Some(node) = tree.get_node(idx) else {
            continue;
        };
        let expandable = node.data.kind.is_folder();
        rows.push(FlatNode {
            id: node.data.id.clone(),
            label: node.data.label.clone(),
            depth,
            expandable,
            state: selection.tri_state_at(tree, idx),
        });

        if expandable && expansion.is_expanded(&node.data.id) {
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
    }
    rows
}
