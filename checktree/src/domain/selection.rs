//! Tri-state selection over a checklist tree.
//!
//! Selection is kept outside the tree as a set of node ids. [`Selection`]
//! answers read-only questions about that set; [`SelectionPropagator`]
//! applies toggles and keeps ancestors and descendants consistent:
//! - toggling a node forces all its descendants to the node's new state;
//! - after any toggle, every ancestor is selected exactly when all of its
//!   descendants are selected.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::TreeArena;
use crate::domain::entities::TriState;
use crate::domain::error::TreeResult;

/// Set of selected node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Raw membership test, no tree lookup.
    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    fn set(&mut self, id: &str, selected: bool) {
        if selected {
            if !self.selected.contains(id) {
                self.selected.insert(id.to_string());
            }
        } else {
            self.selected.remove(id);
        }
    }

    /// Flips membership of `id` and returns the new state.
    fn flip(&mut self, id: &str) -> bool {
        let now_selected = !self.selected.contains(id);
        self.set(id, now_selected);
        now_selected
    }

    /// Drops ids that are no longer part of `tree`.
    pub fn retain_known(&mut self, tree: &TreeArena) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| tree.contains(id));
        before - self.selected.len()
    }

    pub fn is_selected(&self, tree: &TreeArena, id: &str) -> TreeResult<bool> {
        tree.index_of(id)?;
        Ok(self.contains(id))
    }

    /// True iff every descendant of `id` (excluding itself) is selected.
    /// Vacuously true for nodes without descendants.
    pub fn descendants_all_selected(&self, tree: &TreeArena, id: &str) -> TreeResult<bool> {
        let idx = tree.index_of(id)?;
        Ok(self.all_under(tree, idx))
    }

    /// True iff some, but not all, descendants of `id` are selected.
    pub fn descendants_partially_selected(&self, tree: &TreeArena, id: &str) -> TreeResult<bool> {
        let idx = tree.index_of(id)?;
        Ok(self.any_under(tree, idx) && !self.all_under(tree, idx))
    }

    /// Checkbox state for rendering.
    ///
    /// Nodes with descendants derive their state from them; nodes without
    /// descendants show their own membership.
    pub fn tri_state(&self, tree: &TreeArena, id: &str) -> TreeResult<TriState> {
        let idx = tree.index_of(id)?;
        Ok(self.tri_state_at(tree, idx))
    }

    pub(crate) fn tri_state_at(&self, tree: &TreeArena, idx: Index) -> TriState {
        let Some(node) = tree.get_node(idx) else {
            return TriState::Unchecked;
        };
        if node.is_leaf() {
            return if self.contains(&node.data.id) {
                TriState::Checked
            } else {
                TriState::Unchecked
            };
        }
        if self.all_under(tree, idx) {
            TriState::Checked
        } else if self.any_under(tree, idx) {
            TriState::Indeterminate
        } else {
            TriState::Unchecked
        }
    }

    /// Selected ids in tree pre-order.
    pub fn selected_ids(&self, tree: &TreeArena) -> Vec<String> {
        tree.iter()
            .filter(|(_, node)| self.contains(&node.data.id))
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    fn all_under(&self, tree: &TreeArena, idx: Index) -> bool {
        tree.descendants(idx)
            .all(|(_, node)| self.contains(&node.data.id))
    }

    fn any_under(&self, tree: &TreeArena, idx: Index) -> bool {
        tree.descendants(idx)
            .any(|(_, node)| self.contains(&node.data.id))
    }
}

/// Applies toggles to a [`Selection`] over a borrowed tree.
///
/// Each mutating call runs its descendant cascade and the ancestor
/// reconciliation before returning, so no intermediate state is observable.
pub struct SelectionPropagator<'a> {
    tree: &'a TreeArena,
    selection: &'a mut Selection,
}

impl<'a> SelectionPropagator<'a> {
    pub fn new(tree: &'a TreeArena, selection: &'a mut Selection) -> Self {
        Self { tree, selection }
    }

    pub fn selection(&self) -> &Selection {
        &*self.selection
    }

    pub fn is_selected(&self, id: &str) -> TreeResult<bool> {
        self.selection.is_selected(self.tree, id)
    }

    pub fn descendants_all_selected(&self, id: &str) -> TreeResult<bool> {
        self.selection.descendants_all_selected(self.tree, id)
    }

    pub fn descendants_partially_selected(&self, id: &str) -> TreeResult<bool> {
        self.selection.descendants_partially_selected(self.tree, id)
    }

    pub fn tri_state(&self, id: &str) -> TreeResult<TriState> {
        self.selection.tri_state(self.tree, id)
    }

    /// Id of the parent node, `None` for top-level nodes.
    pub fn parent(&self, id: &str) -> TreeResult<Option<String>> {
        let idx = self.tree.index_of(id)?;
        Ok(self
            .tree
            .parent_of(idx)
            .and_then(|p| self.tree.get_node(p))
            .map(|node| node.data.id.clone()))
    }

    /// Toggle a folder or a file, whichever `id` is.
    pub fn toggle(&mut self, id: &str) -> TreeResult<()> {
        if self.tree.node(id)?.data.kind.is_folder() {
            self.toggle_node(id)
        } else {
            self.toggle_leaf(id)
        }
    }

    /// Flip `id`, force all descendants to its new state, then reconcile ancestors.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_node(&mut self, id: &str) -> TreeResult<()> {
        let idx = self.tree.index_of(id)?;
        let now_selected = self.selection.flip(id);

        let mut cascaded = 0usize;
        for (_, node) in self.tree.descendants(idx) {
            self.selection.set(&node.data.id, now_selected);
            cascaded += 1;
        }
        debug!(now_selected, cascaded, "toggled node");

        self.reconcile_from(idx);
        Ok(())
    }

    /// Flip `id` only, then reconcile ancestors.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_leaf(&mut self, id: &str) -> TreeResult<()> {
        let idx = self.tree.index_of(id)?;
        let now_selected = self.selection.flip(id);
        debug!(now_selected, "toggled leaf");

        self.reconcile_from(idx);
        Ok(())
    }

    /// Re-derive the membership of every ancestor of `id`, nearest first.
    #[instrument(level = "debug", skip(self))]
    pub fn reconcile_ancestors(&mut self, id: &str) -> TreeResult<()> {
        let idx = self.tree.index_of(id)?;
        self.reconcile_from(idx);
        Ok(())
    }

    fn reconcile_from(&mut self, idx: Index) {
        // Nearest ancestor first: each level sees its already reconciled subtree.
        for (ancestor_idx, ancestor) in self.tree.ancestors(idx) {
            let ancestor_id = &ancestor.data.id;
            let selected = self.selection.contains(ancestor_id);
            let all_selected = self.selection.all_under(self.tree, ancestor_idx);
            if selected && !all_selected {
                trace!(id = %ancestor_id, "deselecting ancestor");
                self.selection.set(ancestor_id, false);
            } else if !selected && all_selected {
                trace!(id = %ancestor_id, "selecting ancestor");
                self.selection.set(ancestor_id, true);
            }
        }
    }

    /// Select every node of the tree.
    pub fn select_all(&mut self) {
        for (_, node) in self.tree.iter() {
            self.selection.set(&node.data.id, true);
        }
    }

    pub fn clear(&mut self) {
        self.selection.selected.clear();
    }
}
