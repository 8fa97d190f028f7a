//! Checklist service: tree, selection and change notification in one place.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::application::ApplicationResult;
use crate::domain::builder::to_documents;
use crate::domain::{
    flatten, DocumentNode, Expansion, FlatNode, NodeData, NodeKind, Selection,
    SelectionPropagator, TreeArena, TreeBuilder, TriState,
};

/// Handle returned by [`Checklist::subscribe`].
pub type SubscriptionId = u64;

type Observer = Box<dyn FnMut(&Snapshot)>;

/// Copy of the forest in document schema, tagged with a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Incremented on every published change
    pub revision: u64,
    pub nodes: Vec<DocumentNode>,
}

/// Hierarchical checklist with tri-state selection.
///
/// Structure and labels change through [`Checklist::insert_item`],
/// [`Checklist::update_item`] and [`Checklist::replace_tree`]; each of those
/// publishes a fresh [`Snapshot`] to all observers. Selection changes are not
/// published, they are queried.
pub struct Checklist {
    tree: TreeArena,
    selection: Selection,
    revision: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for Checklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checklist")
            .field("nodes", &self.tree.len())
            .field("selected", &self.selection.len())
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Checklist {
    pub fn new(tree: TreeArena) -> Self {
        Self {
            tree,
            selection: Selection::new(),
            revision: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn from_documents(documents: &[DocumentNode]) -> ApplicationResult<Self> {
        let tree = TreeBuilder::new().build(documents)?;
        Ok(Self::new(tree))
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn propagator(&mut self) -> SelectionPropagator<'_> {
        SelectionPropagator::new(&self.tree, &mut self.selection)
    }

    // -- selection ---------------------------------------------------------

    pub fn is_selected(&self, id: &str) -> ApplicationResult<bool> {
        Ok(self.selection.is_selected(&self.tree, id)?)
    }

    pub fn descendants_all_selected(&self, id: &str) -> ApplicationResult<bool> {
        Ok(self.selection.descendants_all_selected(&self.tree, id)?)
    }

    pub fn descendants_partially_selected(&self, id: &str) -> ApplicationResult<bool> {
        Ok(self.selection.descendants_partially_selected(&self.tree, id)?)
    }

    pub fn tri_state(&self, id: &str) -> ApplicationResult<TriState> {
        Ok(self.selection.tri_state(&self.tree, id)?)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.selected_ids(&self.tree)
    }

    pub fn toggle(&mut self, id: &str) -> ApplicationResult<()> {
        Ok(self.propagator().toggle(id)?)
    }

    pub fn toggle_node(&mut self, id: &str) -> ApplicationResult<()> {
        Ok(self.propagator().toggle_node(id)?)
    }

    pub fn toggle_leaf(&mut self, id: &str) -> ApplicationResult<()> {
        Ok(self.propagator().toggle_leaf(id)?)
    }

    pub fn reconcile_ancestors(&mut self, id: &str) -> ApplicationResult<()> {
        Ok(self.propagator().reconcile_ancestors(id)?)
    }

    pub fn select_all(&mut self) {
        self.propagator().select_all();
    }

    pub fn clear_selection(&mut self) {
        self.propagator().clear();
    }

    pub fn rows(&self, expansion: &Expansion) -> Vec<FlatNode> {
        flatten(&self.tree, &self.selection, expansion)
    }

    // -- structure ---------------------------------------------------------

    /// Append a new, unselected file named `name` under folder `parent_id`.
    ///
    /// Returns the generated id of the new node. Ancestors are reconciled,
    /// so a fully selected folder stops being selected.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_item(&mut self, parent_id: &str, name: &str) -> ApplicationResult<String> {
        let parent_idx = self.tree.index_of(parent_id)?;
        let id = Uuid::new_v4().to_string();
        self.tree
            .insert_node(NodeData::new(id.clone(), name, NodeKind::File), Some(parent_idx))?;
        self.propagator().reconcile_ancestors(&id)?;

        info!(%id, parent = %parent_id, "inserted item");
        self.publish();
        Ok(id)
    }

    /// Rename a node in place.
    #[instrument(level = "debug", skip(self))]
    pub fn update_item(&mut self, id: &str, name: &str) -> ApplicationResult<()> {
        self.tree.set_label(id, name)?;
        info!(%id, "renamed item");
        self.publish();
        Ok(())
    }

    /// Swap in a freshly loaded forest, keeping the selection of surviving ids.
    #[instrument(level = "debug", skip(self, documents))]
    pub fn replace_tree(&mut self, documents: &[DocumentNode]) -> ApplicationResult<()> {
        self.tree = TreeBuilder::new().build(documents)?;
        let dropped = self.selection.retain_known(&self.tree);
        debug!(dropped, "pruned stale selection");

        for leaf in self.tree.leaf_nodes() {
            self.propagator().reconcile_ancestors(&leaf)?;
        }
        self.publish();
        Ok(())
    }

    // -- notification ------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            nodes: to_documents(&self.tree),
        }
    }

    /// Register an observer. It receives the current snapshot immediately
    /// and every published snapshot afterwards.
    pub fn subscribe<F>(&mut self, mut observer: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;

        observer(&self.snapshot());
        self.observers.push((id, Box::new(observer)));
        debug!(subscription = id, "observer registered");
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        before != self.observers.len()
    }

    fn publish(&mut self) {
        self.revision += 1;
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        debug!(
            revision = snapshot.revision,
            observers = self.observers.len(),
            "publishing snapshot"
        );
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
    }
}
