//! Rendering of checklists as text trees.

use colored::Colorize;
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::application::Checklist;
use crate::config::Settings;
use crate::domain::TriState;

pub trait TreeRender {
    /// One text tree per top-level node.
    fn to_tree_strings(&self, settings: &Settings) -> Vec<Tree<String>>;
}

impl TreeRender for Checklist {
    #[instrument(level = "debug", skip_all)]
    fn to_tree_strings(&self, settings: &Settings) -> Vec<Tree<String>> {
        fn build(checklist: &Checklist, idx: Index, settings: &Settings) -> Option<Tree<String>> {
            let node = checklist.tree().get_node(idx)?;
            let state = checklist
                .tri_state(&node.data.id)
                .unwrap_or(TriState::Unchecked);
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build(checklist, child, settings))
                .collect();
            let label = row_label(settings, state, &node.data.label, &node.data.id);
            Some(Tree::new(label).with_leaves(leaves))
        }

        self.tree()
            .roots()
            .iter()
            .filter_map(|&root| build(self, root, settings))
            .collect()
    }
}

/// `<glyph> <label> (<id>)`, with the placeholder standing in for empty labels.
pub fn row_label(settings: &Settings, state: TriState, label: &str, id: &str) -> String {
    let glyph = settings.glyphs.for_state(state);
    let glyph = if settings.color {
        match state {
            TriState::Checked => glyph.green().to_string(),
            TriState::Indeterminate => glyph.yellow().to_string(),
            TriState::Unchecked => glyph.to_string(),
        }
    } else {
        glyph.to_string()
    };
    let label = if label.is_empty() {
        settings.placeholder.as_str()
    } else {
        label
    };
    format!("{} {} ({})", glyph, label, id)
}
