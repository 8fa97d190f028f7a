//! Tree builder turning nested checklist documents into an arena forest.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::entities::{DocumentNode, NodeKind};
use crate::domain::error::{DomainError, TreeResult};

/// Constructs checklist trees from nested documents.
///
/// Construction is top-down and preserves document order. Ids must be unique
/// across the whole document.
#[derive(Debug)]
pub struct TreeBuilder {
    /// Reject files that carry a non-empty children list
    strict_files: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { strict_files: true }
    }

    /// Accept files with children by dropping those children.
    pub fn lenient(mut self) -> Self {
        self.strict_files = false;
        self
    }

    /// Build one forest from the top-level document nodes.
    #[instrument(level = "debug", skip(self, documents), fields(top_level = documents.len()))]
    pub fn build(&self, documents: &[DocumentNode]) -> TreeResult<TreeArena> {
        let mut tree = TreeArena::new();
        let mut stack: Vec<(&DocumentNode, Option<Index>)> =
            documents.iter().rev().map(|doc| (doc, None)).collect();

        while let Some((doc, parent_idx)) = stack.pop() {
            let children = doc.children();
            if doc.file_folder_type == NodeKind::File && !children.is_empty() {
                if self.strict_files {
                    return Err(DomainError::InvalidDocument {
                        id: doc.cid.clone(),
                        message: "file node has children".to_string(),
                    });
                }
                debug!(cid = %doc.cid, "dropping children of file node");
            }

            let data = NodeData {
                id: doc.cid.clone(),
                label: doc.name.clone(),
                permission: doc.permission.clone(),
                kind: doc.file_folder_type,
            };
            let current_idx = tree.insert_node(data, parent_idx)?;

            if doc.file_folder_type.is_folder() {
                for child in children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        debug!(nodes = tree.len(), depth = tree.depth(), "built checklist tree");
        Ok(tree)
    }
}

/// Convert the forest back into the nested document schema.
pub fn to_documents(tree: &TreeArena) -> Vec<DocumentNode> {
    fn convert(tree: &TreeArena, idx: Index) -> Option<DocumentNode> {
        let node = tree.get_node(idx)?;
        let file_folder_list = node.data.kind.is_folder().then(|| {
            node.children
                .iter()
                .filter_map(|&child| convert(tree, child))
                .collect()
        });
        Some(DocumentNode {
            name: node.data.label.clone(),
            cid: node.data.id.clone(),
            permission: node.data.permission.clone(),
            file_folder_type: node.data.kind,
            file_folder_list,
        })
    }

    tree.roots()
        .iter()
        .filter_map(|&root| convert(tree, root))
        .collect()
}
