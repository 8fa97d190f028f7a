//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

/// Kind of a checklist node, encoded as `fileFolderType` in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Branch node with a children slot
    #[serde(rename = "1")]
    Folder,
    /// Leaf node, never has children
    #[serde(rename = "2")]
    File,
}

impl NodeKind {
    pub fn is_folder(self) -> bool {
        matches!(self, NodeKind::Folder)
    }
}

/// Nested node of an external checklist document.
///
/// Mirrors the document schema:
/// `{ name, cid, permission, fileFolderType: "1"|"2", fileFolderList?: [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    /// Display label
    pub name: String,
    /// Stable unique identifier
    pub cid: String,
    /// Opaque permission string, carried through untouched
    #[serde(default)]
    pub permission: String,
    pub file_folder_type: NodeKind,
    /// Children, folders only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_folder_list: Option<Vec<DocumentNode>>,
}

impl DocumentNode {
    pub fn folder(name: &str, cid: &str, children: Vec<DocumentNode>) -> Self {
        Self {
            name: name.to_string(),
            cid: cid.to_string(),
            permission: String::new(),
            file_folder_type: NodeKind::Folder,
            file_folder_list: Some(children),
        }
    }

    pub fn file(name: &str, cid: &str) -> Self {
        Self {
            name: name.to_string(),
            cid: cid.to_string(),
            permission: String::new(),
            file_folder_type: NodeKind::File,
            file_folder_list: None,
        }
    }

    /// Children of this node, empty for files and childless folders.
    pub fn children(&self) -> &[DocumentNode] {
        self.file_folder_list.as_deref().unwrap_or(&[])
    }
}

/// Checkbox rendering state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    Checked,
    Indeterminate,
    Unchecked,
}
