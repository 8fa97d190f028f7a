//! Hierarchical checklists with tri-state selection.
//!
//! A checklist is a forest of folders and files loaded from a nested
//! document. Selection is a set of node ids kept next to the tree:
//! toggling a folder selects or deselects its whole subtree, and every
//! toggle re-derives the state of the ancestors above it.
//!
//! ```
//! use checktree::application::Checklist;
//! use checktree::domain::{DocumentNode, TriState};
//!
//! let mut checklist = Checklist::from_documents(&[DocumentNode::folder(
//!     "Home",
//!     "1",
//!     vec![DocumentNode::file("File1", "2"), DocumentNode::file("File2", "3")],
//! )])?;
//!
//! checklist.toggle_leaf("2")?;
//! assert_eq!(checklist.tri_state("1")?, TriState::Indeterminate);
//!
//! checklist.toggle_leaf("3")?;
//! assert!(checklist.is_selected("1")?);
//! # Ok::<(), checktree::application::ApplicationError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
