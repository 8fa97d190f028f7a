//! Domain layer: tree model, selection propagation and flattening
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod flatten;
pub mod selection;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::TreeBuilder;
pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use flatten::{flatten, Expansion, FlatNode};
pub use selection::{Selection, SelectionPropagator};
