//! Infrastructure layer: document sources
//!
//! This layer implements the tree-loading boundary and wires documents into a checklist.

pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use traits::{load_checklist, DocumentSource, JsonFileSource, StaticSource};
