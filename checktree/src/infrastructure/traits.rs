//! I/O boundary traits for testability
//!
//! The checklist core never reads documents itself; it is handed nested
//! [`DocumentNode`]s by a [`DocumentSource`].

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::Checklist;
use crate::domain::DocumentNode;
use crate::infrastructure::{InfraError, InfraResult};

/// Tree-loading collaborator producing the top-level document nodes.
pub trait DocumentSource: Send + Sync {
    /// Load the current document forest.
    fn load(&self) -> InfraResult<Vec<DocumentNode>>;

    /// Human readable origin, used in log and error messages.
    fn describe(&self) -> String;
}

/// JSON document stored in a file: either an array of nodes or a single node.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for JsonFileSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> InfraResult<Vec<DocumentNode>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| InfraError::io(format!("read {}", self.path.display()), e))?;
        let parsed = if content.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<DocumentNode>>(&content)
        } else {
            serde_json::from_str::<DocumentNode>(&content).map(|node| vec![node])
        };
        let documents = parsed.map_err(|source| InfraError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(top_level = documents.len(), "loaded document");
        Ok(documents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory documents.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: Vec<DocumentNode>,
}

impl StaticSource {
    pub fn new(documents: Vec<DocumentNode>) -> Self {
        Self { documents }
    }

    /// The built-in sample: a `Home` folder holding `File1` and `File2`.
    pub fn sample() -> Self {
        let with_permission = |mut node: DocumentNode| {
            node.permission = "1".to_string();
            node
        };
        Self::new(vec![with_permission(DocumentNode::folder(
            "Home",
            "1",
            vec![
                with_permission(DocumentNode::file("File1", "2")),
                with_permission(DocumentNode::file("File2", "3")),
            ],
        ))])
    }
}

impl DocumentSource for StaticSource {
    fn load(&self) -> InfraResult<Vec<DocumentNode>> {
        Ok(self.documents.clone())
    }

    fn describe(&self) -> String {
        "<built-in sample>".to_string()
    }
}

/// Load documents from `source` and build a checklist from them.
#[instrument(level = "debug", skip(source), fields(source = %source.describe()))]
pub fn load_checklist(source: &dyn DocumentSource) -> InfraResult<Checklist> {
    let documents = source.load()?;
    Ok(Checklist::from_documents(&documents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_single_object_document_when_loading_then_wraps_in_vec() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.json");
        fs::write(&path, r#"{"name":"a","cid":"1","fileFolderType":"2"}"#).unwrap();

        let docs = JsonFileSource::new(&path).load().unwrap();
        assert_eq!(docs, vec![DocumentNode::file("a", "1")]);
    }

    #[test]
    fn given_single_object_with_bad_kind_when_loading_then_reports_field_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"  {"name":"a","cid":"1","fileFolderType":"3"}"#).unwrap();

        let err = JsonFileSource::new(&path).load().unwrap_err();

        assert!(matches!(err, InfraError::Parse { .. }));
        assert!(err.to_string().contains("unknown variant `3`"), "{err}");
    }

    #[test]
    fn given_missing_file_when_loading_then_io_error() {
        let err = JsonFileSource::new("/definitely/not/here.json").load().unwrap_err();
        assert!(matches!(err, InfraError::Io { .. }));
    }

    #[test]
    fn given_sample_source_when_loading_checklist_then_has_three_nodes() {
        let checklist = load_checklist(&StaticSource::sample()).unwrap();
        assert_eq!(checklist.tree().len(), 3);
        assert_eq!(checklist.tree().leaf_nodes(), vec!["2", "3"]);
    }
}
