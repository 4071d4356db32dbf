//! Fluent builder for workflow documents
//!
//! Provides a compact API for constructing documents programmatically,
//! used heavily by tests and by host code seeding example workflows.

use crate::types::{
    CustomMetadata, Edge, EdgeCondition, EdgeGroup, Executor, ExecutorKind, Position, PositionMap,
    WorkflowDocument,
};

/// Fluent builder for [`WorkflowDocument`]
///
/// # Example
///
/// ```
/// use loomflow_document::{DocumentBuilder, ExecutorKind};
///
/// let doc = DocumentBuilder::new("wf-1")
///     .name("My Workflow")
///     .executor("a", ExecutorKind::Base)
///     .executor("b", ExecutorKind::Base)
///     .edge("a", "b")
///     .position("a", 0.0, 0.0)
///     .position("b", 240.0, 0.0)
///     .build();
/// assert_eq!(doc.executors.len(), 2);
/// ```
pub struct DocumentBuilder {
    document: WorkflowDocument,
    positions: PositionMap,
    edge_counter: usize,
}

impl DocumentBuilder {
    /// Start a new document with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            document: WorkflowDocument::new(id),
            positions: PositionMap::new(),
            edge_counter: 0,
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.document.name = Some(name.into());
        self
    }

    /// Set the document version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.document.version = Some(version.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.document.description = Some(description.into());
        self
    }

    /// Add an executor of the given kind.
    pub fn executor(mut self, id: impl Into<String>, kind: ExecutorKind) -> Self {
        self.document.executors.push(Executor::new(id, kind));
        self
    }

    /// Add a fully-formed executor.
    pub fn add_executor(mut self, executor: Executor) -> Self {
        self.document.executors.push(executor);
        self
    }

    /// Add an edge between two executors (auto-generates the edge id).
    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        self.document
            .edges
            .push(Edge::new(format!("edge-{}", self.edge_counter), source, target));
        self
    }

    /// Add a conditional edge (auto-generates the edge id).
    pub fn conditional_edge(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        condition: EdgeCondition,
    ) -> Self {
        self.edge_counter += 1;
        self.document.edges.push(
            Edge::new(format!("edge-{}", self.edge_counter), source, target)
                .with_condition(condition),
        );
        self
    }

    /// Add a fully-formed edge.
    pub fn add_edge(mut self, edge: Edge) -> Self {
        self.document.edges.push(edge);
        self
    }

    /// Add an edge group.
    pub fn edge_group(mut self, group: EdgeGroup) -> Self {
        self.document.edge_groups.push(group);
        self
    }

    /// Record a canvas position for a node id.
    pub fn position(mut self, id: impl Into<String>, x: f64, y: f64) -> Self {
        self.positions.insert(id.into(), Position::new(x, y));
        self
    }

    /// Build the document.
    ///
    /// Recorded positions are written to both metadata locations, matching
    /// what the canvas codec produces on export.
    pub fn build(mut self) -> WorkflowDocument {
        if !self.positions.is_empty() {
            let custom = self
                .document
                .metadata
                .custom
                .get_or_insert_with(CustomMetadata::default);
            custom.node_positions = Some(self.positions.clone());
            self.document.metadata.node_positions = Some(self.positions);
        }
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let doc = DocumentBuilder::new("wf-1")
            .name("Test")
            .executor("a", ExecutorKind::Base)
            .executor("b", ExecutorKind::Base)
            .edge("a", "b")
            .build();

        assert_eq!(doc.id, "wf-1");
        assert_eq!(doc.name.as_deref(), Some("Test"));
        assert_eq!(doc.executors.len(), 2);
        assert_eq!(doc.edges[0].id, "edge-1");
    }

    #[test]
    fn test_builder_auto_edge_ids() {
        let doc = DocumentBuilder::new("wf")
            .executor("a", ExecutorKind::Base)
            .executor("b", ExecutorKind::Base)
            .executor("c", ExecutorKind::Base)
            .edge("a", "b")
            .edge("b", "c")
            .build();

        assert_eq!(doc.edges[0].id, "edge-1");
        assert_eq!(doc.edges[1].id, "edge-2");
    }

    #[test]
    fn test_builder_writes_positions_to_both_locations() {
        let doc = DocumentBuilder::new("wf")
            .executor("a", ExecutorKind::Base)
            .position("a", 10.0, 20.0)
            .build();

        let custom = doc.metadata.custom.as_ref().unwrap();
        let canonical = custom.node_positions.as_ref().unwrap();
        let deprecated = doc.metadata.node_positions.as_ref().unwrap();
        assert_eq!(canonical["a"], Position::new(10.0, 20.0));
        assert_eq!(deprecated["a"], Position::new(10.0, 20.0));
    }

    #[test]
    fn test_builder_no_positions_no_metadata() {
        let doc = DocumentBuilder::new("wf")
            .executor("a", ExecutorKind::Base)
            .build();
        assert!(doc.metadata.is_empty());
    }
}
