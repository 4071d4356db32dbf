//! Fluent builder for canvas graphs
//!
//! Mirrors the document builder on the canvas side; mostly used by tests
//! to assemble snapshots without spelling out node payloads.

use loomflow_document::{EdgeCondition, EdgeGroup, Executor, Position};

use crate::factory::{node_data_from_executor, node_type_for_executor, node_type_for_group};
use crate::types::{
    CanvasEdge, CanvasNode, CanvasState, EdgeGroupNodeData, EdgeRenderData, EdgeRenderType,
    NodePayload,
};

/// Fluent builder for [`CanvasState`]
///
/// # Example
///
/// ```
/// use loomflow_canvas::CanvasBuilder;
/// use loomflow_document::{Executor, ExecutorKind};
///
/// let canvas = CanvasBuilder::new()
///     .executor_node(Executor::new("a", ExecutorKind::Base), 0.0, 0.0)
///     .executor_node(Executor::new("b", ExecutorKind::Base), 240.0, 0.0)
///     .edge("a", "b")
///     .build();
/// assert_eq!(canvas.nodes.len(), 2);
/// ```
#[derive(Default)]
pub struct CanvasBuilder {
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
    edge_counter: usize,
}

impl CanvasBuilder {
    /// Start an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node carrying the given executor; the node reuses its id.
    pub fn executor_node(mut self, executor: Executor, x: f64, y: f64) -> Self {
        self.nodes.push(CanvasNode {
            id: executor.id.clone(),
            node_type: node_type_for_executor(&executor),
            position: Position::new(x, y),
            data: NodePayload::Executor(node_data_from_executor(&executor)),
        });
        self
    }

    /// Add a node carrying the given edge group; the node reuses its id.
    pub fn group_node(mut self, group: EdgeGroup, x: f64, y: f64) -> Self {
        self.nodes.push(CanvasNode {
            id: group.id.clone(),
            node_type: node_type_for_group(&group),
            position: Position::new(x, y),
            data: NodePayload::EdgeGroup(EdgeGroupNodeData { group }),
        });
        self
    }

    /// Add a fully-formed node.
    pub fn add_node(mut self, node: CanvasNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add an edge between two nodes (auto-generates the edge id).
    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        self.edges.push(CanvasEdge::new(
            format!("edge-{}", self.edge_counter),
            source,
            target,
        ));
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
        self.edges.push(CanvasEdge {
            id: format!("edge-{}", self.edge_counter),
            source: source.into(),
            target: target.into(),
            edge_type: EdgeRenderType::default(),
            data: EdgeRenderData {
                condition: serde_json::to_value(&condition).ok(),
                extra: serde_json::Map::new(),
            },
        });
        self
    }

    /// Add a fully-formed edge.
    pub fn add_edge(mut self, edge: CanvasEdge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Build the canvas snapshot.
    pub fn build(self) -> CanvasState {
        CanvasState {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomflow_document::{BroadcastMode, EdgeGroupKind, ExecutorKind};

    #[test]
    fn test_builder_basic() {
        let canvas = CanvasBuilder::new()
            .executor_node(Executor::new("a", ExecutorKind::Base), 0.0, 0.0)
            .executor_node(Executor::new("b", ExecutorKind::Base), 100.0, 0.0)
            .edge("a", "b")
            .build();

        assert_eq!(canvas.nodes.len(), 2);
        assert_eq!(canvas.edges.len(), 1);
        assert_eq!(canvas.edges[0].id, "edge-1");
        assert_eq!(canvas.nodes[1].position, Position::new(100.0, 0.0));
    }

    #[test]
    fn test_group_node_type() {
        let canvas = CanvasBuilder::new()
            .group_node(
                EdgeGroup::new(
                    "g",
                    EdgeGroupKind::FanOut {
                        source: "a".to_string(),
                        targets: vec!["b".to_string()],
                        broadcast_mode: BroadcastMode::Sequential,
                    },
                ),
                50.0,
                50.0,
            )
            .build();

        assert_eq!(canvas.nodes[0].node_type, crate::types::NodeType::FanOut);
        assert!(canvas.nodes[0].data.is_edge_group());
    }

    #[test]
    fn test_conditional_edge_stores_condition_shape() {
        let canvas = CanvasBuilder::new()
            .conditional_edge(
                "a",
                "b",
                EdgeCondition::Case {
                    value: serde_json::json!(42),
                },
            )
            .build();

        let condition = canvas.edges[0].data.condition.as_ref().unwrap();
        assert_eq!(condition["type"], "case");
        assert_eq!(condition["value"], 42);
    }
}
