//! Bidirectional canvas/document conversion
//!
//! [`graph_to_document`] folds a canvas snapshot into the portable
//! document; [`document_to_graph`] unfolds a document back onto the
//! canvas. Both directions are total over well-typed input: unknown
//! discriminants degrade to generic shapes and nothing raises.
//! Referential integrity is deliberately not checked here - that is the
//! validator's job, and an import must reach the validator even when it
//! is broken.
//!
//! Node positions are persisted in document metadata at two locations:
//! `custom.nodePositions` (canonical) and the deprecated top-level
//! `nodePositions`. Readers prefer the canonical location and fall back
//! to the deprecated one; writers fill both until all readers have
//! migrated. That quirk is contained in this module.

use loomflow_document::{
    CustomMetadata, DocumentMetadata, Edge, EdgeCondition, Executor, Position, PositionMap,
    WorkflowDocument,
};

use crate::factory::{
    executor_from_node_type, node_data_from_executor, node_type_for_executor, node_type_for_group,
    FactoryOptions,
};
use crate::types::{
    CanvasEdge, CanvasNode, EdgeGroupNodeData, EdgeRenderData, EdgeRenderType, NodePayload,
};

/// Fold a canvas snapshot into a portable workflow document.
///
/// Executor payloads are extracted whole (or minimally synthesized from
/// the node when the payload carries no executor), with each node's
/// screen position stamped into the executor's metadata. Edge-group
/// payloads are carried over verbatim. Canvas edges become document
/// edges; their condition is promoted to a typed condition only when it
/// matches a recognized shape, and all remaining render data rides along
/// as edge metadata.
pub fn graph_to_document(
    nodes: &[CanvasNode],
    edges: &[CanvasEdge],
    document_id: impl Into<String>,
    document_name: Option<&str>,
) -> WorkflowDocument {
    let mut document = WorkflowDocument::new(document_id);
    document.name = document_name.map(str::to_string);

    let mut positions = PositionMap::new();
    for node in nodes {
        positions.insert(node.id.clone(), node.position);
        match &node.data {
            NodePayload::Executor(data) => {
                let mut executor = match &data.executor {
                    Some(executor) => executor.clone(),
                    None => synthesize_executor(node),
                };
                executor.metadata.position = Some(node.position);
                document.executors.push(executor);
            }
            NodePayload::EdgeGroup(data) => {
                document.edge_groups.push(data.group.clone());
            }
        }
    }

    for edge in edges {
        document.edges.push(Edge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            condition: edge.data.condition.as_ref().and_then(recognize_condition),
            metadata: edge.data.extra.clone(),
        });
    }

    if !positions.is_empty() {
        store_positions(&mut document.metadata, positions);
    }
    document
}

/// Unfold a document onto the canvas.
///
/// Executors take their position from the stored position map (canonical
/// location first, then the deprecated one, then the position cached on
/// the executor itself), defaulting to the origin. Edge groups become
/// nodes at the origin - group layout is not persisted. Edges render as
/// animated edges carrying their condition and metadata.
pub fn document_to_graph(document: &WorkflowDocument) -> (Vec<CanvasNode>, Vec<CanvasEdge>) {
    let positions = stored_positions(&document.metadata);

    let mut nodes = Vec::with_capacity(document.executors.len() + document.edge_groups.len());
    for executor in &document.executors {
        nodes.push(CanvasNode {
            id: executor.id.clone(),
            node_type: node_type_for_executor(executor),
            position: resolve_position(positions, executor),
            data: NodePayload::Executor(node_data_from_executor(executor)),
        });
    }
    for group in &document.edge_groups {
        nodes.push(CanvasNode {
            id: group.id.clone(),
            node_type: node_type_for_group(group),
            position: Position::origin(),
            data: NodePayload::EdgeGroup(EdgeGroupNodeData {
                group: group.clone(),
            }),
        });
    }

    let edges = document
        .edges
        .iter()
        .map(|edge| CanvasEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            edge_type: EdgeRenderType::Animated,
            data: EdgeRenderData {
                condition: edge
                    .condition
                    .as_ref()
                    .and_then(|c| serde_json::to_value(c).ok()),
                extra: edge.metadata.clone(),
            },
        })
        .collect();

    (nodes, edges)
}

/// Build a minimal executor for a node whose payload carries none.
fn synthesize_executor(node: &CanvasNode) -> Executor {
    log::debug!(
        "node '{}' has no executor payload, synthesizing a default",
        node.id
    );
    let (label, description) = match &node.data {
        NodePayload::Executor(data) => (data.label.clone(), data.description.clone()),
        NodePayload::EdgeGroup(_) => (None, None),
    };
    let mut executor = executor_from_node_type(
        node.node_type.as_str(),
        node.id.clone(),
        label.as_deref(),
        &FactoryOptions::default(),
    );
    if description.is_some() {
        executor.description = description;
    }
    executor
}

/// Promote loose render data to a typed condition when the shape matches.
fn recognize_condition(value: &serde_json::Value) -> Option<EdgeCondition> {
    serde_json::from_value(value.clone()).ok()
}

/// The stored position map, preferring the canonical location.
fn stored_positions(metadata: &DocumentMetadata) -> Option<&PositionMap> {
    metadata
        .custom
        .as_ref()
        .and_then(|custom| custom.node_positions.as_ref())
        .or(metadata.node_positions.as_ref())
}

/// Write the position map to both storage locations.
fn store_positions(metadata: &mut DocumentMetadata, positions: PositionMap) {
    let custom = metadata.custom.get_or_insert_with(CustomMetadata::default);
    custom.node_positions = Some(positions.clone());
    metadata.node_positions = Some(positions);
}

fn resolve_position(positions: Option<&PositionMap>, executor: &Executor) -> Position {
    positions
        .and_then(|map| map.get(&executor.id).copied())
        .or(executor.metadata.position)
        .unwrap_or_default()
}
