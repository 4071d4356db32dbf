//! Canvas graph types
//!
//! The positioned, editor-facing encoding of a workflow: nodes carry a
//! node-type discriminant, a 2D position and a payload holding either an
//! executor or an edge group; edges carry a rendering type and loose
//! render data. Nothing here is persisted directly - the codec translates
//! between this encoding and the portable document.

use serde::{Deserialize, Serialize};

use loomflow_document::{EdgeGroup, Executor, Position};

/// Node type discriminants used by the canvas.
///
/// Every known executor kind has its own node type; edge groups get one
/// per routing variant. Unknown strings map to the generic
/// [`NodeType::Executor`], so a snapshot from a newer editor still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Generic executor node; also the fallback for unknown type strings.
    Executor,
    FunctionExecutor,
    AgentExecutor,
    MagenticAgentExecutor,
    MagenticOrchestratorExecutor,
    WorkflowExecutor,
    RequestInfoExecutor,
    FanIn,
    FanOut,
    SwitchCase,
}

impl NodeType {
    /// The wire string for this node type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Executor => "executor",
            NodeType::FunctionExecutor => "function-executor",
            NodeType::AgentExecutor => "agent-executor",
            NodeType::MagenticAgentExecutor => "magentic-agent-executor",
            NodeType::MagenticOrchestratorExecutor => "magentic-orchestrator-executor",
            NodeType::WorkflowExecutor => "workflow-executor",
            NodeType::RequestInfoExecutor => "request-info-executor",
            NodeType::FanIn => "fan-in",
            NodeType::FanOut => "fan-out",
            NodeType::SwitchCase => "switch-case",
        }
    }

    /// Total mapping from any string; unknown input degrades to `Executor`.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "function-executor" => NodeType::FunctionExecutor,
            "agent-executor" => NodeType::AgentExecutor,
            "magentic-agent-executor" => NodeType::MagenticAgentExecutor,
            "magentic-orchestrator-executor" => NodeType::MagenticOrchestratorExecutor,
            "workflow-executor" => NodeType::WorkflowExecutor,
            "request-info-executor" => NodeType::RequestInfoExecutor,
            "fan-in" => NodeType::FanIn,
            "fan-out" => NodeType::FanOut,
            "switch-case" => NodeType::SwitchCase,
            _ => NodeType::Executor,
        }
    }

    /// True for the edge-group node types.
    pub fn is_edge_group(&self) -> bool {
        matches!(self, NodeType::FanIn | NodeType::FanOut | NodeType::SwitchCase)
    }
}

impl Serialize for NodeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(NodeType::from_str_lossy(&value))
    }
}

/// Payload-level discriminant the editor renders node bodies by.
///
/// This is a deliberately smaller vocabulary than the executor kinds:
/// magentic agents render with the generic agent body and orchestrators
/// with the generic executor body, carrying the real kind alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadVariant {
    Executor,
    Function,
    Agent,
    Workflow,
    RequestInfo,
}

/// Executor payload of a canvas node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorNodeData {
    /// Which node body the editor renders.
    pub variant: PayloadVariant,
    /// The true executor kind when `variant` is a normalization of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_type: Option<String>,
    /// The underlying executor, preserved in full.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<Executor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Edge-group payload of a canvas node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeGroupNodeData {
    /// The embedded group object, carried verbatim.
    pub group: EdgeGroup,
}

/// What a canvas node carries: an executor or an edge group.
///
/// The two shapes are distinguished by their required keys (`variant`
/// vs `group`), so the union needs no tag on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodePayload {
    Executor(ExecutorNodeData),
    EdgeGroup(EdgeGroupNodeData),
}

impl NodePayload {
    /// True when this payload carries an executor.
    pub fn is_executor(&self) -> bool {
        matches!(self, NodePayload::Executor(_))
    }

    /// True when this payload carries an edge group.
    pub fn is_edge_group(&self) -> bool {
        matches!(self, NodePayload::EdgeGroup(_))
    }
}

/// A positioned node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    pub data: NodePayload,
}

/// Rendering style of a canvas edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRenderType {
    Animated,
    Straight,
    Step,
    Smoothstep,
}

impl Default for EdgeRenderType {
    fn default() -> Self {
        EdgeRenderType::Animated
    }
}

/// Loose render data attached to a canvas edge.
///
/// The condition stays untyped here; the codec promotes it to a typed
/// edge condition only when it matches a recognized shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeRenderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EdgeRenderData {
    pub fn is_empty(&self) -> bool {
        self.condition.is_none() && self.extra.is_empty()
    }
}

/// A rendered edge on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub edge_type: EdgeRenderType,
    #[serde(default, skip_serializing_if = "EdgeRenderData::is_empty")]
    pub data: EdgeRenderData,
}

impl CanvasEdge {
    /// Create an edge with the default rendering type and no data.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            edge_type: EdgeRenderType::default(),
            data: EdgeRenderData::default(),
        }
    }
}

/// A full canvas snapshot: the unit history records and the codec consumes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasState {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomflow_document::{BroadcastMode, EdgeGroupKind, ExecutorKind};

    #[test]
    fn test_node_type_round_trip() {
        for node_type in [
            NodeType::Executor,
            NodeType::MagenticAgentExecutor,
            NodeType::FanOut,
        ] {
            assert_eq!(NodeType::from_str_lossy(node_type.as_str()), node_type);
        }
    }

    #[test]
    fn test_unknown_node_type_degrades() {
        assert_eq!(NodeType::from_str_lossy("hologram-executor"), NodeType::Executor);
        assert_eq!(NodeType::from_str_lossy(""), NodeType::Executor);
    }

    #[test]
    fn test_node_type_serde_uses_wire_strings() {
        let json = serde_json::to_value(NodeType::MagenticOrchestratorExecutor).unwrap();
        assert_eq!(json, "magentic-orchestrator-executor");
        let parsed: NodeType = serde_json::from_value(serde_json::json!("fan-in")).unwrap();
        assert_eq!(parsed, NodeType::FanIn);
    }

    #[test]
    fn test_payload_predicates() {
        let executor_payload = NodePayload::Executor(ExecutorNodeData {
            variant: PayloadVariant::Agent,
            executor_type: None,
            executor: Some(Executor::new("a", ExecutorKind::Base)),
            label: None,
            description: None,
        });
        assert!(executor_payload.is_executor());
        assert!(!executor_payload.is_edge_group());

        let group_payload = NodePayload::EdgeGroup(EdgeGroupNodeData {
            group: EdgeGroup::new(
                "g",
                EdgeGroupKind::FanOut {
                    source: "a".to_string(),
                    targets: vec!["b".to_string()],
                    broadcast_mode: BroadcastMode::Parallel,
                },
            ),
        });
        assert!(group_payload.is_edge_group());
    }

    #[test]
    fn test_payload_untagged_deserialization() {
        let executor_json = serde_json::json!({
            "variant": "agent",
            "executor": {"id": "a", "type": "base"}
        });
        let payload: NodePayload = serde_json::from_value(executor_json).unwrap();
        assert!(payload.is_executor());

        let group_json = serde_json::json!({
            "group": {"id": "g", "type": "fan-in", "sources": ["a"], "target": "b"}
        });
        let payload: NodePayload = serde_json::from_value(group_json).unwrap();
        assert!(payload.is_edge_group());
    }

    #[test]
    fn test_canvas_edge_defaults() {
        let json = serde_json::json!({"id": "e1", "source": "a", "target": "b"});
        let edge: CanvasEdge = serde_json::from_value(json).unwrap();
        assert_eq!(edge.edge_type, EdgeRenderType::Animated);
        assert!(edge.data.is_empty());
    }
}
