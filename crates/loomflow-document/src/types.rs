//! Core types for workflow documents
//!
//! These types define the portable workflow format: executors, edges,
//! edge groups and the document wrapper, together with the metadata
//! blocks the editor round-trips through them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for an executor.
pub type ExecutorId = String;

/// Unique identifier for an edge.
pub type EdgeId = String;

/// Map from node id to its cached canvas position.
pub type PositionMap = HashMap<String, Position>;

/// A 2D position on the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The canvas origin.
    pub fn origin() -> Self {
        Self::default()
    }
}

/// A named processing unit in a workflow document.
///
/// The kind-specific payload is flattened into the executor object, so the
/// wire shape is `{"id": "...", "type": "agent", "model": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Executor {
    /// Unique identifier, stable across edits.
    pub id: ExecutorId,
    /// Display name; falls back to the id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind discriminant plus kind-specific fields.
    #[serde(flatten)]
    pub kind: ExecutorKind,
    /// Typed bookkeeping plus opaque passthrough attributes.
    #[serde(default, skip_serializing_if = "ExecutorMetadata::is_empty")]
    pub metadata: ExecutorMetadata,
}

impl Executor {
    /// Create an executor of the given kind with no label or metadata.
    pub fn new(id: impl Into<String>, kind: ExecutorKind) -> Self {
        Self {
            id: id.into(),
            label: None,
            description: None,
            kind,
            metadata: ExecutorMetadata::default(),
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The label to display, falling back to the id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// The closed set of executor kinds.
///
/// Unrecognized `type` strings deserialize as [`ExecutorKind::Base`], so an
/// imported document from a newer editor never fails to load here; the
/// validator reports what it can about the degraded executor instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ExecutorKind {
    /// A function call with an optional inline body and parameter map.
    #[serde(rename_all = "camelCase")]
    Function {
        function_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameters: Option<serde_json::Map<String, serde_json::Value>>,
    },
    /// A plain model-backed agent.
    #[serde(rename_all = "camelCase")]
    Agent {
        model: String,
        system_prompt: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tools: Vec<String>,
    },
    /// A specialized agent participating in a magentic orchestration.
    #[serde(rename_all = "camelCase")]
    MagenticAgent {
        agent_role: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        capabilities: Vec<String>,
        system_prompt: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tools: Vec<String>,
    },
    /// The coordinator of a magentic agent team.
    #[serde(rename_all = "camelCase")]
    MagenticOrchestrator {
        planning_strategy: PlanningStrategy,
        progress_tracking: bool,
        human_in_the_loop: bool,
    },
    /// A reference to a nested workflow document.
    #[serde(rename_all = "camelCase")]
    Workflow { workflow_id: String },
    /// A gateway that pauses the flow to request information.
    #[serde(rename_all = "camelCase")]
    RequestInfo { request_type: String },
    /// Generic executor; also the designated fallback for unknown kinds.
    #[serde(other)]
    Base,
}

impl ExecutorKind {
    /// The wire discriminant for this kind.
    pub fn discriminant(&self) -> &'static str {
        match self {
            ExecutorKind::Base => "base",
            ExecutorKind::Function { .. } => "function",
            ExecutorKind::Agent { .. } => "agent",
            ExecutorKind::MagenticAgent { .. } => "magentic-agent",
            ExecutorKind::MagenticOrchestrator { .. } => "magentic-orchestrator",
            ExecutorKind::Workflow { .. } => "workflow",
            ExecutorKind::RequestInfo { .. } => "request-info",
        }
    }
}

impl Default for ExecutorKind {
    fn default() -> Self {
        ExecutorKind::Base
    }
}

/// Planning strategy of a magentic orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanningStrategy {
    Adaptive,
    Sequential,
    Parallel,
}

impl Default for PlanningStrategy {
    fn default() -> Self {
        PlanningStrategy::Adaptive
    }
}

/// Typed executor metadata plus an opaque passthrough map.
///
/// The typed fields are the ones this core reads back (preset bookkeeping
/// and the cached canvas position); everything else an editor stores on an
/// executor survives untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorMetadata {
    /// Origin tag for preset-created executors (`"agent-framework"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Preset key this executor was instantiated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// Cached canvas position, stamped on export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Opaque passthrough attributes, preserved losslessly.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ExecutorMetadata {
    /// True when no field carries data; such metadata is omitted from the wire.
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.preset_key.is_none()
            && self.agent_role.is_none()
            && self.capabilities.is_empty()
            && self.tools.is_empty()
            && self.position.is_none()
            && self.extra.is_empty()
    }
}

/// A directed connection between two executors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    /// Source executor id. Referential integrity is a validation concern.
    pub source: ExecutorId,
    /// Target executor id.
    pub target: ExecutorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<EdgeCondition>,
    /// Free-form edge attributes carried through conversion.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Edge {
    /// Create an unconditional edge.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            condition: None,
            metadata: serde_json::Map::new(),
        }
    }

    /// Attach a condition to this edge.
    pub fn with_condition(mut self, condition: EdgeCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// Condition gating an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeCondition {
    /// A boolean expression evaluated against the flow state.
    Predicate { expression: String },
    /// A literal match against the switch value routed over this edge.
    Case { value: serde_json::Value },
}

/// A higher-order routing construct.
///
/// Groups live in the same id namespace as executors: the canvas encoding
/// represents each group as a node and looks both up through one id space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGroup {
    pub id: String,
    #[serde(flatten)]
    pub kind: EdgeGroupKind,
}

impl EdgeGroup {
    pub fn new(id: impl Into<String>, kind: EdgeGroupKind) -> Self {
        Self { id: id.into(), kind }
    }

    /// All executor ids this group references.
    pub fn referenced_ids(&self) -> Vec<&str> {
        match &self.kind {
            EdgeGroupKind::FanIn { sources, target, .. } => {
                let mut ids: Vec<&str> = sources.iter().map(String::as_str).collect();
                ids.push(target);
                ids
            }
            EdgeGroupKind::FanOut { source, targets, .. } => {
                let mut ids = vec![source.as_str()];
                ids.extend(targets.iter().map(String::as_str));
                ids
            }
            EdgeGroupKind::SwitchCase {
                source,
                cases,
                default_target,
                ..
            } => {
                let mut ids = vec![source.as_str()];
                ids.extend(cases.iter().map(|c| c.target.as_str()));
                if let Some(default) = default_target {
                    ids.push(default);
                }
                ids
            }
        }
    }
}

/// The three routing variants an edge group can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EdgeGroupKind {
    /// Many sources converge on one target.
    #[serde(rename_all = "camelCase")]
    FanIn {
        sources: Vec<ExecutorId>,
        target: ExecutorId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aggregation: Option<String>,
    },
    /// One source broadcasts to many targets.
    #[serde(rename_all = "camelCase")]
    FanOut {
        source: ExecutorId,
        targets: Vec<ExecutorId>,
        broadcast_mode: BroadcastMode,
    },
    /// One source routes to the target whose case value matches.
    #[serde(rename_all = "camelCase")]
    SwitchCase {
        source: ExecutorId,
        expression: String,
        cases: Vec<SwitchCaseArm>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_target: Option<ExecutorId>,
    },
}

/// One (case value, target) pair of a switch-case group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCaseArm {
    pub value: serde_json::Value,
    pub target: ExecutorId,
}

/// How a fan-out group delivers to its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    Parallel,
    Sequential,
}

/// Document-level metadata.
///
/// Node positions are stored twice: under `custom.nodePositions` (the
/// canonical location) and at the deprecated top level. Writers fill both
/// until all readers migrate; readers prefer `custom`. The preference logic
/// is kept out of this type so the quirk stays contained in the codec.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Canonical location for extension data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomMetadata>,
    /// Deprecated duplicate of `custom.nodePositions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_positions: Option<PositionMap>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        self.custom.is_none() && self.node_positions.is_none() && self.extra.is_empty()
    }
}

/// The `custom` sub-map of document metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_positions: Option<PositionMap>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The portable workflow unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    /// Assigned once at creation; not expected to change.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub executors: Vec<Executor>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Omitted from the wire entirely when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_groups: Vec<EdgeGroup>,
    #[serde(default, skip_serializing_if = "DocumentMetadata::is_empty")]
    pub metadata: DocumentMetadata,
}

impl WorkflowDocument {
    /// Create an empty document.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            version: None,
            description: None,
            executors: Vec::new(),
            edges: Vec::new(),
            edge_groups: Vec::new(),
            metadata: DocumentMetadata::default(),
        }
    }

    /// Find an executor by id.
    pub fn find_executor(&self, id: &str) -> Option<&Executor> {
        self.executors.iter().find(|e| e.id == id)
    }

    /// Find an edge group by id.
    pub fn find_edge_group(&self, id: &str) -> Option<&EdgeGroup> {
        self.edge_groups.iter().find(|g| g.id == id)
    }

    /// True if any executor or edge group uses this id.
    ///
    /// Executors and groups share one id namespace.
    pub fn contains_id(&self, id: &str) -> bool {
        self.executors.iter().any(|e| e.id == id) || self.edge_groups.iter().any(|g| g.id == id)
    }

    /// Edges entering an executor.
    pub fn incoming_edges<'a>(&'a self, executor_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == executor_id)
    }

    /// Edges leaving an executor.
    pub fn outgoing_edges<'a>(&'a self, executor_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == executor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_wire_shape() {
        let executor = Executor::new(
            "agent-1",
            ExecutorKind::Agent {
                model: "claude-sonnet".to_string(),
                system_prompt: "You review code.".to_string(),
                tools: vec!["search".to_string()],
            },
        )
        .with_label("Reviewer");

        let json = serde_json::to_value(&executor).unwrap();
        assert_eq!(json["type"], "agent");
        assert_eq!(json["systemPrompt"], "You review code.");
        assert_eq!(json["label"], "Reviewer");
        // Empty metadata stays off the wire
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_unknown_executor_type_degrades_to_base() {
        let json = serde_json::json!({
            "id": "future-1",
            "type": "quantum-executor",
            "label": "From a newer editor"
        });
        let executor: Executor = serde_json::from_value(json).unwrap();
        assert_eq!(executor.kind, ExecutorKind::Base);
        assert_eq!(executor.display_label(), "From a newer editor");
    }

    #[test]
    fn test_edge_condition_tagging() {
        let edge = Edge::new("e1", "a", "b").with_condition(EdgeCondition::Case {
            value: serde_json::json!("approved"),
        });
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["condition"]["type"], "case");
        assert_eq!(json["condition"]["value"], "approved");
    }

    #[test]
    fn test_edge_group_referenced_ids() {
        let group = EdgeGroup::new(
            "switch-1",
            EdgeGroupKind::SwitchCase {
                source: "router".to_string(),
                expression: "result.status".to_string(),
                cases: vec![SwitchCaseArm {
                    value: serde_json::json!("ok"),
                    target: "publish".to_string(),
                }],
                default_target: Some("retry".to_string()),
            },
        );
        assert_eq!(group.referenced_ids(), vec!["router", "publish", "retry"]);
    }

    #[test]
    fn test_empty_edge_groups_omitted() {
        let doc = WorkflowDocument::new("wf-1");
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("edgeGroups").is_none());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_metadata_passthrough_preserved() {
        let json = serde_json::json!({
            "id": "agent-2",
            "type": "base",
            "metadata": {"presetKey": "coder", "accentColor": "#ff8800"}
        });
        let executor: Executor = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(executor.metadata.preset_key.as_deref(), Some("coder"));
        assert_eq!(
            executor.metadata.extra.get("accentColor"),
            Some(&serde_json::json!("#ff8800"))
        );
        let back = serde_json::to_value(&executor).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_document_queries() {
        let mut doc = WorkflowDocument::new("wf-2");
        doc.executors.push(Executor::new("a", ExecutorKind::Base));
        doc.executors.push(Executor::new("b", ExecutorKind::Base));
        doc.edges.push(Edge::new("e1", "a", "b"));
        doc.edge_groups.push(EdgeGroup::new(
            "fan-1",
            EdgeGroupKind::FanOut {
                source: "a".to_string(),
                targets: vec!["b".to_string()],
                broadcast_mode: BroadcastMode::Parallel,
            },
        ));

        assert!(doc.find_executor("a").is_some());
        assert!(doc.contains_id("fan-1"));
        assert_eq!(doc.incoming_edges("b").count(), 1);
        assert_eq!(doc.outgoing_edges("b").count(), 0);
    }
}
