//! Executor factory
//!
//! Construction of well-formed default executors from canvas node types,
//! and the inverse payload mapping used when a fresh executor lands on
//! the canvas. Both directions are total: unknown node types degrade to
//! the generic base executor and unknown executor kinds to the generic
//! node shape, so the canvas is never left broken by input from a newer
//! editor.

use loomflow_document::presets::{find_preset, AgentPreset, GENERALIST_ROLE, PRESET_SOURCE};
use loomflow_document::{
    EdgeGroup, EdgeGroupKind, Executor, ExecutorKind, ExecutorMetadata, PlanningStrategy,
};

use crate::types::{ExecutorNodeData, NodeType, PayloadVariant};

/// Options for [`executor_from_node_type`].
#[derive(Debug, Clone, Default)]
pub struct FactoryOptions {
    /// Preset to expand for magentic agents. Also accepted as the
    /// namespace suffix of the node type (`"magentic-agent-executor:coder"`);
    /// an explicit option wins over the namespace.
    pub preset_key: Option<String>,
}

impl FactoryOptions {
    /// Options expanding the given preset.
    pub fn with_preset(key: impl Into<String>) -> Self {
        Self {
            preset_key: Some(key.into()),
        }
    }
}

/// Create a fully-formed default executor for a node type string.
///
/// This function never fails: unrecognized node types (including the
/// edge-group node types, which carry no executor) produce the generic
/// base executor, and unknown preset keys fall back to the generalist
/// agent role.
pub fn executor_from_node_type(
    node_type: &str,
    id: impl Into<String>,
    label: Option<&str>,
    options: &FactoryOptions,
) -> Executor {
    let (base_type, namespace_key) = match node_type.split_once(':') {
        Some((base, key)) => (base, Some(key)),
        None => (node_type, None),
    };
    let preset_key = options.preset_key.as_deref().or(namespace_key);

    let mut executor = match NodeType::from_str_lossy(base_type) {
        NodeType::FunctionExecutor => function_executor(id),
        NodeType::AgentExecutor => agent_executor(id),
        NodeType::MagenticAgentExecutor => magentic_agent_executor(id, preset_key),
        NodeType::MagenticOrchestratorExecutor => magentic_orchestrator_executor(id),
        NodeType::WorkflowExecutor => workflow_executor(id),
        NodeType::RequestInfoExecutor => request_info_executor(id),
        NodeType::Executor | NodeType::FanIn | NodeType::FanOut | NodeType::SwitchCase => {
            base_executor(id)
        }
    };
    if let Some(label) = label {
        executor.label = Some(label.to_string());
    }
    executor
}

fn base_executor(id: impl Into<String>) -> Executor {
    Executor::new(id, ExecutorKind::Base)
        .with_label("Executor")
        .with_description("A generic processing step")
}

fn function_executor(id: impl Into<String>) -> Executor {
    Executor::new(
        id,
        ExecutorKind::Function {
            function_name: "handler".to_string(),
            code: None,
            parameters: None,
        },
    )
    .with_label("Function")
    .with_description("Runs a function over its input")
}

fn agent_executor(id: impl Into<String>) -> Executor {
    Executor::new(
        id,
        ExecutorKind::Agent {
            model: String::new(),
            system_prompt: "You are a helpful assistant.".to_string(),
            tools: Vec::new(),
        },
    )
    .with_label("Agent")
    .with_description("A model-backed agent")
}

fn magentic_agent_executor(id: impl Into<String>, preset_key: Option<&str>) -> Executor {
    match preset_key.and_then(find_preset) {
        Some(preset) => preset_agent_executor(id, preset),
        None => {
            let mut executor = Executor::new(
                id,
                ExecutorKind::MagenticAgent {
                    agent_role: GENERALIST_ROLE.to_string(),
                    capabilities: Vec::new(),
                    system_prompt: "You are a capable generalist agent.".to_string(),
                    tools: Vec::new(),
                },
            )
            .with_label("Magentic Agent")
            .with_description("A specialized agent in a magentic team");
            executor.metadata.agent_role = Some(GENERALIST_ROLE.to_string());
            executor
        }
    }
}

fn preset_agent_executor(id: impl Into<String>, preset: &AgentPreset) -> Executor {
    let capabilities: Vec<String> = preset.capabilities.iter().map(|c| c.to_string()).collect();
    let tools: Vec<String> = preset.tools.iter().map(|t| t.to_string()).collect();
    let mut executor = Executor::new(
        id,
        ExecutorKind::MagenticAgent {
            agent_role: preset.role.to_string(),
            capabilities: capabilities.clone(),
            system_prompt: preset.system_prompt.to_string(),
            tools: tools.clone(),
        },
    )
    .with_label(preset.label)
    .with_description(preset.description);
    // Tagged so the editor can rehydrate the preset later
    executor.metadata = ExecutorMetadata {
        source: Some(PRESET_SOURCE.to_string()),
        preset_key: Some(preset.key.to_string()),
        agent_role: Some(preset.role.to_string()),
        capabilities,
        tools,
        position: None,
        extra: serde_json::Map::new(),
    };
    executor
}

fn magentic_orchestrator_executor(id: impl Into<String>) -> Executor {
    let mut executor = Executor::new(
        id,
        ExecutorKind::MagenticOrchestrator {
            planning_strategy: PlanningStrategy::Adaptive,
            progress_tracking: true,
            human_in_the_loop: false,
        },
    )
    .with_label("Magentic Orchestrator")
    .with_description("Coordinates a team of specialized agents");
    // Mirrored for editors that read settings off metadata
    executor
        .metadata
        .extra
        .insert("planningStrategy".to_string(), "adaptive".into());
    executor
        .metadata
        .extra
        .insert("progressTracking".to_string(), true.into());
    executor
        .metadata
        .extra
        .insert("humanInTheLoop".to_string(), false.into());
    executor
}

fn workflow_executor(id: impl Into<String>) -> Executor {
    Executor::new(
        id,
        ExecutorKind::Workflow {
            workflow_id: String::new(),
        },
    )
    .with_label("Workflow")
    .with_description("Runs a nested workflow")
}

fn request_info_executor(id: impl Into<String>) -> Executor {
    Executor::new(
        id,
        ExecutorKind::RequestInfo {
            request_type: "user-input".to_string(),
        },
    )
    .with_label("Request Info")
    .with_description("Pauses the flow to request information")
}

/// The canvas node type for an executor.
pub fn node_type_for_executor(executor: &Executor) -> NodeType {
    match &executor.kind {
        ExecutorKind::Base => NodeType::Executor,
        ExecutorKind::Function { .. } => NodeType::FunctionExecutor,
        ExecutorKind::Agent { .. } => NodeType::AgentExecutor,
        ExecutorKind::MagenticAgent { .. } => NodeType::MagenticAgentExecutor,
        ExecutorKind::MagenticOrchestrator { .. } => NodeType::MagenticOrchestratorExecutor,
        ExecutorKind::Workflow { .. } => NodeType::WorkflowExecutor,
        ExecutorKind::RequestInfo { .. } => NodeType::RequestInfoExecutor,
    }
}

/// The canvas node type for an edge group.
pub fn node_type_for_group(group: &EdgeGroup) -> NodeType {
    match &group.kind {
        EdgeGroupKind::FanIn { .. } => NodeType::FanIn,
        EdgeGroupKind::FanOut { .. } => NodeType::FanOut,
        EdgeGroupKind::SwitchCase { .. } => NodeType::SwitchCase,
    }
}

/// Build the canvas payload for an executor.
///
/// Magentic agents render with the generic agent body and magentic
/// orchestrators with the generic executor body plus an explicit
/// `executor_type` override; the full executor rides along either way,
/// so nothing is lost in the normalization.
pub fn node_data_from_executor(executor: &Executor) -> ExecutorNodeData {
    let (variant, executor_type) = match &executor.kind {
        ExecutorKind::Base => (PayloadVariant::Executor, None),
        ExecutorKind::Function { .. } => (PayloadVariant::Function, None),
        ExecutorKind::Agent { .. } => (PayloadVariant::Agent, None),
        ExecutorKind::MagenticAgent { .. } => (PayloadVariant::Agent, None),
        ExecutorKind::MagenticOrchestrator { .. } => (
            PayloadVariant::Executor,
            Some("magentic-orchestrator".to_string()),
        ),
        ExecutorKind::Workflow { .. } => (PayloadVariant::Workflow, None),
        ExecutorKind::RequestInfo { .. } => (PayloadVariant::RequestInfo, None),
    };
    ExecutorNodeData {
        variant,
        executor_type,
        executor: Some(executor.clone()),
        label: executor.label.clone(),
        description: executor.description.clone(),
    }
}
