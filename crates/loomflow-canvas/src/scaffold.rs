//! Magentic scaffold expansion
//!
//! A composite "ensure" operation over the canvas: given (or creating) an
//! orchestrator node, make sure one agent node exists per built-in preset
//! and that every agent is wired to the orchestrator in both directions.
//! Existing agents are matched by their preset key and existing edges by
//! their (source, target) pair, so running the operation twice changes
//! nothing.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use loomflow_document::presets::MAGENTIC_PRESETS;
use loomflow_document::Position;

use crate::factory::{executor_from_node_type, node_data_from_executor, FactoryOptions};
use crate::types::{CanvasEdge, CanvasNode, NodePayload, NodeType};

/// Distance from the orchestrator at which new agents are placed.
pub const AGENT_RING_RADIUS: f64 = 280.0;

/// Default canvas position for a freshly created orchestrator.
const DEFAULT_CENTER: Position = Position { x: 400.0, y: 240.0 };

/// Options for [`ensure_magentic_scaffold`].
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// Reuse this node as the orchestrator. Falls back to the first
    /// orchestrator node on the canvas, then to creating a new one.
    pub orchestrator_id: Option<String>,
    /// Where to place a newly created orchestrator.
    pub center: Option<Position>,
}

/// What a scaffold run changed.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    /// The orchestrator in use after the run.
    pub orchestrator_id: String,
    /// True when the orchestrator itself was created by this run.
    pub created_orchestrator: bool,
    /// Node ids of agents created by this run, in preset order.
    pub created_agents: Vec<String>,
    /// Edge ids created by this run.
    pub created_edges: Vec<String>,
}

/// Ensure a complete magentic team exists on the canvas.
///
/// Idempotent: a second run over the same graph creates no nodes and no
/// edges.
pub fn ensure_magentic_scaffold(
    nodes: &mut Vec<CanvasNode>,
    edges: &mut Vec<CanvasEdge>,
    options: &ScaffoldOptions,
) -> ScaffoldReport {
    let mut report = ScaffoldReport::default();

    let (orchestrator_id, center) = match find_orchestrator(nodes, options) {
        Some(node) => (node.id.clone(), node.position),
        None => {
            let id = format!("orchestrator-{}", uuid::Uuid::new_v4());
            let center = options.center.unwrap_or(DEFAULT_CENTER);
            let executor = executor_from_node_type(
                NodeType::MagenticOrchestratorExecutor.as_str(),
                id.clone(),
                None,
                &FactoryOptions::default(),
            );
            nodes.push(CanvasNode {
                id: id.clone(),
                node_type: NodeType::MagenticOrchestratorExecutor,
                position: center,
                data: NodePayload::Executor(node_data_from_executor(&executor)),
            });
            log::info!("created magentic orchestrator '{id}'");
            report.created_orchestrator = true;
            (id, center)
        }
    };
    report.orchestrator_id = orchestrator_id.clone();

    // Existing agents, keyed by the preset they were created from
    let mut agents_by_preset: HashMap<String, String> = HashMap::new();
    for node in nodes.iter() {
        if let NodePayload::Executor(data) = &node.data {
            if let Some(key) = data
                .executor
                .as_ref()
                .and_then(|e| e.metadata.preset_key.clone())
            {
                agents_by_preset.entry(key).or_insert_with(|| node.id.clone());
            }
        }
    }

    let mut agent_ids = Vec::with_capacity(MAGENTIC_PRESETS.len());
    for (index, preset) in MAGENTIC_PRESETS.iter().enumerate() {
        if let Some(existing) = agents_by_preset.get(preset.key) {
            log::debug!("agent for preset '{}' already present: '{existing}'", preset.key);
            agent_ids.push(existing.clone());
            continue;
        }

        let id = format!("agent-{}-{}", preset.key, uuid::Uuid::new_v4());
        let executor = executor_from_node_type(
            NodeType::MagenticAgentExecutor.as_str(),
            id.clone(),
            None,
            &FactoryOptions::with_preset(preset.key),
        );
        let angle = TAU * index as f64 / MAGENTIC_PRESETS.len() as f64;
        nodes.push(CanvasNode {
            id: id.clone(),
            node_type: NodeType::MagenticAgentExecutor,
            position: Position::new(
                center.x + AGENT_RING_RADIUS * angle.cos(),
                center.y + AGENT_RING_RADIUS * angle.sin(),
            ),
            data: NodePayload::Executor(node_data_from_executor(&executor)),
        });
        log::info!("created magentic agent '{id}' for preset '{}'", preset.key);
        report.created_agents.push(id.clone());
        agent_ids.push(id);
    }

    // Wire every agent to the orchestrator in both directions, without
    // duplicating an existing (source, target) pair
    let mut pairs: HashSet<(String, String)> = edges
        .iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();
    for agent_id in &agent_ids {
        for (source, target) in [
            (orchestrator_id.clone(), agent_id.clone()),
            (agent_id.clone(), orchestrator_id.clone()),
        ] {
            if pairs.insert((source.clone(), target.clone())) {
                let id = format!("edge-{source}-{target}");
                edges.push(CanvasEdge::new(id.clone(), source, target));
                report.created_edges.push(id);
            }
        }
    }

    report
}

fn find_orchestrator<'a>(
    nodes: &'a [CanvasNode],
    options: &ScaffoldOptions,
) -> Option<&'a CanvasNode> {
    if let Some(wanted) = &options.orchestrator_id {
        if let Some(node) = nodes.iter().find(|n| &n.id == wanted) {
            return Some(node);
        }
        log::warn!("requested orchestrator '{wanted}' not on canvas, falling back");
    }
    nodes
        .iter()
        .find(|n| n.node_type == NodeType::MagenticOrchestratorExecutor)
}
