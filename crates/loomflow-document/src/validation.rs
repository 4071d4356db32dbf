//! Workflow document validation
//!
//! Two entry points gate a document before it is trusted:
//!
//! - [`validate_schema`] checks structural shape: ids present and unique,
//!   edge endpoints named, edge groups well-formed.
//! - [`validate_extended`] supersets schema validation with semantic
//!   checks: referential integrity of edges and groups, executor-kind
//!   required fields, and structural warnings (isolated executors, cycles).
//!
//! Neither function ever raises; both always return a report. Warnings
//! never affect validity.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::types::{EdgeGroupKind, ExecutorKind, WorkflowDocument};

/// Structural or referential violation. Any of these makes a document invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity} has an empty id")]
    EmptyId { entity: &'static str },

    /// Executors and edge groups share one id namespace.
    #[error("duplicate id '{id}'")]
    DuplicateId { id: String },

    #[error("edge '{edge_id}' has an empty {endpoint}")]
    EmptyEndpoint {
        edge_id: String,
        endpoint: &'static str,
    },

    #[error("{group_kind} group '{group_id}' has no {list}")]
    EmptyGroupList {
        group_id: String,
        group_kind: &'static str,
        list: &'static str,
    },

    #[error("edge '{edge_id}' references unknown executor '{executor_id}'")]
    UnknownEdgeEndpoint {
        edge_id: String,
        executor_id: String,
    },

    #[error("edge group '{group_id}' references unknown executor '{executor_id}'")]
    UnknownGroupReference {
        group_id: String,
        executor_id: String,
    },
}

/// Executor-kind-specific required-field violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeIssue {
    #[error("workflow executor '{executor_id}' does not reference a workflow")]
    MissingWorkflowReference { executor_id: String },

    #[error("function executor '{executor_id}' has no function name")]
    MissingFunctionName { executor_id: String },

    #[error("request-info executor '{executor_id}' has no request type")]
    MissingRequestType { executor_id: String },

    #[error("magentic agent '{executor_id}' has no role")]
    MissingAgentRole { executor_id: String },
}

/// Advisory finding; never affects validity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    /// Isolated executors are legal, e.g. the sole node of a new workflow.
    #[error("executor '{executor_id}' is not connected to any edge")]
    IsolatedExecutor { executor_id: String },

    /// Cycles are legal too: orchestrator/agent pairs are wired both ways.
    #[error("workflow contains a cycle")]
    CycleDetected,

    #[error("switch-case group '{group_id}' has no default target")]
    SwitchWithoutDefault { group_id: String },
}

/// Result of [`validate_schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    pub errors: Vec<ValidationError>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of [`validate_extended`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Structural and connectivity errors.
    pub errors: Vec<ValidationError>,
    /// Executor-kind required-field errors.
    pub type_errors: Vec<TypeIssue>,
    /// General advisories.
    pub warnings: Vec<ValidationWarning>,
    /// Connectivity advisories (isolated executors).
    pub connectivity_warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Valid iff there are no errors and no type errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.type_errors.is_empty()
    }
}

/// Check a document for structural shape violations.
pub fn validate_schema(document: &WorkflowDocument) -> SchemaReport {
    let mut report = SchemaReport::default();
    collect_schema_errors(document, &mut report.errors);
    report
}

/// Check a document for structural, referential and kind-level violations.
pub fn validate_extended(document: &WorkflowDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    collect_schema_errors(document, &mut report.errors);
    collect_connectivity(document, &mut report);
    collect_type_issues(document, &mut report.type_errors);
    detect_cycles(document, &mut report.warnings);

    log::debug!(
        "validated document '{}': {} errors, {} type errors, {} warnings",
        document.id,
        report.errors.len(),
        report.type_errors.len(),
        report.warnings.len() + report.connectivity_warnings.len()
    );
    report
}

fn collect_schema_errors(document: &WorkflowDocument, errors: &mut Vec<ValidationError>) {
    // Executors and groups resolve through one id namespace on the canvas,
    // so uniqueness is checked across both.
    let mut seen: HashSet<&str> = HashSet::new();
    let node_ids = document
        .executors
        .iter()
        .map(|e| ("executor", e.id.as_str()))
        .chain(document.edge_groups.iter().map(|g| ("edge group", g.id.as_str())));
    for (entity, id) in node_ids {
        if id.is_empty() {
            errors.push(ValidationError::EmptyId { entity });
        } else if !seen.insert(id) {
            errors.push(ValidationError::DuplicateId { id: id.to_string() });
        }
    }

    let mut seen_edges: HashSet<&str> = HashSet::new();
    for edge in &document.edges {
        if edge.id.is_empty() {
            errors.push(ValidationError::EmptyId { entity: "edge" });
        } else if !seen_edges.insert(&edge.id) {
            errors.push(ValidationError::DuplicateId {
                id: edge.id.clone(),
            });
        }
        if edge.source.is_empty() {
            errors.push(ValidationError::EmptyEndpoint {
                edge_id: edge.id.clone(),
                endpoint: "source",
            });
        }
        if edge.target.is_empty() {
            errors.push(ValidationError::EmptyEndpoint {
                edge_id: edge.id.clone(),
                endpoint: "target",
            });
        }
    }

    for group in &document.edge_groups {
        match &group.kind {
            EdgeGroupKind::FanIn { sources, .. } if sources.is_empty() => {
                errors.push(ValidationError::EmptyGroupList {
                    group_id: group.id.clone(),
                    group_kind: "fan-in",
                    list: "sources",
                });
            }
            EdgeGroupKind::FanOut { targets, .. } if targets.is_empty() => {
                errors.push(ValidationError::EmptyGroupList {
                    group_id: group.id.clone(),
                    group_kind: "fan-out",
                    list: "targets",
                });
            }
            EdgeGroupKind::SwitchCase {
                cases,
                default_target,
                ..
            } if cases.is_empty() && default_target.is_none() => {
                errors.push(ValidationError::EmptyGroupList {
                    group_id: group.id.clone(),
                    group_kind: "switch-case",
                    list: "cases",
                });
            }
            _ => {}
        }
    }
}

fn collect_connectivity(document: &WorkflowDocument, report: &mut ValidationReport) {
    let executor_ids: HashSet<&str> = document.executors.iter().map(|e| e.id.as_str()).collect();
    // Edges drawn to a group node are legal, so endpoints resolve against
    // the shared id namespace.
    let node_ids: HashSet<&str> = executor_ids
        .iter()
        .copied()
        .chain(document.edge_groups.iter().map(|g| g.id.as_str()))
        .collect();

    for edge in &document.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !endpoint.is_empty() && !node_ids.contains(endpoint.as_str()) {
                report.errors.push(ValidationError::UnknownEdgeEndpoint {
                    edge_id: edge.id.clone(),
                    executor_id: endpoint.clone(),
                });
            }
        }
    }

    for group in &document.edge_groups {
        for referenced in group.referenced_ids() {
            if !referenced.is_empty() && !executor_ids.contains(referenced) {
                report.errors.push(ValidationError::UnknownGroupReference {
                    group_id: group.id.clone(),
                    executor_id: referenced.to_string(),
                });
            }
        }
        if let EdgeGroupKind::SwitchCase {
            default_target: None,
            ..
        } = &group.kind
        {
            report.warnings.push(ValidationWarning::SwitchWithoutDefault {
                group_id: group.id.clone(),
            });
        }
    }

    // An executor counts as connected when any edge or group touches it.
    let mut connected: HashSet<&str> = HashSet::new();
    for edge in &document.edges {
        connected.insert(edge.source.as_str());
        connected.insert(edge.target.as_str());
    }
    for group in &document.edge_groups {
        connected.extend(group.referenced_ids());
    }
    for executor in &document.executors {
        if !connected.contains(executor.id.as_str()) {
            report
                .connectivity_warnings
                .push(ValidationWarning::IsolatedExecutor {
                    executor_id: executor.id.clone(),
                });
        }
    }
}

fn collect_type_issues(document: &WorkflowDocument, issues: &mut Vec<TypeIssue>) {
    for executor in &document.executors {
        match &executor.kind {
            ExecutorKind::Workflow { workflow_id } if workflow_id.is_empty() => {
                issues.push(TypeIssue::MissingWorkflowReference {
                    executor_id: executor.id.clone(),
                });
            }
            ExecutorKind::Function { function_name, .. } if function_name.is_empty() => {
                issues.push(TypeIssue::MissingFunctionName {
                    executor_id: executor.id.clone(),
                });
            }
            ExecutorKind::RequestInfo { request_type } if request_type.is_empty() => {
                issues.push(TypeIssue::MissingRequestType {
                    executor_id: executor.id.clone(),
                });
            }
            ExecutorKind::MagenticAgent { agent_role, .. } if agent_role.is_empty() => {
                issues.push(TypeIssue::MissingAgentRole {
                    executor_id: executor.id.clone(),
                });
            }
            _ => {}
        }
    }
}

/// Detect cycles using Kahn's algorithm (topological sort).
///
/// Only edges whose endpoints both exist participate; dangling edges are
/// already reported as connectivity errors.
fn detect_cycles(document: &WorkflowDocument, warnings: &mut Vec<ValidationWarning>) {
    let executor_ids: HashSet<&str> = document.executors.iter().map(|e| e.id.as_str()).collect();
    let edges: Vec<(&str, &str)> = document
        .edges
        .iter()
        .filter(|e| {
            executor_ids.contains(e.source.as_str()) && executor_ids.contains(e.target.as_str())
        })
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();

    let mut in_degree: HashMap<&str, usize> = executor_ids.iter().map(|id| (*id, 0)).collect();
    for &(_, target) in &edges {
        if let Some(degree) = in_degree.get_mut(target) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut visited = 0;
    while let Some(id) = queue.pop_front() {
        visited += 1;
        for &(source, target) in &edges {
            if source == id {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    if visited < executor_ids.len() {
        warnings.push(ValidationWarning::CycleDetected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::types::{BroadcastMode, EdgeGroup, EdgeGroupKind, ExecutorKind};

    fn two_node_document() -> WorkflowDocument {
        DocumentBuilder::new("wf-v")
            .executor("A", ExecutorKind::Base)
            .executor("B", ExecutorKind::Base)
            .edge("A", "B")
            .build()
    }

    #[test]
    fn test_valid_two_node_document() {
        let report = validate_extended(&two_node_document());
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
        assert!(report.connectivity_warnings.is_empty());
    }

    #[test]
    fn test_dangling_target_is_single_connectivity_error() {
        let mut doc = two_node_document();
        doc.edges[0].target = "C".to_string();

        let report = validate_extended(&doc);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].to_string().contains("'C'"));
    }

    #[test]
    fn test_adding_dangling_edge_flips_validity() {
        let mut doc = two_node_document();
        assert!(validate_extended(&doc).is_valid());

        doc.edges
            .push(crate::types::Edge::new("e2", "B", "ghost"));
        let report = validate_extended(&doc);
        assert!(!report.is_valid());
        let dangling: Vec<_> = report
            .errors
            .iter()
            .filter(|e| matches!(e, ValidationError::UnknownEdgeEndpoint { .. }))
            .collect();
        assert_eq!(dangling.len(), 1);
        assert!(dangling[0].to_string().contains("e2"));
    }

    #[test]
    fn test_isolated_executor_is_warning_not_error() {
        let doc = DocumentBuilder::new("wf")
            .executor("solo", ExecutorKind::Base)
            .build();

        let report = validate_extended(&doc);
        assert!(report.is_valid());
        assert_eq!(report.connectivity_warnings.len(), 1);
        assert!(matches!(
            report.connectivity_warnings[0],
            ValidationWarning::IsolatedExecutor { .. }
        ));
    }

    #[test]
    fn test_group_endpoints_count_as_connections() {
        let doc = DocumentBuilder::new("wf")
            .executor("a", ExecutorKind::Base)
            .executor("b", ExecutorKind::Base)
            .executor("c", ExecutorKind::Base)
            .edge_group(EdgeGroup::new(
                "fan",
                EdgeGroupKind::FanOut {
                    source: "a".to_string(),
                    targets: vec!["b".to_string(), "c".to_string()],
                    broadcast_mode: BroadcastMode::Parallel,
                },
            ))
            .build();

        let report = validate_extended(&doc);
        assert!(report.is_valid());
        assert!(report.connectivity_warnings.is_empty());
    }

    #[test]
    fn test_group_reference_to_missing_executor() {
        let doc = DocumentBuilder::new("wf")
            .executor("a", ExecutorKind::Base)
            .edge_group(EdgeGroup::new(
                "fan",
                EdgeGroupKind::FanOut {
                    source: "a".to_string(),
                    targets: vec!["nowhere".to_string()],
                    broadcast_mode: BroadcastMode::Sequential,
                },
            ))
            .build();

        let report = validate_extended(&doc);
        assert!(!report.is_valid());
        assert!(report
            .errors
            .iter()
            .any(|e| e.to_string().contains("'nowhere'")));
    }

    #[test]
    fn test_duplicate_id_across_executors_and_groups() {
        let doc = DocumentBuilder::new("wf")
            .executor("shared", ExecutorKind::Base)
            .edge_group(EdgeGroup::new(
                "shared",
                EdgeGroupKind::FanIn {
                    sources: vec!["shared".to_string()],
                    target: "shared".to_string(),
                    aggregation: None,
                },
            ))
            .build();

        let report = validate_schema(&doc);
        assert!(!report.is_valid());
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateId { id } if id == "shared")));
    }

    #[test]
    fn test_missing_workflow_reference_is_type_error() {
        let doc = DocumentBuilder::new("wf")
            .executor(
                "nested",
                ExecutorKind::Workflow {
                    workflow_id: String::new(),
                },
            )
            .build();

        let report = validate_extended(&doc);
        assert!(!report.is_valid());
        assert_eq!(report.type_errors.len(), 1);
        assert!(matches!(
            report.type_errors[0],
            TypeIssue::MissingWorkflowReference { .. }
        ));
    }

    #[test]
    fn test_cycle_is_warning_only() {
        let doc = DocumentBuilder::new("wf")
            .executor("a", ExecutorKind::Base)
            .executor("b", ExecutorKind::Base)
            .edge("a", "b")
            .edge("b", "a")
            .build();

        let report = validate_extended(&doc);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::CycleDetected)));
    }

    #[test]
    fn test_empty_fan_out_targets() {
        let doc = DocumentBuilder::new("wf")
            .executor("a", ExecutorKind::Base)
            .edge_group(EdgeGroup::new(
                "fan",
                EdgeGroupKind::FanOut {
                    source: "a".to_string(),
                    targets: vec![],
                    broadcast_mode: BroadcastMode::Parallel,
                },
            ))
            .build();

        let report = validate_schema(&doc);
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyGroupList { .. })));
    }

    #[test]
    fn test_schema_report_never_includes_connectivity() {
        let mut doc = two_node_document();
        doc.edges[0].target = "C".to_string();
        // Dangling references are an extended concern
        assert!(validate_schema(&doc).is_valid());
    }
}
