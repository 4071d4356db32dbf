//! Loomflow document model - the portable workflow format
//!
//! This crate defines the executable workflow document that the visual
//! editor exports: executors, typed edges, edge groups and document
//! metadata. It also provides:
//!
//! - Serialization to JSON and to a line-oriented text format
//! - Schema and extended (connectivity/type) validation
//! - The built-in magentic agent preset catalog
//! - A fluent builder for constructing documents programmatically
//!
//! The document is deliberately independent of any canvas representation;
//! conversion to and from the editor graph lives in `loomflow-canvas`.
//!
//! # Example
//!
//! ```
//! use loomflow_document::{DocumentBuilder, ExecutorKind};
//! use loomflow_document::validation::validate_extended;
//!
//! let doc = DocumentBuilder::new("workflow-1")
//!     .name("Review pipeline")
//!     .executor("fetch", ExecutorKind::Base)
//!     .executor("summarize", ExecutorKind::Base)
//!     .edge("fetch", "summarize")
//!     .build();
//!
//! let report = validate_extended(&doc);
//! assert!(report.is_valid());
//! ```

pub mod builder;
pub mod error;
pub mod presets;
pub mod serialize;
pub mod types;
pub mod validation;

pub use builder::DocumentBuilder;
pub use error::{DocumentError, ParseError, Result, SerializeError};
pub use presets::{find_preset, AgentPreset, MAGENTIC_PRESETS};
pub use serialize::{deserialize, serialize, DocumentFormat};
pub use types::{
    BroadcastMode, CustomMetadata, DocumentMetadata, Edge, EdgeCondition, EdgeGroup,
    EdgeGroupKind, Executor, ExecutorKind, ExecutorMetadata, PlanningStrategy, Position,
    PositionMap, SwitchCaseArm, WorkflowDocument,
};
pub use validation::{
    validate_extended, validate_schema, SchemaReport, TypeIssue, ValidationError, ValidationReport,
    ValidationWarning,
};
