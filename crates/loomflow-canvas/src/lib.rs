//! Loomflow canvas layer - editor graph types and document conversion
//!
//! The canvas is the positioned, editor-facing encoding of a workflow:
//! nodes with screen coordinates and payloads, plus rendered edges. This
//! crate translates between that encoding and the portable workflow
//! document, and carries the canvas-side machinery around it:
//!
//! - `codec`: bidirectional conversion (`graph_to_document` /
//!   `document_to_graph`) with round-trip fidelity
//! - `factory`: well-formed default executors per node type, including
//!   magentic preset expansion
//! - `scaffold`: the idempotent "ensure a full magentic team" operation
//! - `history`: bounded undo/redo over compressed canvas snapshots
//!
//! Conversion never fails and never validates referential integrity;
//! gate imported documents with `loomflow_document::validation` before
//! trusting them.
//!
//! # Example
//!
//! ```
//! use loomflow_canvas::{ensure_magentic_scaffold, graph_to_document, ScaffoldOptions};
//!
//! let mut nodes = Vec::new();
//! let mut edges = Vec::new();
//! ensure_magentic_scaffold(&mut nodes, &mut edges, &ScaffoldOptions::default());
//!
//! let doc = graph_to_document(&nodes, &edges, "wf-team", Some("Magentic team"));
//! assert!(!doc.executors.is_empty());
//! ```

pub mod builder;
pub mod codec;
pub mod error;
pub mod factory;
pub mod history;
pub mod scaffold;
pub mod types;

pub use builder::CanvasBuilder;
pub use codec::{document_to_graph, graph_to_document};
pub use error::{CanvasError, Result};
pub use factory::{
    executor_from_node_type, node_data_from_executor, node_type_for_executor, node_type_for_group,
    FactoryOptions,
};
pub use history::HistoryStack;
pub use scaffold::{ensure_magentic_scaffold, ScaffoldOptions, ScaffoldReport, AGENT_RING_RADIUS};
pub use types::{
    CanvasEdge, CanvasNode, CanvasState, EdgeGroupNodeData, EdgeRenderData, EdgeRenderType,
    ExecutorNodeData, NodePayload, NodeType, PayloadVariant,
};
