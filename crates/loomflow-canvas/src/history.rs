//! Canvas history as compressed snapshots
//!
//! Undo/redo over the canvas is a bounded ring of immutable snapshots
//! rather than a command log: any mutation is covered without inverse
//! operations, and zstd keeps full-graph snapshots cheap. Entries are
//! stored compressed and materialized fresh on access, so no history
//! entry ever shares mutable state with another or with the live canvas.

use std::collections::VecDeque;

use crate::error::{CanvasError, Result};
use crate::types::CanvasState;

/// Compression level for snapshots; zstd's fast range is plenty here.
const COMPRESSION_LEVEL: i32 = 3;

/// Bounded undo/redo ring of compressed canvas snapshots.
pub struct HistoryStack {
    /// Compressed snapshots, oldest first.
    snapshots: VecDeque<Vec<u8>>,
    /// Index of the current snapshot.
    current: usize,
    /// Maximum number of snapshots kept.
    capacity: usize,
}

impl HistoryStack {
    /// Create a history keeping at most `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            current: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new snapshot, truncating any redo entries.
    pub fn push(&mut self, state: &CanvasState) -> Result<()> {
        let json = serde_json::to_vec(state)?;
        let compressed = zstd::encode_all(&json[..], COMPRESSION_LEVEL)
            .map_err(|e| CanvasError::Compression(e.to_string()))?;

        while self.snapshots.len() > self.current + 1 {
            self.snapshots.pop_back();
        }
        self.snapshots.push_back(compressed);
        self.current = self.snapshots.len() - 1;

        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            self.current = self.current.saturating_sub(1);
        }
        Ok(())
    }

    /// Step back one snapshot, or `None` at the beginning.
    pub fn undo(&mut self) -> Option<Result<CanvasState>> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        Some(self.materialize(self.current))
    }

    /// Step forward one snapshot, or `None` at the end.
    pub fn redo(&mut self) -> Option<Result<CanvasState>> {
        if self.current + 1 >= self.snapshots.len() {
            return None;
        }
        self.current += 1;
        Some(self.materialize(self.current))
    }

    /// The current snapshot, without moving.
    pub fn current(&self) -> Option<Result<CanvasState>> {
        if self.snapshots.is_empty() {
            None
        } else {
            Some(self.materialize(self.current))
        }
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.current = 0;
    }

    /// Total compressed size in bytes, for diagnostics.
    pub fn compressed_size(&self) -> usize {
        self.snapshots.iter().map(Vec::len).sum()
    }

    fn materialize(&self, index: usize) -> Result<CanvasState> {
        let json = zstd::decode_all(&self.snapshots[index][..])
            .map_err(|e| CanvasError::Compression(e.to_string()))?;
        Ok(serde_json::from_slice(&json)?)
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(100)
    }
}
