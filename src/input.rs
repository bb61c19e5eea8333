//! Input model: mouse buttons, keys, and the drag state machine.
//!
//! `InputState` is the drag session tracked between pointer-down and
//! pointer-up. Only one tool is addressed per session.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::coords::LogicalPoint;
use crate::tool::ToolId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The currently selected tool, if any.
    pub selected_id: Option<ToolId>,
    /// Last cursor requested from the host.
    pub cursor: String,
}

/// Drag session state.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Moving one anchor (possibly virtual) of a tool.
    DraggingAnchor {
        id: ToolId,
        index: usize,
        /// Logical and price distance from the pointer to the anchor when the
        /// drag began. Zero when grabbed on the handle itself, non-zero when
        /// grabbed through a text box.
        grab_offset: (f64, f64),
    },
    /// Moving a whole tool rigidly.
    DraggingTool {
        id: ToolId,
        /// Pointer position in chart space when the drag began.
        start: LogicalPoint,
        /// Anchors when the drag began; each move offsets these.
        orig_anchors: Vec<LogicalPoint>,
    },
}

impl InputState {
    /// The tool addressed by the active drag.
    #[must_use]
    pub fn dragging(&self) -> Option<ToolId> {
        match self {
            Self::Idle => None,
            Self::DraggingAnchor { id, .. } | Self::DraggingTool { id, .. } => Some(*id),
        }
    }
}
