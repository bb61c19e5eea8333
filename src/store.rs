//! Overlay registry: the tools attached to one chart pane.
//!
//! `ToolStore` owns every live [`Tool`] keyed by id. The renderer walks
//! `sorted_tools` for draw order, the input engine hit-tests through
//! `hit_test`, and the host's bar scheduler runs `evaluate_alerts` once per
//! completed bar. Detaching a tool is its end of life.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::alert::{AlertRule, Bar, check_alert};
use crate::coords::ChartHost;
use crate::error::{DrawError, ToolError};
use crate::render::Surface;
use crate::tool::{HitTestResult, Tool, ToolId};

/// A hit on a specific tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreHit {
    pub id: ToolId,
    pub result: HitTestResult,
}

/// In-memory store of attached tools.
#[derive(Debug, Default)]
pub struct ToolStore {
    tools: HashMap<ToolId, Tool>,
}

impl ToolStore {
    #[must_use]
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Attach a tool, replacing any tool with the same id. Returns its id.
    pub fn insert(&mut self, tool: Tool) -> ToolId {
        let id = tool.id;
        debug!(%id, kind = %tool.kind, anchors = tool.anchors.len(), "tool attached");
        self.tools.insert(id, tool);
        id
    }

    /// Detach a tool, returning it if it was attached.
    pub fn remove(&mut self, id: &ToolId) -> Option<Tool> {
        let removed = self.tools.remove(id);
        if removed.is_some() {
            debug!(%id, "tool detached");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, id: &ToolId) -> Option<&Tool> {
        self.tools.get(id)
    }

    pub fn get_mut(&mut self, id: &ToolId) -> Option<&mut Tool> {
        self.tools.get_mut(id)
    }

    /// Merge style options into a tool. Returns whether a repaint is needed.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] if no tool has this id.
    pub fn apply_options(&mut self, id: &ToolId, partial: &Value) -> Result<bool, ToolError> {
        let tool = self.tools.get_mut(id).ok_or(ToolError::NotFound(*id))?;
        Ok(tool.apply_options(partial))
    }

    /// Mark exactly one tool (or none) as selected.
    pub fn select(&mut self, id: Option<ToolId>) {
        for (tool_id, tool) in &mut self.tools {
            tool.set_selected(Some(*tool_id) == id);
        }
    }

    /// All tools sorted by `(z_index, id)` for draw order.
    #[must_use]
    pub fn sorted_tools(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        tools
    }

    /// Recompute every tool's view for the current frame.
    pub fn refresh(&mut self, host: &dyn ChartHost) {
        for tool in self.tools.values_mut() {
            tool.update_view(host);
        }
    }

    /// Draw all tools bottom to top.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first surface failure.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), DrawError> {
        for tool in self.sorted_tools() {
            tool.draw(surface)?;
        }
        Ok(())
    }

    /// Topmost tool under `(x, y)`.
    ///
    /// The selected tool's handles are checked first so a handle stays
    /// grabbable even when another tool is drawn over it.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64, selected: Option<ToolId>) -> Option<StoreHit> {
        if let Some(id) = selected {
            if let Some(index) = self.tools.get(&id).and_then(|t| t.handle_hit_test(x, y)) {
                return Some(StoreHit { id, result: HitTestResult::point(index) });
            }
        }
        self.sorted_tools()
            .into_iter()
            .rev()
            .find_map(|tool| tool.tool_hit_test(x, y).map(|result| StoreHit { id: tool.id, result }))
    }

    /// Rules whose condition holds for `bar` at `logical_index`.
    ///
    /// Rules naming a detached tool never fire.
    #[must_use]
    pub fn evaluate_alerts(&self, rules: &[AlertRule], bar: &Bar, logical_index: f64) -> Vec<AlertRule> {
        rules
            .iter()
            .filter(|rule| {
                let fired = self
                    .tools
                    .get(&rule.tool_id)
                    .is_some_and(|tool| check_alert(tool, bar, logical_index, rule.condition));
                if fired {
                    debug!(tool_id = %rule.tool_id, condition = %rule.condition, logical_index, "alert triggered");
                }
                fired
            })
            .copied()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
