use tracing::{debug, trace};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::coords::{ChartHost, LogicalPoint, coordinate_to_point};
use crate::error::{DrawError, ToolError};
use crate::geometry::Point;
use crate::input::{Button, InputState, Key, UiState};
use crate::store::ToolStore;
use crate::tool::{HitKind, Tool, ToolId};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A drag finished; persist the tool's new anchors.
    ToolUpdated { id: ToolId, anchors: Vec<LogicalPoint> },
    ToolRemoved { id: ToolId },
    SelectionChanged(Option<ToolId>),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: everything that does not touch the browser.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub store: ToolStore,
    pub ui: UiState,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Registry ---

    /// Attach a tool to the pane.
    pub fn add_tool(&mut self, tool: Tool) -> ToolId {
        self.store.insert(tool)
    }

    /// Detach a tool, ending any drag on it and clearing its selection.
    pub fn remove_tool(&mut self, id: &ToolId) -> Vec<Action> {
        if self.store.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::ToolRemoved { id: *id }];
        if self.input.dragging() == Some(*id) {
            self.input = InputState::Idle;
        }
        if self.ui.selected_id == Some(*id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Merge style options into a tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] if no tool has this id.
    pub fn apply_options(&mut self, id: &ToolId, partial: &serde_json::Value) -> Result<Vec<Action>, ToolError> {
        let repaint = self.store.apply_options(id, partial)?;
        Ok(if repaint { vec![Action::RenderNeeded] } else { Vec::new() })
    }

    /// Recompute every tool's view for the current frame.
    pub fn refresh(&mut self, host: &dyn ChartHost) {
        self.store.refresh(host);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, host: &dyn ChartHost, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            trace!(?button, "ignoring non-primary pointer down");
            return Vec::new();
        }
        let mut actions = Vec::new();
        let Some(hit) = self.store.hit_test(screen_pt.x, screen_pt.y, self.ui.selected_id) else {
            if self.ui.selected_id.is_some() {
                self.set_selection(None, &mut actions);
                actions.push(Action::RenderNeeded);
            }
            return actions;
        };

        self.set_selection(Some(hit.id), &mut actions);
        let Some(tool) = self.store.get(&hit.id) else {
            return actions;
        };
        if tool.is_locked() {
            trace!(id = %hit.id, "tool is locked; not dragging");
            actions.push(Action::RenderNeeded);
            return actions;
        }

        match (hit.result.kind, hit.result.index) {
            (HitKind::Point, Some(handle)) => {
                let index = tool.drag_index(handle);
                let grab_offset = grab_offset(host, tool, handle, screen_pt);
                debug!(id = %hit.id, handle, index, "anchor drag started");
                self.input = InputState::DraggingAnchor { id: hit.id, index, grab_offset };
                self.set_cursor("grabbing", &mut actions);
            }
            _ => {
                if let Some(start) = coordinate_to_point(host, screen_pt) {
                    debug!(id = %hit.id, "tool drag started");
                    self.input =
                        InputState::DraggingTool { id: hit.id, start, orig_anchors: tool.anchors().to_vec() };
                    self.set_cursor("move", &mut actions);
                }
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, host: &dyn ChartHost, screen_pt: Point) -> Vec<Action> {
        match &self.input {
            InputState::Idle => {
                let cursor = match self.store.hit_test(screen_pt.x, screen_pt.y, self.ui.selected_id) {
                    Some(hit) if hit.result.kind == HitKind::Point => "pointer",
                    Some(_) => "move",
                    None => "default",
                };
                let mut actions = Vec::new();
                self.set_cursor(cursor, &mut actions);
                actions
            }
            InputState::DraggingAnchor { id, index, grab_offset } => {
                let (id, index, (d_logical, d_price)) = (*id, *index, *grab_offset);
                let Some(point) = coordinate_to_point(host, screen_pt) else {
                    return Vec::new();
                };
                let point = point.offset(d_logical, d_price);
                let moved = self.store.get_mut(&id).is_some_and(|tool| tool.update_point_by_index(host, index, point));
                if moved { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            InputState::DraggingTool { id, start, orig_anchors } => {
                let Some(point) = coordinate_to_point(host, screen_pt) else {
                    return Vec::new();
                };
                let (d_logical, d_price) = (point.logical - start.logical, point.price - start.price);
                let moved: Vec<LogicalPoint> = orig_anchors.iter().map(|a| a.offset(d_logical, d_price)).collect();
                let id = *id;
                match self.store.get_mut(&id) {
                    Some(tool) => {
                        tool.update_points(host, moved);
                        vec![Action::RenderNeeded]
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self, _host: &dyn ChartHost, _screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let Some(id) = std::mem::take(&mut self.input).dragging() else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if let Some(tool) = self.store.get(&id) {
            debug!(%id, "drag finished");
            actions.push(Action::ToolUpdated { id, anchors: tool.anchors().to_vec() });
        }
        self.set_cursor("default", &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abort the active drag. Updates already applied stay applied.
    pub fn cancel_drag(&mut self) -> Vec<Action> {
        if let Some(id) = std::mem::take(&mut self.input).dragging() {
            debug!(%id, "drag cancelled");
        }
        Vec::new()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => {
                let mut actions = self.cancel_drag();
                if self.ui.selected_id.is_some() {
                    self.set_selection(None, &mut actions);
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
            "Delete" | "Backspace" => {
                let Some(id) = self.ui.selected_id else {
                    return Vec::new();
                };
                if self.store.get(&id).is_some_and(Tool::is_locked) {
                    return Vec::new();
                }
                self.remove_tool(&id)
            }
            other => {
                trace!(key = other, "ignoring key");
                Vec::new()
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ToolId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn tool(&self, id: &ToolId) -> Option<&Tool> {
        self.store.get(id)
    }

    // --- Helpers ---

    fn set_selection(&mut self, id: Option<ToolId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id == id {
            return;
        }
        self.ui.selected_id = id;
        self.store.select(id);
        actions.push(Action::SelectionChanged(id));
    }

    fn set_cursor(&mut self, cursor: &str, actions: &mut Vec<Action>) {
        if self.ui.cursor == cursor {
            return;
        }
        cursor.clone_into(&mut self.ui.cursor);
        actions.push(Action::SetCursor(cursor.to_owned()));
    }
}

/// The full engine. Wraps `EngineCore` and owns the overlay canvas context.
pub struct Engine {
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine drawing into the given overlay context.
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, core: EngineCore::new() }
    }

    // --- Delegated registry ---

    pub fn add_tool(&mut self, tool: Tool) -> ToolId {
        self.core.add_tool(tool)
    }

    pub fn remove_tool(&mut self, id: &ToolId) -> Vec<Action> {
        self.core.remove_tool(id)
    }

    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] if no tool has this id.
    pub fn apply_options(&mut self, id: &ToolId, partial: &serde_json::Value) -> Result<Vec<Action>, ToolError> {
        self.core.apply_options(id, partial)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, host: &dyn ChartHost, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(host, screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, host: &dyn ChartHost, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(host, screen_pt)
    }

    pub fn on_pointer_up(&mut self, host: &dyn ChartHost, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(host, screen_pt, button)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    // --- Render ---

    /// Refresh every tool against the host's current scales and redraw the overlay.
    ///
    /// # Errors
    ///
    /// Returns the first [`DrawError`] raised by the canvas.
    pub fn render(&mut self, host: &dyn ChartHost) -> Result<(), DrawError> {
        self.core.refresh(host);
        let pane = host.pane_size();
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).map_err(surface_err)?;
        self.ctx.clear_rect(0.0, 0.0, pane.width, pane.height);
        self.core.store.draw(&mut self.ctx)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ToolId> {
        self.core.selection()
    }

    #[must_use]
    pub fn tool(&self, id: &ToolId) -> Option<&Tool> {
        self.core.tool(id)
    }
}

fn surface_err(e: JsValue) -> DrawError {
    DrawError::Surface(format!("{e:?}"))
}

/// Pointer-to-anchor distance kept through an anchor drag. A grab on the
/// handle circle snaps the anchor to the pointer; a grab elsewhere (a text
/// box) keeps the box where the pointer took hold of it.
fn grab_offset(host: &dyn ChartHost, tool: &Tool, handle: usize, screen_pt: Point) -> (f64, f64) {
    if tool.handle_hit_test(screen_pt.x, screen_pt.y).is_some() {
        return (0.0, 0.0);
    }
    match (tool.anchors().get(handle), coordinate_to_point(host, screen_pt)) {
        (Some(anchor), Some(grab)) => (anchor.logical - grab.logical, anchor.price - grab.price),
        _ => (0.0, 0.0),
    }
}
