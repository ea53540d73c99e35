use egui::{Painter, Pos2, Vec2};

use crate::command::Command;
use crate::surface::Surface;

mod draw_stroke_tool;
mod select_tool;

pub use draw_stroke_tool::DrawStrokeTool;
pub use select_tool::{SelectTool, draw_selection_outline};

/// Pointer handling for the canvas. Positions are in canvas coordinates.
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Drop any in-progress interaction
    fn reset(&mut self);

    /// Pointer pressed on the canvas. Returns a command to apply immediately, if any.
    fn on_pointer_down(&mut self, pos: Pos2, surface: &Surface) -> Option<Command>;

    /// Pointer moved while held down
    fn on_pointer_move(&mut self, pos: Pos2, surface: &Surface) -> Option<Command>;

    /// Pointer released
    fn on_pointer_up(&mut self, pos: Pos2, surface: &Surface) -> Option<Command>;

    /// Paint transient feedback on top of the surface
    fn draw_preview(&self, _painter: &Painter, _offset: Vec2) {}
}

/// The tool driving the canvas, chosen by the surface's drawing mode
#[derive(Debug, Clone)]
pub enum ToolType {
    DrawStroke(DrawStrokeTool),
    Select(SelectTool),
}

impl ToolType {
    pub fn for_mode(drawing_mode: bool) -> Self {
        if drawing_mode {
            Self::DrawStroke(DrawStrokeTool::new())
        } else {
            Self::Select(SelectTool::new())
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::DrawStroke(_))
    }

    fn tool(&self) -> &dyn Tool {
        match self {
            Self::DrawStroke(t) => t,
            Self::Select(t) => t,
        }
    }

    fn tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::DrawStroke(t) => t,
            Self::Select(t) => t,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        self.tool().name()
    }

    fn reset(&mut self) {
        self.tool_mut().reset()
    }

    fn on_pointer_down(&mut self, pos: Pos2, surface: &Surface) -> Option<Command> {
        self.tool_mut().on_pointer_down(pos, surface)
    }

    fn on_pointer_move(&mut self, pos: Pos2, surface: &Surface) -> Option<Command> {
        self.tool_mut().on_pointer_move(pos, surface)
    }

    fn on_pointer_up(&mut self, pos: Pos2, surface: &Surface) -> Option<Command> {
        self.tool_mut().on_pointer_up(pos, surface)
    }

    fn draw_preview(&self, painter: &Painter, offset: Vec2) {
        self.tool().draw_preview(painter, offset)
    }
}
