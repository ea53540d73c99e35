use egui::{Color32, Painter, Pos2, Stroke as EguiStroke, Vec2};

use super::Tool;
use crate::command::Command;
use crate::element::Element;
use crate::surface::Surface;

const OUTLINE_COLOR: Color32 = Color32::from_rgb(33, 150, 243);

/// Picks and drags elements while the surface is not in drawing mode
#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    dragging: Option<Drag>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    id: usize,
    last: Pos2,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }
}

impl Tool for SelectTool {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn reset(&mut self) {
        self.dragging = None;
    }

    fn on_pointer_down(&mut self, pos: Pos2, surface: &Surface) -> Option<Command> {
        let hit = surface.element_at(pos);
        self.dragging = hit.map(|id| Drag { id, last: pos });
        match hit {
            // A second click on the selected text box starts editing it
            Some(id) if hit == surface.active_id() => surface
                .element(id)
                .and_then(|e| e.as_text())
                .filter(|t| !t.is_editing())
                .map(|_| Command::EditText(id)),
            _ if hit == surface.active_id() => None,
            _ => Some(Command::Select(hit)),
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, _surface: &Surface) -> Option<Command> {
        let drag = self.dragging.as_mut()?;
        let delta = pos - drag.last;
        if delta == Vec2::ZERO {
            return None;
        }
        drag.last = pos;
        Some(Command::Move { id: drag.id, delta })
    }

    fn on_pointer_up(&mut self, pos: Pos2, surface: &Surface) -> Option<Command> {
        let command = self.on_pointer_move(pos, surface);
        self.dragging = None;
        command
    }
}

/// Outline drawn around the active element
pub fn draw_selection_outline(painter: &Painter, surface: &Surface, offset: Vec2) {
    if let Some(element) = surface.active() {
        let rect = element.rect().expand(3.0).translate(offset);
        painter.rect_stroke(rect, 0.0, EguiStroke::new(1.5, OUTLINE_COLOR));
    }
}
