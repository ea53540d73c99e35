use egui::{Painter, Pos2, Vec2};

use super::Tool;
use crate::command::Command;
use crate::stroke::MutableStroke;
use crate::surface::Surface;

/// Freehand brush. Uses whatever brush style the surface holds when the stroke starts.
#[derive(Debug, Clone, Default)]
pub struct DrawStrokeTool {
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<MutableStroke>,
}

impl DrawStrokeTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_stroke(&self) -> Option<&MutableStroke> {
        self.current_stroke.as_ref()
    }
}

impl Tool for DrawStrokeTool {
    fn name(&self) -> &'static str {
        "DrawStroke"
    }

    fn reset(&mut self) {
        self.current_stroke = None;
    }

    fn on_pointer_down(&mut self, pos: Pos2, surface: &Surface) -> Option<Command> {
        let mut stroke = MutableStroke::new(surface.brush());
        stroke.add_point(pos);
        self.current_stroke = Some(stroke);
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, _surface: &Surface) -> Option<Command> {
        if let Some(stroke) = &mut self.current_stroke {
            stroke.add_point(pos);
        }
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, _surface: &Surface) -> Option<Command> {
        let mut stroke = self.current_stroke.take()?;
        stroke.add_point(pos);
        Some(Command::AddElement(stroke.into_element()))
    }

    fn draw_preview(&self, painter: &Painter, offset: Vec2) {
        if let Some(stroke) = &self.current_stroke {
            stroke.draw_preview(painter, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::tool_state::StrokeStyle;
    use egui::pos2;

    #[test]
    fn stroke_is_committed_on_release() {
        let mut surface = Surface::create(true);
        let style = StrokeStyle { color: Rgba::opaque(255, 0, 0), width: 4.0 };
        surface.set_brush(style);

        let mut tool = DrawStrokeTool::new();
        assert!(tool.on_pointer_down(pos2(10.0, 10.0), &surface).is_none());
        assert!(tool.on_pointer_move(pos2(20.0, 15.0), &surface).is_none());
        let command = tool.on_pointer_up(pos2(30.0, 20.0), &surface).unwrap();
        command.execute(&mut surface);

        assert!(tool.current_stroke().is_none());
        let stroke = surface.elements()[0].as_stroke().unwrap();
        assert_eq!(stroke.points().len(), 3);
        assert_eq!(stroke.color(), style.color);
        assert_eq!(stroke.width(), 4.0);
    }

    #[test]
    fn release_without_press_does_nothing() {
        let surface = Surface::create(true);
        let mut tool = DrawStrokeTool::new();
        assert!(tool.on_pointer_up(pos2(1.0, 1.0), &surface).is_none());
    }
}
