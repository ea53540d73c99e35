//! The drawing surface and its mount/dispose lifecycle.

use egui::{Pos2, Vec2, pos2};
use log::{debug, info};
use uuid::Uuid;

use crate::color::Rgba;
use crate::element::{Element, ElementType};
use crate::tool_state::StrokeStyle;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;
pub const BACKGROUND: Rgba = Rgba::WHITE;
/// Where inserted text boxes and images are anchored
pub const INSERT_POSITION: Pos2 = pos2(100.0, 100.0);

/// Identity of one mounted surface, so late async work can tell it was remounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A mutable drawing canvas with an ordered list of elements
#[derive(Debug)]
pub struct Surface {
    id: SurfaceId,
    drawing_mode: bool,
    background: Rgba,
    elements: Vec<ElementType>,
    active: Option<usize>,
    brush: StrokeStyle,
}

impl Surface {
    /// Allocates an empty 800x600 white surface.
    pub fn create(drawing_mode: bool) -> Self {
        let id = SurfaceId(Uuid::new_v4());
        info!("Creating surface {id} (drawing mode: {drawing_mode})");
        Self {
            id,
            drawing_mode,
            background: BACKGROUND,
            elements: Vec::new(),
            active: None,
            brush: StrokeStyle::default(),
        }
    }

    /// Releases the surface and everything drawn on it.
    pub fn dispose(self) {
        info!("Disposing surface {} ({} elements)", self.id, self.elements.len());
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32)
    }

    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn set_drawing_mode(&mut self, drawing_mode: bool) {
        self.drawing_mode = drawing_mode;
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn brush(&self) -> StrokeStyle {
        self.brush
    }

    pub fn set_brush(&mut self, brush: StrokeStyle) {
        self.brush = brush;
    }

    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: usize) -> Option<&ElementType> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn element_mut(&mut self, id: usize) -> Option<&mut ElementType> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Appends an element on top of everything else and returns its id.
    pub fn add(&mut self, element: ElementType) -> usize {
        let id = element.id();
        debug!("Adding {} {} to surface {}", element.element_type(), id, self.id);
        self.elements.push(element);
        id
    }

    /// Topmost element under `pos`
    pub fn element_at(&self, pos: Pos2) -> Option<usize> {
        self.elements.iter().rev().find(|e| e.hit_test(pos)).map(|e| e.id())
    }

    pub fn active_id(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&ElementType> {
        self.active.and_then(|id| self.element(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut ElementType> {
        let id = self.active?;
        self.element_mut(id)
    }

    /// Makes `id` the active element. Unknown ids clear the selection.
    pub fn set_active(&mut self, id: Option<usize>) {
        if let Some(text) = self.active_mut().and_then(ElementType::as_text_mut) {
            text.exit_editing();
        }
        self.active = id.filter(|id| self.element(*id).is_some());
    }

    /// Removes every element. Background, brush and drawing mode are kept.
    pub fn clear(&mut self) {
        debug!("Clearing {} elements from surface {}", self.elements.len(), self.id);
        self.elements.clear();
        self.active = None;
    }
}

/// Holds the single live surface, disposing the old one before mounting a new one
#[derive(Debug, Default)]
pub struct CanvasHost {
    surface: Option<Surface>,
}

impl CanvasHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disposes the current surface (if any) and mounts a fresh, empty one.
    pub fn remount(&mut self, drawing_mode: bool) -> &mut Surface {
        self.unmount();
        self.surface.insert(Surface::create(drawing_mode))
    }

    pub fn unmount(&mut self) {
        if let Some(old) = self.surface.take() {
            old.dispose();
        }
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;

    #[test]
    fn new_surface_is_blank() {
        let surface = Surface::create(true);
        assert!(surface.is_empty());
        assert_eq!(surface.background(), Rgba::WHITE);
        assert_eq!(surface.size(), Vec2::new(800.0, 600.0));
        assert!(surface.active().is_none());
    }

    #[test]
    fn remount_replaces_surface() {
        let mut host = CanvasHost::new();
        let first = host.remount(true).id();
        host.surface_mut()
            .unwrap()
            .add(factory::create_stroke(vec![pos2(1.0, 1.0)], 3.0, Rgba::BLACK));

        let second = host.remount(true);
        assert_ne!(second.id(), first);
        assert!(second.is_empty());

        host.unmount();
        assert!(host.surface().is_none());
    }

    #[test]
    fn element_at_prefers_topmost() {
        let mut surface = Surface::create(false);
        let below = surface.add(factory::create_text(INSERT_POSITION, Rgba::BLACK, 20.0));
        let above = surface.add(factory::create_stroke(
            vec![pos2(90.0, 105.0), pos2(150.0, 105.0)],
            6.0,
            Rgba::BLACK,
        ));
        assert_eq!(surface.element_at(pos2(110.0, 105.0)), Some(above));
        assert_eq!(surface.element_at(pos2(110.0, 118.0)), Some(below));
        assert_eq!(surface.element_at(pos2(700.0, 500.0)), None);
    }

    #[test]
    fn clear_keeps_brush_and_background() {
        let mut surface = Surface::create(true);
        let brush = StrokeStyle { color: Rgba::opaque(255, 0, 0), width: 12.0 };
        surface.set_brush(brush);
        let id = surface.add(factory::create_text(INSERT_POSITION, Rgba::BLACK, 20.0));
        surface.set_active(Some(id));

        surface.clear();
        assert!(surface.is_empty());
        assert!(surface.active().is_none());
        assert_eq!(surface.brush(), brush);
        assert_eq!(surface.background(), Rgba::WHITE);
        assert!(surface.drawing_mode());
    }
}
