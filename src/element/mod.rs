use egui::{Painter, Pos2, Rect, Vec2};

mod common;
pub(crate) mod image;
pub(crate) mod stroke;
pub(crate) mod text;

pub use common::next_element_id;
pub(crate) use common::distance_to_line_segment;
pub use self::image::Image;
pub use stroke::Stroke;
pub use text::{DEFAULT_FONT_SIZE, TextBox};

/// Common trait that all surface elements implement.
///
/// Coordinates are in canvas space, with the origin at the top-left corner of the
/// drawing surface.
pub trait Element {
    /// Unique identifier for this element
    fn id(&self) -> usize;

    fn element_type(&self) -> &'static str;

    /// Top-left anchor (`left`, `top`)
    fn position(&self) -> Pos2;

    /// Bounding rectangle
    fn rect(&self) -> Rect;

    /// Draw the element, shifted by `offset` into screen space
    fn draw(&self, painter: &Painter, offset: Vec2);

    fn hit_test(&self, pos: Pos2) -> bool;

    fn translate(&mut self, delta: Vec2);
}

/// Everything that can live on a surface
#[derive(Clone, Debug)]
pub enum ElementType {
    Stroke(Stroke),
    Text(TextBox),
    Image(Image),
}

impl ElementType {
    pub fn as_text(&self) -> Option<&TextBox> {
        match self {
            ElementType::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBox> {
        match self {
            ElementType::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            ElementType::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            ElementType::Image(i) => Some(i),
            _ => None,
        }
    }
}

impl Element for ElementType {
    fn id(&self) -> usize {
        match self {
            ElementType::Stroke(s) => s.id(),
            ElementType::Text(t) => t.id(),
            ElementType::Image(i) => i.id(),
        }
    }

    fn element_type(&self) -> &'static str {
        match self {
            ElementType::Stroke(s) => s.element_type(),
            ElementType::Text(t) => t.element_type(),
            ElementType::Image(i) => i.element_type(),
        }
    }

    fn position(&self) -> Pos2 {
        match self {
            ElementType::Stroke(s) => s.position(),
            ElementType::Text(t) => t.position(),
            ElementType::Image(i) => i.position(),
        }
    }

    fn rect(&self) -> Rect {
        match self {
            ElementType::Stroke(s) => s.rect(),
            ElementType::Text(t) => t.rect(),
            ElementType::Image(i) => i.rect(),
        }
    }

    fn draw(&self, painter: &Painter, offset: Vec2) {
        match self {
            ElementType::Stroke(s) => s.draw(painter, offset),
            ElementType::Text(t) => t.draw(painter, offset),
            ElementType::Image(i) => i.draw(painter, offset),
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        match self {
            ElementType::Stroke(s) => s.hit_test(pos),
            ElementType::Text(t) => t.hit_test(pos),
            ElementType::Image(i) => i.hit_test(pos),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            ElementType::Stroke(s) => s.translate(delta),
            ElementType::Text(t) => t.translate(delta),
            ElementType::Image(i) => i.translate(delta),
        }
    }
}

/// Factory functions for creating elements with fresh ids
pub mod factory {
    use super::*;
    use crate::color::Rgba;
    use ::image::RgbaImage;
    use std::sync::Arc;

    pub fn create_stroke(points: Vec<Pos2>, width: f32, color: Rgba) -> ElementType {
        ElementType::Stroke(Stroke::new(next_element_id(), points, width, color))
    }

    pub fn create_text(position: Pos2, fill: Rgba, font_size: f32) -> ElementType {
        ElementType::Text(TextBox::new(next_element_id(), position, fill, font_size))
    }

    pub fn create_image(pixels: Arc<RgbaImage>, position: Pos2) -> ElementType {
        ElementType::Image(Image::new(next_element_id(), pixels, position))
    }
}
