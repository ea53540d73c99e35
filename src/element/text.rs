use egui::{Align2, FontId, Painter, Pos2, Rect, Vec2};

use super::Element;
use crate::color::Rgba;

pub const DEFAULT_FONT_SIZE: f32 = 20.0;
/// Line height as a multiple of the font size
pub const LINE_HEIGHT: f32 = 1.16;
/// Width of an empty text box, so it can still be clicked
pub const MIN_TEXT_BOX_WIDTH: f32 = 40.0;
// Rough advance per character used for hit testing without a font
const AVG_CHAR_WIDTH: f32 = 0.55;

/// Editable text box
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    id: usize,
    position: Pos2,
    text: String,
    fill: Rgba,
    font_size: f32,
    editing: bool,
}

impl TextBox {
    pub fn new(id: usize, position: Pos2, fill: Rgba, font_size: f32) -> Self {
        Self {
            id,
            position,
            text: String::new(),
            fill,
            font_size,
            editing: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn fill(&self) -> Rgba {
        self.fill
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font_id(&self) -> FontId {
        FontId::proportional(self.font_size)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn enter_editing(&mut self) {
        self.editing = true;
    }

    pub fn exit_editing(&mut self) {
        self.editing = false;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

impl Element for TextBox {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "text"
    }

    fn position(&self) -> Pos2 {
        self.position
    }

    fn rect(&self) -> Rect {
        let widest = self.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = (widest as f32 * self.font_size * AVG_CHAR_WIDTH).max(MIN_TEXT_BOX_WIDTH);
        let height = self.lines().count() as f32 * self.font_size * LINE_HEIGHT;
        Rect::from_min_size(self.position, Vec2::new(width, height))
    }

    fn draw(&self, painter: &Painter, offset: Vec2) {
        // While editing, the text edit widget renders the content
        if self.editing || self.text.is_empty() {
            return;
        }
        painter.text(
            self.position + offset,
            Align2::LEFT_TOP,
            &self.text,
            self.font_id(),
            self.fill.into(),
        );
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
