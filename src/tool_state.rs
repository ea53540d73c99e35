//! The currently selected drawing parameters and the stroke style derived from them.

use crate::color::{self, Rgba};
use crate::error::ToolError;
use serde::{Deserialize, Serialize};

pub const MIN_BRUSH_WIDTH: u32 = 1;
pub const MAX_BRUSH_WIDTH: u32 = 20;
pub const DEFAULT_BRUSH_WIDTH: u32 = 5;

/// The tool buttons of the tool bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Pen,
    Fluorescent,
    /// Paints opaque white at the current width. The colour stays pinned to white while
    /// the eraser is selected, even if a swatch is picked or the width changes; the
    /// picked colour is stored and used again once another tool is chosen.
    Eraser,
}

impl ToolMode {
    pub fn label(self) -> &'static str {
        match self {
            ToolMode::Pen => "Pen",
            ToolMode::Fluorescent => "Highlighter",
            ToolMode::Eraser => "Eraser",
        }
    }
}

/// Brush parameters written into the surface while it is in drawing mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            width: DEFAULT_BRUSH_WIDTH as f32,
        }
    }
}

/// Tool state persisted between sessions; the drawing itself never is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolState {
    color: String,
    brush_width: u32,
    drawing_mode: bool,
    fluorescent: bool,
    mode: ToolMode,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            color: "#000000".to_owned(),
            brush_width: DEFAULT_BRUSH_WIDTH,
            drawing_mode: true,
            fluorescent: false,
            mode: ToolMode::Pen,
        }
    }
}

impl ToolState {
    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn brush_width(&self) -> u32 {
        self.brush_width
    }

    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn fluorescent(&self) -> bool {
        self.fluorescent
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Restores the width and colour rules on state that bypassed the setters, such as
    /// preferences loaded from storage.
    pub fn sanitized(mut self) -> Self {
        let width = i32::try_from(self.brush_width).unwrap_or(i32::MAX);
        self.set_brush_width(width);
        if color::parse_hex(&self.color).is_none() {
            log::warn!("Stored colour {:?} is invalid, using black", self.color);
            self.color = Self::default().color;
        }
        self
    }

    /// Sets the base colour. Only `#RRGGBB` strings are accepted.
    pub fn set_color(&mut self, hex: &str) -> Result<(), ToolError> {
        if color::parse_hex(hex).is_none() {
            return Err(ToolError::InvalidColor(hex.to_owned()));
        }
        self.color = hex.to_owned();
        Ok(())
    }

    /// Sets the brush width, clamped to `MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH`.
    pub fn set_brush_width(&mut self, width: i32) {
        self.brush_width = width.clamp(MIN_BRUSH_WIDTH as i32, MAX_BRUSH_WIDTH as i32) as u32;
    }

    pub fn set_fluorescent(&mut self, fluorescent: bool) {
        self.fluorescent = fluorescent;
    }

    /// Returns true if the flag changed, i.e. the surface must be remounted.
    pub fn set_drawing_mode(&mut self, drawing_mode: bool) -> bool {
        let changed = self.drawing_mode != drawing_mode;
        self.drawing_mode = drawing_mode;
        changed
    }

    /// Switches tool. Pen clears the fluorescent flag, the highlighter sets it and the
    /// eraser leaves it untouched. The brush width is never changed.
    pub fn set_mode(&mut self, mode: ToolMode) {
        match mode {
            ToolMode::Pen => self.fluorescent = false,
            ToolMode::Fluorescent => self.fluorescent = true,
            ToolMode::Eraser => {}
        }
        self.mode = mode;
    }

    /// Colour actually painted with the current settings.
    pub fn effective_color(&self) -> Rgba {
        match self.mode {
            ToolMode::Eraser => Rgba::WHITE,
            _ if self.fluorescent => color::apply_fluorescent_effect(&self.color),
            _ => Rgba::from_hex(&self.color).unwrap_or(Rgba::BLACK),
        }
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.effective_color(),
            width: self.brush_width as f32,
        }
    }

    /// Fill colour used for new text boxes. The eraser does not affect it.
    pub fn fill_color(&self) -> Rgba {
        Rgba::from_hex(&self.color).unwrap_or(Rgba::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_clamped_on_write() {
        let mut tools = ToolState::default();
        tools.set_brush_width(25);
        assert_eq!(tools.brush_width(), 20);
        tools.set_brush_width(0);
        assert_eq!(tools.brush_width(), 1);
        tools.set_brush_width(-7);
        assert_eq!(tools.brush_width(), 1);
        tools.set_brush_width(12);
        assert_eq!(tools.brush_width(), 12);
    }

    #[test]
    fn eraser_paints_white_at_current_width() {
        let mut tools = ToolState::default();
        tools.set_color("#FF0000").unwrap();
        tools.set_brush_width(9);
        tools.set_mode(ToolMode::Eraser);
        assert_eq!(tools.stroke_style(), StrokeStyle { color: Rgba::WHITE, width: 9.0 });

        // Still pinned after picking another colour
        tools.set_color("#0000FF").unwrap();
        assert_eq!(tools.effective_color(), Rgba::WHITE);
        assert_eq!(tools.color(), "#0000FF");
    }

    #[test]
    fn highlighter_applies_effect() {
        let mut tools = ToolState::default();
        tools.set_color("#FFE820").unwrap();
        tools.set_mode(ToolMode::Fluorescent);
        assert!(tools.fluorescent());
        assert_eq!(tools.effective_color(), Rgba { r: 255, g: 232, b: 32, a: 0.7 });

        tools.set_mode(ToolMode::Pen);
        assert!(!tools.fluorescent());
        assert_eq!(tools.effective_color(), Rgba::opaque(255, 232, 32));
    }

    #[test]
    fn invalid_color_is_rejected() {
        let mut tools = ToolState::default();
        let err = tools.set_color("red").unwrap_err();
        assert_eq!(err, ToolError::InvalidColor("red".into()));
        assert_eq!(tools.color(), "#000000");
    }

    #[test]
    fn sanitized_repairs_stored_values() {
        let stored = ToolState {
            color: "red".to_owned(),
            brush_width: 99,
            drawing_mode: false,
            fluorescent: true,
            mode: ToolMode::Fluorescent,
        };
        let tools = stored.sanitized();
        assert_eq!(tools.color(), "#000000");
        assert_eq!(tools.brush_width(), MAX_BRUSH_WIDTH);
        assert!(!tools.drawing_mode());
        assert_eq!(tools.mode(), ToolMode::Fluorescent);

        let zero = ToolState { brush_width: 0, ..ToolState::default() }.sanitized();
        assert_eq!(zero.brush_width(), MIN_BRUSH_WIDTH);

        let valid = ToolState { color: "#00A0E6".to_owned(), brush_width: 7, ..ToolState::default() };
        assert_eq!(valid.clone().sanitized(), valid);
    }

    #[test]
    fn drawing_mode_reports_changes() {
        let mut tools = ToolState::default();
        assert!(!tools.set_drawing_mode(true));
        assert!(tools.set_drawing_mode(false));
        assert!(tools.set_drawing_mode(true));
    }
}
