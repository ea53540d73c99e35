use egui::{Painter, Pos2, Shape, Stroke as EguiStroke, Vec2};

use crate::element::{ElementType, factory};
use crate::tool_state::StrokeStyle;

/// A freehand path still being drawn. Becomes a stroke element on pointer release.
#[derive(Debug, Clone)]
pub struct MutableStroke {
    points: Vec<Pos2>,
    style: StrokeStyle,
}

impl MutableStroke {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            points: Vec::new(),
            style,
        }
    }

    /// Adds a point, skipping repeats of the last one
    pub fn add_point(&mut self, point: Pos2) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Draws the in-progress path
    pub fn draw_preview(&self, painter: &Painter, offset: Vec2) {
        let color: egui::Color32 = self.style.color.into();
        match self.points.as_slice() {
            [] => {}
            [point] => {
                painter.circle_filled(*point + offset, self.style.width / 2.0, color);
            }
            points => {
                let points = points.iter().map(|p| *p + offset).collect();
                painter.add(Shape::line(points, EguiStroke::new(self.style.width, color)));
            }
        }
    }

    pub fn into_element(self) -> ElementType {
        factory::create_stroke(self.points, self.style.width, self.style.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::element::Element;
    use egui::pos2;

    #[test]
    fn repeated_points_are_dropped() {
        let mut stroke = MutableStroke::new(StrokeStyle::default());
        stroke.add_point(pos2(1.0, 1.0));
        stroke.add_point(pos2(1.0, 1.0));
        stroke.add_point(pos2(2.0, 1.0));
        assert_eq!(stroke.points().len(), 2);
    }

    #[test]
    fn into_element_keeps_style() {
        let style = StrokeStyle { color: Rgba::opaque(0, 0, 255), width: 7.0 };
        let mut stroke = MutableStroke::new(style);
        stroke.add_point(pos2(10.0, 10.0));
        stroke.add_point(pos2(20.0, 10.0));

        let element = stroke.into_element();
        assert_eq!(element.element_type(), "stroke");
        let stroke = element.as_stroke().unwrap();
        assert_eq!(stroke.width(), 7.0);
        assert_eq!(stroke.color(), Rgba::opaque(0, 0, 255));
        assert_eq!(stroke.points(), &[pos2(10.0, 10.0), pos2(20.0, 10.0)]);
    }
}
