use egui::{Painter, Pos2, Rect, Shape, Stroke as EguiStroke, Vec2};

use super::Element;
use crate::color::Rgba;
use crate::element::common;

/// A committed freehand path
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    id: usize,
    points: Vec<Pos2>,
    color: Rgba,
    width: f32,
}

impl Stroke {
    pub fn new(id: usize, points: Vec<Pos2>, width: f32, color: Rgba) -> Self {
        Self {
            id,
            points,
            color,
            width,
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

impl Element for Stroke {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "stroke"
    }

    fn position(&self) -> Pos2 {
        self.rect().min
    }

    fn rect(&self) -> Rect {
        common::calculate_bounds(&self.points, self.width / 2.0)
    }

    fn draw(&self, painter: &Painter, offset: Vec2) {
        let color: egui::Color32 = self.color.into();
        match self.points.as_slice() {
            [] => {}
            // A click without movement leaves a dot
            [point] => {
                painter.circle_filled(*point + offset, self.width / 2.0, color);
            }
            points => {
                let points = points.iter().map(|p| *p + offset).collect();
                painter.add(Shape::line(points, EguiStroke::new(self.width, color)));
            }
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        let reach = self.width / 2.0 + common::STROKE_HIT_PADDING;
        match self.points.as_slice() {
            [] => false,
            [point] => (pos - *point).length() <= reach,
            points => points
                .windows(2)
                .any(|w| common::distance_to_line_segment(pos, w[0], w[1]) <= reach),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}
