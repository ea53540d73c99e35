use egui::{Pos2, Rect};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Extra hit-test slack around thin strokes
pub const STROKE_HIT_PADDING: f32 = 2.0;

// Single counter shared by every element kind
static NEXT_ELEMENT_ID: AtomicUsize = AtomicUsize::new(1);

pub fn next_element_id() -> usize {
    NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let len_sq = line_vec.length_sq();
    if len_sq == 0.0 {
        return (point - line_start).length();
    }

    let t = ((point - line_start).dot(line_vec) / len_sq).clamp(0.0, 1.0);
    let projection = line_start + line_vec * t;
    (point - projection).length()
}

/// Bounding box of a set of points, grown by `padding` on every side
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut rect = Rect::from_min_max(points[0], points[0]);
    for point in &points[1..] {
        rect.extend_with(*point);
    }
    rect.expand(padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn segment_distance() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert_eq!(distance_to_line_segment(pos2(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_line_segment(pos2(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_line_segment(pos2(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn bounds_include_padding() {
        let rect = calculate_bounds(&[pos2(10.0, 20.0), pos2(30.0, 5.0)], 2.0);
        assert_eq!(rect, Rect::from_min_max(pos2(8.0, 3.0), pos2(32.0, 22.0)));
        assert_eq!(calculate_bounds(&[], 1.0), Rect::NOTHING);
    }
}
