use std::sync::Arc;

use egui::{Pos2, Vec2};
use image::RgbaImage;
use sketchboard::Command;
use sketchboard::color::Rgba;
use sketchboard::element::{Element, ElementType, factory};
use sketchboard::surface::Surface;

fn test_stroke() -> ElementType {
    let points = vec![Pos2::new(10.0, 10.0), Pos2::new(20.0, 20.0)];
    factory::create_stroke(points, 2.0, Rgba::opaque(255, 0, 0))
}

fn test_image() -> ElementType {
    let pixels = Arc::new(RgbaImage::new(100, 50));
    factory::create_image(pixels, Pos2::new(10.0, 20.0))
}

#[test]
fn factory_assigns_distinct_ids() {
    let stroke = test_stroke();
    let image = test_image();
    assert_ne!(stroke.id(), image.id());
    assert_eq!(stroke.element_type(), "stroke");
    assert_eq!(image.element_type(), "image");
}

#[test]
fn element_rect() {
    let rect = test_stroke().rect();
    assert!(rect.contains(Pos2::new(10.0, 10.0)));
    assert!(rect.contains(Pos2::new(20.0, 20.0)));

    let rect = test_image().rect();
    assert_eq!(rect.min, Pos2::new(10.0, 20.0));
    assert_eq!(rect.size(), Vec2::new(100.0, 50.0));
}

#[test]
fn element_translate() {
    let mut stroke = test_stroke();
    let before = stroke.rect();
    stroke.translate(Vec2::new(5.0, 10.0));
    let after = stroke.rect();
    assert!((after.min.x - before.min.x - 5.0).abs() < 0.001);
    assert!((after.min.y - before.min.y - 10.0).abs() < 0.001);

    let mut image = test_image();
    image.translate(Vec2::new(-10.0, 5.0));
    assert_eq!(image.position(), Pos2::new(0.0, 25.0));
}

#[test]
fn stroke_hit_test_follows_segments() {
    let stroke = test_stroke();
    assert!(stroke.hit_test(Pos2::new(15.0, 15.0)));
    assert!(!stroke.hit_test(Pos2::new(20.0, 10.0)));
}

#[test]
fn topmost_element_wins_hit() {
    let mut surface = Surface::create(false);
    let under = surface.add(test_image());
    let over = surface.add(test_stroke());

    assert_eq!(surface.element_at(Pos2::new(19.5, 20.5)), Some(over));
    assert_eq!(surface.element_at(Pos2::new(80.0, 60.0)), Some(under));
    assert_eq!(surface.element_at(Pos2::new(500.0, 500.0)), None);
}

#[test]
fn commands_edit_the_surface() {
    let mut surface = Surface::create(false);
    let id = surface.add(test_image());

    Command::Select(Some(id)).execute(&mut surface);
    assert_eq!(surface.active_id(), Some(id));

    Command::Move { id, delta: Vec2::new(10.0, 20.0) }.execute(&mut surface);
    assert_eq!(surface.element(id).unwrap().position(), Pos2::new(20.0, 40.0));

    // Moving a missing element is a no-op
    Command::Move { id: id + 1000, delta: Vec2::splat(1.0) }.execute(&mut surface);
    assert_eq!(surface.elements().len(), 1);

    Command::AddElement(test_stroke()).execute(&mut surface);
    assert_eq!(surface.elements().len(), 2);

    Command::Select(None).execute(&mut surface);
    assert_eq!(surface.active_id(), None);
}

#[test]
fn edit_text_command_only_applies_to_text() {
    let mut surface = Surface::create(false);
    let text = surface.add(factory::create_text(Pos2::ZERO, Rgba::BLACK, 20.0));
    let image = surface.add(test_image());

    Command::EditText(image).execute(&mut surface);
    assert_eq!(surface.active_id(), Some(image));

    Command::EditText(text).execute(&mut surface);
    assert!(surface.element(text).and_then(|e| e.as_text()).unwrap().is_editing());
}
