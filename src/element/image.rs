use egui::{Color32, ColorImage, Painter, Pos2, Rect, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;
use log::debug;
use std::sync::{Arc, OnceLock};

use super::Element;

/// Bitmap placed on the surface from an upload
#[derive(Clone)]
pub struct Image {
    id: usize,
    pixels: Arc<RgbaImage>,
    position: Pos2,
    angle: f32,

    // Uploaded to the GPU on first draw
    texture: OnceLock<TextureHandle>,
}

// Custom Debug implementation since TextureHandle doesn't implement Debug
impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("size", &self.size())
            .field("position", &self.position)
            .field("angle", &self.angle)
            .field("has_texture", &self.texture.get().is_some())
            .finish()
    }
}

impl Image {
    pub fn new(id: usize, pixels: Arc<RgbaImage>, position: Pos2) -> Self {
        Self {
            id,
            pixels,
            position,
            angle: 0.0,
            texture: OnceLock::new(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    /// Rotation in degrees. Images are always inserted upright.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn texture(&self, painter: &Painter) -> &TextureHandle {
        self.texture.get_or_init(|| {
            debug!("Uploading texture for image {}", self.id);
            let size = [self.pixels.width() as usize, self.pixels.height() as usize];
            let color_image = ColorImage::from_rgba_unmultiplied(size, self.pixels.as_raw());
            painter.ctx().load_texture(
                format!("image_{}", self.id),
                color_image,
                TextureOptions::LINEAR,
            )
        })
    }
}

impl Element for Image {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "image"
    }

    fn position(&self) -> Pos2 {
        self.position
    }

    fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size())
    }

    fn draw(&self, painter: &Painter, offset: Vec2) {
        let texture = self.texture(painter);
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.image(texture.id(), self.rect().translate(offset), uv, Color32::WHITE);
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
