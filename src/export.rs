//! Flattens a surface into a PNG.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use egui::Pos2;
use image::{ImageFormat, RgbaImage};
use log::{info, warn};
use std::io::Cursor;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::color::Rgba;
use crate::element::text::LINE_HEIGHT;
use crate::element::{Element, ElementType, Image, Stroke, TextBox, distance_to_line_segment};
use crate::error::ExportError;
use crate::surface::{CANVAS_HEIGHT, CANVAS_WIDTH, Surface};

/// Name of the exported file
pub const EXPORT_FILE_NAME: &str = "drawing.png";

/// Renders the surface at full resolution.
pub fn render(surface: &Surface) -> RgbaImage {
    let mut target = RgbaImage::from_pixel(
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        image::Rgba(surface.background().to_array()),
    );

    for element in surface.elements() {
        match element {
            ElementType::Stroke(stroke) => draw_stroke(&mut target, stroke),
            ElementType::Text(text) => draw_text(&mut target, text),
            ElementType::Image(img) => draw_image(&mut target, img),
        }
    }
    target
}

/// Renders the surface and encodes it as PNG.
pub fn export_png(surface: &Surface) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    render(surface).write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Writes `drawing.png` into `directory`, replacing any previous export.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_png(surface: &Surface, directory: &Path) -> Result<PathBuf, ExportError> {
    let bytes = export_png(surface)?;
    let path = directory.join(EXPORT_FILE_NAME);
    std::fs::write(&path, &bytes)?;
    info!("Saved drawing to {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Hands the PNG to the browser as a `drawing.png` download.
#[cfg(target_arch = "wasm32")]
pub fn download_png(surface: &Surface) -> Result<(), ExportError> {
    use eframe::wasm_bindgen::{JsCast as _, JsValue};
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url, js_sys};

    let js_error = |err: JsValue| ExportError::Download(format!("{err:?}"));

    let bytes = export_png(surface)?;
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| ExportError::Download("no document".to_owned()))?;
    let link = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| ExportError::Download("created element is not an anchor".to_owned()))?;
    link.set_href(&url);
    link.set_download(EXPORT_FILE_NAME);
    link.click();
    Url::revoke_object_url(&url).map_err(js_error)?;

    info!("Started download of {EXPORT_FILE_NAME} ({} bytes)", bytes.len());
    Ok(())
}

/// Source-over blend of a straight-alpha colour with coverage `alpha`
fn blend(target: &mut RgbaImage, x: i64, y: i64, rgb: [u8; 3], alpha: f32) {
    if x < 0 || y < 0 || x >= target.width() as i64 || y >= target.height() as i64 || alpha <= 0.0 {
        return;
    }
    let dst = target.get_pixel_mut(x as u32, y as u32);
    let sa = alpha.min(1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let value = (rgb[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

fn draw_stroke(target: &mut RgbaImage, stroke: &Stroke) {
    let points = stroke.points();
    if points.is_empty() {
        return;
    }
    let half = stroke.width() / 2.0;
    let color: Rgba = stroke.color();
    let rgb = [color.r, color.g, color.b];

    let bounds = stroke.rect().expand(1.0);
    let min_x = bounds.min.x.floor().max(0.0) as i64;
    let min_y = bounds.min.y.floor().max(0.0) as i64;
    let max_x = (bounds.max.x.ceil() as i64).min(target.width() as i64 - 1);
    let max_y = (bounds.max.y.ceil() as i64).min(target.height() as i64 - 1);

    // Each pixel is blended once per stroke so translucent strokes don't darken where
    // segments overlap
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            let distance = distance_to_path(center, points);
            let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend(target, x, y, rgb, color.a * coverage);
            }
        }
    }
}

fn distance_to_path(pos: Pos2, points: &[Pos2]) -> f32 {
    if let [point] = points {
        return (pos - *point).length();
    }
    points
        .windows(2)
        .map(|w| distance_to_line_segment(pos, w[0], w[1]))
        .fold(f32::INFINITY, f32::min)
}

fn draw_image(target: &mut RgbaImage, img: &Image) {
    let origin = img.position();
    let left = origin.x.round() as i64;
    let top = origin.y.round() as i64;
    for (x, y, pixel) in img.pixels().enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        blend(target, left + x as i64, top + y as i64, [r, g, b], a as f32 / 255.0);
    }
}

fn default_font() -> Option<&'static FontArc> {
    static FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    FONT.get_or_init(|| {
        let definitions = egui::FontDefinitions::default();
        let name = definitions
            .families
            .get(&egui::FontFamily::Proportional)?
            .first()?;
        let data = definitions.font_data.get(name)?;
        match FontArc::try_from_vec(data.font.to_vec()) {
            Ok(font) => Some(font),
            Err(err) => {
                warn!("Bundled font {name} is unreadable: {err}");
                None
            }
        }
    })
    .as_ref()
}

fn draw_text(target: &mut RgbaImage, text: &TextBox) {
    if text.text().is_empty() {
        return;
    }
    let Some(font) = default_font() else {
        warn!("No font available, text {} left out of export", text.id());
        return;
    };
    let fill = text.fill();
    let rgb = [fill.r, fill.g, fill.b];
    let scaled = font.as_scaled(PxScale::from(text.font_size()));
    let line_step = text.font_size() * LINE_HEIGHT;
    let origin = text.position();

    for (row, line) in text.lines().enumerate() {
        let baseline = origin.y + row as f32 * line_step + scaled.ascent();
        let mut cursor_x = origin.x;
        let mut previous = None;

        for ch in line.chars() {
            let mut glyph = scaled.scaled_glyph(ch);
            if let Some(prev) = previous {
                cursor_x += scaled.kern(prev, glyph.id);
            }
            previous = Some(glyph.id);
            let advance = scaled.h_advance(glyph.id);
            glyph.position = point(cursor_x, baseline);
            cursor_x += advance;

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i64 + gx as i64;
                    let y = bounds.min.y as i64 + gy as i64;
                    blend(target, x, y, rgb, coverage * fill.a);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::pos2;

    fn pixel(img: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
        img.get_pixel(x, y).0
    }

    #[test]
    fn blank_surface_is_white() {
        let surface = Surface::create(true);
        let img = render(&surface);
        assert_eq!(img.dimensions(), (800, 600));
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn stroke_is_painted_along_its_path() {
        let mut surface = Surface::create(true);
        surface.add(factory::create_stroke(
            vec![pos2(10.0, 50.0), pos2(200.0, 50.0)],
            10.0,
            Rgba::opaque(255, 0, 0),
        ));
        let img = render(&surface);
        assert_eq!(pixel(&img, 100, 50), [255, 0, 0, 255]);
        assert_eq!(pixel(&img, 100, 80), [255, 255, 255, 255]);
    }

    #[test]
    fn highlighter_blends_with_background() {
        let mut surface = Surface::create(true);
        surface.add(factory::create_stroke(
            vec![pos2(10.0, 50.0), pos2(60.0, 50.0), pos2(60.0, 50.5), pos2(10.0, 50.5)],
            10.0,
            crate::color::apply_fluorescent_effect("#0000FF"),
        ));
        let img = render(&surface);
        // Overlapping segments are not blended twice
        let [r, g, b, a] = pixel(&img, 30, 50);
        assert!((76..=77).contains(&r) && r == g, "got {r} {g}");
        assert_eq!((b, a), (255, 255));
    }

    #[test]
    fn eraser_paints_over() {
        let mut surface = Surface::create(true);
        surface.add(factory::create_stroke(vec![pos2(10.0, 10.0), pos2(90.0, 10.0)], 6.0, Rgba::BLACK));
        surface.add(factory::create_stroke(vec![pos2(10.0, 10.0), pos2(90.0, 10.0)], 10.0, Rgba::WHITE));
        let img = render(&surface);
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn image_is_placed_at_its_position() {
        let mut surface = Surface::create(true);
        let pixels = RgbaImage::from_pixel(4, 4, image::Rgba([0, 128, 0, 255]));
        surface.add(factory::create_image(std::sync::Arc::new(pixels), pos2(100.0, 100.0)));
        let img = render(&surface);
        assert_eq!(pixel(&img, 100, 100), [0, 128, 0, 255]);
        assert_eq!(pixel(&img, 103, 103), [0, 128, 0, 255]);
        assert_eq!(pixel(&img, 104, 104), [255, 255, 255, 255]);
        assert_eq!(pixel(&img, 99, 100), [255, 255, 255, 255]);
    }

    #[test]
    fn text_leaves_ink() {
        let mut surface = Surface::create(true);
        let id = surface.add(factory::create_text(pos2(100.0, 100.0), Rgba::BLACK, 20.0));
        surface
            .element_mut(id)
            .and_then(ElementType::as_text_mut)
            .unwrap()
            .set_text("Hello");
        let img = render(&surface);
        let inked = (100..200)
            .flat_map(|x| (100..125).map(move |y| (x, y)))
            .filter(|&(x, y)| pixel(&img, x, y)[0] < 128)
            .count();
        assert!(inked > 20, "only {inked} dark pixels");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn save_png_overwrites_previous_export() {
        let dir = std::env::temp_dir().join(format!("sketchboard-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(EXPORT_FILE_NAME), b"stale").unwrap();

        let path = save_png(&Surface::create(true), &dir).unwrap();
        assert_eq!(path, dir.join(EXPORT_FILE_NAME));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn export_encodes_png() {
        let surface = Surface::create(true);
        let bytes = export_png(&surface).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 600));
    }
}
