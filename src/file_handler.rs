use egui::{Align2, Color32, DroppedFile, Id, LayerId, Order, TextStyle};
#[cfg(target_arch = "wasm32")]
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use log::{debug, warn};

/// Extensions accepted for uploads
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Turns files dropped onto the window, or picked in the browser, into image uploads
#[derive(Debug)]
pub struct FileHandler {
    // Bytes read by the browser file picker
    #[cfg(target_arch = "wasm32")]
    picked_tx: UnboundedSender<Vec<u8>>,
    #[cfg(target_arch = "wasm32")]
    picked_rx: UnboundedReceiver<Vec<u8>>,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {}
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        let (picked_tx, picked_rx) = mpsc::unbounded();
        Self { picked_tx, picked_rx }
    }

    /// Opens the browser file picker. The chosen image shows up in
    /// [`Self::take_picked_images`] once it has been read.
    #[cfg(target_arch = "wasm32")]
    pub fn pick_image(&self, ctx: &egui::Context) {
        let tx = self.picked_tx.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                debug!("Image picker closed without a file");
                return;
            };
            let bytes = file.read().await;
            debug!("Picked {} ({} bytes)", file.file_name(), bytes.len());
            if tx.unbounded_send(bytes).is_err() {
                warn!("File handler dropped before {} was read", file.file_name());
            }
            ctx.request_repaint();
        });
    }

    /// Bytes of every image the browser picker has finished reading
    #[cfg(target_arch = "wasm32")]
    pub fn take_picked_images(&mut self) -> Vec<Vec<u8>> {
        std::iter::from_fn(|| self.picked_rx.try_next().ok().flatten()).collect()
    }

    /// Bytes of every image dropped this frame
    pub fn take_dropped_images(&mut self, ctx: &egui::Context) -> Vec<Vec<u8>> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped
            .iter()
            .filter(|file| {
                let is_image = is_image_file(file);
                if !is_image {
                    warn!("Dropped file is not a supported type: {}", display_name(file));
                }
                is_image
            })
            .filter_map(read_bytes)
            .collect()
    }

    /// Dims the window while files hover over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop an image to place it on the canvas",
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check MIME type first, then the extension
fn is_image_file(file: &DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let extension = file
        .path
        .as_ref()
        .and_then(|p| p.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| file.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));
    extension.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn read_bytes(file: &DroppedFile) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        debug!("Dropped {} ({} bytes)", display_name(file), bytes.len());
        return Some(bytes.to_vec());
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Some(path) = &file.path {
            return match std::fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    warn!("Failed to read {}: {err}", path.display());
                    None
                }
            };
        }
    }

    warn!("Dropped file has no accessible data: {}", display_name(file));
    None
}


#[cfg(all(test, target_arch = "wasm32"))]
mod web_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn picked_images_are_taken_in_order() {
        let mut handler = FileHandler::new();
        assert!(handler.take_picked_images().is_empty());

        handler.picked_tx.unbounded_send(vec![1, 2]).unwrap();
        handler.picked_tx.unbounded_send(vec![3]).unwrap();
        assert_eq!(handler.take_picked_images(), vec![vec![1, 2], vec![3]]);
        assert!(handler.take_picked_images().is_empty());
    }
}
