//! Decodes uploaded images off the UI thread and hands the results back in
//! completion order.

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use image::RgbaImage;
use log::debug;
#[cfg(not(target_arch = "wasm32"))]
use log::warn;
#[cfg(not(target_arch = "wasm32"))]
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::surface::SurfaceId;

/// Pixels of a successfully decoded upload
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: Arc<RgbaImage>,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Identifies one upload and the surface it was meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket {
    pub surface: SurfaceId,
    pub seq: u64,
}

/// Result of one decode, in the order decoding finished
#[derive(Debug)]
pub struct DecodeOutcome {
    pub ticket: ImageTicket,
    pub result: Result<DecodedImage, DecodeError>,
}

/// Decodes any format the `image` crate recognises into RGBA pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let pixels = image::load_from_memory(bytes)?.to_rgba8();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(DecodedImage {
        pixels: Arc::new(pixels),
    })
}

/// Runs decodes in the background and queues their outcomes
pub struct ImageLoader {
    tx: UnboundedSender<DecodeOutcome>,
    rx: UnboundedReceiver<DecodeOutcome>,
    next_seq: u64,
    in_flight: usize,
    repaint: Option<egui::Context>,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("next_seq", &self.next_seq)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded();
        Self {
            tx,
            rx,
            next_seq: 0,
            in_flight: 0,
            repaint: None,
        }
    }

    /// Requests a repaint of `ctx` whenever a decode finishes
    pub fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    /// Number of decodes started but not yet collected
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts decoding `bytes` for `surface`. The outcome shows up in [`Self::try_next`].
    pub fn request(&mut self, surface: SurfaceId, bytes: Vec<u8>) -> ImageTicket {
        let ticket = ImageTicket {
            surface,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.in_flight += 1;
        debug!("Decoding upload #{} ({} bytes)", ticket.seq, bytes.len());

        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        let job = move || {
            let result = decode_image(&bytes);
            if tx.unbounded_send(DecodeOutcome { ticket, result }).is_err() {
                debug!("Image loader dropped before upload #{} finished", ticket.seq);
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        };
        spawn(job);
        ticket
    }

    /// Next finished decode, if one is ready
    pub fn try_next(&mut self) -> Option<DecodeOutcome> {
        match self.rx.try_next() {
            Ok(Some(outcome)) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(outcome)
            }
            // Channel closed or nothing queued
            Ok(None) | Err(_) => None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn(job: impl FnOnce() + Send + 'static) {
    let job = Arc::new(Mutex::new(Some(job)));
    let remote = Arc::clone(&job);
    let started = std::thread::Builder::new()
        .name("image-decode".to_owned())
        .spawn(move || {
            if let Some(job) = remote.lock().take() {
                job();
            }
        });
    if let Err(err) = started {
        warn!("Failed to start decoder thread, decoding inline: {err}");
        if let Some(job) = job.lock().take() {
            job();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn(job: impl FnOnce() + 'static) {
    wasm_bindgen_futures::spawn_local(async move { job() });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;
    use std::time::Duration;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn wait_next(loader: &mut ImageLoader) -> DecodeOutcome {
        for _ in 0..500 {
            if let Some(outcome) = loader.try_next() {
                return outcome;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("decode did not finish");
    }

    #[test]
    fn decodes_png() {
        let decoded = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert_eq!(decoded.pixels.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode_image(b"not an image"), Err(DecodeError::Image(_))));
    }

    #[test]
    fn background_decode_reports_back() {
        let surface = crate::surface::Surface::create(true);
        let mut loader = ImageLoader::new();
        let ticket = loader.request(surface.id(), png_bytes(4, 4));
        assert_eq!(loader.in_flight(), 1);

        let outcome = wait_next(&mut loader);
        assert_eq!(outcome.ticket, ticket);
        assert!(outcome.result.is_ok());
        assert_eq!(loader.in_flight(), 0);
        assert!(loader.try_next().is_none());
    }
}
