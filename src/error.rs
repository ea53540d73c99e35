use thiserror::Error;

/// Errors raised while updating the tool state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Invalid colour {0:?}, expected #RRGGBB")]
    InvalidColor(String),
}

/// Errors raised while decoding an uploaded image
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image has zero size")]
    Empty,
}

/// Errors raised while exporting the surface to PNG
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Browser download failed: {0}")]
    Download(String),
}
