#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod command;
pub mod components;
pub mod editor;
pub mod element;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod loader;
pub mod panels;
pub mod stroke;
pub mod surface;
pub mod tool_state;
pub mod tools;

pub use app::DrawingApp;
pub use color::{Rgba, Swatch, apply_fluorescent_effect};
pub use command::Command;
pub use editor::{Editor, UiAction};
pub use error::{DecodeError, ExportError, ToolError};
pub use surface::{CanvasHost, Surface, SurfaceId};
pub use tool_state::{ToolMode, ToolState};
pub use tools::Tool;
