//! Ties the tool state, the mounted surface, the pointer tools and the image loader
//! together behind the tool bar actions.

use egui::{Pos2, Vec2};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::color::Swatch;
use crate::command::Command;
use crate::element::{DEFAULT_FONT_SIZE, Element, ElementType, factory};
use crate::error::{ExportError, ToolError};
use crate::export;
use crate::loader::{DecodeOutcome, DecodedImage, ImageLoader, ImageTicket};
use crate::surface::{CanvasHost, INSERT_POSITION, Surface};
use crate::tool_state::{ToolMode, ToolState};
use crate::tools::{Tool, ToolType};

/// One tool bar control
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectPen,
    SelectFluorescentPen,
    SelectEraser,
    AddText,
    SaveImage,
    ClearCanvas,
    ChangeBrushSize(i32),
    PickColor(Swatch),
    UploadImage(Vec<u8>),
    /// Switch between freehand drawing and object selection. Remounts the surface.
    SetDrawingMode(bool),
}

/// The drawing editor
#[derive(Debug)]
pub struct Editor {
    tools: ToolState,
    host: CanvasHost,
    pointer_tool: ToolType,
    loader: ImageLoader,
    export_dir: PathBuf,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(ToolState::default())
    }
}

impl Editor {
    /// Mounts a surface for `tools` and applies its stroke style.
    pub fn new(tools: ToolState) -> Self {
        let mut editor = Self {
            pointer_tool: ToolType::for_mode(tools.drawing_mode()),
            tools,
            host: CanvasHost::new(),
            loader: ImageLoader::new(),
            export_dir: PathBuf::from("."),
        };
        editor.mount();
        editor
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.tools
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.host.surface()
    }

    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.host.surface_mut()
    }

    pub fn pointer_tool(&self) -> &ToolType {
        &self.pointer_tool
    }

    pub fn loader_mut(&mut self) -> &mut ImageLoader {
        &mut self.loader
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn set_export_dir(&mut self, dir: impl Into<PathBuf>) {
        self.export_dir = dir.into();
    }

    /// Runs one tool bar action. Failures are logged and otherwise ignored.
    pub fn dispatch(&mut self, action: UiAction) {
        debug!("Dispatching {}", action_name(&action));
        match action {
            UiAction::SelectPen => self.set_mode(ToolMode::Pen),
            UiAction::SelectFluorescentPen => self.set_mode(ToolMode::Fluorescent),
            UiAction::SelectEraser => self.set_mode(ToolMode::Eraser),
            UiAction::AddText => {
                self.add_text();
            }
            UiAction::SaveImage => {
                if let Err(err) = self.save_image() {
                    log::error!("Export failed: {err}");
                }
            }
            UiAction::ClearCanvas => self.clear(),
            UiAction::ChangeBrushSize(width) => self.set_brush_width(width),
            UiAction::PickColor(swatch) => {
                if let Err(err) = self.set_color(swatch.hex()) {
                    warn!("{err}");
                }
            }
            UiAction::UploadImage(bytes) => {
                self.add_image(bytes);
            }
            UiAction::SetDrawingMode(drawing_mode) => self.set_drawing_mode(drawing_mode),
        }
    }

    pub fn set_color(&mut self, hex: &str) -> Result<(), ToolError> {
        self.tools.set_color(hex)?;
        self.apply_style();
        Ok(())
    }

    pub fn set_brush_width(&mut self, width: i32) {
        self.tools.set_brush_width(width);
        self.apply_style();
    }

    pub fn set_fluorescent(&mut self, fluorescent: bool) {
        self.tools.set_fluorescent(fluorescent);
        self.apply_style();
    }

    /// Picks a tool button. Puts the surface into drawing mode without remounting it.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.tools.set_mode(mode);
        if let Some(surface) = self.host.surface_mut() {
            surface.set_drawing_mode(true);
        }
        self.sync_pointer_tool();
        self.apply_style();
    }

    /// Changing the drawing mode remounts the surface, discarding everything on it.
    pub fn set_drawing_mode(&mut self, drawing_mode: bool) {
        if self.tools.set_drawing_mode(drawing_mode) {
            info!("Drawing mode changed to {drawing_mode}, remounting surface");
            self.mount();
        }
    }

    fn mount(&mut self) {
        self.host.remount(self.tools.drawing_mode());
        self.sync_pointer_tool();
        self.apply_style();
    }

    fn sync_pointer_tool(&mut self) {
        let drawing = self.surface().is_some_and(Surface::drawing_mode);
        if drawing != self.pointer_tool.is_drawing() {
            self.pointer_tool = ToolType::for_mode(drawing);
        } else {
            self.pointer_tool.reset();
        }
    }

    /// Copies the derived stroke style into the surface brush, if it is drawing.
    pub fn apply_style(&mut self) {
        let style = self.tools.stroke_style();
        if let Some(surface) = self.host.surface_mut() {
            if surface.drawing_mode() {
                surface.set_brush(style);
            }
        }
    }

    /// Inserts an empty text box at the insert position, active and in editing state.
    pub fn add_text(&mut self) -> Option<usize> {
        let fill = self.tools.fill_color();
        let surface = self.host.surface_mut()?;
        let id = surface.add(factory::create_text(INSERT_POSITION, fill, DEFAULT_FONT_SIZE));
        surface.set_active(Some(id));
        if let Some(text) = surface.active_mut().and_then(ElementType::as_text_mut) {
            text.enter_editing();
        }
        Some(id)
    }

    /// Replaces the content of a text box
    pub fn set_text(&mut self, id: usize, content: &str) {
        let text = self
            .host
            .surface_mut()
            .and_then(|s| s.element_mut(id))
            .and_then(ElementType::as_text_mut);
        match text {
            Some(text) => text.set_text(content),
            None => debug!("No text box {id} to edit"),
        }
    }

    /// Leaves editing mode on the active text box and deselects it
    pub fn finish_editing(&mut self) {
        if let Some(surface) = self.host.surface_mut() {
            surface.set_active(None);
        }
    }

    /// Text box currently being edited, if any
    pub fn editing_text_id(&self) -> Option<usize> {
        self.surface()?
            .active()?
            .as_text()
            .filter(|t| t.is_editing())
            .map(|t| t.id())
    }

    /// Starts decoding an upload. The image is inserted by [`Self::poll_images`] once
    /// decoding succeeds.
    pub fn add_image(&mut self, bytes: Vec<u8>) -> Option<ImageTicket> {
        let surface = self.host.surface()?.id();
        Some(self.loader.request(surface, bytes))
    }

    /// Inserts every finished decode in completion order. Returns how many were added.
    pub fn poll_images(&mut self) -> usize {
        let mut inserted = 0;
        while let Some(DecodeOutcome { ticket, result }) = self.loader.try_next() {
            match result {
                Ok(decoded) => {
                    if self.insert_image(ticket, decoded).is_some() {
                        inserted += 1;
                    }
                }
                Err(err) => warn!("Upload #{} not added: {err}", ticket.seq),
            }
        }
        inserted
    }

    /// Inserts a decoded image at the insert position, unless its surface is gone.
    pub fn insert_image(&mut self, ticket: ImageTicket, decoded: DecodedImage) -> Option<usize> {
        let surface = self.host.surface_mut()?;
        if surface.id() != ticket.surface {
            warn!("Upload #{} finished after its surface was disposed, dropping it", ticket.seq);
            return None;
        }
        Some(surface.add(factory::create_image(decoded.pixels, INSERT_POSITION)))
    }

    pub fn clear(&mut self) {
        self.pointer_tool.reset();
        if let Some(surface) = self.host.surface_mut() {
            surface.clear();
        }
    }

    pub fn export_png(&self) -> Option<Result<Vec<u8>, ExportError>> {
        self.surface().map(export::export_png)
    }

    /// Writes `drawing.png` into the export directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_image(&self) -> Result<Option<PathBuf>, ExportError> {
        match self.surface() {
            Some(surface) => export::save_png(surface, &self.export_dir).map(Some),
            None => Ok(None),
        }
    }

    /// Downloads `drawing.png` through the browser. The export directory is not used.
    #[cfg(target_arch = "wasm32")]
    pub fn save_image(&self) -> Result<Option<PathBuf>, ExportError> {
        match self.surface() {
            Some(surface) => {
                export::download_png(surface)?;
                Ok(Some(PathBuf::from(export::EXPORT_FILE_NAME)))
            }
            None => Ok(None),
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        let Some(surface) = self.host.surface_mut() else {
            return;
        };
        if let Some(command) = self.pointer_tool.on_pointer_down(pos, surface) {
            command.execute(surface);
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let Some(surface) = self.host.surface_mut() else {
            return;
        };
        if let Some(command) = self.pointer_tool.on_pointer_move(pos, surface) {
            command.execute(surface);
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        let Some(surface) = self.host.surface_mut() else {
            return;
        };
        if let Some(command) = self.pointer_tool.on_pointer_up(pos, surface) {
            command.execute(surface);
        }
    }

    /// Makes the topmost element under `pos` active, or clears the selection.
    pub fn select_at(&mut self, pos: Pos2) -> Option<usize> {
        let surface = self.host.surface_mut()?;
        let hit = surface.element_at(pos);
        Command::Select(hit).execute(surface);
        hit
    }

    /// Moves the active element, if there is one
    pub fn move_active(&mut self, delta: Vec2) {
        let Some(surface) = self.host.surface_mut() else {
            return;
        };
        if let Some(id) = surface.active_id() {
            Command::Move { id, delta }.execute(surface);
        }
    }

    /// Applies a command built outside the pointer tools
    pub fn execute(&mut self, command: Command) {
        if let Some(surface) = self.host.surface_mut() {
            command.execute(surface);
        }
    }
}

fn action_name(action: &UiAction) -> &'static str {
    match action {
        UiAction::SelectPen => "select-pen",
        UiAction::SelectFluorescentPen => "select-fluorescent-pen",
        UiAction::SelectEraser => "select-eraser",
        UiAction::AddText => "add-text",
        UiAction::SaveImage => "save-image",
        UiAction::ClearCanvas => "clear-canvas",
        UiAction::ChangeBrushSize(_) => "change-brush-size",
        UiAction::PickColor(_) => "pick-color",
        UiAction::UploadImage(_) => "upload-image",
        UiAction::SetDrawingMode(_) => "set-drawing-mode",
    }
}
