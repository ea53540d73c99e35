use crate::editor::{Editor, UiAction};
use crate::file_handler::FileHandler;
use crate::panels::{central_panel, tools_panel};
use crate::tool_state::ToolState;

/// The eframe application: a tool bar above a single drawing surface.
///
/// Only the tool preferences survive a restart; the drawing itself is never persisted.
pub struct DrawingApp {
    editor: Editor,
    file_handler: FileHandler,
    // Text box whose editor currently holds keyboard focus
    focused_text: Option<usize>,
    upload_path: String,
}

impl Default for DrawingApp {
    fn default() -> Self {
        Self::with_tools(ToolState::default())
    }
}

impl DrawingApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let tools = cc
            .storage
            .and_then(|storage| eframe::get_value::<ToolState>(storage, eframe::APP_KEY))
            .unwrap_or_default()
            .sanitized();
        log::info!("Starting with {tools:?}");

        let mut app = Self::with_tools(tools);
        app.editor.loader_mut().set_repaint_context(cc.egui_ctx.clone());
        app
    }

    pub fn with_tools(tools: ToolState) -> Self {
        Self {
            editor: Editor::new(tools),
            file_handler: FileHandler::new(),
            focused_text: None,
            upload_path: String::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn focused_text(&self) -> Option<usize> {
        self.focused_text
    }

    pub fn set_focused_text(&mut self, id: Option<usize>) {
        self.focused_text = id;
    }

    /// Opens the browser file picker for an image upload
    #[cfg(target_arch = "wasm32")]
    pub fn pick_image(&self, ctx: &egui::Context) {
        self.file_handler.pick_image(ctx);
    }

    pub fn upload_path_mut(&mut self) -> &mut String {
        &mut self.upload_path
    }

    /// Reads the file named in the upload field. Failures are only logged.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_upload_path(&self) -> Option<Vec<u8>> {
        let path = self.upload_path.trim();
        if path.is_empty() {
            return None;
        }
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::warn!("Failed to read {path}: {err}");
                None
            }
        }
    }
}

impl eframe::App for DrawingApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.editor.tool_state());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for bytes in self.file_handler.take_dropped_images(ctx) {
            self.editor.dispatch(UiAction::UploadImage(bytes));
        }
        #[cfg(target_arch = "wasm32")]
        for bytes in self.file_handler.take_picked_images() {
            self.editor.dispatch(UiAction::UploadImage(bytes));
        }
        self.editor.poll_images();

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
