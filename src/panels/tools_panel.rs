use egui::Slider;

use crate::DrawingApp;
use crate::color::Swatch;
use crate::components::{ToolButton, swatch_button};
use crate::editor::UiAction;
use crate::tool_state::{MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH, ToolMode};

pub fn tools_panel(app: &mut DrawingApp, ctx: &egui::Context) {
    let mut actions = Vec::new();

    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        let tools = app.editor().tool_state();
        let surface_drawing = app.editor().surface().is_some_and(|s| s.drawing_mode());

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            for (mode, action) in [
                (ToolMode::Pen, UiAction::SelectPen),
                (ToolMode::Fluorescent, UiAction::SelectFluorescentPen),
                (ToolMode::Eraser, UiAction::SelectEraser),
            ] {
                let selected = surface_drawing && tools.mode() == mode;
                if ToolButton::new(mode.label(), selected).show(ui).clicked() {
                    actions.push(action);
                }
            }

            ui.separator();
            if ui.button("Add text").clicked() {
                actions.push(UiAction::AddText);
            }
            if ui.button("Save").clicked() {
                actions.push(UiAction::SaveImage);
            }
            if ui.button("Clear").clicked() {
                actions.push(UiAction::ClearCanvas);
            }

            ui.separator();
            let mut width = tools.brush_width() as i32;
            let slider = Slider::new(&mut width, MIN_BRUSH_WIDTH as i32..=MAX_BRUSH_WIDTH as i32)
                .text("Brush size");
            if ui.add(slider).changed() {
                actions.push(UiAction::ChangeBrushSize(width));
            }

            ui.separator();
            ui.label("Colour");
            for swatch in Swatch::ALL {
                let selected = tools.color().eq_ignore_ascii_case(swatch.hex());
                if swatch_button(ui, swatch.color32(), selected)
                    .on_hover_text(swatch.hex())
                    .clicked()
                {
                    actions.push(UiAction::PickColor(swatch));
                }
            }

            ui.separator();
            let mut drawing_mode = tools.drawing_mode();
            if ui
                .checkbox(&mut drawing_mode, "Drawing mode")
                .on_hover_text("Switching modes starts a new, empty canvas")
                .changed()
            {
                actions.push(UiAction::SetDrawingMode(drawing_mode));
            }
        });

        #[cfg(not(target_arch = "wasm32"))]
        ui.horizontal(|ui| {
            ui.label("Image file:");
            ui.text_edit_singleline(app.upload_path_mut());
            if ui.button("Upload").clicked() {
                if let Some(bytes) = app.read_upload_path() {
                    actions.push(UiAction::UploadImage(bytes));
                }
            }
            ui.weak("or drop an image onto the window");
        });

        #[cfg(target_arch = "wasm32")]
        ui.horizontal(|ui| {
            if ui.button("Upload image…").clicked() {
                app.pick_image(ctx);
            }
            ui.weak("or drop an image onto the page");
        });
        ui.add_space(4.0);
    });

    for action in actions {
        app.editor_mut().dispatch(action);
    }
}
