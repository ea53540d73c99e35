use egui::{Color32, Key, Pos2, Rect, Sense, TextEdit, Vec2};

use crate::DrawingApp;
use crate::element::{Element, ElementType};
use crate::surface::Surface;
use crate::tools::{Tool, draw_selection_outline};

pub fn central_panel(app: &mut DrawingApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::central_panel(&ctx.style()).fill(Color32::from_gray(40)))
        .show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| canvas(app, ui));
        });
}

fn canvas(app: &mut DrawingApp, ui: &mut egui::Ui) {
    let Some(size) = app.editor().surface().map(Surface::size) else {
        return;
    };
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let offset = response.rect.min.to_vec2();
    let to_canvas = |pos: Pos2| pos - offset;

    handle_pointer(app, ui, &response, to_canvas);

    let editor = app.editor();
    let Some(surface) = editor.surface() else {
        return;
    };
    painter.rect_filled(response.rect, 0.0, Color32::from(surface.background()));
    for element in surface.elements() {
        element.draw(&painter, offset);
    }
    editor.pointer_tool().draw_preview(&painter, offset);
    draw_selection_outline(&painter, surface, offset);

    text_editor(app, ui, offset);
}

fn handle_pointer(
    app: &mut DrawingApp,
    ui: &egui::Ui,
    response: &egui::Response,
    to_canvas: impl Fn(Pos2) -> Pos2,
) {
    let pressed_on_canvas = response.drag_started() || response.clicked();
    if pressed_on_canvas && app.editor().editing_text_id().is_some() {
        // Clicking the canvas ends text editing instead of drawing
        app.editor_mut().finish_editing();
        return;
    }

    let editor = app.editor_mut();
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            editor.pointer_down(to_canvas(pos));
            editor.pointer_up(to_canvas(pos));
        }
        return;
    }
    if response.drag_started() {
        let origin = ui.input(|i| i.pointer.press_origin());
        if let Some(pos) = origin.or(response.interact_pointer_pos()) {
            editor.pointer_down(to_canvas(pos));
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            editor.pointer_move(to_canvas(pos));
        }
    }
    if response.drag_stopped() {
        let pos = response
            .interact_pointer_pos()
            .or(ui.input(|i| i.pointer.latest_pos()));
        if let Some(pos) = pos {
            editor.pointer_up(to_canvas(pos));
        }
    }
}

/// Multiline editor placed over the text box being edited
fn text_editor(app: &mut DrawingApp, ui: &mut egui::Ui, offset: Vec2) {
    let Some(id) = app.editor().editing_text_id() else {
        app.set_focused_text(None);
        return;
    };
    let newly_editing = app.focused_text() != Some(id);

    let Some(text) = app
        .editor_mut()
        .surface_mut()
        .and_then(|s| s.element_mut(id))
        .and_then(ElementType::as_text_mut)
    else {
        return;
    };

    let rect = text.rect().translate(offset);
    let rect = Rect::from_min_size(rect.min, rect.size().max(Vec2::new(200.0, rect.height())));
    let font_id = text.font_id();
    let color = Color32::from(text.fill());
    let edit = TextEdit::multiline(text.text_mut())
        .font(font_id)
        .text_color(color)
        .frame(false)
        .margin(Vec2::ZERO)
        .desired_width(rect.width())
        .desired_rows(1);
    let response = ui.put(rect, edit);
    ui.painter().rect_stroke(rect.expand(2.0), 0.0, egui::Stroke::new(1.0, Color32::GRAY));

    if newly_editing {
        response.request_focus();
        app.set_focused_text(Some(id));
    }
    let escaped = ui.input(|i| i.key_pressed(Key::Escape));
    if escaped || (response.lost_focus() && !newly_editing) {
        app.editor_mut().finish_editing();
        app.set_focused_text(None);
    }
}
