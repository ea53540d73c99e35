use egui::Vec2;
use log::debug;

use crate::element::{Element, ElementType};
use crate::surface::Surface;

/// Surface mutations produced by the pointer tools
#[derive(Debug, Clone)]
pub enum Command {
    /// Append a finished element, such as a freehand stroke
    AddElement(ElementType),
    /// Change the active element, or clear it with `None`
    Select(Option<usize>),
    /// Move an element by a delta in canvas coordinates
    Move { id: usize, delta: Vec2 },
    /// Put a text box into editing state
    EditText(usize),
}

impl Command {
    /// Applies the command to `surface`
    pub fn execute(self, surface: &mut Surface) {
        match self {
            Command::AddElement(element) => {
                surface.add(element);
            }
            Command::Select(id) => {
                surface.set_active(id);
            }
            Command::Move { id, delta } => match surface.element_mut(id) {
                Some(element) => element.translate(delta),
                None => debug!("Ignoring move of missing element {id}"),
            },
            Command::EditText(id) => {
                surface.set_active(Some(id));
                match surface.active_mut().and_then(ElementType::as_text_mut) {
                    Some(text) => text.enter_editing(),
                    None => debug!("Element {id} is not a text box"),
                }
            }
        }
    }
}
