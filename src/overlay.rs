//! The text input overlay as seen from the controller.
//!
//! On the web the overlay is a `<textarea>` plus a submit button (see
//! `crate::web::DomOverlay`). Native builds and tests use [`HeadlessOverlay`],
//! which keeps the typed text in memory.

use crate::viewport::TooltipMode;

pub trait Overlay {
    /// Make the input visible, empty it and give it focus.
    fn show(&mut self);

    fn hide(&mut self);

    /// Current content of the input.
    fn value(&self) -> String;

    fn set_tooltip_mode(&mut self, mode: TooltipMode);

    /// Text typed while the overlay has focus. The DOM handles this itself.
    fn receive_text(&mut self, _text: &str) {}

    fn delete_back(&mut self) {}
}

#[derive(Debug, Default)]
pub struct HeadlessOverlay {
    buffer: String,
    shown: bool,
    tooltips: Option<TooltipMode>,
}

impl HeadlessOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn tooltips(&self) -> Option<TooltipMode> {
        self.tooltips
    }
}

impl Overlay for HeadlessOverlay {
    fn show(&mut self) {
        self.buffer.clear();
        self.shown = true;
        log::info!("text input open, press Enter to apply");
    }

    fn hide(&mut self) {
        self.shown = false;
    }

    fn value(&self) -> String {
        self.buffer.clone()
    }

    fn set_tooltip_mode(&mut self, mode: TooltipMode) {
        log::debug!("tooltips: {:?}", mode);
        self.tooltips = Some(mode);
    }

    fn receive_text(&mut self, text: &str) {
        if self.shown {
            self.buffer.push_str(text);
        }
    }

    fn delete_back(&mut self) {
        if self.shown {
            self.buffer.pop();
        }
    }
}
