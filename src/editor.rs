//! Visibility state machine of the text input overlay.
//!
//! The editor itself knows nothing about the DOM. It decides when the overlay
//! opens or closes and when a submission happens; [`crate::controller`] applies
//! the outcome to the [`crate::overlay::Overlay`] and the scene.

/// Two touches closer together than this count as a double tap.
pub const DOUBLE_TAP_MS: f64 = 500.0;

/// Key that opens the overlay while it is hidden.
pub const OPEN_KEY: &str = "t";
pub const SUBMIT_KEY: &str = "Enter";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorAction {
    None,
    /// The overlay became visible and should be cleared and focused.
    Opened,
    Closed,
    /// The overlay closed and its content should replace the text mesh.
    Submit,
}

#[derive(Clone, Debug, Default)]
pub struct TextEditor {
    visible: bool,
    last_touch_ms: Option<f64>,
}

impl TextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) -> EditorAction {
        self.visible = !self.visible;
        if self.visible {
            EditorAction::Opened
        } else {
            EditorAction::Closed
        }
    }

    pub fn on_key(&mut self, key: &str) -> EditorAction {
        match (key, self.visible) {
            (OPEN_KEY, false) => self.toggle(),
            (SUBMIT_KEY, true) => {
                self.visible = false;
                EditorAction::Submit
            }
            _ => EditorAction::None,
        }
    }

    pub fn on_double_click(&mut self) -> EditorAction {
        self.toggle()
    }

    /// Register a touch start at `timestamp_ms`. The time is recorded even when
    /// it does not complete a double tap.
    pub fn on_touch_start(&mut self, timestamp_ms: f64) -> EditorAction {
        let previous = self.last_touch_ms.replace(timestamp_ms);
        match previous {
            Some(previous) if timestamp_ms - previous < DOUBLE_TAP_MS => self.toggle(),
            _ => EditorAction::None,
        }
    }
}
