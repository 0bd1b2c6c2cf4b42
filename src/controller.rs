//! The scene controller.
//!
//! [`SceneController`] owns the scene and every piece of UI state that event
//! handlers touch: the current theme, the editor state machine and the overlay.
//! Platform code translates its input into [`UiEvent`]s and hands them to
//! [`SceneController::handle`].

use rand::Rng;

use crate::{
    config::{Config, TEXT_MESH_NAME},
    data_structures::scene_graph::{Mesh, Scene},
    editor::{EditorAction, TextEditor},
    font::Font,
    geometry::{self, Geometry},
    overlay::Overlay,
    scatter::{self, ShapeKind},
    theme::Theme,
};

pub const BACKSPACE_KEY: &str = "Backspace";

/// Platform independent input events.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// A key in DOM `KeyboardEvent.key` naming; `text` is the produced character, if any.
    KeyDown { key: String, text: Option<String> },
    DoubleClick,
    TouchStart { timestamp_ms: f64 },
    /// A theme control was clicked; carries the control id.
    ThemeSelected(String),
    /// The submit control was clicked.
    Submit,
}

pub struct SceneController {
    scene: Scene,
    current_theme: Theme,
    editor: TextEditor,
    font: Option<Font>,
    config: Config,
    overlay: Box<dyn Overlay>,
}

impl SceneController {
    /// `font` is `None` when the typeface failed to load or is still loading
    /// (see [`SceneController::attach`]); the scene then stays empty.
    pub fn new(config: Config, font: Option<Font>, overlay: Box<dyn Overlay>) -> Self {
        Self {
            scene: Scene::new(),
            current_theme: Theme::default(),
            editor: TextEditor::new(),
            font,
            config,
            overlay,
        }
    }

    /// Hand over the configuration and font once loading finished. Editor and
    /// theme state gathered before that are kept.
    pub fn attach(&mut self, config: Config, font: Option<Font>) {
        self.config = config;
        self.font = font;
    }

    /// Insert the default text and the decorative shapes.
    pub fn bootstrap(&mut self, rng: &mut impl Rng) {
        if self.font.is_none() {
            log::error!("no font loaded, the scene stays empty");
            return;
        }
        let default_text = self.config.default_text.clone();
        self.regenerate_text(&default_text);

        let material = self.scene.new_material(self.current_theme);
        let capsule = self.scene.add_geometry(geometry::capsule(0.3, 0.5, 64, 32));
        let torus = self.scene.add_geometry(geometry::torus(0.3, 0.2, 32, 64));
        for _ in 0..self.config.shapes.count {
            let geometry = match ShapeKind::sample(rng) {
                ShapeKind::Capsule => capsule,
                ShapeKind::Torus => torus,
            };
            let transform = scatter::scatter_transform(rng, &self.config.shapes);
            self.scene.add(Mesh {
                name: None,
                geometry,
                material,
                transform,
            });
        }
        log::info!(
            "scene ready: {} meshes, theme {}",
            self.scene.len(),
            self.current_theme
        );
    }

    /// Rebind every mesh to `id`'s matcap and make it the default for new text.
    pub fn select_theme(&mut self, id: &str) -> Theme {
        let theme = Theme::from_id(id);
        self.current_theme = theme;
        self.scene.set_material_all(theme);
        log::debug!("theme {} applied to {} meshes", theme, self.scene.len());
        theme
    }

    /// Replace the text mesh with one showing `text`.
    pub fn regenerate_text(&mut self, text: &str) {
        let Some(font) = &self.font else {
            log::warn!("cannot build text {:?} without a font", text);
            return;
        };
        let geometry = match geometry::text_geometry(font, text, &self.config.text) {
            Ok(geometry) => geometry,
            Err(e) => {
                log::error!("failed to build geometry for {:?}: {}", text, e);
                Geometry::default()
            }
        };
        self.scene.remove_named(TEXT_MESH_NAME);
        let geometry = self.scene.add_geometry(geometry);
        let material = self.scene.new_material(self.current_theme);
        self.scene.add(Mesh {
            name: Some(TEXT_MESH_NAME.to_string()),
            geometry,
            material,
            transform: Default::default(),
        });
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::KeyDown { key, text } => {
                let action = self.editor.on_key(&key);
                if action != EditorAction::None {
                    self.apply(action);
                } else if self.editor.is_visible() {
                    if key == BACKSPACE_KEY {
                        self.overlay.delete_back();
                    } else if let Some(text) = text {
                        self.overlay.receive_text(&text);
                    }
                } else {
                    self.theme_shortcut(&key);
                }
            }
            UiEvent::DoubleClick => {
                let action = self.editor.on_double_click();
                self.apply(action);
            }
            UiEvent::TouchStart { timestamp_ms } => {
                let action = self.editor.on_touch_start(timestamp_ms);
                self.apply(action);
            }
            UiEvent::ThemeSelected(id) => {
                self.select_theme(&id);
            }
            UiEvent::Submit => {
                let action = self.editor.toggle();
                self.apply(action);
                self.submit();
            }
        }
    }

    fn apply(&mut self, action: EditorAction) {
        match action {
            EditorAction::None => (),
            EditorAction::Opened => self.overlay.show(),
            EditorAction::Closed => self.overlay.hide(),
            EditorAction::Submit => {
                self.overlay.hide();
                self.submit();
            }
        }
    }

    fn submit(&mut self) {
        let text = self.overlay.value();
        self.regenerate_text(&text);
    }

    /// Digits 1 to 5 pick a theme on native builds, where there are no theme buttons.
    #[cfg(not(target_arch = "wasm32"))]
    fn theme_shortcut(&mut self, key: &str) {
        let selected = key
            .parse::<usize>()
            .ok()
            .and_then(|digit| digit.checked_sub(1))
            .and_then(|idx| Theme::SELECTABLE.get(idx));
        if let Some(theme) = selected {
            self.select_theme(theme.id());
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn theme_shortcut(&mut self, _key: &str) {}

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    pub fn editor(&self) -> &TextEditor {
        &self.editor
    }

    pub fn overlay(&self) -> &dyn Overlay {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> &mut dyn Overlay {
        self.overlay.as_mut()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
