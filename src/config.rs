//! Runtime configuration.
//!
//! Every field has a default so the scene runs without any config file. When
//! `config.json` exists in the asset directory, its fields override the defaults.

use serde::Deserialize;

use crate::resources::texture::load_string;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_TEXT: &str = "straight cash, homie";
pub const DEFAULT_FONT: &str = "fonts/helvetiker_regular.typeface.json";
/// Name of the single editable text mesh.
pub const TEXT_MESH_NAME: &str = "text";

/// Parameters for extruded text geometry. Bootstrap and every edit share them.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextParams {
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.2,
            curve_segments: 12,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    pub count: usize,
    /// Full width of the sampling range per axis, centered on the origin.
    pub spread: [f32; 3],
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            count: 100,
            spread: [15.0, 15.0, 12.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_text: String,
    pub font: String,
    pub text: TextParams,
    pub shapes: ScatterParams,
    /// Fixed seed for the shape layout; a clock-derived seed is used when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_text: DEFAULT_TEXT.to_string(),
            font: DEFAULT_FONT.to_string(),
            text: TextParams::default(),
            shapes: ScatterParams::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load `config.json` from the asset directory, falling back to defaults.
    pub async fn load() -> Self {
        match load_string(CONFIG_FILE).await {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed {}: {}", CONFIG_FILE, e);
                Self::default()
            }),
            Err(e) => {
                log::info!("No {} found ({}), using defaults", CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| instant::now().to_bits())
    }
}
