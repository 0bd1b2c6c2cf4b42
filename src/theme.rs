//! Matcap themes.
//!
//! A [`Theme`] names one of the six matcap textures the scene loads at startup.
//! Five of them can be selected from the UI by id; `Metal` is loaded with the
//! others but has no control bound to it.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    Metal,
    Flame,
    Copper,
    Neon,
    PurplePearl,
    Xray,
}

impl Theme {
    /// Every theme with a texture to load, in load order.
    pub const ALL: [Theme; 6] = [
        Theme::Metal,
        Theme::Flame,
        Theme::Copper,
        Theme::Neon,
        Theme::PurplePearl,
        Theme::Xray,
    ];

    /// Themes that a UI control can select.
    pub const SELECTABLE: [Theme; 5] = [
        Theme::Xray,
        Theme::Flame,
        Theme::Copper,
        Theme::Neon,
        Theme::PurplePearl,
    ];

    /// Resolve a UI control id. Unknown ids fall back to the default theme.
    pub fn from_id(id: &str) -> Self {
        match id {
            "xray" => Theme::Xray,
            "flame" => Theme::Flame,
            "copper" => Theme::Copper,
            "neon" => Theme::Neon,
            "purple-pearl" => Theme::PurplePearl,
            other => {
                log::debug!("unknown theme id {:?}, using {}", other, Theme::default());
                Theme::default()
            }
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Theme::Metal => "metal",
            Theme::Flame => "flame",
            Theme::Copper => "copper",
            Theme::Neon => "neon",
            Theme::PurplePearl => "purple-pearl",
            Theme::Xray => "xray",
        }
    }

    /// Asset path of the matcap image, relative to the asset root.
    pub fn texture_path(&self) -> &'static str {
        match self {
            Theme::Metal => "textures/matcaps/3.png",
            Theme::Flame => "textures/matcaps/flame.png",
            Theme::Copper => "textures/matcaps/copper.png",
            Theme::Neon => "textures/matcaps/neon.png",
            Theme::PurplePearl => "textures/matcaps/8.png",
            Theme::Xray => "textures/matcaps/xray.png",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Xray
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
