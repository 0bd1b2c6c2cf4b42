//! Asset loading.
//!
//! The font and all six matcaps are loaded together by [`load_assets`], so no
//! mesh is built before every texture it might reference exists.

use std::collections::HashMap;

use crate::{
    data_structures::texture::{PLACEHOLDER_RGBA, Texture},
    font::Font,
    resources::texture::{load_string, load_texture},
    theme::Theme,
};

pub mod texture;

pub struct Assets {
    /// `None` when the font could not be loaded or parsed.
    pub font: Option<Font>,
    /// One texture per entry of [`Theme::ALL`].
    pub matcaps: HashMap<Theme, Texture>,
}

pub async fn load_font(file_name: &str) -> anyhow::Result<Font> {
    let json = load_string(file_name).await?;
    let font = Font::from_json(&json)?;
    log::info!("loaded font {:?} from {}", font.family_name, file_name);
    Ok(font)
}

/// Load every matcap. A texture that fails to load is replaced by a grey placeholder.
pub async fn load_matcaps(device: &wgpu::Device, queue: &wgpu::Queue) -> HashMap<Theme, Texture> {
    let loads = Theme::ALL.map(|theme| async move {
        let texture = match load_texture(theme.texture_path(), device, queue).await {
            Ok(texture) => texture,
            Err(e) => {
                log::error!("failed to load matcap {}: {:#}", theme.texture_path(), e);
                Texture::solid(device, queue, PLACEHOLDER_RGBA, theme.id())
            }
        };
        (theme, texture)
    });
    futures::future::join_all(loads).await.into_iter().collect()
}

pub async fn load_assets(font_file: &str, device: &wgpu::Device, queue: &wgpu::Queue) -> Assets {
    let (font, matcaps) = futures::join!(load_font(font_file), load_matcaps(device, queue));
    let font = font
        .inspect_err(|e| log::error!("failed to load font {}: {:#}", font_file, e))
        .ok();
    Assets { font, matcaps }
}
