//! matcap-text
//!
//! An interactive 3D scene: a line of extruded, beveled text surrounded by a
//! hundred capsules and tori, all shaded with a single matcap. The theme (the
//! matcap texture) can be switched at runtime and the text can be retyped
//! through an overlay editor. Runs natively through winit and in the browser
//! on WebGL.
//!
//! High-level modules
//! - `camera`: orbit camera, projection and the camera uniform
//! - `config`: runtime configuration with defaults for every field
//! - `context`: GPU device, surface and camera state
//! - `controller`: scene bootstrap, theme switching and text editing
//! - `data_structures`: scene graph, instances, GPU meshes and textures
//! - `editor`: visibility state machine of the text overlay
//! - `flow`: the winit event loop, frame clock and input translation
//! - `font`: typeface JSON parsing and glyph outline flattening
//! - `geometry`: extruded text, capsule and torus meshes
//! - `overlay`: the text input surface the editor shows and hides
//! - `pipelines`: the matcap render pipeline
//! - `render`: uploads the scene and draws it
//! - `resources`: asset loading (font, matcaps, config)
//! - `scatter`: random placement of the decorative shapes
//! - `theme`: the matcap themes
//! - `viewport`: window size, pixel ratio and the responsive layout
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod controller;
pub mod data_structures;
pub mod editor;
pub mod flow;
pub mod font;
pub mod geometry;
pub mod overlay;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scatter;
pub mod theme;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    flow::run().map_err(|e| JsValue::from_str(&e.to_string()))
}
