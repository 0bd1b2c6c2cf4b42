//! Scene data: meshes, instances and textures.
//!
//! - `model` contains the vertex layout and GPU meshes
//! - `instance` holds per-mesh transforms and their GPU layout
//! - `scene_graph` is the retained scene the controller mutates
//! - `texture` wraps GPU textures and their creation

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
