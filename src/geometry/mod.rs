//! CPU-side mesh geometry.
//!
//! Geometries are plain vertex/index lists built once on the CPU and uploaded to
//! the GPU by [`crate::render::SceneRenderer`] the first time a mesh references them.
//!
//! - `capsule` builds a capsule as a lathe of a stadium profile
//! - `torus` builds a ring torus
//! - `text` extrudes and bevels glyph contours into solid text

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::ModelVertex;

pub mod capsule;
pub mod text;
pub mod torus;

pub use capsule::capsule;
pub use text::{TextGeometryError, text_geometry};
pub use torus::torus;

/// Axis aligned bounds of a geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns `None` for a geometry without vertices.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first: Vector3<f32> = self.vertices.first()?.position.into();
        let bounds = self.vertices.iter().fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bounds, vertex| BoundingBox {
                min: Vector3::new(
                    bounds.min.x.min(vertex.position[0]),
                    bounds.min.y.min(vertex.position[1]),
                    bounds.min.z.min(vertex.position[2]),
                ),
                max: Vector3::new(
                    bounds.max.x.max(vertex.position[0]),
                    bounds.max.y.max(vertex.position[1]),
                    bounds.max.z.max(vertex.position[2]),
                ),
            },
        );
        Some(bounds)
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        for vertex in &mut self.vertices {
            let position: Vector3<f32> = vertex.position.into();
            vertex.position = (position + offset).into();
        }
    }

    /// Move the geometry so that its bounding box is centered on the origin.
    pub fn center(&mut self) {
        if let Some(bounds) = self.bounding_box() {
            self.translate(-bounds.center());
        }
    }

    /// Append a triangle with its own three vertices and a flat face normal.
    ///
    /// Degenerate triangles are skipped.
    pub(crate) fn push_flat_triangle(&mut self, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) {
        let normal = (b - a).cross(c - a);
        if normal.magnitude2() <= 1e-20 {
            return;
        }
        let normal = normal.normalize();
        let base = self.vertices.len() as u32;
        for (position, tex_coords) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (c, [1.0, 1.0])] {
            self.vertices.push(ModelVertex {
                position: position.into(),
                tex_coords,
                normal: normal.into(),
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}
