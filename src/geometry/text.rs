//! Solid text built from glyph contours.
//!
//! Contours are extruded along +Z. With bevels enabled the walls are split into
//! layers: `bevel_segments + 1` front bevel rings, one body ring and
//! `bevel_segments` back bevel rings. Each ring pushes the contour outwards
//! along per-vertex miter vectors by a quarter-circle profile, so the caps keep
//! the glyph outline while the body is `bevel_size` wider.

use std::f32::consts::{FRAC_PI_2, SQRT_2};

use cgmath::{InnerSpace, Vector2, Vector3};
use lyon::{
    math::point,
    path::Path,
    tessellation::{
        BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, TessellationError,
        VertexBuffers,
    },
};

use crate::{
    config::TextParams,
    font::{Contour, Font},
    geometry::Geometry,
};

#[derive(Debug, thiserror::Error)]
pub enum TextGeometryError {
    #[error("failed to tessellate text caps: {0:?}")]
    Tessellation(TessellationError),
}

/// Build centered text geometry for `text`.
pub fn text_geometry(
    font: &Font,
    text: &str,
    params: &TextParams,
) -> Result<Geometry, TextGeometryError> {
    // Holes never cross glyph boundaries, so containment is only tested per glyph.
    let contours: Vec<Contour> = font
        .glyph_contours(text, params.size, params.curve_segments)
        .iter()
        .flat_map(|glyph| orient(glyph))
        .collect();
    let mut geometry = extrude_oriented(&contours, params)?;
    geometry.center();
    Ok(geometry)
}

/// A ring of the extrusion: its depth and how far the contour is pushed outwards.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Layer {
    z: f32,
    offset: f32,
}

fn layers(params: &TextParams) -> Vec<Layer> {
    let mut layers = Vec::new();
    let segments = if params.bevel_enabled {
        params.bevel_segments
    } else {
        0
    };
    if segments == 0 {
        layers.push(Layer { z: 0.0, offset: 0.0 });
        layers.push(Layer {
            z: params.depth,
            offset: 0.0,
        });
        return layers;
    }
    let ring = |t: f32| {
        let angle = t * FRAC_PI_2;
        (
            params.bevel_thickness * angle.cos(),
            params.bevel_size * angle.sin() + params.bevel_offset,
        )
    };
    for b in 0..=segments {
        let (z, offset) = ring(b as f32 / segments as f32);
        layers.push(Layer { z: -z, offset });
    }
    layers.push(Layer {
        z: params.depth,
        offset: params.bevel_size + params.bevel_offset,
    });
    for b in (0..segments).rev() {
        let (z, offset) = ring(b as f32 / segments as f32);
        layers.push(Layer {
            z: params.depth + z,
            offset,
        });
    }
    layers
}

/// Extrude contours into a closed solid. Contour orientation does not matter:
/// holes are found by containment parity.
pub fn extrude(contours: &[Contour], params: &TextParams) -> Result<Geometry, TextGeometryError> {
    extrude_oriented(&orient(contours), params)
}

/// Extrude contours whose outer rings are counter-clockwise and holes clockwise.
fn extrude_oriented(
    contours: &[Contour],
    params: &TextParams,
) -> Result<Geometry, TextGeometryError> {
    let mut geometry = Geometry::default();
    if contours.is_empty() {
        return Ok(geometry);
    }
    let layers = layers(params);
    let bevels: Vec<Vec<Vector2<f32>>> = contours.iter().map(|c| bevel_vectors(c)).collect();

    let ring = |contour: usize, layer: &Layer| -> Vec<Vector3<f32>> {
        contours[contour]
            .iter()
            .zip(&bevels[contour])
            .map(|(p, v)| {
                let p = *p + *v * layer.offset;
                Vector3::new(p.x, p.y, layer.z)
            })
            .collect()
    };

    // Caps share one triangulation of the (possibly offset) outline.
    let (first, last) = (layers[0], layers[layers.len() - 1]);
    let cap_outline: Vec<Contour> = contours
        .iter()
        .zip(&bevels)
        .map(|(contour, vectors)| {
            contour
                .iter()
                .zip(vectors)
                .map(|(p, v)| *p + *v * first.offset)
                .collect()
        })
        .collect();
    for [a, b, c] in tessellate(&cap_outline)? {
        let at = |p: Vector2<f32>, z: f32| Vector3::new(p.x, p.y, z);
        geometry.push_flat_triangle(at(a, last.z), at(b, last.z), at(c, last.z));
        geometry.push_flat_triangle(at(a, first.z), at(c, first.z), at(b, first.z));
    }

    for contour in 0..contours.len() {
        let rings: Vec<Vec<Vector3<f32>>> =
            layers.iter().map(|layer| ring(contour, layer)).collect();
        for pair in rings.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            let len = lower.len();
            for i in 0..len {
                let j = (i + 1) % len;
                geometry.push_flat_triangle(lower[i], lower[j], upper[j]);
                geometry.push_flat_triangle(lower[i], upper[j], upper[i]);
            }
        }
    }
    Ok(geometry)
}

/// Make outer contours counter-clockwise and holes clockwise.
fn orient(contours: &[Contour]) -> Vec<Contour> {
    let bounds: Vec<Bounds> = contours.iter().map(|c| Bounds::of(c)).collect();
    contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            let depth = contours
                .iter()
                .zip(&bounds)
                .enumerate()
                .filter(|(j, (other, bounds))| {
                    *j != i && bounds.contains(contour[0]) && contains(other, contour[0])
                })
                .count();
            let is_hole = depth % 2 == 1;
            let is_ccw = signed_area(contour) > 0.0;
            if is_ccw == is_hole {
                contour.iter().rev().copied().collect()
            } else {
                contour.clone()
            }
        })
        .collect()
}

/// Axis aligned bounds of a contour.
#[derive(Clone, Copy, Debug)]
struct Bounds {
    min: Vector2<f32>,
    max: Vector2<f32>,
}

impl Bounds {
    fn of(contour: &[Vector2<f32>]) -> Self {
        let first = contour[0];
        contour.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| Self {
                min: Vector2::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Vector2::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        )
    }

    fn contains(&self, p: Vector2<f32>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

pub(crate) fn signed_area(contour: &[Vector2<f32>]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let (a, b) = (contour[i], contour[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        / 2.0
}

/// Even-odd point in polygon test.
pub(crate) fn contains(polygon: &[Vector2<f32>], p: Vector2<f32>) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn edge_normal(from: Vector2<f32>, to: Vector2<f32>) -> Vector2<f32> {
    let d = to - from;
    let n = Vector2::new(d.y, -d.x);
    if n.magnitude2() > 0.0 {
        n.normalize()
    } else {
        n
    }
}

/// Per-vertex miter vectors pointing away from the filled side.
///
/// Moving a vertex by `v * d` moves both adjacent edges outwards by `d`. The
/// length is clamped to √2 so sharp corners do not spike.
fn bevel_vectors(contour: &[Vector2<f32>]) -> Vec<Vector2<f32>> {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let prev = contour[(i + n - 1) % n];
            let cur = contour[i];
            let next = contour[(i + 1) % n];
            let n1 = edge_normal(prev, cur);
            let n2 = edge_normal(cur, next);
            let denom = 1.0 + n1.dot(n2);
            let v = if denom < 1e-6 { n1 } else { (n1 + n2) / denom };
            if v.magnitude2() > 2.0 {
                v.normalize() * SQRT_2
            } else {
                v
            }
        })
        .collect()
}

/// Triangulate the area enclosed by `contours` (non-zero rule). Every triangle is counter-clockwise.
fn tessellate(contours: &[Contour]) -> Result<Vec<[Vector2<f32>; 3]>, TextGeometryError> {
    let mut builder = Path::builder();
    for contour in contours {
        builder.begin(point(contour[0].x, contour[0].y));
        for p in &contour[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vector2<f32>, u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::default().with_fill_rule(FillRule::NonZero),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                let position = vertex.position();
                Vector2::new(position.x, position.y)
            }),
        )
        .map_err(TextGeometryError::Tessellation)?;

    Ok(buffers
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let [a, b, c] = [
                buffers.vertices[tri[0] as usize],
                buffers.vertices[tri[1] as usize],
                buffers.vertices[tri[2] as usize],
            ];
            if (b - a).perp_dot(c - a) < 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect())
}
