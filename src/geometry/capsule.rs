use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::Vector2;

use crate::{data_structures::model::ModelVertex, geometry::Geometry};

/// A capsule around the Y axis: a cylinder of `length` capped by two hemispheres.
///
/// The profile of both caps is split into `cap_segments` pieces and revolved in
/// `radial_segments` steps.
pub fn capsule(radius: f32, length: f32, cap_segments: u32, radial_segments: u32) -> Geometry {
    let cap_segments = cap_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let half = length / 2.0;

    // (profile point, profile normal) from the bottom pole to the top pole
    let mut profile: Vec<(Vector2<f32>, Vector2<f32>)> = Vec::new();
    for i in 0..=cap_segments {
        let angle = 1.5 * PI + FRAC_PI_2 * i as f32 / cap_segments as f32;
        let normal = Vector2::new(angle.cos(), angle.sin());
        profile.push((Vector2::new(0.0, -half) + normal * radius, normal));
    }
    for i in 0..=cap_segments {
        let angle = FRAC_PI_2 * i as f32 / cap_segments as f32;
        let normal = Vector2::new(angle.cos(), angle.sin());
        profile.push((Vector2::new(0.0, half) + normal * radius, normal));
    }
    lathe(&profile, radial_segments)
}

fn lathe(profile: &[(Vector2<f32>, Vector2<f32>)], segments: u32) -> Geometry {
    let rows = profile.len() as u32;
    let mut geometry = Geometry::default();
    for i in 0..=segments {
        let phi = TAU * i as f32 / segments as f32;
        let (sin, cos) = phi.sin_cos();
        for (j, (point, normal)) in profile.iter().enumerate() {
            geometry.vertices.push(ModelVertex {
                position: [point.x * sin, point.y, point.x * cos],
                tex_coords: [
                    i as f32 / segments as f32,
                    j as f32 / (rows - 1) as f32,
                ],
                normal: [normal.x * sin, normal.y, normal.x * cos],
            });
        }
    }
    for i in 0..segments {
        for j in 0..rows - 1 {
            let a = j + i * rows;
            let b = a + rows;
            let c = a + rows + 1;
            let d = a + 1;
            geometry.indices.extend_from_slice(&[a, b, d, c, d, b]);
        }
    }
    geometry
}
