//! Random placement of the decorative shapes.

use std::f32::consts::PI;

use cgmath::{Quaternion, Rad, Rotation3, Vector3};
use rand::Rng;

use crate::{config::ScatterParams, data_structures::instance::Instance};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Capsule,
    Torus,
}

impl ShapeKind {
    pub fn sample(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            ShapeKind::Capsule
        } else {
            ShapeKind::Torus
        }
    }
}

/// Sample `(u - 0.5) * spread` until the value falls outside the open interval (0, 1).
pub fn sample_axis(rng: &mut impl Rng, spread: f32) -> f32 {
    loop {
        let value = (rng.random::<f32>() - 0.5) * spread;
        if !(value > 0.0 && value < 1.0) {
            return value;
        }
    }
}

/// Transform of one shape: dead-zone avoiding position, rotation about X then Y
/// by up to π each, and one uniform scale in [0, 1).
pub fn scatter_transform(rng: &mut impl Rng, params: &ScatterParams) -> Instance {
    let [sx, sy, sz] = params.spread;
    let position = Vector3::new(
        sample_axis(rng, sx),
        sample_axis(rng, sy),
        sample_axis(rng, sz),
    );
    let rotation = Quaternion::from_angle_x(Rad(rng.random::<f32>() * PI))
        * Quaternion::from_angle_y(Rad(rng.random::<f32>() * PI));
    let scale = rng.random::<f32>();
    Instance {
        position,
        rotation,
        scale: Vector3::new(scale, scale, scale),
    }
}
