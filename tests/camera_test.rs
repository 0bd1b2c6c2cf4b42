use std::f32::consts::TAU;

use cgmath::{Deg, EuclideanSpace, InnerSpace, Point3, Vector4};
use matcap_text::camera::{
    Camera, FOVY_DEGREES, MIN_DISTANCE, OrbitController, Projection, ZFAR, ZNEAR, ZOOM_SCALE,
};

use crate::common::test_utils::assert_close;

mod common;

fn projection() -> Projection {
    Projection::new(800.0, 600.0, Deg(FOVY_DEGREES), ZNEAR, ZFAR)
}

fn settle(controller: &mut OrbitController, camera: &mut Camera, projection: &Projection) {
    for _ in 0..1000 {
        controller.update(camera, projection);
    }
    assert!(controller.is_idle());
}

fn distance(camera: &Camera) -> f32 {
    (camera.position - camera.target).magnitude()
}

#[test]
fn target_projects_to_the_center() {
    let camera = Camera::new((1.0, 1.0, 5.0));
    let clip = projection().calc_matrix()
        * camera.calc_matrix()
        * Vector4::new(0.0, 0.0, 0.0, 1.0);
    assert_close(clip.x / clip.w, 0.0, 1e-5);
    assert_close(clip.y / clip.w, 0.0, 1e-5);
    let depth = clip.z / clip.w;
    assert!((0.0..=1.0).contains(&depth), "depth {}", depth);
}

#[test]
fn resize_updates_the_aspect() {
    let mut projection = projection();
    assert_close(projection.aspect(), 4.0 / 3.0, 1e-6);
    projection.resize(600.0, 600.0);
    assert_close(projection.aspect(), 1.0, 1e-6);
}

#[test]
fn rotation_glides_to_the_full_drag() {
    let projection = projection();
    let mut camera = Camera::new((0.0, 0.0, 5.0));
    let mut controller = OrbitController::new(1000.0);

    controller.rotate(100.0, 0.0);
    assert!(!controller.is_idle());
    controller.update(&mut camera, &projection);
    let first = camera.position;
    // only a fraction of the drag is applied per frame
    assert!(first.x < 0.0 && first.x > -0.5, "first step {:?}", first);

    settle(&mut controller, &mut camera, &projection);
    let angle = -TAU * 0.1;
    assert_close(camera.position.x, 5.0 * angle.sin(), 1e-2);
    assert_close(camera.position.z, 5.0 * angle.cos(), 1e-2);
    assert_close(distance(&camera), 5.0, 1e-3);
    assert_eq!(camera.target, Point3::origin());
}

#[test]
fn polar_angle_never_flips() {
    let projection = projection();
    let mut camera = Camera::new((0.0, 0.0, 5.0));
    let mut controller = OrbitController::new(100.0);
    controller.rotate(0.0, 1000.0);
    settle(&mut controller, &mut camera, &projection);
    // dragging down far enough parks the camera just short of the top pole
    assert!(camera.position.x.is_finite() && camera.position.z.is_finite());
    assert!(camera.position.y > 0.0);
    assert!(camera.position.y <= 5.0 + 1e-4);
    assert_close(distance(&camera), 5.0, 1e-3);
}

#[test]
fn dolly_applies_once() {
    let projection = projection();
    let mut camera = Camera::new((0.0, 0.0, 5.0));
    let mut controller = OrbitController::new(600.0);
    controller.dolly(1.0);
    controller.update(&mut camera, &projection);
    assert_close(distance(&camera), 5.0 * ZOOM_SCALE, 1e-4);
    assert!(controller.is_idle());
    controller.update(&mut camera, &projection);
    assert_close(distance(&camera), 5.0 * ZOOM_SCALE, 1e-4);
}

#[test]
fn dolly_stops_at_the_minimum_distance() {
    let projection = projection();
    let mut camera = Camera::new((0.0, 0.0, 0.2));
    let mut controller = OrbitController::new(600.0);
    controller.dolly(100.0);
    controller.update(&mut camera, &projection);
    assert_close(distance(&camera), MIN_DISTANCE, 1e-5);
}

#[test]
fn pan_moves_the_target() {
    let projection = projection();
    let mut camera = Camera::new((0.0, 0.0, 5.0));
    let mut controller = OrbitController::new(600.0);
    controller.pan(50.0, 0.0);
    settle(&mut controller, &mut camera, &projection);
    // dragging right moves the scene right, so the target goes left
    assert!(camera.target.x < 0.0);
    assert_close(camera.target.y, 0.0, 1e-4);
    assert_close(distance(&camera), 5.0, 1e-3);
}
