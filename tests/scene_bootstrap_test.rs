use std::collections::HashSet;

use matcap_text::{
    config::{Config, ScatterParams, TEXT_MESH_NAME},
    controller::SceneController,
    overlay::HeadlessOverlay,
    scatter::{ShapeKind, sample_axis, scatter_transform},
    theme::Theme,
};
use rand::{SeedableRng, rngs::SmallRng};

use crate::common::test_utils::{SEED, bootstrapped, controller, fixture_config};

mod common;

#[test]
fn bootstrap_adds_text_and_shapes() {
    let controller = bootstrapped(fixture_config());
    let scene = controller.scene();
    assert_eq!(scene.len(), 101);

    let named: Vec<_> = scene.meshes().iter().filter(|m| m.name.is_some()).collect();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name.as_deref(), Some(TEXT_MESH_NAME));

    let text = scene.geometry(named[0].geometry).expect("text geometry");
    assert!(!text.is_empty());
    let center = text.bounding_box().expect("text has vertices").center();
    assert!(center.x.abs() < 1e-4 && center.y.abs() < 1e-4 && center.z.abs() < 1e-4);

    assert!(
        scene
            .meshes()
            .iter()
            .all(|m| m.material.matcap == Theme::default())
    );
}

#[test]
fn shapes_share_two_geometries_and_one_material() {
    let controller = bootstrapped(fixture_config());
    let shapes: Vec<_> = controller
        .scene()
        .meshes()
        .iter()
        .filter(|m| m.name.is_none())
        .collect();
    assert_eq!(shapes.len(), 100);

    let geometries: HashSet<_> = shapes.iter().map(|m| m.geometry).collect();
    assert_eq!(geometries.len(), 2);
    let materials: HashSet<_> = shapes.iter().map(|m| m.material.id).collect();
    assert_eq!(materials.len(), 1);
}

#[test]
fn shapes_avoid_the_text() {
    let controller = bootstrapped(fixture_config());
    let [sx, sy, sz] = controller.config().shapes.spread;
    for mesh in controller.scene().meshes().iter().filter(|m| m.name.is_none()) {
        let p = mesh.transform.position;
        for (value, spread) in [(p.x, sx), (p.y, sy), (p.z, sz)] {
            assert!(!(value > 0.0 && value < 1.0), "{} is in the dead zone", value);
            assert!(value.abs() <= spread / 2.0);
        }
        let scale = mesh.transform.uniform_scale().expect("scale is uniform");
        assert!((0.0..1.0).contains(&scale));
    }
}

#[test]
fn same_seed_same_layout() {
    let a = bootstrapped(fixture_config());
    let b = bootstrapped(fixture_config());
    let c = bootstrapped(Config {
        seed: Some(SEED + 1),
        ..fixture_config()
    });

    let transforms = |controller: &SceneController| -> Vec<_> {
        controller
            .scene()
            .meshes()
            .iter()
            .map(|m| m.transform)
            .collect()
    };
    assert_eq!(transforms(&a), transforms(&b));
    assert_ne!(transforms(&a), transforms(&c));
}

#[test]
fn shape_count_is_configurable() {
    let controller = bootstrapped(Config {
        shapes: ScatterParams {
            count: 10,
            ..ScatterParams::default()
        },
        ..fixture_config()
    });
    assert_eq!(controller.scene().len(), 11);
}

#[test]
fn missing_font_leaves_the_scene_empty() {
    let mut controller = SceneController::new(
        fixture_config(),
        None,
        Box::new(HeadlessOverlay::new()),
    );
    controller.bootstrap(&mut SmallRng::seed_from_u64(SEED));
    assert!(controller.scene().is_empty());

    controller.regenerate_text("oi");
    assert!(controller.scene().is_empty());
}

#[test]
fn regenerating_before_bootstrap_adds_the_text() {
    let mut controller = controller(fixture_config());
    controller.regenerate_text("io");
    assert_eq!(controller.scene().len(), 1);
    assert!(controller.scene().find_named(TEXT_MESH_NAME).is_some());
}

#[test]
fn axis_samples_skip_the_dead_zone() {
    let mut rng = SmallRng::seed_from_u64(SEED);
    for _ in 0..10_000 {
        let value = sample_axis(&mut rng, 15.0);
        assert!(!(value > 0.0 && value < 1.0));
        assert!((-7.5..7.5).contains(&value));
    }
}

#[test]
fn both_shape_kinds_are_drawn() {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let kinds: HashSet<_> = (0..100).map(|_| ShapeKind::sample(&mut rng)).collect();
    assert_eq!(kinds.len(), 2);

    let params = ScatterParams::default();
    let transform = scatter_transform(&mut rng, &params);
    assert!(transform.uniform_scale().is_some());
}
