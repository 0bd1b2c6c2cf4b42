use cgmath::{InnerSpace, Vector3};
use matcap_text::{
    config::TextParams,
    geometry::{self, Geometry},
};

use crate::common::test_utils::{assert_close, fixture_font};

mod common;

fn flat() -> TextParams {
    TextParams {
        size: 1.0,
        depth: 0.2,
        bevel_enabled: false,
        ..TextParams::default()
    }
}

fn assert_well_formed(geometry: &Geometry) {
    assert_eq!(geometry.indices.len() % 3, 0);
    let count = geometry.vertices.len() as u32;
    assert!(geometry.indices.iter().all(|&i| i < count));
    for vertex in &geometry.vertices {
        let normal: Vector3<f32> = vertex.normal.into();
        assert_close(normal.magnitude(), 1.0, 1e-4);
    }
}

fn triangles(geometry: &Geometry) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
    geometry.indices.chunks_exact(3).map(|tri| {
        [0, 1, 2].map(|k| Vector3::from(geometry.vertices[tri[k] as usize].position))
    })
}

#[test]
fn capsule_dimensions() {
    let capsule = geometry::capsule(0.3, 0.5, 8, 16);
    assert_well_formed(&capsule);
    let rows = 2 * (8 + 1);
    assert_eq!(capsule.vertices.len(), (16 + 1) * rows);
    assert_eq!(capsule.indices.len(), 16 * (rows - 1) * 6);

    let bounds = capsule.bounding_box().expect("capsule has vertices");
    assert_close(bounds.min.y, -0.55, 1e-5);
    assert_close(bounds.max.y, 0.55, 1e-5);
    assert_close(bounds.max.x, 0.3, 1e-5);
    assert_close(bounds.max.z, 0.3, 1e-5);
}

#[test]
fn torus_dimensions() {
    let torus = geometry::torus(0.3, 0.2, 8, 16);
    assert_well_formed(&torus);
    assert_eq!(torus.vertices.len(), 9 * 17);
    assert_eq!(torus.indices.len(), 8 * 16 * 6);

    let bounds = torus.bounding_box().expect("torus has vertices");
    assert_close(bounds.max.x, 0.5, 1e-5);
    assert_close(bounds.min.x, -0.5, 1e-5);
    assert_close(bounds.max.z, 0.2, 1e-5);
    assert_close(bounds.min.z, -0.2, 1e-5);
}

#[test]
fn text_is_centered() {
    let text = geometry::text_geometry(&fixture_font(), "oi", &TextParams::default())
        .expect("text builds");
    assert!(!text.is_empty());
    assert_well_formed(&text);
    let center = text.bounding_box().expect("text has vertices").center();
    assert!(center.magnitude() < 1e-4, "center is {:?}", center);
}

#[test]
fn empty_text_builds_an_empty_geometry() {
    let font = fixture_font();
    let empty = geometry::text_geometry(&font, "", &TextParams::default()).expect("builds");
    assert!(empty.is_empty());
    assert!(empty.bounding_box().is_none());

    let blank = geometry::text_geometry(&font, "   ", &TextParams::default()).expect("builds");
    assert!(blank.is_empty());
}

#[test]
fn flat_extrusion_spans_the_depth() {
    let text = geometry::text_geometry(&fixture_font(), "i", &flat()).expect("builds");
    let size = text.bounding_box().expect("text has vertices").size();
    assert_close(size.x, 0.2, 1e-5);
    assert_close(size.y, 0.7, 1e-5);
    assert_close(size.z, 0.2, 1e-5);
}

#[test]
fn bevel_adds_thickness_and_width() {
    let params = TextParams {
        size: 1.0,
        ..TextParams::default()
    };
    let text = geometry::text_geometry(&fixture_font(), "i", &params).expect("builds");
    assert_well_formed(&text);
    let size = text.bounding_box().expect("text has vertices").size();
    assert_close(size.z, params.depth + 2.0 * params.bevel_thickness, 1e-5);
    assert_close(size.x, 0.2 + 2.0 * params.bevel_size, 1e-5);
    assert_close(size.y, 0.7 + 2.0 * params.bevel_size, 1e-5);
}

#[test]
fn faces_point_outwards() {
    let text = geometry::text_geometry(&fixture_font(), "i", &flat()).expect("builds");
    let mut caps = 0;
    for vertex in &text.vertices {
        let [x, y, z] = vertex.position;
        let [nx, ny, nz] = vertex.normal;
        if nz.abs() > 0.5 {
            caps += 1;
            assert_eq!(nz > 0.0, z > 0.0, "cap normal at z = {}", z);
        }
        if nx.abs() > 0.5 {
            assert_eq!(nx > 0.0, x > 0.0, "side normal at x = {}", x);
        }
        if ny.abs() > 0.5 {
            assert_eq!(ny > 0.0, y > 0.0, "side normal at y = {}", y);
        }
    }
    assert!(caps > 0);
}

#[test]
fn holes_stay_open() {
    let text = geometry::text_geometry(&fixture_font(), "o", &flat()).expect("builds");
    let cap_area: f32 = triangles(&text)
        .filter(|[a, b, c]| (b - a).cross(c - a).z > 0.0)
        .map(|[a, b, c]| (b - a).cross(c - a).magnitude() / 2.0)
        .sum();
    // 0.6 x 0.7 square minus the 0.3 x 0.4 hole
    assert_close(cap_area, 0.30, 1e-4);
}

#[test]
fn long_text_keeps_every_hole() {
    let text = "o".repeat(200);
    let geometry = geometry::text_geometry(&fixture_font(), &text, &flat()).expect("builds");
    assert_well_formed(&geometry);
    let cap_area: f32 = triangles(&geometry)
        .filter(|[a, b, c]| (b - a).cross(c - a).z > 0.0)
        .map(|[a, b, c]| (b - a).cross(c - a).magnitude() / 2.0)
        .sum();
    assert_close(cap_area, 200.0 * 0.30, 1e-2);
}

#[test]
fn curve_segments_refine_the_outline() {
    let font = fixture_font();
    let coarse = TextParams {
        curve_segments: 2,
        ..flat()
    };
    let fine = TextParams {
        curve_segments: 12,
        ..flat()
    };
    let coarse = geometry::text_geometry(&font, "c", &coarse).expect("builds");
    let fine = geometry::text_geometry(&font, "c", &fine).expect("builds");
    assert!(fine.vertices.len() > coarse.vertices.len());
}

#[test]
fn translate_moves_every_vertex() {
    let mut torus = geometry::torus(0.3, 0.2, 8, 8);
    let before = torus.bounding_box().expect("torus has vertices");
    torus.translate(Vector3::new(1.0, -2.0, 0.5));
    let after = torus.bounding_box().expect("torus has vertices");
    assert!((after.min - before.min - Vector3::new(1.0, -2.0, 0.5)).magnitude() < 1e-5);
    torus.center();
    let centered = torus.bounding_box().expect("torus has vertices");
    assert!(centered.center().magnitude() < 1e-5);
}
