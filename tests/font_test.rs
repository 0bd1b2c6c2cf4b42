use matcap_text::font::{FALLBACK_GLYPH, Font, FontError, PathCommand};

use crate::common::test_utils::{assert_close, fixture_font};

mod common;

fn typeface(outline: &str, resolution: f32) -> String {
    format!(
        r#"{{
            "glyphs": {{ "a": {{ "ha": 500, "o": "{}" }} }},
            "resolution": {},
            "boundingBox": {{ "yMin": 0, "yMax": 1000 }}
        }}"#,
        outline, resolution
    )
}

fn bounds(points: &[cgmath::Vector2<f32>]) -> (f32, f32, f32, f32) {
    points.iter().fold(
        (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    )
}

#[test]
fn parses_glyph_outlines() {
    let font = fixture_font();
    assert_eq!(font.family_name, "Fixture");
    assert_close(font.line_height(), 1350.0, 1e-3);

    let o = font.glyph('o').expect("o is in the font");
    assert_eq!(o.advance, 700.0);
    assert_eq!(o.commands.len(), 10);
    assert_eq!(
        o.commands[0],
        PathCommand::MoveTo(cgmath::Vector2::new(0.0, 0.0))
    );

    let c = font.glyph('c').expect("c is in the font");
    assert_eq!(
        c.commands[2],
        PathCommand::QuadTo {
            ctrl: cgmath::Vector2::new(600.0, 350.0),
            to: cgmath::Vector2::new(500.0, 700.0),
        }
    );

    let space = font.glyph(' ').expect("space is in the font");
    assert!(space.commands.is_empty());
    assert!(font.glyph(FALLBACK_GLYPH).is_some());
}

#[test]
fn closing_point_is_dropped() {
    let contours = fixture_font().generate_contours("o", 1.0, 12);
    assert_eq!(contours.len(), 2);
    assert_eq!(contours[0].len(), 4);
    assert_eq!(contours[1].len(), 4);

    let (min_x, min_y, max_x, max_y) = bounds(&contours[0]);
    assert_close(min_x, 0.0, 1e-6);
    assert_close(min_y, 0.0, 1e-6);
    assert_close(max_x, 0.6, 1e-6);
    assert_close(max_y, 0.7, 1e-6);
}

#[test]
fn size_scales_outlines() {
    let contours = fixture_font().generate_contours("i", 2.0, 12);
    let (_, _, max_x, max_y) = bounds(&contours[0]);
    assert_close(max_x, 0.4, 1e-6);
    assert_close(max_y, 1.4, 1e-6);
}

#[test]
fn glyphs_advance_along_the_line() {
    let font = fixture_font();

    let contours = font.generate_contours("ii", 1.0, 12);
    assert_eq!(contours.len(), 2);
    let (min_x, _, _, _) = bounds(&contours[1]);
    assert_close(min_x, 0.3, 1e-6);

    let contours = font.generate_contours(" i", 1.0, 12);
    assert_eq!(contours.len(), 1);
    let (min_x, _, _, _) = bounds(&contours[0]);
    assert_close(min_x, 0.3, 1e-6);
}

#[test]
fn newline_starts_a_new_line() {
    let contours = fixture_font().generate_contours("i\ni", 1.0, 12);
    assert_eq!(contours.len(), 2);
    let (min_x, min_y, _, _) = bounds(&contours[1]);
    assert_close(min_x, 0.0, 1e-6);
    assert_close(min_y, -1.35, 1e-5);
}

#[test]
fn unknown_characters_use_the_fallback_glyph() {
    let contours = fixture_font().generate_contours("Z", 1.0, 12);
    assert_eq!(contours.len(), 1);
    let (_, _, max_x, _) = bounds(&contours[0]);
    assert_close(max_x, 0.4, 1e-6);
}

#[test]
fn curves_are_split_into_segments() {
    let font = fixture_font();

    // two line points, the curve, the last line point
    let quad = font.generate_contours("c", 1.0, 4);
    assert_eq!(quad[0].len(), 2 + 4 + 1);
    let (_, _, max_x, _) = bounds(&quad[0]);
    assert!(max_x > 0.5 && max_x < 0.6, "curve bulges towards its control point");
    // halfway along the curve
    assert_close(quad[0][3].x, 0.55, 1e-6);
    assert_close(quad[0][3].y, 0.35, 1e-6);

    let cubic = font.generate_contours("s", 1.0, 3);
    assert_eq!(cubic[0].len(), 2 + 3 + 1);

    let fine = font.generate_contours("c", 1.0, 12);
    assert!(fine[0].len() > quad[0].len());
}

#[test]
fn contours_are_grouped_per_glyph() {
    let font = fixture_font();
    let glyphs = font.glyph_contours("o i", 1.0, 12);
    assert_eq!(glyphs.len(), 2);
    assert_eq!(glyphs[0].len(), 2);
    assert_eq!(glyphs[1].len(), 1);
    let (min_x, _, _, _) = bounds(&glyphs[1][0]);
    assert_close(min_x, 1.0, 1e-6);

    let flat: Vec<_> = glyphs.into_iter().flatten().collect();
    assert_eq!(flat, font.generate_contours("o i", 1.0, 12));
}

#[test]
fn empty_text_has_no_contours() {
    assert!(fixture_font().generate_contours("", 1.0, 12).is_empty());
}

#[test]
fn rejects_malformed_typefaces() {
    assert!(matches!(
        Font::from_json("not a typeface"),
        Err(FontError::Json(_))
    ));
    assert!(matches!(
        Font::from_json(&typeface("m 0 0", 0.0)),
        Err(FontError::Resolution(_))
    ));
    assert!(matches!(
        Font::from_json(&typeface("m 0 0 x 1 1", 1000.0)),
        Err(FontError::UnknownCommand { glyph: 'a', ref command }) if command == "x"
    ));
    assert!(matches!(
        Font::from_json(&typeface("m 0", 1000.0)),
        Err(FontError::MissingCoordinates {
            glyph: 'a',
            command: 'm'
        })
    ));
    assert!(matches!(
        Font::from_json(&typeface("m 0 zz", 1000.0)),
        Err(FontError::InvalidCoordinate { glyph: 'a', ref value }) if value == "zz"
    ));
}
