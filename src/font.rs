//! Typeface fonts.
//!
//! Parses the JSON typeface format (as produced by facetype.js) and turns a
//! string into flattened glyph contours that the text geometry builder extrudes.
//!
//! Each glyph carries an advance (`ha`) and an outline string (`o`) made of
//! whitespace separated commands in font units:
//!
//! - `m x y` starts a new contour
//! - `l x y` draws a line
//! - `q x y cx cy` draws a quadratic curve to `(x, y)` with control point `(cx, cy)`
//! - `b x y c1x c1y c2x c2y` draws a cubic curve to `(x, y)`

use std::collections::HashMap;

use cgmath::Vector2;
use lyon::{
    geom::{CubicBezierSegment, QuadraticBezierSegment},
    math::{Point, point},
};
use serde::Deserialize;

/// Glyph used in place of characters the font does not cover.
pub const FALLBACK_GLYPH: char = '?';

/// Points closer than this are merged while flattening.
const MERGE_EPSILON: f32 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("malformed typeface json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("font resolution must be positive, got {0}")]
    Resolution(f32),
    #[error("glyph {glyph:?}: unknown outline command {command:?}")]
    UnknownCommand { glyph: char, command: String },
    #[error("glyph {glyph:?}: outline command '{command}' is missing coordinates")]
    MissingCoordinates { glyph: char, command: char },
    #[error("glyph {glyph:?}: invalid coordinate {value:?}")]
    InvalidCoordinate { glyph: char, value: String },
}

#[derive(Deserialize)]
struct TypefaceJson {
    glyphs: HashMap<String, GlyphJson>,
    resolution: f32,
    #[serde(rename = "boundingBox")]
    bounding_box: BoundingBoxJson,
    #[serde(rename = "underlineThickness", default)]
    underline_thickness: f32,
    #[serde(rename = "familyName", default)]
    family_name: String,
}

#[derive(Deserialize)]
struct GlyphJson {
    #[serde(default)]
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Deserialize)]
struct BoundingBoxJson {
    #[serde(rename = "yMin")]
    y_min: f32,
    #[serde(rename = "yMax")]
    y_max: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vector2<f32>),
    LineTo(Vector2<f32>),
    QuadTo {
        ctrl: Vector2<f32>,
        to: Vector2<f32>,
    },
    CubicTo {
        ctrl1: Vector2<f32>,
        ctrl2: Vector2<f32>,
        to: Vector2<f32>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub advance: f32,
    pub commands: Vec<PathCommand>,
}

/// A closed polyline in text space. The closing edge back to the first point is implicit.
pub type Contour = Vec<Vector2<f32>>;

#[derive(Clone, Debug)]
pub struct Font {
    pub family_name: String,
    resolution: f32,
    line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    pub fn from_json(json: &str) -> Result<Self, FontError> {
        let raw: TypefaceJson = serde_json::from_str(json)?;
        if !(raw.resolution > 0.0) {
            return Err(FontError::Resolution(raw.resolution));
        }
        let mut glyphs = HashMap::with_capacity(raw.glyphs.len());
        for (key, glyph) in raw.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                log::debug!("skipping glyph entry {:?}", key);
                continue;
            };
            let commands = match &glyph.o {
                Some(outline) => parse_outline(ch, outline)?,
                None => Vec::new(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: glyph.ha,
                    commands,
                },
            );
        }
        let line_height =
            raw.bounding_box.y_max - raw.bounding_box.y_min + raw.underline_thickness;
        Ok(Self {
            family_name: raw.family_name,
            resolution: raw.resolution,
            line_height,
            glyphs,
        })
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Line height in font units.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Lay out `text` left to right and flatten every glyph outline into contours.
    ///
    /// `size` is the height of one em in scene units. Curves are split into
    /// `curve_segments` straight pieces; lines stay single segments.
    pub fn generate_contours(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Contour> {
        self.glyph_contours(text, size, curve_segments)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Same layout as [`Font::generate_contours`], grouped by glyph. Glyphs
    /// without an outline (spaces) are left out.
    pub fn glyph_contours(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Vec<Contour>> {
        let scale = size / self.resolution;
        let line_height = self.line_height * scale;
        let segments = curve_segments.max(1);
        let mut offset = Vector2::new(0.0f32, 0.0);
        let mut glyphs = Vec::new();
        for ch in text.chars() {
            if ch == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }
            let glyph = match self.glyphs.get(&ch) {
                Some(glyph) => glyph,
                None => {
                    log::error!(
                        "character {:?} does not exist in font family {}",
                        ch,
                        self.family_name
                    );
                    match self.glyphs.get(&FALLBACK_GLYPH) {
                        Some(glyph) => glyph,
                        None => continue,
                    }
                }
            };
            let contours = flatten_glyph(glyph, scale, offset, segments);
            if !contours.is_empty() {
                glyphs.push(contours);
            }
            offset.x += glyph.advance * scale;
        }
        glyphs
    }
}

fn parse_outline(glyph: char, outline: &str) -> Result<Vec<PathCommand>, FontError> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();
    while let Some(token) = tokens.next() {
        let command = match token {
            "m" => PathCommand::MoveTo(read_point(glyph, 'm', &mut tokens)?),
            "l" => PathCommand::LineTo(read_point(glyph, 'l', &mut tokens)?),
            "q" => {
                let to = read_point(glyph, 'q', &mut tokens)?;
                let ctrl = read_point(glyph, 'q', &mut tokens)?;
                PathCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = read_point(glyph, 'b', &mut tokens)?;
                let ctrl1 = read_point(glyph, 'b', &mut tokens)?;
                let ctrl2 = read_point(glyph, 'b', &mut tokens)?;
                PathCommand::CubicTo { ctrl1, ctrl2, to }
            }
            "z" => continue,
            other => {
                return Err(FontError::UnknownCommand {
                    glyph,
                    command: other.to_string(),
                });
            }
        };
        commands.push(command);
    }
    Ok(commands)
}

fn read_point<'a>(
    glyph: char,
    command: char,
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<Vector2<f32>, FontError> {
    let mut coordinate = || -> Result<f32, FontError> {
        let token = tokens
            .next()
            .ok_or(FontError::MissingCoordinates { glyph, command })?;
        token.parse().map_err(|_| FontError::InvalidCoordinate {
            glyph,
            value: token.to_string(),
        })
    };
    let x = coordinate()?;
    let y = coordinate()?;
    Ok(Vector2::new(x, y))
}

fn to_point(p: Vector2<f32>) -> Point {
    point(p.x, p.y)
}

fn to_vector(p: Point) -> Vector2<f32> {
    Vector2::new(p.x, p.y)
}

fn flatten_glyph(glyph: &Glyph, scale: f32, offset: Vector2<f32>, segments: u32) -> Vec<Contour> {
    let place = |p: Vector2<f32>| p * scale + offset;
    let steps = move || (1..=segments).map(move |i| i as f32 / segments as f32);
    let mut contours = Vec::new();
    let mut current: Contour = Vec::new();
    for command in &glyph.commands {
        match *command {
            PathCommand::MoveTo(p) => {
                finish_contour(std::mem::take(&mut current), &mut contours);
                current.push(place(p));
            }
            PathCommand::LineTo(p) => current.push(place(p)),
            PathCommand::QuadTo { ctrl, to } => {
                let Some(&from) = current.last() else {
                    continue;
                };
                let curve = QuadraticBezierSegment {
                    from: to_point(from),
                    ctrl: to_point(place(ctrl)),
                    to: to_point(place(to)),
                };
                current.extend(steps().map(|t| to_vector(curve.sample(t))));
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let Some(&from) = current.last() else {
                    continue;
                };
                let curve = CubicBezierSegment {
                    from: to_point(from),
                    ctrl1: to_point(place(ctrl1)),
                    ctrl2: to_point(place(ctrl2)),
                    to: to_point(place(to)),
                };
                current.extend(steps().map(|t| to_vector(curve.sample(t))));
            }
        }
    }
    finish_contour(current, &mut contours);
    contours
}

fn finish_contour(mut contour: Contour, contours: &mut Vec<Contour>) {
    contour.dedup_by(|a, b| close(*a, *b));
    while contour.len() > 1 && close(contour[0], contour[contour.len() - 1]) {
        contour.pop();
    }
    if contour.len() >= 3 {
        contours.push(contour);
    }
}

fn close(a: Vector2<f32>, b: Vector2<f32>) -> bool {
    (a.x - b.x).abs() <= MERGE_EPSILON && (a.y - b.y).abs() <= MERGE_EPSILON
}
