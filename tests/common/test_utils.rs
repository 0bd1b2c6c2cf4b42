#![allow(dead_code)]

use matcap_text::{
    config::Config,
    controller::{SceneController, UiEvent},
    font::Font,
    overlay::HeadlessOverlay,
};
use rand::{SeedableRng, rngs::SmallRng};

/// A tiny typeface: resolution 1000, one em is 1000 units.
///
/// - `o` is a 600x700 square with a 300x400 hole
/// - `i` is a 200x700 bar without an explicit closing point
/// - `c` ends in a quadratic curve, `s` in a cubic one
/// - ` ` only advances
/// - `?` is the fallback glyph, a 400x700 bar
pub const FIXTURE_FONT: &str = r#"{
    "glyphs": {
        "o": { "ha": 700, "o": "m 0 0 l 600 0 l 600 700 l 0 700 l 0 0 m 150 150 l 150 550 l 450 550 l 450 150 l 150 150" },
        "i": { "ha": 300, "o": "m 0 0 l 200 0 l 200 700 l 0 700" },
        "c": { "ha": 600, "o": "m 0 0 l 500 0 q 500 700 600 350 l 0 700" },
        "s": { "ha": 600, "o": "m 0 0 l 500 0 b 500 700 700 200 700 500 l 0 700" },
        " ": { "ha": 300 },
        "?": { "ha": 500, "o": "m 0 0 l 400 0 l 400 700 l 0 700 z" }
    },
    "familyName": "Fixture",
    "resolution": 1000,
    "boundingBox": { "yMin": -300, "yMax": 1000, "xMin": 0, "xMax": 700 },
    "underlineThickness": 50
}"#;

pub const SEED: u64 = 7;

pub fn fixture_font() -> Font {
    Font::from_json(FIXTURE_FONT).expect("fixture font parses")
}

/// Default configuration drawn with a fixed seed. The default text only uses
/// glyphs the fixture font covers.
pub fn fixture_config() -> Config {
    Config {
        default_text: "oi".to_string(),
        seed: Some(SEED),
        ..Config::default()
    }
}

pub fn controller(config: Config) -> SceneController {
    SceneController::new(
        config,
        Some(fixture_font()),
        Box::new(HeadlessOverlay::new()),
    )
}

pub fn bootstrapped(config: Config) -> SceneController {
    let seed = config.seed();
    let mut controller = controller(config);
    controller.bootstrap(&mut SmallRng::seed_from_u64(seed));
    controller
}

pub fn key(key: &str) -> UiEvent {
    UiEvent::KeyDown {
        key: key.to_string(),
        text: None,
    }
}

/// Send every character of `text` as a key press that produces it.
pub fn type_text(controller: &mut SceneController, text: &str) {
    for ch in text.chars() {
        controller.handle(UiEvent::KeyDown {
            key: ch.to_string(),
            text: Some(ch.to_string()),
        });
    }
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
