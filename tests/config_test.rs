use matcap_text::config::{Config, DEFAULT_TEXT, ScatterParams, TextParams};

#[test]
fn defaults_describe_the_stock_scene() {
    let config = Config::default();
    assert_eq!(config.default_text, DEFAULT_TEXT);
    assert_eq!(config.shapes.count, 100);
    assert_eq!(config.text.size, 0.5);
    assert_eq!(config.text.depth, 0.2);
    assert_eq!(config.text.curve_segments, 12);
    assert!(config.text.bevel_enabled);
    assert_eq!(config.text.bevel_thickness, 0.03);
    assert_eq!(config.text.bevel_size, 0.02);
    assert_eq!(config.text.bevel_offset, 0.0);
    assert_eq!(config.text.bevel_segments, 5);
    assert!(config.seed.is_none());
}

#[test]
fn json_overrides_only_what_it_names() {
    let config = Config::from_json(
        r#"{ "default_text": "hello", "text": { "depth": 0.5 }, "shapes": { "count": 3 }, "seed": 42 }"#,
    )
    .expect("valid config");
    assert_eq!(config.default_text, "hello");
    assert_eq!(
        config.text,
        TextParams {
            depth: 0.5,
            ..TextParams::default()
        }
    );
    assert_eq!(
        config.shapes,
        ScatterParams {
            count: 3,
            ..ScatterParams::default()
        }
    );
    assert_eq!(config.seed(), 42);
    assert_eq!(config.font, Config::default().font);
}

#[test]
fn empty_object_is_the_default() {
    assert_eq!(Config::from_json("{}").expect("valid config"), Config::default());
}

#[test]
fn malformed_json_is_an_error() {
    assert!(Config::from_json("{ \"shapes\": { \"count\": -1 } }").is_err());
    assert!(Config::from_json("text").is_err());
}
