use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn empty_object_yields_defaults() {
    let cfg = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.grid_size, 16);
    assert_eq!(cfg.initial_expression, DEFAULT_EXPRESSION);
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas().unwrap(), Canvas { width: 320, height: 320 });
}

#[test]
fn fields_override_defaults() {
    let cfg = EngineConfig::from_json_str(
        r##"{
            "grid_size": 8,
            "canvas": { "width": 160, "height": 120 },
            "palette": { "positive": "#ffffff" },
            "initial_expression": "x/8",
            "presets": ["1", "0"],
            "start_paused": true,
            "fps": { "num": 30, "den": 1 }
        }"##,
    )
    .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.grid_size, 8);
    assert_eq!(cfg.canvas().unwrap(), Canvas { width: 160, height: 120 });
    assert_eq!(cfg.palette.positive, Rgba8::rgb(255, 255, 255));
    assert_eq!(cfg.palette.background, Palette::DEFAULT_BACKGROUND);
    assert_eq!(cfg.preset_library().unwrap().len(), 2);
    assert!(cfg.start_paused);
    assert_eq!(cfg.fps.num, 30);
}

#[test]
fn viewport_width_sets_square_canvas() {
    let cfg = EngineConfig::from_json_str(r#"{ "viewport_width": 1000 }"#).unwrap();
    assert_eq!(cfg.canvas().unwrap(), Canvas { width: 500, height: 500 });
}

#[test]
fn out_of_range_values_fail_validation() {
    let mut cfg = EngineConfig::default();
    cfg.grid_size = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.grid_size = crate::grid::MAX_GRID_SIZE + 1;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.presets.clear();
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.viewport_width = -4.0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.fps.den = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = EngineConfig::from_json_str("{ \"grid_size\": \"big\" }").unwrap_err();
    assert!(matches!(err, TixelError::Serde(_)));
    let err = EngineConfig::from_json_str("{ \"grid\": 3 }").unwrap_err();
    assert!(matches!(err, TixelError::Serde(_)));
    let err = EngineConfig::from_json_str(r##"{ "palette": { "positive": "#zzz" } }"##).unwrap_err();
    assert!(matches!(err, TixelError::Serde(_)));
}

#[test]
fn missing_file_is_reported() {
    assert!(EngineConfig::from_path("/definitely/not/here.json").is_err());
}
