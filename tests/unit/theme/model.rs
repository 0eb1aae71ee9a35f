use super::*;

#[test]
fn defaults_match_empty_document() {
    let theme = Theme::from_json_str("{}").unwrap();
    assert_eq!(theme, Theme::default());
    assert_eq!(theme.line_height(), 108.0);
}

#[test]
fn color_fallback_chain_is_resolved_once() {
    let theme = Theme::from_json_str(r##"{ "text_color": "#aabbcc" }"##).unwrap();
    assert_eq!(theme.active_text_color, Rgba8::rgb(0xaa, 0xbb, 0xcc));
    assert_eq!(theme.active_glow_color, Rgba8::rgb(0xaa, 0xbb, 0xcc));

    let theme = Theme::from_json_str(
        r##"{ "text_color": "#aabbcc", "active_text_color": "#ff0000" }"##,
    )
    .unwrap();
    assert_eq!(theme.active_glow_color, Rgba8::rgb(0xff, 0, 0));

    let theme = Theme::from_json_str(
        r##"{ "active_text_color": "#ff0000", "active_glow_color": "#00ff00" }"##,
    )
    .unwrap();
    assert_eq!(theme.text_color, Rgba8::rgb(0xff, 0xff, 0xff));
    assert_eq!(theme.active_glow_color, Rgba8::rgb(0, 0xff, 0));
}

#[test]
fn legacy_keys_map_to_new_fields() {
    let theme = Theme::from_json_str(
        r#"{ "glow_enabled": false, "inactive_alphas": [0.5], "line_height": 144, "font_size": 72 }"#,
    )
    .unwrap();
    assert!(!theme.active_text_glow);
    assert_eq!(theme.inactive_text_opacity_gradient, vec![0.5]);
    assert_eq!(theme.line_spacing, 2.0);
    assert_eq!(theme.line_height(), 144.0);

    let theme = Theme::from_json_str(
        r#"{ "glow_enabled": false, "active_text_glow": true, "inactive_alphas": [0.5], "inactive_text_opacity_gradient": [0.9, 0.1] }"#,
    )
    .unwrap();
    assert!(theme.active_text_glow);
    assert_eq!(theme.inactive_text_opacity_gradient, vec![0.9, 0.1]);
}

#[test]
fn validation_reports_every_problem() {
    let err = Theme::from_json_str(
        r##"{
            "text_color": "white",
            "lyric_position": "middle",
            "highlight_mode": "syllable",
            "inactive_text_opacity_gradient": [0.5, 1.5],
            "font_size": 12.5,
            "line_spacing": 0
        }"##,
    )
    .unwrap_err();
    let LyricaError::InvalidConfig(msg) = err else {
        panic!("expected InvalidConfig, got {err:?}");
    };
    for key in [
        "text_color",
        "lyric_position",
        "highlight_mode",
        "inactive_text_opacity_gradient",
        "font_size",
        "line_spacing",
    ] {
        assert!(msg.contains(key), "missing {key} in {msg}");
    }
}

#[test]
fn shadow_and_modes_parse() {
    let theme = Theme::from_json_str(
        r##"{
            "text_shadow": true,
            "text_shadow_color": "#101010",
            "text_shadow_offset": [4, 2],
            "lyric_position": "Left",
            "highlight_mode": "word"
        }"##,
    )
    .unwrap();
    assert_eq!(
        theme.text_shadow,
        Some(TextShadow {
            color: Rgba8::rgb(0x10, 0x10, 0x10),
            offset: [4.0, 2.0],
        })
    );
    assert_eq!(theme.lyric_position, LyricPosition::Left);
    assert_eq!(theme.highlight_mode, HighlightMode::Word);
}

#[test]
fn engine_config_carries_geometry() {
    let theme = Theme::default();
    let cfg = theme.engine_config(Canvas::FULL_HD);
    assert_eq!(cfg.line_height, 108.0);
    assert_eq!(cfg.inactive_opacity_gradient, vec![0.6, 0.4, 0.2]);
    assert!(cfg.validate().is_ok());
}
