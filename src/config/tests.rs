use super::*;

#[test]
fn empty_file_gives_defaults() {
    let mut config = Config::from_toml("").unwrap();
    config.validate_and_clamp();
    assert_eq!(config.style(), Style::default());
    assert_eq!(config.size_limits(), SizeLimits::default());
    assert_eq!(config.mode_settings(), ModeSettings::default());
    assert_eq!(config.initial_mode(), EditorMode::Arrow);

    let board = config.build_board();
    assert_eq!(board.outline().width(), 100_000_000);
    assert_eq!(board.layers().len(), 3);
}

#[test]
fn unit_strings_and_raw_values_are_accepted() {
    let mut config = Config::from_toml(
        r#"
        [board]
        width = "160mm"
        height = 50000000
        layers = ["front", "back"]

        [defaults]
        line_thickness = "8mil"

        [editing]
        grid = "1mm"
        initial_mode = "Line"
        undo_limit = 5
        "#,
    )
    .unwrap();
    config.validate_and_clamp();

    assert_eq!(config.style().line_thickness, 203_200);
    assert_eq!(config.mode_settings().grid, 1_000_000);
    assert_eq!(config.initial_mode(), EditorMode::Line);

    let session = config.build_session();
    assert_eq!(session.board.outline().width(), 160_000_000);
    assert_eq!(session.board.outline().height(), 50_000_000);
    assert_eq!(session.board.layer_by_name("front").map(|l| l.id), Some(session.layer));
    assert_eq!(session.undo_log().depth(), 0);
}

#[test]
fn invalid_values_are_clamped() {
    let mut config = Config::from_toml(
        r#"
        [limits]
        min_size = "20mil"
        max_size = "5mil"

        [defaults]
        line_thickness = "fat"
        via_diameter = "40mil"
        via_drill = "60mil"

        [editing]
        min_polygon_vertices = 1
        initial_mode = "sculpt"
        grid = "-1mm"
        "#,
    )
    .unwrap();
    config.validate_and_clamp();

    let limits = config.size_limits();
    assert_eq!(limits.size.min, 127_000);
    assert_eq!(limits.size.max, 508_000);
    assert_eq!(config.editing.min_polygon_vertices, 3);
    assert_eq!(config.initial_mode(), EditorMode::Arrow);
    assert_eq!(config.mode_settings().grid, 0);

    let style = config.style();
    assert_eq!(style.line_thickness, 254_000);
    assert!(style.via_drill < style.via_diameter);
}

#[test]
fn defaults_are_pulled_inside_limits() {
    let mut config = Config::from_toml(
        r#"
        [limits]
        max_clearance = "5mil"
        "#,
    )
    .unwrap();
    config.validate_and_clamp();
    assert_eq!(config.style().clearance, 127_000);
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(Config::from_toml("[board\nwidth = 1").is_err());
}

#[test]
fn load_from_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[editing]\nmin_polygon_vertices = 0\n").unwrap();
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.editing.min_polygon_vertices, 3);

    assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
}

#[test]
fn schema_describes_every_section() {
    let schema = serde_json::to_value(Config::json_schema()).unwrap();
    let properties = schema.get("properties").unwrap();
    for section in ["board", "defaults", "limits", "editing", "keybindings"] {
        assert!(properties.get(section).is_some(), "missing {section}");
    }
}

#[test]
fn example_config_parses() {
    let text = include_str!("../../config.example.toml");
    let mut config = Config::from_toml(text).unwrap();
    config.validate_and_clamp();
    config.keybindings.build_action_map().unwrap();
}
