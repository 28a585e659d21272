use super::*;
use std::io::Write;

#[test]
fn defaults_enable_mouse_and_ctrl_c() {
    let config = UiConfig::default();
    assert!(config.mouse_capture);
    assert!(config.exit_on_ctrl_c);
    assert_eq!(config.input_poll_interval(), Duration::from_millis(50));
    assert_eq!(config.root_background, Color::BLACK);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let config =
        UiConfig::from_json_str(r#"{"mouse_capture": false, "root_background": {"indexed": 4}}"#)
            .unwrap();
    assert!(!config.mouse_capture);
    assert!(config.exit_on_ctrl_c);
    assert_eq!(config.root_background, Color::Indexed(4));
    assert_eq!(config.input_poll_ms, 50);
}

#[test]
fn zero_poll_interval_is_clamped() {
    let config = UiConfig::from_json_str(r#"{"input_poll_ms": 0}"#).unwrap();
    assert_eq!(config.input_poll_interval(), Duration::from_millis(1));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = UiConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = UiConfig::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config, UiConfig::default());
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"exit_on_ctrl_c": false, "log_filter": "termwin=debug"}}"#).unwrap();
    let config = UiConfig::load(file.path()).unwrap();
    assert!(!config.exit_on_ctrl_c);
    assert_eq!(config.log_filter.as_deref(), Some("termwin=debug"));
}

#[test]
fn round_trips_through_json() {
    let config = UiConfig {
        log_dir: Some(PathBuf::from("/tmp/termwin")),
        ..UiConfig::default()
    };
    let data = serde_json::to_string(&config).unwrap();
    assert_eq!(UiConfig::from_json_str(&data).unwrap(), config);
}
