use super::*;

#[test]
fn configured_log_dir_is_created() {
    let tmp = tempfile::tempdir().unwrap();
    let config = UiConfig {
        log_dir: Some(tmp.path().join("nested").join("logs")),
        ..UiConfig::default()
    };
    let dir = log_dir(&config).unwrap();
    assert!(dir.is_dir());
    assert!(dir.ends_with("nested/logs"));
}

#[test]
fn bad_filter_falls_back_to_default() {
    let config = UiConfig {
        log_filter: Some("termwin=[".to_string()),
        ..UiConfig::default()
    };
    // Must not panic on invalid directives.
    let _ = env_filter(&config);
}
