//! Integration tests for configuration management

use grad_planner::config::{Config, ConfigOverrides};
use grad_planner::core::planner::PlannerSettings;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(!config.logging.level.is_empty());
    assert_eq!(config.planning.epoch, "Winter 2026");
    assert_eq!(config.planning.courses_per_quarter, 3);
    assert_eq!(config.planning.max_terms, 24);
    assert!(config.planning.session_idle_secs > 0);
    assert!(!config.paths.catalog_file.is_empty());
    assert!(!config.paths.reports_dir.is_empty());
}

#[test]
fn test_defaults_produce_valid_planner_settings() {
    let settings = PlannerSettings::from_config(&Config::from_defaults()).unwrap();

    assert_eq!(settings.epoch.to_string(), "Winter 2026");
    assert_eq!(settings.courses_per_quarter, 3);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[planning]
epoch = "Fall 2025"
courses_per_quarter = 4
max_terms = 12
session_idle_secs = 90

[paths]
catalog_file = "./data/courses.json"
reports_dir = "./reports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.planning.epoch, "Fall 2025");
    assert_eq!(config.planning.courses_per_quarter, 4);
    assert_eq!(config.planning.max_terms, 12);
    assert_eq!(config.planning.session_idle_secs, 90);
    assert_eq!(config.paths.catalog_file, "./data/courses.json");
    assert_eq!(config.paths.reports_dir, "./reports");
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.planning.epoch, "");
    assert_eq!(config.planning.courses_per_quarter, 0);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$GRAD_PLANNER/test.log"

[paths]
catalog_file = "$GRAD_PLANNER/data/courses.json"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("gradplanner"));
    assert!(!config.logging.file.contains("$GRAD_PLANNER"));
    assert!(config.paths.catalog_file.ends_with("courses.json"));
    assert!(!config.paths.catalog_file.contains("$GRAD_PLANNER"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config.set("epoch", "Fall 2026").unwrap();
    config.set("courses-per-quarter", "5").unwrap();
    config.set("session_idle_secs", "120").unwrap();
    assert_eq!(config.get("epoch").unwrap(), "Fall 2026");
    assert_eq!(config.get("courses_per_quarter").unwrap(), "5");
    assert_eq!(config.planning.session_idle_secs, 120);

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.set("max_terms", "lots").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("max_terms", "6").unwrap();

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config.unset("max-terms", &defaults).unwrap();

    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.planning.max_terms, defaults.planning.max_terms);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("epoch", "Spring 2026").unwrap();

    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent).expect("Failed to create dir");
    }
    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(loaded_config.planning.epoch, "Spring 2026");
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        epoch: Some("Fall 2025".to_string()),
        courses_per_quarter: Some(2),
        catalog_file: Some("./catalog.json".to_string()),
        reports_dir: Some("./custom_reports".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.planning.epoch, "Fall 2025");
    assert_eq!(config.planning.courses_per_quarter, 2);
    assert_eq!(config.paths.catalog_file, "./catalog.json");
    assert_eq!(config.paths.reports_dir, "./custom_reports");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.planning.epoch, before.planning.epoch);
    assert_eq!(config.paths.catalog_file, before.paths.catalog_file);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[planning]"));
    assert!(display_str.contains("[paths]"));

    assert!(display_str.contains("epoch = \"Winter 2026\""));
    assert!(display_str.contains("courses_per_quarter = 3"));
    assert!(display_str.contains("catalog_file"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    // A config written before the [planning] section existed
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(changed);
    assert_eq!(config.planning.epoch, defaults.planning.epoch);
    assert_eq!(config.planning.max_terms, defaults.planning.max_terms);
    assert_eq!(config.paths.catalog_file, defaults.paths.catalog_file);
    assert!(!config.merge_defaults(&defaults));
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[planning]
epoch = "Fall 2025"
courses_per_quarter = 5
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.planning.epoch, "Fall 2025");
    assert_eq!(config.planning.courses_per_quarter, 5);
}

#[test]
fn test_get_gradplanner_dir() {
    let dir = Config::get_gradplanner_dir();

    assert!(dir.to_string_lossy().contains("gradplanner"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
