//! Integration tests for Settings layered loading.
//!
//! These tests use explicit config files in temp directories; a global
//! config on the test machine, if any, sits below them in precedence.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use forumtree::application::ApplicationError;
use forumtree::config::Settings;

#[test]
fn given_explicit_config_when_load_then_overrides_fields() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("forumtree.toml");
    fs::write(
        &config,
        r#"
store_path = "/srv/forums/tree.toml"
indent = "----"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&config)).expect("load settings");

    assert_eq!(settings.store_path, PathBuf::from("/srv/forums/tree.toml"));
    assert_eq!(settings.indent, "----");
}

#[test]
fn given_partial_config_when_load_then_keeps_default_indent() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("forumtree.toml");
    fs::write(&config, "store_path = \"/tmp/forums.toml\"\n").unwrap();

    let settings = Settings::load(Some(&config)).expect("load settings");

    assert_eq!(settings.store_path, PathBuf::from("/tmp/forums.toml"));
    assert!(!settings.indent.is_empty());
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(&temp.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("forumtree.toml");
    fs::write(&config, "store_path = [unterminated").unwrap();

    let result = Settings::load(Some(&config));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_rendering_toml_then_parses_back() {
    let settings = Settings {
        store_path: PathBuf::from("/data/forums.toml"),
        indent: "  ".to_string(),
    };

    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(parsed, settings);
}
