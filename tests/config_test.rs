//! Integration tests for Settings config loading.
//!
//! These tests only use local config files in temp directories; they assume
//! no global config and no TREEBUILDER_* variables are present.

use std::fs;

use tempfile::TempDir;

use treebuilder::application::ApplicationError;
use treebuilder::config::{local_config_path, Settings};
use treebuilder::TraversalOrder;

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "default_order = \"post-order\"\nindent_width = 4\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.default_order, TraversalOrder::PostOrder);
    assert_eq!(settings.indent_width, 4);
    assert!(settings.color, "unspecified fields keep their defaults");
}

#[test]
fn given_zero_indent_width_when_load_then_fails_validation() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "indent_width = 0\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{err}");
}

#[test]
fn given_unknown_order_in_config_when_load_then_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "default_order = \"sideways\"\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains(".treebuilder.toml"), "{err}");
}

#[test]
fn given_settings_when_round_tripping_through_toml_then_values_survive() {
    let settings = Settings {
        default_order: TraversalOrder::InOrder,
        indent_width: 3,
        color: false,
    };

    let toml = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&toml).unwrap();

    assert_eq!(parsed, settings);
}
